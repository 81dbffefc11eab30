//! hb-components: element library for hydronic heating circuits.
//!
//! Provides models for the elements of a radiator network:
//! - Radiator thermal duty (supply/return temperature and mass flow)
//! - Pipes with the empirical kv(d) fit and standard diameter selection
//! - Radiator and collector bodies with fixed kv
//! - Thermostatic valves (catalog, custom and reference characteristics)
//! - Pump curves and quadratic system curves
//!
//! Hydraulic elements implement the `HydraulicResistance` trait and are pure
//! functions of their parameters and the mass flow through them.
//!
//! # Example
//!
//! ```
//! use hb_components::{FixedKv, HydraulicResistance, Pipe};
//! use hb_core::units::{kg_per_h, m, mm, to_pa};
//!
//! let pipe = Pipe::new("circuit 1", m(10.0), mm(16.0));
//! let body = FixedKv::radiator_body();
//!
//! let flow = kg_per_h(70.3);
//! let dp = pipe.pressure_loss(flow).unwrap() + body.pressure_loss(flow).unwrap();
//! println!("Circuit loss: {:.1} Pa", to_pa(dp));
//! ```

pub mod common;
pub mod error;
pub mod pipe;
pub mod pump;
pub mod thermal;
pub mod traits;
pub mod valve;

// Re-exports
pub use error::{ComponentError, ComponentResult};
pub use pipe::{DIAMETER_LADDER_MM, Pipe, select_diameter, velocity};
pub use pump::{PumpCurve, PumpLibrary, SystemCurve};
pub use thermal::{DutyPoint, RadiatorDuty, extra_power_needed, q_ratio};
pub use traits::{FixedKv, HydraulicResistance};
pub use valve::{ValveCatalog, ValveCharacteristic, ValveSetting, kv_needed};
