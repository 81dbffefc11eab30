//! hb-core: stable foundation for hydrobal.
//!
//! Contains:
//! - units (uom SI types + constructors for the hydronic units in use)
//! - numeric (Real, finiteness checks, reporting rounding)
//! - ids (radiator identifiers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HbError, HbResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
