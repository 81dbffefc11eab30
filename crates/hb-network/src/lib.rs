//! hb-network: collector/radiator topology for hb.
//!
//! Provides:
//! - Network builder with validation
//! - Immutable network with collectors in canonical (name) order
//! - Collector flow aggregation and downstream pressure accumulation
//!
//! Collectors are taken to be plumbed in series toward the boiler in name
//! order: a collector's downstream set is itself plus every collector whose
//! name sorts after it.
//!
//! # Example
//!
//! ```
//! use hb_core::RadiatorId;
//! use hb_network::NetworkBuilder;
//!
//! let mut builder = NetworkBuilder::new();
//! builder.add_collector("Collector 2");
//! builder.add_collector("Collector 1");
//! builder.add_radiator(RadiatorId::new(1).unwrap(), "Collector 2");
//! let network = builder.build().unwrap();
//!
//! assert_eq!(network.collectors()[0].name, "Collector 1");
//! assert_eq!(network.downstream(0), 0..2);
//! ```

pub mod aggregate;
pub mod builder;
pub mod error;
pub mod network;
pub(crate) mod validate;

pub use aggregate::{collector_flows, downstream_losses, total_pressure_losses};
pub use builder::NetworkBuilder;
pub use error::{NetworkError, NetworkResult};
pub use network::{CollectorNode, Network, RadiatorNode};
