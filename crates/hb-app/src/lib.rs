//! Shared application service layer for hydrobal.
//!
//! This crate runs the hydronic design pipeline for CLI and UI frontends:
//! heat-load split, thermal design per mode, pipe sizing, network
//! aggregation, pump operating point and sizing search, valve balancing and
//! the velocity check.

pub mod balancing;
pub mod design_service;
pub mod error;
pub mod heat_load;
pub mod hydraulics;
pub mod input;
pub mod progress;
pub mod project_service;
pub mod pump_mode;
pub mod results;
pub mod thermal_design;
pub mod velocity;

// Re-export key types for convenience
pub use design_service::{run_design, run_design_with_progress};
pub use error::{AppError, AppResult};
pub use input::{DesignInput, RadiatorInput, ValveOverride};
pub use progress::{DesignProgressEvent, DesignStage};
pub use project_service::{
    ConfigOverrides, design_project, design_project_file, design_project_with_progress,
    load_project, save_project, validate_project,
};
pub use results::{CollectorResult, DesignMetrics, DesignReport, RadiatorResult};
