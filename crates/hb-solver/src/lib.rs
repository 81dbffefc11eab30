//! Pump operating point and pump-sizing search for hydronic networks.
//!
//! Both procedures are bounded: the operating point is a single scan over a
//! fixed flow grid, and the ΔT search is a bisection capped by iteration count
//! and bracket width. Neither holds state between calls.

pub mod delta_t_search;
pub mod error;
pub mod operating_point;

pub use delta_t_search::{
    DeltaTSearch, DeltaTSearchConfig, DeltaTTrial, Trial, TrialStatus, search_min_delta_t,
};
pub use error::{SolverError, SolverResult};
pub use operating_point::{
    OperatingPoint, OperatingPointConfig, OperatingPointOutcome, OperatingPointSolution,
    PumpSystemCurves, solve_operating_point,
};
