//! Error types for solver operations.

use hb_components::ComponentError;
use hb_core::error::HbError;
use thiserror::Error;

/// Errors that can occur while solving for the pump operating point or ΔT.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for HbError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::ProblemSetup { what: _ } => HbError::InvalidArg {
                what: "problem setup",
            },
            SolverError::Component(inner) => inner.into(),
        }
    }
}
