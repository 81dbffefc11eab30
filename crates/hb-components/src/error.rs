//! Error types for component operations.

use hb_core::error::HbError;
use thiserror::Error;

/// Errors that can occur during component calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Infeasible: {message}")]
    Infeasible { message: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown valve: {name}")]
    UnknownValve { name: String },

    #[error("Unknown pump curve: {model} ({speed})")]
    UnknownPumpCurve { model: String, speed: String },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl ComponentError {
    /// Message for attributing the error to a named element; infeasibility
    /// messages are returned without the variant prefix.
    pub fn detail(&self) -> String {
        match self {
            ComponentError::Infeasible { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<ComponentError> for HbError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonPhysical { what } => HbError::InvalidArg { what },
            ComponentError::Infeasible { message } => HbError::Infeasible { message },
            ComponentError::InvalidArg { what } => HbError::InvalidArg { what },
            ComponentError::UnknownValve { .. } => HbError::InvalidArg {
                what: "unknown valve",
            },
            ComponentError::UnknownPumpCurve { .. } => HbError::InvalidArg {
                what: "unknown pump curve",
            },
        }
    }
}
