//! Error types for the hb-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and classifies design failures for CLI and UI frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to write report: {path}")]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A physically impossible operating point, attributed to a radiator or collector.
    #[error("Infeasible configuration ({subject}): {message}")]
    Infeasible { subject: String, message: String },

    /// Input that must be completed before a design can run.
    #[error("Incomplete configuration: {0}")]
    Incomplete(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Component error: {0}")]
    Component(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for hb-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Infeasibility attributed to a radiator.
    pub fn radiator(id: impl std::fmt::Display, message: impl ToString) -> Self {
        AppError::Infeasible {
            subject: format!("Radiator {id}"),
            message: message.to_string(),
        }
    }

    /// Infeasibility attributed to a collector.
    pub fn collector(name: impl std::fmt::Display, message: impl ToString) -> Self {
        AppError::Infeasible {
            subject: format!("Collector {name}"),
            message: message.to_string(),
        }
    }
}

// Conversions from backend error types
impl From<hb_project::ProjectError> for AppError {
    fn from(err: hb_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<hb_project::ValidationError> for AppError {
    fn from(err: hb_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<hb_network::NetworkError> for AppError {
    fn from(err: hb_network::NetworkError) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<hb_solver::SolverError> for AppError {
    fn from(err: hb_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}

impl From<hb_components::ComponentError> for AppError {
    fn from(err: hb_components::ComponentError) -> Self {
        AppError::Component(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
