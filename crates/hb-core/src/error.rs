use thiserror::Error;

pub type HbResult<T> = Result<T, HbError>;

#[derive(Error, Debug)]
pub enum HbError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Infeasible configuration: {message}")]
    Infeasible { message: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
