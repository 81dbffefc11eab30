//! Network-specific error types.

use hb_core::{HbError, RadiatorId};

pub type NetworkResult<T> = Result<T, NetworkError>;

/// Network construction and aggregation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The network has no collectors or no radiators.
    Empty { what: &'static str },

    /// Two collectors share a name.
    DuplicateCollector { name: String },

    /// Two radiators share a number.
    DuplicateRadiator { id: RadiatorId },

    /// A radiator names a collector that doesn't exist.
    UnknownCollector {
        radiator: RadiatorId,
        collector: String,
    },

    /// A per-element table doesn't match the network size.
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::Empty { what } => write!(f, "Network has no {}", what),
            NetworkError::DuplicateCollector { name } => {
                write!(f, "Collector '{}' is defined more than once", name)
            }
            NetworkError::DuplicateRadiator { id } => {
                write!(f, "Radiator {} is defined more than once", id)
            }
            NetworkError::UnknownCollector {
                radiator,
                collector,
            } => {
                write!(
                    f,
                    "Radiator {} refers to non-existent collector '{}'",
                    radiator, collector
                )
            }
            NetworkError::LengthMismatch {
                what,
                expected,
                actual,
            } => {
                write!(f, "{} has {} entries (expected {})", what, actual, expected)
            }
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<NetworkError> for HbError {
    fn from(err: NetworkError) -> Self {
        HbError::Invariant {
            what: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_subject() {
        let err = NetworkError::UnknownCollector {
            radiator: RadiatorId::new(3).unwrap(),
            collector: "B".into(),
        };
        assert_eq!(
            err.to_string(),
            "Radiator 3 refers to non-existent collector 'B'"
        );
    }

    #[test]
    fn converts_to_core_error() {
        let err: HbError = NetworkError::Empty { what: "radiators" }.into();
        assert!(matches!(err, HbError::Invariant { .. }));
    }
}
