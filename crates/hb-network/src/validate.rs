//! Network validation logic.

use std::collections::HashSet;

use hb_core::RadiatorId;

use crate::error::{NetworkError, NetworkResult};

/// Validate raw builder input: non-empty, unique names and ids, known collectors.
pub(crate) fn validate_structure(
    collectors: &[String],
    radiators: &[(RadiatorId, String)],
) -> NetworkResult<()> {
    if collectors.is_empty() {
        return Err(NetworkError::Empty { what: "collectors" });
    }
    if radiators.is_empty() {
        return Err(NetworkError::Empty { what: "radiators" });
    }

    let mut names = HashSet::new();
    for name in collectors {
        if !names.insert(name.as_str()) {
            return Err(NetworkError::DuplicateCollector { name: name.clone() });
        }
    }

    let mut ids = HashSet::new();
    for (id, collector) in radiators {
        if !ids.insert(*id) {
            return Err(NetworkError::DuplicateRadiator { id: *id });
        }
        if !names.contains(collector.as_str()) {
            return Err(NetworkError::UnknownCollector {
                radiator: *id,
                collector: collector.clone(),
            });
        }
    }

    Ok(())
}

/// Check a per-element table against the network size.
pub(crate) fn expect_len<T>(what: &'static str, values: &[T], expected: usize) -> NetworkResult<()> {
    if values.len() != expected {
        return Err(NetworkError::LengthMismatch {
            what,
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> RadiatorId {
        RadiatorId::new(n).unwrap()
    }

    #[test]
    fn accepts_valid_input() {
        let collectors = vec!["A".to_string(), "B".to_string()];
        let radiators = vec![(id(1), "A".to_string()), (id(2), "B".to_string())];
        assert!(validate_structure(&collectors, &radiators).is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(
            validate_structure(&[], &[(id(1), "A".into())]),
            Err(NetworkError::Empty { what: "collectors" })
        );
        assert_eq!(
            validate_structure(&["A".into()], &[]),
            Err(NetworkError::Empty { what: "radiators" })
        );
    }

    #[test]
    fn rejects_duplicates() {
        let dup_col = validate_structure(&["A".into(), "A".into()], &[(id(1), "A".into())]);
        assert!(matches!(dup_col, Err(NetworkError::DuplicateCollector { .. })));

        let dup_rad = validate_structure(&["A".into()], &[(id(1), "A".into()), (id(1), "A".into())]);
        assert!(matches!(dup_rad, Err(NetworkError::DuplicateRadiator { .. })));
    }

    #[test]
    fn rejects_unknown_collector() {
        let result = validate_structure(&["A".into()], &[(id(4), "Z".into())]);
        assert!(matches!(result, Err(NetworkError::UnknownCollector { .. })));
    }

    #[test]
    fn length_check() {
        assert!(expect_len("flows", &[1.0, 2.0], 2).is_ok());
        assert!(expect_len("flows", &[1.0], 2).is_err());
    }
}
