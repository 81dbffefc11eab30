//! Finiteness checks and the rounding used for reported values.

use crate::HbError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, HbError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HbError::NonFinite { what, value: v })
    }
}

/// Round to `decimals` places, half away from zero.
///
/// Reported values are rounded, and the thermal chain reuses the rounded
/// values, so results stay reproducible against reference fixtures.
pub fn round_to(v: Real, decimals: i32) -> Real {
    let scale = 10_f64.powi(decimals);
    (v * scale).round() / scale
}

/// Round to 0.1 (temperatures, flows, pressure losses).
pub fn round1(v: Real) -> Real {
    round_to(v, 1)
}

/// Round to 0.01 (water volumes).
pub fn round2(v: Real) -> Real {
    round_to(v, 2)
}

/// Round to 0.001 (velocities).
pub fn round3(v: Real) -> Real {
    round_to(v, 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round1(64.25), 64.3);
        assert_eq!(round1(-0.25), -0.3);
        assert_eq!(round1(12.04), 12.0);
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round3(0.123_45), 0.123);
    }

    #[test]
    fn rounding_keeps_non_finite() {
        assert!(round1(f64::INFINITY).is_infinite());
        assert!(round1(f64::NAN).is_nan());
    }
}
