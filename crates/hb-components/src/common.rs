//! Common constants and helpers for hydraulic calculations.

use crate::error::{ComponentError, ComponentResult};
use hb_core::numeric::ensure_finite;

/// Pressure loss (Pa) of a 1 m³/h flow through a kv = 1 element.
pub const HYDRAULIC_CONSTANT_PA: f64 = 97_180.0;

/// Allowance for fittings and bends on top of straight piping.
pub const LOCAL_LOSS_COEFFICIENT: f64 = 1.3;

/// Fixed boiler loss, added once per radiator circuit.
pub const PRESSURE_LOSS_BOILER_PA: f64 = 350.0;

/// kv of a radiator body (m³/h).
pub const KV_RADIATOR_M3_H: f64 = 2.0;

/// kv of a collector body (m³/h).
pub const KV_COLLECTOR_M3_H: f64 = 14.66;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Pressure loss (Pa) across an element of flow coefficient `kv` (m³/h).
///
/// Zero flow gives zero loss; a non-positive kv with flow gives +∞.
pub fn kv_pressure_loss_pa(mass_flow_kg_h: f64, kv: f64) -> f64 {
    if mass_flow_kg_h == 0.0 {
        return 0.0;
    }
    if kv <= 0.0 {
        return f64::INFINITY;
    }
    HYDRAULIC_CONSTANT_PA * (mass_flow_kg_h / 1000.0 / kv).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_finite() {
        assert!(check_finite(1.0, "test").is_ok());
        assert!(check_finite(f64::INFINITY, "test").is_err());
        assert!(check_finite(f64::NAN, "test").is_err());
    }

    #[test]
    fn kv_loss_reference_point() {
        // 1 m³/h through kv 1 loses the hydraulic constant
        assert!((kv_pressure_loss_pa(1000.0, 1.0) - HYDRAULIC_CONSTANT_PA).abs() < 1e-9);
        // doubling the flow quadruples the loss
        let a = kv_pressure_loss_pa(100.0, 2.0);
        let b = kv_pressure_loss_pa(200.0, 2.0);
        assert!((b / a - 4.0).abs() < 1e-12);
    }

    #[test]
    fn kv_loss_degenerate_inputs() {
        assert_eq!(kv_pressure_loss_pa(0.0, 0.0), 0.0);
        assert!(kv_pressure_loss_pa(10.0, 0.0).is_infinite());
        assert!(kv_pressure_loss_pa(10.0, -1.0).is_infinite());
    }
}
