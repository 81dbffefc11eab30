//! Water velocity check against the noise limit.

use hb_components::pipe::MAX_VELOCITY_M_S;
use hb_components::velocity;
use hb_core::round3;
use hb_core::units::{kg_per_h, mm, to_m_per_s};

use crate::hydraulics::HydraulicDesign;
use crate::input::DesignInput;

#[derive(Debug, Clone, PartialEq)]
pub struct VelocityCheck {
    /// Indexed like the radiator table.
    pub radiator_m_s: Vec<f64>,
    /// Canonical collector order.
    pub collector_m_s: Vec<f64>,
    pub warnings: Vec<String>,
}

fn velocity_m_s(flow_kg_h: f64, diameter_mm: f64) -> f64 {
    round3(to_m_per_s(velocity(kg_per_h(flow_kg_h), mm(diameter_mm))))
}

/// Velocities of every circuit; circuits above the limit get a warning.
pub fn check(input: &DesignInput, flows: &[f64], hydraulics: &HydraulicDesign) -> VelocityCheck {
    let mut warnings = Vec::new();

    let radiator_m_s = input
        .radiators
        .iter()
        .zip(flows)
        .zip(&hydraulics.radiators)
        .map(|((radiator, &flow), row)| {
            let v = velocity_m_s(flow, row.diameter_mm);
            if v > MAX_VELOCITY_M_S {
                warnings.push(format!(
                    "High velocity radiator {}: {v:.2} m/s > {MAX_VELOCITY_M_S:.2} m/s",
                    radiator.id
                ));
            }
            v
        })
        .collect();

    let collector_m_s = hydraulics
        .collectors
        .iter()
        .map(|c| {
            let v = velocity_m_s(c.mass_flow_kg_h, c.diameter_mm);
            if v > MAX_VELOCITY_M_S {
                warnings.push(format!(
                    "High velocity collector {}: {v:.2} m/s > {MAX_VELOCITY_M_S:.2} m/s",
                    c.name
                ));
            }
            v
        })
        .collect();

    VelocityCheck {
        radiator_m_s,
        collector_m_s,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_velocity() {
        // 70.3 kg/h through 10 mm
        assert_eq!(velocity_m_s(70.3, 10.0), 0.249);
        assert_eq!(velocity_m_s(0.0, 10.0), 0.0);
        assert!(velocity_m_s(400.0, 16.0) > MAX_VELOCITY_M_S);
    }
}
