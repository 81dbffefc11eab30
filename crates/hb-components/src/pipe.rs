//! Circuit piping: empirical kv(d) fit, diameter selection and velocity.

use crate::common::{LOCAL_LOSS_COEFFICIENT, check_finite, kv_pressure_loss_pa};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{HydraulicResistance, checked_flow_kg_h};
use hb_core::units::constants::WATER_DENSITY_KG_M3;
use hb_core::units::{
    Length, MassRate, Pressure, SECONDS_PER_HOUR, Velocity, Volume, m_per_s, mm, pa, to_kg_per_h,
    to_m,
};

/// Pipe kv polynomial: kv = A·d² + B·d + C (d in metres).
pub const KV_PIPE_A: f64 = 51_626.0;
pub const KV_PIPE_B: f64 = -417.39;
pub const KV_PIPE_C: f64 = 1.5541;

/// Standard inner diameters (mm), ascending.
pub const DIAMETER_LADDER_MM: [f64; 15] = [
    8.0, 10.0, 12.0, 13.0, 14.0, 16.0, 18.0, 20.0, 22.0, 25.0, 26.0, 28.0, 32.0, 36.0, 50.0,
];

/// Comfort limit on water velocity (m/s).
pub const MAX_VELOCITY_M_S: f64 = 0.5;

/// Empirical minimum diameter: d_min = 1.4641 · ṅ^0.4217 (mm, ṅ in kg/h).
pub const MIN_DIAMETER_COEFF: f64 = 1.4641;
pub const MIN_DIAMETER_EXPONENT: f64 = 0.4217;

/// Supply and return runs of a radiator or collector circuit.
///
/// The loss covers both runs (×2) plus the fixed local-loss allowance (×1.3).
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    name: String,
    /// One-way circuit length
    pub length: Length,
    /// Inner diameter
    pub diameter: Length,
}

impl Pipe {
    /// Create a new pipe.
    pub fn new(name: impl Into<String>, length: Length, diameter: Length) -> Self {
        Self {
            name: name.into(),
            length,
            diameter,
        }
    }

    /// Flow coefficient per metre of run from the empirical fit.
    ///
    /// Can come out non-positive for diameters outside the fitted range.
    pub fn kv(&self) -> f64 {
        let d = to_m(self.diameter);
        KV_PIPE_A * d * d + KV_PIPE_B * d + KV_PIPE_C
    }

    /// Water held by one run of the circuit.
    pub fn water_volume(&self) -> Volume {
        let r = self.diameter / 2.0;
        r * r * self.length * std::f64::consts::PI
    }
}

impl HydraulicResistance for Pipe {
    fn name(&self) -> &str {
        &self.name
    }

    fn pressure_loss(&self, mdot: MassRate) -> ComponentResult<Pressure> {
        let flow = checked_flow_kg_h(mdot)?;
        let length = to_m(self.length);
        check_finite(length, "circuit length")?;

        let kv = self.kv();
        if kv <= 0.0 {
            return Ok(pa(f64::INFINITY));
        }

        let per_metre = kv_pressure_loss_pa(flow, kv);
        Ok(pa(per_metre * length * 2.0 * LOCAL_LOSS_COEFFICIENT))
    }
}

/// Mean water velocity for a mass flow through a pipe of the given diameter.
///
/// A zero diameter reports zero velocity.
pub fn velocity(mdot: MassRate, diameter: Length) -> Velocity {
    let r = to_m(diameter) / 2.0;
    let area = std::f64::consts::PI * r * r;
    if area == 0.0 {
        return m_per_s(0.0);
    }
    let kg_s = to_kg_per_h(mdot) / SECONDS_PER_HOUR;
    m_per_s(kg_s / (WATER_DENSITY_KG_M3 * area))
}

/// Empirical minimum inner diameter (mm) for a flow in kg/h.
pub fn minimum_diameter_mm(flow_kg_h: f64) -> f64 {
    MIN_DIAMETER_COEFF * flow_kg_h.powf(MIN_DIAMETER_EXPONENT)
}

/// Whether a diameter (mm) is on the standard ladder.
pub fn is_standard_diameter(diameter_mm: f64) -> bool {
    DIAMETER_LADDER_MM.iter().any(|&d| d == diameter_mm)
}

/// Select the standard diameter nearest to the empirical minimum, never below it.
pub fn select_diameter(mdot: MassRate) -> ComponentResult<Length> {
    let flow = to_kg_per_h(mdot);
    if !flow.is_finite() {
        return Err(ComponentError::Infeasible {
            message: "mass flow rate is not finite; check collector configuration".to_string(),
        });
    }
    if flow < 0.0 {
        return Err(ComponentError::Infeasible {
            message: format!(
                "negative mass flow rate ({flow:.1} kg/h); increase radiator power, ΔT or supply temperature"
            ),
        });
    }

    let d_min = minimum_diameter_mm(flow);
    DIAMETER_LADDER_MM
        .iter()
        .copied()
        .find(|&d| d >= d_min)
        .map(mm)
        .ok_or_else(|| ComponentError::Infeasible {
            message: format!(
                "mass flow {flow:.1} kg/h exceeds all standard diameters; increase ΔT or split into parallel radiators"
            ),
        })
}
