//! Radiator thermal duty: output-ratio law, supply/return temperatures and mass flow.
//!
//! Temperatures are °C, powers W and flows kg/h. Each step rounds to 0.1 and the
//! next step consumes the rounded value, so results reproduce reference tables.

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};
use hb_core::numeric::round1;
use hb_core::units::SECONDS_PER_HOUR;
use hb_core::units::constants::WATER_CP_J_KGK;

/// Characteristic temperature of the output-ratio law (K).
pub const T_FACTOR: f64 = 49.83;

/// Radiator output exponent.
pub const EXPONENT_RADIATOR: f64 = 1.34;

/// Mean excess temperature at the 75/65/20 rating point (K).
pub const DELTA_T_REF: f64 = (75.0 + 65.0) / 2.0 - 20.0;

/// Lift above space temperature used when the output law gives no finite supply.
pub const MIN_LIFT_K: f64 = 3.0;

/// Floor on supply − return when converting heat to flow.
pub const MIN_FLOW_DELTA_K: f64 = 0.1;

/// Required-output ratio: net heat demand over rated output.
///
/// Electric pre-heat is subtracted first; a non-positive rated output gives 0.
pub fn q_ratio(heat_loss_w: f64, electric_power_w: f64, rated_power_w: f64) -> f64 {
    if rated_power_w <= 0.0 {
        return 0.0;
    }
    (heat_loss_w - electric_power_w).max(0.0) / rated_power_w
}

/// Operating inputs of one radiator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DutyPoint {
    pub q_ratio: f64,
    pub delta_t_k: f64,
    pub space_temperature_c: f64,
    pub heat_loss_w: f64,
}

/// Resolved temperatures and flow of one radiator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiatorDuty {
    pub supply_temperature_c: f64,
    pub return_temperature_c: f64,
    pub mass_flow_kg_h: f64,
}

impl RadiatorDuty {
    /// Supply − return.
    pub fn lift_k(&self) -> f64 {
        self.supply_temperature_c - self.return_temperature_c
    }

    /// A radiator that must deliver heat across less than the flow floor.
    pub fn is_near_degenerate(&self, heat_loss_w: f64) -> bool {
        heat_loss_w > 0.0 && self.lift_k() < MIN_FLOW_DELTA_K
    }
}

impl DutyPoint {
    pub fn new(
        q_ratio: f64,
        delta_t_k: f64,
        space_temperature_c: f64,
        heat_loss_w: f64,
    ) -> ComponentResult<Self> {
        check_finite(q_ratio, "output ratio")?;
        check_finite(delta_t_k, "ΔT")?;
        check_finite(space_temperature_c, "space temperature")?;
        check_finite(heat_loss_w, "heat loss")?;
        if delta_t_k <= 0.0 {
            return Err(ComponentError::Infeasible {
                message: format!("ΔT must be positive (got {delta_t_k} K)"),
            });
        }
        if q_ratio < 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "output ratio must be non-negative",
            });
        }
        if heat_loss_w < 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "heat loss must be non-negative",
            });
        }
        Ok(Self {
            q_ratio,
            delta_t_k,
            space_temperature_c,
            heat_loss_w,
        })
    }

    /// Output law factor c; +∞ for a radiator with no net demand.
    fn c(&self) -> f64 {
        if self.q_ratio <= 0.0 {
            return f64::INFINITY;
        }
        (self.delta_t_k / T_FACTOR / self.q_ratio.powf(1.0 / EXPONENT_RADIATOR)).exp()
    }

    /// Supply temperature this radiator needs at the configured ΔT.
    pub fn required_supply(&self) -> f64 {
        let c = self.c();
        if c.is_finite() && c > 1.0 {
            round1(self.space_temperature_c + self.delta_t_k * c / (c - 1.0))
        } else {
            round1(self.space_temperature_c + self.delta_t_k.max(MIN_LIFT_K))
        }
    }

    /// Return temperature at a given supply.
    ///
    /// With no lift over the space no heat moves and the return equals the supply.
    pub fn return_temperature(&self, supply_c: f64) -> f64 {
        let lift = supply_c - self.space_temperature_c;
        if lift <= 0.0 {
            return round1(supply_c);
        }
        let excess = self.q_ratio.powf(1.0 / EXPONENT_RADIATOR) * T_FACTOR;
        round1(excess * excess / lift + self.space_temperature_c)
    }

    /// Mass flow carrying the heat loss across supply − return.
    pub fn mass_flow_kg_h(&self, supply_c: f64, return_c: f64) -> f64 {
        let dt = (supply_c - return_c).max(MIN_FLOW_DELTA_K);
        round1(self.heat_loss_w / WATER_CP_J_KGK / dt * SECONDS_PER_HOUR)
    }

    /// Resolve at the radiator's own required supply.
    pub fn solve(&self) -> ComponentResult<RadiatorDuty> {
        self.at_supply(self.required_supply())
    }

    /// Resolve at an imposed supply temperature.
    pub fn at_supply(&self, supply_c: f64) -> ComponentResult<RadiatorDuty> {
        check_finite(supply_c, "supply temperature")?;
        let return_c = self.return_temperature(supply_c);
        let mass_flow = self.mass_flow_kg_h(supply_c, return_c);
        if !mass_flow.is_finite() || mass_flow < 0.0 {
            return Err(ComponentError::Infeasible {
                message: format!("mass flow rate {mass_flow} kg/h is not physical"),
            });
        }
        Ok(RadiatorDuty {
            supply_temperature_c: supply_c,
            return_temperature_c: return_c,
            mass_flow_kg_h: mass_flow,
        })
    }
}

/// Nominal extra radiator output needed to cover the heat loss at a fixed supply.
///
/// Scales the rated output from the 75/65/20 point to the actual mean excess
/// temperature and returns the shortfall expressed back at the rating point.
pub fn extra_power_needed(
    rated_power_w: f64,
    heat_loss_w: f64,
    supply_c: f64,
    delta_t_k: f64,
    space_c: f64,
) -> f64 {
    let inputs = [rated_power_w, heat_loss_w, supply_c, delta_t_k, space_c];
    if !inputs.iter().all(|v| v.is_finite()) || delta_t_k <= 0.0 || rated_power_w <= 0.0 {
        return 0.0;
    }
    let return_c = supply_c - delta_t_k;
    let mean_excess = (supply_c + return_c) / 2.0 - space_c;
    if mean_excess <= 0.0 {
        return 0.0;
    }
    let scale = (mean_excess / DELTA_T_REF).max(1e-6).powf(EXPONENT_RADIATOR);
    let available = rated_power_w * scale;
    (heat_loss_w - available).max(0.0) / scale
}
