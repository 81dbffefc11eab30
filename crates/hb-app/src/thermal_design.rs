//! Per-radiator supply/return temperatures and mass flows at a ΔT.

use hb_components::thermal::MIN_FLOW_DELTA_K;
use hb_components::{DutyPoint, RadiatorDuty, extra_power_needed, q_ratio};
use hb_project::DesignMode;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::input::{DesignInput, RadiatorInput};

/// Thermal state of one radiator.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalRow {
    pub q_ratio: f64,
    /// Supply the radiator would need on its own.
    pub required_supply_c: f64,
    pub supply_temperature_c: f64,
    pub return_temperature_c: f64,
    pub mass_flow_kg_h: f64,
    /// Nominal output to add at 75/65/20 (fixed-supply mode only).
    pub extra_power_w: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThermalDesign {
    /// Indexed like the radiator table.
    pub rows: Vec<ThermalRow>,
    /// Supply temperature shared by every radiator.
    pub supply_temperature_c: f64,
    pub warnings: Vec<String>,
}

impl ThermalDesign {
    pub fn flows(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.mass_flow_kg_h).collect()
    }
}

fn duty_point(radiator: &RadiatorInput, q: f64, delta_t_k: f64) -> AppResult<DutyPoint> {
    DutyPoint::new(q, delta_t_k, radiator.space_temperature_c, radiator.heat_loss_w)
        .map_err(|e| AppError::radiator(radiator.id, e.detail()))
}

/// Thermal design at `delta_t_k` for the configured mode.
pub fn design(input: &DesignInput, delta_t_k: f64) -> AppResult<ThermalDesign> {
    match input.config.mode {
        DesignMode::Fixed => {
            let supply = input.config.supply_temperature_c.ok_or_else(|| {
                AppError::Incomplete(
                    "fixed-supply mode requires a supply temperature (config.supply_temperature_c)"
                        .to_string(),
                )
            })?;
            fixed_supply(&input.radiators, delta_t_k, supply)
        }
        DesignMode::Existing | DesignMode::Pump | DesignMode::Balancing => {
            shared_supply(&input.radiators, delta_t_k)
        }
    }
}

/// Every radiator runs at the highest supply any of them requires.
pub fn shared_supply(radiators: &[RadiatorInput], delta_t_k: f64) -> AppResult<ThermalDesign> {
    let points = radiators
        .iter()
        .map(|r| {
            let q = q_ratio(r.heat_loss_w, r.electric_power_w, r.rated_power_w);
            duty_point(r, q, delta_t_k)
        })
        .collect::<AppResult<Vec<_>>>()?;

    let required: Vec<f64> = points.iter().map(DutyPoint::required_supply).collect();
    let supply = required.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !supply.is_finite() {
        return Err(AppError::Incomplete(
            "at least one radiator is required".to_string(),
        ));
    }
    debug!(delta_t = delta_t_k, supply, "shared supply temperature");

    resolve(radiators, &points, &required, supply, |_| 0.0)
}

/// Supply imposed by the user; radiators that fall short report extra power.
pub fn fixed_supply(
    radiators: &[RadiatorInput],
    delta_t_k: f64,
    supply_c: f64,
) -> AppResult<ThermalDesign> {
    if !supply_c.is_finite() {
        return Err(AppError::Incomplete(format!(
            "supply temperature must be finite (got {supply_c})"
        )));
    }

    let extra: Vec<f64> = radiators
        .iter()
        .map(|r| {
            let demand = (r.heat_loss_w - r.electric_power_w).max(0.0);
            extra_power_needed(r.rated_power_w, demand, supply_c, delta_t_k, r.space_temperature_c)
        })
        .collect();

    let points = radiators
        .iter()
        .zip(&extra)
        .map(|(r, &extra_w)| {
            let q = q_ratio(r.heat_loss_w, r.electric_power_w, r.rated_power_w + extra_w);
            duty_point(r, q, delta_t_k)
        })
        .collect::<AppResult<Vec<_>>>()?;
    let required: Vec<f64> = points.iter().map(DutyPoint::required_supply).collect();

    resolve(radiators, &points, &required, supply_c, |i| extra[i])
}

fn resolve(
    radiators: &[RadiatorInput],
    points: &[DutyPoint],
    required: &[f64],
    supply_c: f64,
    extra_power: impl Fn(usize) -> f64,
) -> AppResult<ThermalDesign> {
    let mut rows = Vec::with_capacity(radiators.len());
    let mut warnings = Vec::new();

    for (i, (radiator, point)) in radiators.iter().zip(points).enumerate() {
        let duty: RadiatorDuty = point
            .at_supply(supply_c)
            .map_err(|e| AppError::radiator(radiator.id, e.detail()))?;
        if duty.is_near_degenerate(radiator.heat_loss_w) {
            warnings.push(format!(
                "Radiator {}: supply − return is below {MIN_FLOW_DELTA_K} K; flow is bounded by the minimum temperature drop.",
                radiator.id
            ));
        }
        rows.push(ThermalRow {
            q_ratio: point.q_ratio,
            required_supply_c: required[i],
            supply_temperature_c: duty.supply_temperature_c,
            return_temperature_c: duty.return_temperature_c,
            mass_flow_kg_h: duty.mass_flow_kg_h,
            extra_power_w: extra_power(i),
        });
    }

    Ok(ThermalDesign {
        rows,
        supply_temperature_c: supply_c,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hb_core::RadiatorId;

    fn radiator(id: u32, heat_loss_w: f64, rated_power_w: f64) -> RadiatorInput {
        RadiatorInput {
            id: RadiatorId::new(id).unwrap(),
            room: 1,
            collector: "Collector 1".into(),
            rated_power_w,
            heat_loss_w,
            electric_power_w: 0.0,
            space_temperature_c: 20.0,
            circuit_length_m: 10.0,
            fixed_diameter_mm: None,
        }
    }

    #[test]
    fn single_reference_radiator() {
        let design = shared_supply(&[radiator(1, 800.0, 2000.0)], 10.0).unwrap();
        assert_eq!(design.supply_temperature_c, 50.5);
        assert_eq!(design.rows[0].return_temperature_c, 40.7);
        assert_eq!(design.rows[0].mass_flow_kg_h, 70.3);
        assert!(design.warnings.is_empty());
    }

    #[test]
    fn hottest_radiator_sets_shared_supply() {
        let design =
            shared_supply(&[radiator(1, 800.0, 2000.0), radiator(2, 1500.0, 1000.0)], 10.0)
                .unwrap();
        assert_eq!(design.supply_temperature_c, 92.6);
        assert_eq!(design.rows[0].required_supply_c, 50.5);
        assert_eq!(design.rows[0].supply_temperature_c, 92.6);
        assert_eq!(design.rows[1].return_temperature_c, 82.6);
        assert_eq!(design.rows[1].mass_flow_kg_h, 129.2);
    }

    #[test]
    fn fixed_supply_reports_extra_power() {
        let design = fixed_supply(&[radiator(1, 800.0, 1000.0)], 10.0, 55.0).unwrap();
        let row = &design.rows[0];
        assert!((row.extra_power_w - 586.234).abs() < 1e-2);
        assert_eq!(row.supply_temperature_c, 55.0);
        assert!(row.mass_flow_kg_h > 0.0);
    }

    #[test]
    fn supply_below_room_warns() {
        let design = fixed_supply(&[radiator(1, 800.0, 2000.0)], 10.0, 18.0).unwrap();
        assert_eq!(design.warnings.len(), 1);
        assert!(design.warnings[0].starts_with("Radiator 1:"));
    }

    #[test]
    fn non_positive_delta_t_is_attributed() {
        let err = shared_supply(&[radiator(7, 800.0, 2000.0)], 0.0).unwrap_err();
        assert!(matches!(err, AppError::Infeasible { ref subject, .. } if subject == "Radiator 7"));
    }

    #[test]
    fn empty_table_is_incomplete() {
        assert!(matches!(
            shared_supply(&[], 10.0),
            Err(AppError::Incomplete(_))
        ));
    }
}
