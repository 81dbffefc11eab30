//! Design report: result rows, metrics and pump series.
//!
//! Everything here is plain data for rendering; nothing feeds back into the
//! computation.

use hb_project::DesignMode;
use hb_solver::{DeltaTSearch, OperatingPointSolution, TrialStatus};
use serde::Serialize;

use crate::balancing::ValveRow;
use crate::hydraulics::HydraulicDesign;
use crate::input::DesignInput;
use crate::pump_mode::Evaluation;
use crate::thermal_design::ThermalDesign;
use hb_core::round2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValveResult {
    pub valve_name: String,
    pub position: u32,
    pub kv: f64,
    pub kv_needed: f64,
    pub dp_open_pa: f64,
    pub dp_needed_pa: f64,
    pub dp_valve_pa: f64,
    pub dp_total_with_valve_pa: f64,
    pub overridden: bool,
}

impl From<&ValveRow> for ValveResult {
    fn from(row: &ValveRow) -> Self {
        Self {
            valve_name: row.valve_name.clone(),
            position: row.position,
            kv: row.kv,
            kv_needed: row.kv_needed,
            dp_open_pa: row.dp_open_pa,
            dp_needed_pa: row.dp_needed_pa,
            dp_valve_pa: row.dp_valve_pa,
            dp_total_with_valve_pa: row.dp_total_with_valve_pa,
            overridden: row.overridden,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadiatorResult {
    pub id: u32,
    pub room: u32,
    pub collector: String,
    pub rated_power_w: f64,
    pub heat_loss_w: f64,
    pub electric_power_w: f64,
    pub extra_power_w: f64,
    pub space_temperature_c: f64,
    pub q_ratio: f64,
    pub supply_temperature_c: f64,
    pub return_temperature_c: f64,
    pub mass_flow_kg_h: f64,
    pub diameter_mm: f64,
    pub velocity_m_s: f64,
    pub water_volume_l: f64,
    pub dp_piping_pa: f64,
    pub dp_body_pa: f64,
    pub dp_circuit_pa: f64,
    pub dp_total_pa: f64,
    pub valve: ValveResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectorResult {
    pub name: String,
    pub circuit_length_m: f64,
    pub mass_flow_kg_h: f64,
    pub diameter_mm: f64,
    pub velocity_m_s: f64,
    pub dp_pa: f64,
    pub water_volume_l: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HighestSupply {
    pub radiator: u32,
    pub supply_temperature_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignMetrics {
    pub total_heat_loss_w: f64,
    pub total_rated_power_w: f64,
    pub total_extra_power_w: f64,
    pub total_flow_kg_h: f64,
    /// Flow-weighted mean of supply − return.
    pub weighted_delta_t_c: f64,
    /// Radiator with the highest required supply.
    pub highest_supply: Option<HighestSupply>,
    pub total_water_volume_l: f64,
    /// Loss of the index circuit, valves excluded.
    pub index_circuit_pa: f64,
}

/// Flow-weighted ΔT; zero when nothing flows.
pub fn weighted_delta_t(thermal: &ThermalDesign) -> f64 {
    let (weighted, total) = thermal.rows.iter().fold((0.0, 0.0), |(w, t), row| {
        let lift = row.supply_temperature_c - row.return_temperature_c;
        (w + row.mass_flow_kg_h * lift, t + row.mass_flow_kg_h)
    });
    if total > 0.0 { weighted / total } else { 0.0 }
}

impl DesignMetrics {
    pub fn compute(input: &DesignInput, thermal: &ThermalDesign, hydraulics: &HydraulicDesign) -> Self {
        let highest_supply = input
            .radiators
            .iter()
            .zip(&thermal.rows)
            .fold(None::<HighestSupply>, |best, (radiator, row)| match best {
                Some(b) if b.supply_temperature_c >= row.required_supply_c => Some(b),
                _ => Some(HighestSupply {
                    radiator: radiator.id.get(),
                    supply_temperature_c: row.required_supply_c,
                }),
            });

        Self {
            total_heat_loss_w: input.total_heat_loss_w(),
            total_rated_power_w: input.radiators.iter().map(|r| r.rated_power_w).sum(),
            total_extra_power_w: thermal.rows.iter().map(|r| r.extra_power_w).sum(),
            total_flow_kg_h: hydraulics.total_flow_kg_h,
            weighted_delta_t_c: round2(weighted_delta_t(thermal)),
            highest_supply,
            total_water_volume_l: hydraulics.total_water_volume_l(),
            index_circuit_pa: hydraulics.max_total_pa,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OperatingPointResult {
    pub flow_kg_h: f64,
    pub head_kpa: f64,
}

/// Pump curve, system curve and operating point on a shared flow grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PumpChart {
    pub flow_kg_h: Vec<f64>,
    pub pump_head_kpa: Vec<Option<f64>>,
    pub system_head_kpa: Vec<f64>,
    pub operating_point: Option<OperatingPointResult>,
}

impl From<&OperatingPointSolution> for PumpChart {
    fn from(solution: &OperatingPointSolution) -> Self {
        Self {
            flow_kg_h: solution.curves.flow_kg_h.clone(),
            pump_head_kpa: solution.curves.pump_head_kpa.clone(),
            system_head_kpa: solution.curves.system_head_kpa.clone(),
            operating_point: operating_point_result(solution),
        }
    }
}

pub fn operating_point_result(solution: &OperatingPointSolution) -> Option<OperatingPointResult> {
    solution.outcome.point().map(|p| OperatingPointResult {
        flow_kg_h: p.flow_kg_h,
        head_kpa: p.head_kpa,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchTrialResult {
    pub delta_t_c: f64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PumpSearchResult {
    pub accepted: bool,
    pub delta_t_c: f64,
    pub trials: Vec<SearchTrialResult>,
}

impl From<&DeltaTSearch<Evaluation>> for PumpSearchResult {
    fn from(search: &DeltaTSearch<Evaluation>) -> Self {
        let trials = search
            .trace()
            .iter()
            .map(|t| SearchTrialResult {
                delta_t_c: t.delta_t_k,
                status: match &t.status {
                    TrialStatus::Satisfied => "satisfied".to_string(),
                    TrialStatus::Unsatisfied => "unsatisfied".to_string(),
                    TrialStatus::Failed(reason) => format!("failed: {reason}"),
                },
            })
            .collect();
        Self {
            accepted: search.is_accepted(),
            delta_t_c: search.delta_t_k(),
            trials,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PumpResult {
    pub model: String,
    pub speed: String,
    /// System curve coefficient K (kPa per (kg/h)²).
    pub system_coefficient: f64,
    pub operating_point: Option<OperatingPointResult>,
    /// Pump mode only.
    pub search: Option<PumpSearchResult>,
    pub summary: Option<String>,
    pub chart: Option<PumpChart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignReport {
    pub mode: DesignMode,
    pub delta_t_c: f64,
    pub supply_temperature_c: f64,
    pub radiators: Vec<RadiatorResult>,
    pub collectors: Vec<CollectorResult>,
    pub metrics: DesignMetrics,
    pub pump: Option<PumpResult>,
    pub warnings: Vec<String>,
}

impl DesignReport {
    pub fn radiator(&self, id: u32) -> Option<&RadiatorResult> {
        self.radiators.iter().find(|r| r.id == id)
    }

    pub fn collector(&self, name: &str) -> Option<&CollectorResult> {
        self.collectors.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermal_design::ThermalRow;

    fn row(supply: f64, ret: f64, flow: f64) -> ThermalRow {
        ThermalRow {
            q_ratio: 0.4,
            required_supply_c: supply,
            supply_temperature_c: supply,
            return_temperature_c: ret,
            mass_flow_kg_h: flow,
            extra_power_w: 0.0,
        }
    }

    #[test]
    fn weighted_delta_t_by_flow() {
        let thermal = ThermalDesign {
            rows: vec![row(50.0, 40.0, 100.0), row(50.0, 30.0, 300.0)],
            supply_temperature_c: 50.0,
            warnings: vec![],
        };
        assert!((weighted_delta_t(&thermal) - 17.5).abs() < 1e-12);

        let idle = ThermalDesign {
            rows: vec![row(30.0, 20.0, 0.0)],
            supply_temperature_c: 30.0,
            warnings: vec![],
        };
        assert_eq!(weighted_delta_t(&idle), 0.0);
    }
}
