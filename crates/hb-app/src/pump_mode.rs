//! Full-pipeline evaluation at one ΔT and the pump-sizing search over it.

use hb_components::{PumpCurve, SystemCurve};
use hb_core::units::{pa, to_kpa};
use hb_solver::{
    DeltaTSearch, DeltaTSearchConfig, OperatingPointConfig, OperatingPointSolution, Trial,
    search_min_delta_t, solve_operating_point,
};
use tracing::debug;

use hb_network::Network;

use crate::error::AppResult;
use crate::hydraulics::{self, HydraulicDesign};
use crate::input::DesignInput;
use crate::thermal_design::{self, ThermalDesign};

/// Pipeline state at one ΔT.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub delta_t_k: f64,
    pub thermal: ThermalDesign,
    pub hydraulics: HydraulicDesign,
    pub system: SystemCurve,
    /// Present when a pump is selected.
    pub operating_point: Option<OperatingPointSolution>,
}

impl Evaluation {
    /// Pump flow at the operating point, if one was found.
    pub fn pump_flow_kg_h(&self) -> Option<f64> {
        self.operating_point
            .as_ref()
            .and_then(|s| s.outcome.point())
            .map(|p| p.flow_kg_h)
    }

    /// Whether the pump delivers at least the network's total flow.
    pub fn pump_satisfies_flow(&self) -> bool {
        self.pump_flow_kg_h()
            .is_some_and(|q| self.hydraulics.total_flow_kg_h <= q)
    }
}

/// System curve through the design flow and the index-circuit head.
pub fn system_curve(hydraulics: &HydraulicDesign) -> SystemCurve {
    let branch_head_kpa = to_kpa(pa(hydraulics.max_total_pa));
    SystemCurve::from_design_point(hydraulics.total_flow_kg_h, branch_head_kpa)
}

/// Operating point of a pump against the system curve of a sized network.
pub fn operating_point(
    pump: &PumpCurve,
    system: &SystemCurve,
    config: &OperatingPointConfig,
) -> AppResult<OperatingPointSolution> {
    Ok(solve_operating_point(pump, system, config)?)
}

/// Thermal design, sizing and (with a pump) the operating point at `delta_t_k`.
pub fn evaluate(
    input: &DesignInput,
    network: &Network,
    delta_t_k: f64,
    pump: Option<&PumpCurve>,
    config: &OperatingPointConfig,
) -> AppResult<Evaluation> {
    let thermal = thermal_design::design(input, delta_t_k)?;
    let hydraulics = hydraulics::size(input, network, &thermal)?;
    let system = system_curve(&hydraulics);
    let operating_point = pump
        .map(|curve| operating_point(curve, &system, config))
        .transpose()?;
    Ok(Evaluation {
        delta_t_k,
        thermal,
        hydraulics,
        system,
        operating_point,
    })
}

/// Search bracket for the configured design ΔT.
pub fn search_config(input: &DesignInput) -> DeltaTSearchConfig {
    DeltaTSearchConfig::for_design_delta_t(input.config.delta_t_k)
}

/// Smallest ΔT at which the pump carries the network's flow.
///
/// `at_high` is reused as the first trial when it was evaluated at the
/// search's upper bound.
pub fn size_pump(
    input: &DesignInput,
    network: &Network,
    pump: &PumpCurve,
    config: &OperatingPointConfig,
    at_high: Option<Evaluation>,
) -> AppResult<DeltaTSearch<Evaluation>> {
    let search_config = search_config(input);
    let mut seed = at_high.filter(|e| e.delta_t_k == search_config.high_k);
    search_min_delta_t(&search_config, |delta_t_k| {
        let evaluation = match seed.take() {
            Some(evaluation) if evaluation.delta_t_k == delta_t_k => evaluation,
            _ => evaluate(input, network, delta_t_k, Some(pump), config)?,
        };
        let satisfied = evaluation.pump_satisfies_flow();
        debug!(
            delta_t = delta_t_k,
            total_flow = evaluation.hydraulics.total_flow_kg_h,
            pump_flow = ?evaluation.pump_flow_kg_h(),
            satisfied,
            "pump trial"
        );
        Ok(Trial {
            satisfied,
            payload: evaluation,
        })
    })
}

pub const PUMP_INSUFFICIENT_MESSAGE: &str =
    "Pump insufficient even at max ΔT – consider a larger pump or wider pipes.";

/// One-line outcome of the pump-sizing search.
pub fn summary_message(search: &DeltaTSearch<Evaluation>) -> String {
    match search {
        DeltaTSearch::Accepted { delta_t_k, best, .. } => format!(
            "Pump mode: ΔT={:.1} °C, Q≈{:.0} kg/h, pump Q*≈{:.0} kg/h.",
            delta_t_k,
            best.hydraulics.total_flow_kg_h,
            best.pump_flow_kg_h().unwrap_or(0.0)
        ),
        DeltaTSearch::Insufficient { .. } => PUMP_INSUFFICIENT_MESSAGE.to_string(),
    }
}

