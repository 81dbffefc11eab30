//! Design pipeline: thermal design, sizing, pump, balancing and velocity check.

use std::time::Instant;

use hb_components::PumpCurve;
use hb_project::{Catalogs, DesignMode};
use hb_solver::OperatingPointConfig;
use tracing::{debug, info, warn};

use crate::balancing::{self, Branch};
use crate::error::{AppError, AppResult};
use crate::hydraulics;
use crate::input::DesignInput;
use crate::progress::{DesignProgressEvent, DesignStage};
use crate::pump_mode::{self, Evaluation};
use crate::results::{
    CollectorResult, DesignMetrics, DesignReport, PumpChart, PumpResult, PumpSearchResult,
    RadiatorResult, ValveResult, operating_point_result,
};
use crate::thermal_design;
use crate::velocity;

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(DesignProgressEvent)>,
    mode: DesignMode,
    stage: DesignStage,
    started: Instant,
    message: Option<String>,
) {
    debug!(?stage, ?message, "design stage");
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(DesignProgressEvent::stage(
            mode,
            stage,
            started.elapsed().as_secs_f64(),
            message,
        ));
    }
}

/// Run the design pipeline.
pub fn run_design(input: &DesignInput, catalogs: &Catalogs) -> AppResult<DesignReport> {
    run_design_with_progress(input, catalogs, None)
}

/// Run the design pipeline, reporting each stage to `progress_cb`.
///
/// A failed run emits a final `Failed` event carrying the error message.
pub fn run_design_with_progress(
    input: &DesignInput,
    catalogs: &Catalogs,
    mut progress_cb: Option<&mut dyn FnMut(DesignProgressEvent)>,
) -> AppResult<DesignReport> {
    let started = Instant::now();
    let mode = input.config.mode;
    info!(
        mode = mode.as_str(),
        radiators = input.radiators.len(),
        collectors = input.collectors.len(),
        "starting design"
    );

    match run_pipeline(input, catalogs, &mut progress_cb, started) {
        Ok(report) => {
            emit_progress(&mut progress_cb, mode, DesignStage::Done, started, None);
            info!(
                warnings = report.warnings.len(),
                elapsed_s = started.elapsed().as_secs_f64(),
                "design finished"
            );
            Ok(report)
        }
        Err(err) => {
            warn!(%err, "design failed");
            emit_progress(
                &mut progress_cb,
                mode,
                DesignStage::Failed,
                started,
                Some(err.to_string()),
            );
            Err(err)
        }
    }
}

/// Input that has to be present before anything is computed.
fn check_complete(input: &DesignInput) -> AppResult<()> {
    if input.radiators.is_empty() || input.collectors.is_empty() {
        return Err(AppError::Incomplete(
            "radiator and collector tables must not be empty".to_string(),
        ));
    }
    match input.config.mode {
        DesignMode::Fixed if input.config.supply_temperature_c.is_none() => {
            Err(AppError::Incomplete(
                "fixed-supply mode requires a supply temperature (config.supply_temperature_c)"
                    .to_string(),
            ))
        }
        DesignMode::Pump if input.config.pump.is_none() => Err(AppError::Incomplete(
            "pump mode requires a pump model and speed (config.pump)".to_string(),
        )),
        _ => Ok(()),
    }
}

fn run_pipeline(
    input: &DesignInput,
    catalogs: &Catalogs,
    progress_cb: &mut Option<&mut dyn FnMut(DesignProgressEvent)>,
    started: Instant,
) -> AppResult<DesignReport> {
    let mode = input.config.mode;
    check_complete(input)?;

    let network = hydraulics::build_network(input)?;
    let pump_curve: Option<&PumpCurve> = input
        .config
        .pump
        .as_ref()
        .map(|p| catalogs.pumps.curve(&p.model, &p.speed))
        .transpose()?;
    let base_valve = balancing::valve_characteristic(&input.config.valve, &catalogs.valves)?;
    let op_config = OperatingPointConfig::default();
    // Pump mode never designs at the configured ΔT; it starts at the search's upper bound.
    let delta_t_k = if mode == DesignMode::Pump {
        pump_mode::search_config(input).high_k
    } else {
        input.config.delta_t_k
    };

    emit_progress(progress_cb, mode, DesignStage::ThermalDesign, started, None);
    let thermal = thermal_design::design(input, delta_t_k)?;

    emit_progress(progress_cb, mode, DesignStage::Sizing, started, None);
    let hydraulics = hydraulics::size(input, &network, &thermal)?;

    emit_progress(
        progress_cb,
        mode,
        DesignStage::Aggregate,
        started,
        Some(format!("index circuit {:.1} Pa", hydraulics.max_total_pa)),
    );
    let system = pump_mode::system_curve(&hydraulics);
    let mut evaluation = Evaluation {
        delta_t_k,
        thermal,
        hydraulics,
        system,
        operating_point: None,
    };

    let mut warnings = input.notes.clone();
    let mut search = None;
    if let Some(curve) = pump_curve {
        emit_progress(progress_cb, mode, DesignStage::PumpSolve, started, None);
        evaluation.operating_point =
            Some(pump_mode::operating_point(curve, &evaluation.system, &op_config)?);

        if mode == DesignMode::Pump {
            let result =
                pump_mode::size_pump(input, &network, curve, &op_config, Some(evaluation))?;
            let summary = pump_mode::summary_message(&result);
            info!(%summary, trials = result.trace().len(), "pump sizing finished");
            emit_progress(
                progress_cb,
                mode,
                DesignStage::DeltaTSearch,
                started,
                Some(summary.clone()),
            );
            warnings.push(summary.clone());
            let search_result = PumpSearchResult::from(&result);
            evaluation = result.into_payload();
            search = Some((search_result, summary));
        }
    }

    warnings.extend(evaluation.thermal.warnings.iter().cloned());
    if let Some(message) = evaluation
        .operating_point
        .as_ref()
        .and_then(|s| s.outcome.warning())
    {
        warnings.push(message.to_string());
    }

    emit_progress(progress_cb, mode, DesignStage::Balance, started, None);
    let flows = evaluation.thermal.flows();
    let apply_overrides = mode == DesignMode::Balancing;
    if !apply_overrides && !input.overrides.is_empty() {
        warnings.push(format!(
            "Valve overrides are only applied in balancing mode; {} override(s) ignored.",
            input.overrides.len()
        ));
    }
    let branches: Vec<Branch<'_>> = input
        .radiators
        .iter()
        .zip(&evaluation.hydraulics.radiators)
        .zip(&flows)
        .map(|((radiator, row), &flow)| Branch {
            radiator: radiator.id,
            mass_flow_kg_h: flow,
            dp_total_pa: row.dp_total_pa,
            valve_override: if apply_overrides {
                input.override_for(radiator.id)
            } else {
                None
            },
        })
        .collect();
    let balanced = balancing::balance(&branches, &base_valve, &input.config.valve, &catalogs.valves)?;

    emit_progress(progress_cb, mode, DesignStage::VelocityCheck, started, None);
    let velocities = velocity::check(input, &flows, &evaluation.hydraulics);
    warnings.extend(velocities.warnings.iter().cloned());
    for warning in &warnings {
        debug!(%warning, "advisory");
    }

    let metrics = DesignMetrics::compute(input, &evaluation.thermal, &evaluation.hydraulics);

    let radiators = input
        .radiators
        .iter()
        .enumerate()
        .map(|(i, radiator)| {
            let thermal = &evaluation.thermal.rows[i];
            let hyd = &evaluation.hydraulics.radiators[i];
            RadiatorResult {
                id: radiator.id.get(),
                room: radiator.room,
                collector: radiator.collector.clone(),
                rated_power_w: radiator.rated_power_w,
                heat_loss_w: radiator.heat_loss_w,
                electric_power_w: radiator.electric_power_w,
                extra_power_w: thermal.extra_power_w,
                space_temperature_c: radiator.space_temperature_c,
                q_ratio: thermal.q_ratio,
                supply_temperature_c: thermal.supply_temperature_c,
                return_temperature_c: thermal.return_temperature_c,
                mass_flow_kg_h: thermal.mass_flow_kg_h,
                diameter_mm: hyd.diameter_mm,
                velocity_m_s: velocities.radiator_m_s[i],
                water_volume_l: hyd.water_volume_l,
                dp_piping_pa: hyd.dp_piping_pa,
                dp_body_pa: hyd.dp_body_pa,
                dp_circuit_pa: hyd.dp_circuit_pa,
                dp_total_pa: hyd.dp_total_pa,
                valve: ValveResult::from(&balanced.rows[i]),
            }
        })
        .collect();

    let collectors = evaluation
        .hydraulics
        .collectors
        .iter()
        .zip(&velocities.collector_m_s)
        .map(|(c, &velocity_m_s)| CollectorResult {
            name: c.name.clone(),
            circuit_length_m: c.circuit_length_m,
            mass_flow_kg_h: c.mass_flow_kg_h,
            diameter_mm: c.diameter_mm,
            velocity_m_s,
            dp_pa: c.dp_pa,
            water_volume_l: c.water_volume_l,
        })
        .collect();

    let pump = input.config.pump.as_ref().map(|selection| {
        let solution = evaluation.operating_point.as_ref();
        let (search, summary) = match search.take() {
            Some((result, summary)) => (Some(result), Some(summary)),
            None => (None, None),
        };
        PumpResult {
            model: selection.model.clone(),
            speed: selection.speed.clone(),
            system_coefficient: evaluation.system.k,
            operating_point: solution.and_then(operating_point_result),
            chart: if mode == DesignMode::Pump {
                solution.map(PumpChart::from)
            } else {
                None
            },
            search,
            summary,
        }
    });

    Ok(DesignReport {
        mode,
        delta_t_c: evaluation.delta_t_k,
        supply_temperature_c: evaluation.thermal.supply_temperature_c,
        radiators,
        collectors,
        metrics,
        pump,
        warnings,
    })
}
