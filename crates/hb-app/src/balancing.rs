//! Thermostatic valve presetting.
//!
//! Every branch is throttled up to the index circuit: the branch with the
//! largest loss including a fully open valve. A branch's valve takes up the
//! difference, and the preset is the first position whose kv covers the flow
//! at that pressure drop.

use hb_components::common::kv_pressure_loss_pa;
use hb_components::valve::{DEFAULT_CUSTOM_KV_MAX, DEFAULT_CUSTOM_POSITIONS};
use hb_components::{ValveCatalog, ValveCharacteristic, kv_needed};
use hb_core::{RadiatorId, round1};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::input::{ValveConfig, ValveOverride};

/// Resolve the configured valve type to a characteristic.
///
/// For the custom type a missing parameter takes its default; with neither
/// set the reference polynomial is used.
pub fn valve_characteristic(
    config: &ValveConfig,
    catalog: &ValveCatalog,
) -> AppResult<ValveCharacteristic> {
    let custom = match (config.kv_max, config.positions) {
        (None, None) => None,
        (kv_max, positions) => Some((
            kv_max.unwrap_or(DEFAULT_CUSTOM_KV_MAX),
            positions.unwrap_or(DEFAULT_CUSTOM_POSITIONS),
        )),
    };
    Ok(catalog.characteristic(&config.valve_type, custom)?)
}

/// One branch entering the balancing step.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch<'a> {
    pub radiator: RadiatorId,
    pub mass_flow_kg_h: f64,
    /// Branch loss without the valve.
    pub dp_total_pa: f64,
    pub valve_override: Option<&'a ValveOverride>,
}

/// Valve preset of one branch.
#[derive(Debug, Clone, PartialEq)]
pub struct ValveRow {
    pub valve_name: String,
    pub position: u32,
    pub kv: f64,
    pub kv_needed: f64,
    /// Valve loss when fully open.
    pub dp_open_pa: f64,
    /// Drop the valve has to take up to match the index circuit.
    pub dp_needed_pa: f64,
    /// Valve loss at the chosen setting.
    pub dp_valve_pa: f64,
    pub dp_total_with_valve_pa: f64,
    pub overridden: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Balancing {
    pub rows: Vec<ValveRow>,
    /// Index-circuit loss with its valve fully open.
    pub max_pressure_pa: f64,
}

fn branch_characteristic(
    base: &ValveCharacteristic,
    config: &ValveConfig,
    catalog: &ValveCatalog,
    valve_override: Option<&ValveOverride>,
) -> AppResult<ValveCharacteristic> {
    match valve_override.and_then(|o| o.valve_name.as_deref()) {
        Some(name) if name != base.name() => {
            let config = ValveConfig {
                valve_type: name.to_string(),
                ..config.clone()
            };
            valve_characteristic(&config, catalog)
        }
        _ => Ok(base.clone()),
    }
}

/// Preset every branch's valve against the index circuit.
///
/// Overrides take precedence as kv, then position, then the computed preset.
/// A valve-name override re-derives the preset through that valve.
pub fn balance(
    branches: &[Branch<'_>],
    base: &ValveCharacteristic,
    config: &ValveConfig,
    catalog: &ValveCatalog,
) -> AppResult<Balancing> {
    let characteristics = branches
        .iter()
        .map(|b| branch_characteristic(base, config, catalog, b.valve_override))
        .collect::<AppResult<Vec<_>>>()?;

    let open_losses: Vec<f64> = branches
        .iter()
        .zip(&characteristics)
        .map(|(b, c)| round1(kv_pressure_loss_pa(b.mass_flow_kg_h, c.open_kv())))
        .collect();

    let max_pressure_pa = branches
        .iter()
        .zip(&open_losses)
        .map(|(b, open)| b.dp_total_pa + open)
        .fold(0.0, f64::max);
    debug!(max_pressure_pa, "index circuit");

    let mut rows = Vec::with_capacity(branches.len());
    for ((branch, characteristic), &dp_open_pa) in
        branches.iter().zip(&characteristics).zip(&open_losses)
    {
        let dp_needed_pa = round1(max_pressure_pa - branch.dp_total_pa);
        let needed = kv_needed(branch.mass_flow_kg_h, dp_needed_pa);
        let mut position = characteristic.position_for_kv(needed);
        let mut kv = characteristic.kv_at_position(position);

        let mut overridden = false;
        if let Some(ov) = branch.valve_override {
            overridden = ov.valve_name.is_some() || ov.position.is_some() || ov.kv.is_some();
            if let Some(p) = ov.position {
                position = p;
                kv = characteristic.kv_at_position(p);
            }
            if let Some(k) = ov.kv {
                if !(k.is_finite() && k > 0.0) {
                    return Err(AppError::radiator(
                        branch.radiator,
                        format!("override kv must be positive (got {k})"),
                    ));
                }
                kv = k;
            }
        }

        let dp_valve_pa = round1(kv_pressure_loss_pa(branch.mass_flow_kg_h, kv));
        rows.push(ValveRow {
            valve_name: characteristic.name().to_string(),
            position,
            kv,
            kv_needed: needed,
            dp_open_pa,
            dp_needed_pa,
            dp_valve_pa,
            dp_total_with_valve_pa: round1(branch.dp_total_pa + dp_valve_pa),
            overridden,
        });
    }

    Ok(Balancing {
        rows,
        max_pressure_pa,
    })
}
