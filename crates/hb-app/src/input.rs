//! Engine input: the project resolved into per-radiator rows.

use std::collections::BTreeMap;

use hb_core::{RadiatorId, RoomId};
use hb_project::{DesignMode, DesignProject};

use crate::error::{AppError, AppResult};
use crate::heat_load::split_equally;

/// One radiator with its share of the room heat loss.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiatorInput {
    pub id: RadiatorId,
    pub room: RoomId,
    pub collector: String,
    pub rated_power_w: f64,
    pub heat_loss_w: f64,
    pub electric_power_w: f64,
    pub space_temperature_c: f64,
    pub circuit_length_m: f64,
    pub fixed_diameter_mm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectorInput {
    pub name: String,
    pub circuit_length_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PumpSelection {
    pub model: String,
    pub speed: String,
}

/// Valve type plus optional custom characteristic parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ValveConfig {
    pub valve_type: String,
    pub positions: Option<u32>,
    pub kv_max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignConfig {
    pub mode: DesignMode,
    pub delta_t_k: f64,
    pub supply_temperature_c: Option<f64>,
    pub fix_diameter: bool,
    pub pump: Option<PumpSelection>,
    pub valve: ValveConfig,
}

/// Manual valve setting for one radiator (balancing mode).
#[derive(Debug, Clone, PartialEq)]
pub struct ValveOverride {
    pub radiator: RadiatorId,
    pub valve_name: Option<String>,
    pub position: Option<u32>,
    pub kv: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignInput {
    pub config: DesignConfig,
    pub radiators: Vec<RadiatorInput>,
    pub collectors: Vec<CollectorInput>,
    pub overrides: Vec<ValveOverride>,
    /// Advisories raised while resolving the project.
    pub notes: Vec<String>,
}

fn radiator_id(nr: u32) -> AppResult<RadiatorId> {
    RadiatorId::new(nr)
        .ok_or_else(|| AppError::Validation(format!("radiator id must be positive (got {nr})")))
}

impl DesignInput {
    /// Resolve a project: split room heat loss and attach room temperatures.
    ///
    /// Structural checks belong to `hb_project::validate_project`; this only
    /// fails where a row cannot be represented at all.
    pub fn from_project(project: &DesignProject) -> AppResult<Self> {
        let room_loads: BTreeMap<RoomId, f64> =
            project.rooms.iter().map(|r| (r.id, r.heat_loss_w)).collect();
        let room_temps: BTreeMap<RoomId, f64> = project
            .rooms
            .iter()
            .map(|r| (r.id, r.indoor_temperature_c))
            .collect();

        let radiator_rooms: Vec<RoomId> = project.radiators.iter().map(|r| r.room).collect();
        let split = split_equally(&room_loads, &radiator_rooms);

        let radiators = project
            .radiators
            .iter()
            .zip(&split.per_radiator_w)
            .map(|(def, &heat_loss_w)| {
                let space_temperature_c = room_temps.get(&def.room).copied().ok_or_else(|| {
                    AppError::Validation(format!(
                        "radiator {} references unknown room {}",
                        def.id, def.room
                    ))
                })?;
                Ok(RadiatorInput {
                    id: radiator_id(def.id)?,
                    room: def.room,
                    collector: def.collector.clone(),
                    rated_power_w: def.rated_power_w,
                    heat_loss_w,
                    electric_power_w: def.electric_power_w,
                    space_temperature_c,
                    circuit_length_m: def.circuit_length_m,
                    fixed_diameter_mm: def.fixed_diameter_mm,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let collectors = project
            .collectors
            .iter()
            .map(|c| CollectorInput {
                name: c.name.clone(),
                circuit_length_m: c.circuit_length_m,
            })
            .collect();

        let overrides = project
            .valve_overrides
            .iter()
            .map(|o| {
                Ok(ValveOverride {
                    radiator: radiator_id(o.radiator)?,
                    valve_name: o.valve_name.clone(),
                    position: o.position,
                    kv: o.kv,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let notes = split
            .unserved_rooms
            .iter()
            .map(|room| {
                format!("Room {room} has heat loss but no radiator; its load is not covered.")
            })
            .collect();

        let cfg = &project.config;
        Ok(Self {
            config: DesignConfig {
                mode: cfg.mode,
                delta_t_k: cfg.delta_t_c,
                supply_temperature_c: cfg.supply_temperature_c,
                fix_diameter: cfg.fix_diameter,
                pump: cfg.pump.as_ref().map(|p| PumpSelection {
                    model: p.model.clone(),
                    speed: p.speed.clone(),
                }),
                valve: ValveConfig {
                    valve_type: cfg.valve.valve_type.clone(),
                    positions: cfg.valve.positions,
                    kv_max: cfg.valve.kv_max,
                },
            },
            radiators,
            collectors,
            overrides,
            notes,
        })
    }

    pub fn override_for(&self, id: RadiatorId) -> Option<&ValveOverride> {
        self.overrides.iter().find(|o| o.radiator == id)
    }

    pub fn total_heat_loss_w(&self) -> f64 {
        self.radiators.iter().map(|r| r.heat_loss_w).sum()
    }
}
