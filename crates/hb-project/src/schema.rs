//! Project schema definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesignProject {
    pub version: u32,
    pub name: String,
    pub config: DesignConfigDef,
    #[serde(default)]
    pub rooms: Vec<RoomDef>,
    #[serde(default)]
    pub radiators: Vec<RadiatorDef>,
    #[serde(default)]
    pub collectors: Vec<CollectorDef>,
    #[serde(default)]
    pub valve_overrides: Vec<ValveOverrideDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogs: Option<CatalogsDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DesignMode {
    /// Size for the existing radiators at the configured ΔT.
    #[default]
    Existing,
    /// Fixed supply temperature; report extra radiator power needed.
    Fixed,
    /// Smallest ΔT the selected pump can serve.
    Pump,
    /// Existing design plus manual valve overrides.
    Balancing,
}

impl DesignMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DesignMode::Existing => "existing",
            DesignMode::Fixed => "fixed",
            DesignMode::Pump => "pump",
            DesignMode::Balancing => "balancing",
        }
    }
}

impl std::str::FromStr for DesignMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "existing" => Ok(DesignMode::Existing),
            "fixed" => Ok(DesignMode::Fixed),
            "pump" => Ok(DesignMode::Pump),
            "balancing" => Ok(DesignMode::Balancing),
            other => Err(format!(
                "unknown design mode '{other}' (expected existing, fixed, pump or balancing)"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesignConfigDef {
    #[serde(default)]
    pub mode: DesignMode,
    #[serde(default = "default_delta_t")]
    pub delta_t_c: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_temperature_c: Option<f64>,
    #[serde(default)]
    pub fix_diameter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pump: Option<PumpSelectionDef>,
    #[serde(default)]
    pub valve: ValveConfigDef,
}

fn default_delta_t() -> f64 {
    10.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpSelectionDef {
    pub model: String,
    pub speed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValveConfigDef {
    #[serde(default = "default_valve_type")]
    pub valve_type: String,
    /// Position count of the custom valve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<u32>,
    /// Fully-open kv of the custom valve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kv_max: Option<f64>,
}

fn default_valve_type() -> String {
    hb_components::valve::CUSTOM_VALVE.to_string()
}

impl Default for ValveConfigDef {
    fn default() -> Self {
        Self {
            valve_type: default_valve_type(),
            positions: None,
            kv_max: None,
        }
    }
}

/// Room heat load, as produced by a heat-loss calculation or entered by hand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomDef {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_indoor_temperature")]
    pub indoor_temperature_c: f64,
    pub heat_loss_w: f64,
}

fn default_indoor_temperature() -> f64 {
    20.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RadiatorDef {
    pub id: u32,
    pub room: u32,
    pub collector: String,
    /// Output at 75/65/20.
    pub rated_power_w: f64,
    pub circuit_length_m: f64,
    #[serde(default)]
    pub electric_power_w: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_diameter_mm: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectorDef {
    pub name: String,
    pub circuit_length_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValveOverrideDef {
    pub radiator: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valve_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kv: Option<f64>,
}

/// Project-supplied catalogs. An empty table falls back to the built-in one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CatalogsDef {
    /// model → speed → [flow kg/h, head kPa] samples
    #[serde(default)]
    pub pumps: BTreeMap<String, BTreeMap<String, Vec<[f64; 2]>>>,
    #[serde(default)]
    pub valves: BTreeMap<String, ValveCatalogDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValveCatalogDef {
    pub kv_values: Vec<f64>,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_uses_defaults() {
        let yaml = r#"
version: 1
name: Minimal
config: {}
rooms:
  - id: 1
    heat_loss_w: 800
radiators:
  - id: 1
    room: 1
    collector: Collector 1
    rated_power_w: 2000
    circuit_length_m: 8
collectors:
  - name: Collector 1
    circuit_length_m: 5
"#;
        let project: DesignProject = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(project.config.mode, DesignMode::Existing);
        assert_eq!(project.config.delta_t_c, 10.0);
        assert_eq!(project.config.valve.valve_type, "Custom");
        assert_eq!(project.rooms[0].indoor_temperature_c, 20.0);
        assert_eq!(project.radiators[0].electric_power_w, 0.0);
        assert!(project.catalogs.is_none());
    }

    #[test]
    fn missing_mandatory_field_is_rejected() {
        let yaml = r#"
version: 1
name: Broken
config: {}
radiators:
  - id: 1
    room: 1
    collector: Collector 1
    circuit_length_m: 8
"#;
        assert!(serde_yaml::from_str::<DesignProject>(yaml).is_err());
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("pump".parse::<DesignMode>(), Ok(DesignMode::Pump));
        assert!("turbo".parse::<DesignMode>().is_err());
        assert_eq!(DesignMode::Balancing.as_str(), "balancing");
    }

    #[test]
    fn mode_serializes_snake_case() {
        let json = serde_json::to_string(&DesignMode::Balancing).unwrap();
        assert_eq!(json, "\"balancing\"");
    }
}
