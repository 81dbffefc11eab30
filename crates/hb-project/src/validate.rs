//! Project validation logic.

use std::collections::HashSet;

use hb_components::pipe::is_standard_diameter;
use hb_components::valve::{CUSTOM_VALVE, DEFAULT_CUSTOM_POSITIONS};

use crate::catalog::effective_catalogs_def;
use crate::schema::{DesignProject, LATEST_VERSION, RadiatorDef, ValveOverrideDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn require_finite_non_negative(field: String, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(invalid(field, value, "must be finite"));
    }
    if value < 0.0 {
        return Err(invalid(field, value, "must be non-negative"));
    }
    Ok(())
}

pub fn validate_project(project: &DesignProject) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let catalogs = effective_catalogs_def(project);
    let valve_known =
        |name: &str| name == CUSTOM_VALVE || catalogs.valves.contains_key(name);
    // Last settable position; the reference polynomial has no fixed range.
    let last_position = |name: &str| -> Option<u32> {
        if name == CUSTOM_VALVE {
            let valve = &project.config.valve;
            match (valve.positions, valve.kv_max) {
                (None, None) => None,
                (positions, _) => Some(positions.unwrap_or(DEFAULT_CUSTOM_POSITIONS)),
            }
        } else {
            catalogs
                .valves
                .get(name)
                .map(|entry| entry.kv_values.len().saturating_sub(1) as u32)
        }
    };

    let config = &project.config;
    if !config.delta_t_c.is_finite() || config.delta_t_c <= 0.0 {
        return Err(invalid("config.delta_t_c", config.delta_t_c, "must be positive"));
    }
    if let Some(ts) = config.supply_temperature_c {
        if !ts.is_finite() {
            return Err(invalid("config.supply_temperature_c", ts, "must be finite"));
        }
    }
    if let Some(pump) = &config.pump {
        let known = catalogs
            .pumps
            .get(&pump.model)
            .is_some_and(|speeds| speeds.contains_key(&pump.speed));
        if !known {
            return Err(ValidationError::MissingReference {
                id: format!("{} ({})", pump.model, pump.speed),
                context: "pump catalog".to_string(),
            });
        }
    }
    if !valve_known(&config.valve.valve_type) {
        return Err(ValidationError::MissingReference {
            id: config.valve.valve_type.clone(),
            context: "valve catalog".to_string(),
        });
    }
    if config.valve.positions == Some(0) {
        return Err(invalid("config.valve.positions", 0, "must be positive"));
    }
    if let Some(kv_max) = config.valve.kv_max {
        if !kv_max.is_finite() || kv_max <= 0.0 {
            return Err(invalid("config.valve.kv_max", kv_max, "must be positive"));
        }
    }

    let mut room_ids = HashSet::new();
    for room in &project.rooms {
        if !room_ids.insert(room.id) {
            return Err(ValidationError::DuplicateId {
                id: room.id.to_string(),
                context: "rooms".to_string(),
            });
        }
        require_finite_non_negative(format!("room {} heat_loss_w", room.id), room.heat_loss_w)?;
        if !room.indoor_temperature_c.is_finite() {
            return Err(invalid(
                format!("room {} indoor_temperature_c", room.id),
                room.indoor_temperature_c,
                "must be finite",
            ));
        }
    }

    let mut collector_names = HashSet::new();
    for collector in &project.collectors {
        if !collector_names.insert(collector.name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: collector.name.clone(),
                context: "collectors".to_string(),
            });
        }
        require_finite_non_negative(
            format!("collector '{}' circuit_length_m", collector.name),
            collector.circuit_length_m,
        )?;
    }

    let mut radiator_ids = HashSet::new();
    for radiator in &project.radiators {
        if !radiator_ids.insert(radiator.id) {
            return Err(ValidationError::DuplicateId {
                id: radiator.id.to_string(),
                context: "radiators".to_string(),
            });
        }
        validate_radiator(radiator, &room_ids, &collector_names)?;
    }

    for ov in &project.valve_overrides {
        validate_override(
            ov,
            &radiator_ids,
            &project.config.valve.valve_type,
            &valve_known,
            &last_position,
        )?;
    }

    for (model, speeds) in &catalogs.pumps {
        for (speed, points) in speeds {
            let ordered = points.windows(2).all(|w| w[1][0] > w[0][0]);
            if points.len() < 2 || !ordered {
                return Err(invalid(
                    format!("pump curve {model} ({speed})"),
                    format!("{} points", points.len()),
                    "needs at least two points with increasing flow",
                ));
            }
        }
    }

    Ok(())
}

fn validate_radiator(
    radiator: &RadiatorDef,
    room_ids: &HashSet<u32>,
    collector_names: &HashSet<&str>,
) -> Result<(), ValidationError> {
    let label = format!("radiator {}", radiator.id);
    if radiator.id == 0 {
        return Err(invalid("radiator id", 0, "radiator numbers start at 1"));
    }
    if !room_ids.contains(&radiator.room) {
        return Err(ValidationError::MissingReference {
            id: radiator.room.to_string(),
            context: format!("{label} room"),
        });
    }
    if !collector_names.contains(radiator.collector.as_str()) {
        return Err(ValidationError::MissingReference {
            id: radiator.collector.clone(),
            context: format!("{label} collector"),
        });
    }
    require_finite_non_negative(format!("{label} rated_power_w"), radiator.rated_power_w)?;
    require_finite_non_negative(format!("{label} circuit_length_m"), radiator.circuit_length_m)?;
    require_finite_non_negative(format!("{label} electric_power_w"), radiator.electric_power_w)?;
    if let Some(d) = radiator.fixed_diameter_mm {
        if !is_standard_diameter(d) {
            return Err(invalid(
                format!("{label} fixed_diameter_mm"),
                d,
                "not a standard diameter",
            ));
        }
    }
    Ok(())
}

fn validate_override(
    ov: &ValveOverrideDef,
    radiator_ids: &HashSet<u32>,
    valve_type: &str,
    valve_known: &impl Fn(&str) -> bool,
    last_position: &impl Fn(&str) -> Option<u32>,
) -> Result<(), ValidationError> {
    if !radiator_ids.contains(&ov.radiator) {
        return Err(ValidationError::MissingReference {
            id: ov.radiator.to_string(),
            context: "valve override radiator".to_string(),
        });
    }
    if let Some(kv) = ov.kv {
        if !kv.is_finite() || kv <= 0.0 {
            return Err(invalid(
                format!("valve override {} kv", ov.radiator),
                kv,
                "must be positive",
            ));
        }
    }
    if let Some(name) = &ov.valve_name {
        if !valve_known(name) {
            return Err(ValidationError::MissingReference {
                id: name.clone(),
                context: format!("valve override {} valve_name", ov.radiator),
            });
        }
    }
    if let Some(position) = ov.position {
        let name = ov.valve_name.as_deref().unwrap_or(valve_type);
        if let Some(last) = last_position(name) {
            if position > last {
                return Err(invalid(
                    format!("valve override {} position", ov.radiator),
                    position,
                    &format!("{name} has positions 0..={last}"),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn project() -> DesignProject {
        DesignProject {
            version: 1,
            name: "Test".into(),
            config: DesignConfigDef {
                mode: DesignMode::Existing,
                delta_t_c: 10.0,
                supply_temperature_c: None,
                fix_diameter: false,
                pump: None,
                valve: ValveConfigDef::default(),
            },
            rooms: vec![RoomDef {
                id: 1,
                name: None,
                indoor_temperature_c: 20.0,
                heat_loss_w: 800.0,
            }],
            radiators: vec![RadiatorDef {
                id: 1,
                room: 1,
                collector: "C1".into(),
                rated_power_w: 2000.0,
                circuit_length_m: 8.0,
                electric_power_w: 0.0,
                fixed_diameter_mm: None,
            }],
            collectors: vec![CollectorDef {
                name: "C1".into(),
                circuit_length_m: 5.0,
            }],
            valve_overrides: vec![],
            catalogs: None,
        }
    }

    #[test]
    fn valid_project_passes() {
        validate_project(&project()).unwrap();
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut p = project();
        p.version = 9;
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::UnsupportedVersion { version: 9 })
        ));
    }

    #[test]
    fn rejects_duplicate_radiator() {
        let mut p = project();
        p.radiators.push(p.radiators[0].clone());
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn rejects_unknown_references() {
        let mut p = project();
        p.radiators[0].collector = "C9".into();
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::MissingReference { .. })
        ));

        let mut p = project();
        p.radiators[0].room = 4;
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::MissingReference { .. })
        ));

        let mut p = project();
        p.valve_overrides.push(ValveOverrideDef {
            radiator: 5,
            valve_name: None,
            position: Some(2),
            kv: None,
        });
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn rejects_bad_numbers() {
        let mut p = project();
        p.config.delta_t_c = 0.0;
        assert!(validate_project(&p).is_err());

        let mut p = project();
        p.radiators[0].rated_power_w = f64::NAN;
        assert!(validate_project(&p).is_err());

        let mut p = project();
        p.radiators[0].id = 0;
        assert!(validate_project(&p).is_err());

        let mut p = project();
        p.radiators[0].fixed_diameter_mm = Some(15.0);
        assert!(validate_project(&p).is_err());

        let mut p = project();
        p.config.valve.kv_max = Some(-1.0);
        assert!(validate_project(&p).is_err());
    }

    fn position_override(position: u32, valve_name: Option<&str>) -> ValveOverrideDef {
        ValveOverrideDef {
            radiator: 1,
            valve_name: valve_name.map(str::to_string),
            position: Some(position),
            kv: None,
        }
    }

    #[test]
    fn override_position_must_exist_on_valve() {
        // Danfoss RA-N 15 (1/2) has eight kv steps: positions 0..=7
        let mut p = project();
        p.valve_overrides.push(position_override(7, Some("Danfoss RA-N 15 (1/2)")));
        validate_project(&p).unwrap();

        p.valve_overrides[0] = position_override(42, Some("Danfoss RA-N 15 (1/2)"));
        match validate_project(&p) {
            Err(ValidationError::InvalidValue { field, value, .. }) => {
                assert_eq!(field, "valve override 1 position");
                assert_eq!(value, "42");
            }
            other => panic!("expected invalid position, got {other:?}"),
        }

        // the configured valve applies when the override names none
        let mut p = project();
        p.config.valve.valve_type = "Danfoss RA-N 15 (1/2)".into();
        p.valve_overrides.push(position_override(8, None));
        assert!(validate_project(&p).is_err());
    }

    #[test]
    fn override_position_on_custom_valve() {
        let mut p = project();
        p.config.valve.positions = Some(10);
        p.valve_overrides.push(position_override(10, None));
        validate_project(&p).unwrap();
        p.valve_overrides[0] = position_override(11, None);
        assert!(validate_project(&p).is_err());

        // kv only: the default position count applies
        let mut p = project();
        p.config.valve.kv_max = Some(0.9);
        p.valve_overrides.push(position_override(9, None));
        assert!(validate_project(&p).is_err());

        // no custom range configured: reference polynomial, not range-checked
        let mut p = project();
        p.valve_overrides.push(position_override(12, None));
        validate_project(&p).unwrap();
    }

    #[test]
    fn checks_catalog_names() {
        let mut p = project();
        p.config.valve.valve_type = "Comap".into();
        validate_project(&p).unwrap();

        p.config.valve.valve_type = "Mystery".into();
        assert!(validate_project(&p).is_err());

        let mut p = project();
        p.config.pump = Some(PumpSelectionDef {
            model: "Generic 25-60".into(),
            speed: "speed_4".into(),
        });
        assert!(validate_project(&p).is_err());
    }
}
