//! Project loading, validation, catalog listing and design entry points.

use std::path::Path;

use hb_project::{Catalogs, DesignMode, DesignProject};

use crate::design_service;
use crate::error::{AppError, AppResult};
use crate::input::DesignInput;
use crate::progress::DesignProgressEvent;
use crate::results::DesignReport;

/// Load a project (YAML or JSON by extension).
pub fn load_project(path: &Path) -> AppResult<DesignProject> {
    Ok(hb_project::load_project(path)?)
}

pub fn save_project(path: &Path, project: &DesignProject) -> AppResult<()> {
    Ok(hb_project::save_project(path, project)?)
}

/// Validate project structure and catalog references.
pub fn validate_project(project: &DesignProject) -> AppResult<()> {
    Ok(hb_project::validate_project(project)?)
}

/// Command-line adjustments applied on top of the project configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub mode: Option<DesignMode>,
    pub delta_t_c: Option<f64>,
    pub supply_temperature_c: Option<f64>,
}

impl ConfigOverrides {
    pub fn apply(&self, project: &mut DesignProject) {
        if let Some(mode) = self.mode {
            project.config.mode = mode;
        }
        if let Some(dt) = self.delta_t_c {
            project.config.delta_t_c = dt;
        }
        if let Some(ts) = self.supply_temperature_c {
            project.config.supply_temperature_c = Some(ts);
        }
    }
}

/// Validate a project and run the design on its effective catalogs.
pub fn design_project(project: &DesignProject) -> AppResult<DesignReport> {
    design_project_with_progress(project, None)
}

pub fn design_project_with_progress(
    project: &DesignProject,
    progress_cb: Option<&mut dyn FnMut(DesignProgressEvent)>,
) -> AppResult<DesignReport> {
    validate_project(project)?;
    let catalogs = Catalogs::for_project(project)?;
    let input = DesignInput::from_project(project)?;
    design_service::run_design_with_progress(&input, &catalogs, progress_cb)
}

/// Load, adjust and design a project file.
pub fn design_project_file(path: &Path, overrides: &ConfigOverrides) -> AppResult<DesignReport> {
    let mut project = load_project(path)?;
    overrides.apply(&mut project);
    design_project(&project)
}

/// Write a report as pretty JSON.
pub fn write_report_json(path: &Path, report: &DesignReport) -> AppResult<()> {
    let content = serde_json::to_string_pretty(report)?;
    std::fs::write(path, content).map_err(|source| AppError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Catalog entry for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpSummary {
    pub model: String,
    pub speeds: Vec<String>,
    /// (min, max) flow over all speeds, kg/h.
    pub flow_range_kg_h: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValveSummary {
    pub name: String,
    pub description: String,
    pub positions: usize,
    pub kv_open: f64,
}

/// Catalogs in effect for an optional project; built-in ones otherwise.
pub fn catalogs_for(project: Option<&DesignProject>) -> AppResult<Catalogs> {
    Ok(match project {
        Some(p) => Catalogs::for_project(p)?,
        None => Catalogs::builtin()?,
    })
}

pub fn list_pumps(catalogs: &Catalogs) -> Vec<PumpSummary> {
    catalogs
        .pumps
        .models()
        .map(|model| {
            let speeds: Vec<_> = catalogs.pumps.speeds(model).collect();
            let flow_range_kg_h = speeds.iter().map(|(_, c)| c.flow_range()).fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), (a, b)| (lo.min(a), hi.max(b)),
            );
            PumpSummary {
                model: model.to_string(),
                speeds: speeds.iter().map(|(s, _)| s.to_string()).collect(),
                flow_range_kg_h,
            }
        })
        .collect()
}

pub fn list_valves(catalogs: &Catalogs) -> Vec<ValveSummary> {
    catalogs
        .valves
        .iter()
        .map(|(name, entry)| ValveSummary {
            name: name.to_string(),
            description: entry.description.clone(),
            positions: entry.kv_values.len(),
            kv_open: entry.kv_values.last().copied().unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_listing() {
        let catalogs = catalogs_for(None).unwrap();
        let pumps = list_pumps(&catalogs);
        assert!(!pumps.is_empty());
        assert!(pumps.iter().all(|p| !p.speeds.is_empty()));
        assert!(pumps.iter().all(|p| p.flow_range_kg_h.0 <= p.flow_range_kg_h.1));
        let valves = list_valves(&catalogs);
        assert!(valves.iter().all(|v| v.positions > 0 && v.kv_open > 0.0));
    }
}
