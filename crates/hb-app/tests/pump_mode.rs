//! Pump-sizing runs: accepted search, insufficient pump and chart series.

use std::collections::BTreeMap;
use std::path::Path;

use hb_app::pump_mode::PUMP_INSUFFICIENT_MESSAGE;
use hb_app::{design_project, load_project};
use hb_project::{CatalogsDef, DesignMode, DesignProject, PumpSelectionDef};

fn demo(name: &str) -> DesignProject {
    load_project(&Path::new("../../demos/projects").join(name)).unwrap()
}

#[test]
fn pump_sizing_accepts_smallest_delta_t() {
    let report = design_project(&demo("03_pump_sizing.yaml")).unwrap();
    let pump = report.pump.as_ref().expect("pump result");
    let search = pump.search.as_ref().expect("search result");

    assert!(search.accepted);
    assert_eq!(report.delta_t_c, search.delta_t_c);
    assert!(search.delta_t_c > 0.1 && search.delta_t_c <= 20.0);
    assert_eq!(search.trials[0].delta_t_c, 20.0);
    assert_eq!(search.trials[0].status, "satisfied");
    assert!(search.trials.len() <= 51);

    let op = pump.operating_point.expect("operating point");
    assert!(report.metrics.total_flow_kg_h <= op.flow_kg_h);

    let summary = pump.summary.as_deref().unwrap();
    assert!(summary.starts_with("Pump mode: ΔT="), "{summary}");
    assert!(!report.warnings.iter().any(|w| w == PUMP_INSUFFICIENT_MESSAGE));
    assert!(report.warnings.iter().any(|w| w == summary));

    let chart = pump.chart.as_ref().expect("chart in pump mode");
    assert_eq!(chart.flow_kg_h.len(), 150);
    assert_eq!(chart.pump_head_kpa.len(), 150);
    assert_eq!(chart.system_head_kpa.len(), 150);
    assert_eq!(chart.flow_kg_h[0], 0.0);
    assert_eq!(chart.flow_kg_h[149], 1400.0);
    assert!(chart.pump_head_kpa.iter().all(Option::is_some));
    assert_eq!(chart.operating_point, Some(op));
}

#[test]
fn weak_pump_is_insufficient() {
    let mut project = demo("01_single_radiator.yaml");
    project.config.mode = DesignMode::Pump;
    project.config.pump = Some(PumpSelectionDef {
        model: "Weak".to_string(),
        speed: "only".to_string(),
    });
    project.catalogs = Some(CatalogsDef {
        pumps: BTreeMap::from([(
            "Weak".to_string(),
            BTreeMap::from([("only".to_string(), vec![[500.0, 20.0], [1000.0, 10.0]])]),
        )]),
        valves: BTreeMap::new(),
    });

    let report = design_project(&project).unwrap();
    let pump = report.pump.as_ref().unwrap();
    let search = pump.search.as_ref().unwrap();

    assert!(!search.accepted);
    assert_eq!(search.trials.len(), 1);
    assert_eq!(report.delta_t_c, 20.0);
    assert!(pump.operating_point.is_none());
    assert!(report.warnings.iter().any(|w| w == PUMP_INSUFFICIENT_MESSAGE));
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("pump likely insufficient"))
    );
    // the design is still reported at the upper bound
    assert_eq!(report.radiators.len(), 1);
    assert!(report.radiator(1).unwrap().mass_flow_kg_h > 0.0);
}

#[test]
fn operating_point_without_pump_mode() {
    let mut project = demo("01_single_radiator.yaml");
    project.config.pump = Some(PumpSelectionDef {
        model: "Generic 25-60".to_string(),
        speed: "speed_1".to_string(),
    });

    let report = design_project(&project).unwrap();
    let pump = report.pump.as_ref().unwrap();
    assert!(pump.search.is_none());
    assert!(pump.chart.is_none());
    assert!(pump.system_coefficient > 0.0);
    assert_eq!(report.delta_t_c, 10.0);
}

#[test]
fn low_configured_delta_t_does_not_block_search() {
    // At 0.5 K every radiator needs 6890 kg/h, beyond the largest pipe.
    let mut project = demo("03_pump_sizing.yaml");
    for room in &mut project.rooms {
        room.heat_loss_w = 4000.0;
    }
    for radiator in &mut project.radiators {
        radiator.rated_power_w = 4000.0;
    }
    let mut at_bound = project.clone();
    project.config.delta_t_c = 0.5;
    at_bound.config.delta_t_c = 20.0;

    let report = design_project(&project).unwrap();
    let search = report.pump.as_ref().unwrap().search.as_ref().unwrap();
    assert!(search.accepted);
    assert_eq!(search.trials[0].delta_t_c, 20.0);
    assert!((report.delta_t_c - 6.94).abs() < 0.01, "{}", report.delta_t_c);
    assert!(report.radiators.iter().all(|r| r.mass_flow_kg_h > 0.0));

    // the configured ΔT only matters above the 20 K bound
    assert_eq!(report, design_project(&at_bound).unwrap());
}
