//! Pump sizing end to end: operating point inside the ΔT bisection.

use hb_components::{PumpCurve, SystemCurve};
use hb_solver::{
    DeltaTSearchConfig, OperatingPointConfig, OperatingPointOutcome, SolverError, Trial,
    search_min_delta_t, solve_operating_point,
};

fn generic_speed_2() -> PumpCurve {
    PumpCurve::new(vec![
        (0.0, 58.0),
        (300.0, 52.0),
        (600.0, 44.0),
        (900.0, 32.0),
        (1200.0, 19.0),
        (1400.0, 11.0),
    ])
    .unwrap()
}

/// Network whose total flow falls as 1/ΔT and whose head grows as Q².
fn network_flow(delta_t: f64) -> f64 {
    6000.0 / delta_t
}

fn network_head_kpa(flow: f64) -> f64 {
    8e-5 * flow * flow
}

fn evaluate(pump: &PumpCurve, delta_t: f64) -> Result<Trial<Option<f64>>, SolverError> {
    let flow = network_flow(delta_t);
    let system = SystemCurve::from_design_point(flow, network_head_kpa(flow));
    let solution = solve_operating_point(pump, &system, &OperatingPointConfig::default())?;
    let q_star = solution.outcome.point().map(|p| p.flow_kg_h);
    Ok(Trial {
        satisfied: q_star.is_some_and(|q| flow <= q),
        payload: q_star,
    })
}

#[test]
fn finds_smallest_serviceable_delta_t() {
    let pump = generic_speed_2();
    let config = DeltaTSearchConfig::for_design_delta_t(10.0);
    let result = search_min_delta_t(&config, |dt| evaluate(&pump, dt)).unwrap();

    assert!(result.is_accepted());
    let dt = result.delta_t_k();
    let q_star = result.payload().unwrap();

    // analytic crossing of 44 − 0.04·(Q − 600) and 8e-5·Q² is Q ≈ 705
    assert!((q_star - 705.25).abs() < 2.0);
    assert!(network_flow(dt) <= q_star);
    assert!(network_flow(dt - config.tolerance_k) > q_star);
}

#[test]
fn weak_pump_reports_insufficient() {
    let weak = PumpCurve::new(vec![(0.0, 5.0), (200.0, 1.0)]).unwrap();
    let config = DeltaTSearchConfig::for_design_delta_t(10.0);
    let result = search_min_delta_t(&config, |dt| evaluate(&weak, dt)).unwrap();

    assert!(!result.is_accepted());
    assert_eq!(result.delta_t_k(), 20.0);
    assert_eq!(result.trace().len(), 1);
}

#[test]
fn operating_point_below_required_head() {
    let pump = PumpCurve::new(vec![(100.0, 20.0), (400.0, 12.0)]).unwrap();
    let system = SystemCurve::from_design_point(100.0, 40.0);
    let solution = solve_operating_point(&pump, &system, &OperatingPointConfig::default()).unwrap();
    assert_eq!(solution.outcome, OperatingPointOutcome::PumpInsufficient);
}
