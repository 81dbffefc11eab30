//! Intersection of a pump curve with a quadratic system curve.

use hb_components::{PumpCurve, SystemCurve};

use crate::error::{SolverError, SolverResult};

/// Operating-point grid configuration.
#[derive(Debug, Clone, Copy)]
pub struct OperatingPointConfig {
    /// Flow samples spanning the pump curve
    pub samples: usize,
}

impl Default for OperatingPointConfig {
    fn default() -> Self {
        Self { samples: 150 }
    }
}

/// Flow and head where pump and system curves meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    pub flow_kg_h: f64,
    pub head_kpa: f64,
}

/// What the grid scan found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperatingPointOutcome {
    Found(OperatingPoint),
    /// Pump head exceeds system head over the whole curve.
    BeyondCurve,
    /// System head exceeds (or meets) pump head over the whole curve.
    PumpInsufficient,
    /// Fewer than two comparable grid samples.
    InsufficientData,
}

impl OperatingPointOutcome {
    pub fn point(&self) -> Option<OperatingPoint> {
        match self {
            Self::Found(point) => Some(*point),
            _ => None,
        }
    }

    /// Advisory message for outcomes without an operating point.
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Self::Found(_) => None,
            Self::BeyondCurve => Some(
                "Pump curve stays above system curve – operating point may be at a higher flow than the provided curve covers.",
            ),
            Self::PumpInsufficient => {
                Some("System curve stays above pump curve – pump likely insufficient.")
            }
            Self::InsufficientData => Some("Insufficient data to find pump operating point."),
        }
    }
}

/// Pump and system heads sampled on a shared flow grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpSystemCurves {
    pub flow_kg_h: Vec<f64>,
    /// `None` where the flow lies outside the pump curve.
    pub pump_head_kpa: Vec<Option<f64>>,
    pub system_head_kpa: Vec<f64>,
}

impl PumpSystemCurves {
    pub fn sample(pump: &PumpCurve, system: &SystemCurve, samples: usize) -> Self {
        let flow_kg_h = pump.flow_grid(samples);
        let pump_head_kpa = flow_kg_h.iter().map(|&q| pump.head_at(q)).collect();
        let system_head_kpa = flow_kg_h.iter().map(|&q| system.head_at(q)).collect();
        Self {
            flow_kg_h,
            pump_head_kpa,
            system_head_kpa,
        }
    }
}

/// Operating point together with the sampled curves it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingPointSolution {
    pub outcome: OperatingPointOutcome,
    pub curves: PumpSystemCurves,
}

/// Locate the first crossing of pump and system curves on a flow grid.
pub fn solve_operating_point(
    pump: &PumpCurve,
    system: &SystemCurve,
    config: &OperatingPointConfig,
) -> SolverResult<OperatingPointSolution> {
    if config.samples < 2 {
        return Err(SolverError::ProblemSetup {
            what: format!("operating point grid needs at least 2 samples, got {}", config.samples),
        });
    }
    if !system.k.is_finite() {
        return Err(SolverError::ProblemSetup {
            what: format!("system coefficient is not finite ({})", system.k),
        });
    }

    let curves = PumpSystemCurves::sample(pump, system, config.samples);
    let outcome = scan_for_crossing(&curves);
    Ok(OperatingPointSolution { outcome, curves })
}

/// Sign with zero kept distinct (unlike `f64::signum`).
fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

fn scan_for_crossing(curves: &PumpSystemCurves) -> OperatingPointOutcome {
    // (flow, pump head, pump − system) where both heads are defined
    let valid: Vec<(f64, f64, f64)> = curves
        .flow_kg_h
        .iter()
        .zip(&curves.pump_head_kpa)
        .zip(&curves.system_head_kpa)
        .filter_map(|((&q, pump), &sys)| {
            pump.filter(|h| h.is_finite() && sys.is_finite())
                .map(|h| (q, h, h - sys))
        })
        .collect();

    if valid.len() < 2 {
        return OperatingPointOutcome::InsufficientData;
    }

    let crossing = valid
        .windows(2)
        .find(|w| sign(w[0].2) != sign(w[1].2));

    let Some(w) = crossing else {
        return if valid.iter().all(|&(_, _, d)| d > 0.0) {
            OperatingPointOutcome::BeyondCurve
        } else {
            OperatingPointOutcome::PumpInsufficient
        };
    };

    let (x0, p0, y0) = w[0];
    let (x1, p1, y1) = w[1];
    let flow = if y1 != y0 {
        x0 - y0 * (x1 - x0) / (y1 - y0)
    } else {
        x0
    };
    let t = (flow - x0) / (x1 - x0);
    OperatingPointOutcome::Found(OperatingPoint {
        flow_kg_h: flow,
        head_kpa: p0 + t * (p1 - p0),
    })
}
