//! Pump curves, the pump library and quadratic system curves.
//!
//! Flows are kg/h and heads kPa, the units manufacturer tables are given in.

use std::collections::BTreeMap;

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};

/// Lower bound on design flow when deriving a system coefficient.
const MIN_DESIGN_FLOW_KG_H: f64 = 1e-6;

/// Manufacturer pump curve: (flow kg/h, head kPa) samples sorted by flow.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpCurve {
    points: Vec<(f64, f64)>,
}

impl PumpCurve {
    /// Build a curve. Points are sorted by flow; at least two distinct flows are required.
    pub fn new(mut points: Vec<(f64, f64)>) -> ComponentResult<Self> {
        if points.len() < 2 {
            return Err(ComponentError::InvalidArg {
                what: "pump curve needs at least two points",
            });
        }
        for &(q, h) in &points {
            check_finite(q, "pump curve flow")?;
            check_finite(h, "pump curve head")?;
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        if points.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(ComponentError::InvalidArg {
                what: "pump curve flows must be strictly increasing",
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// (min, max) flow covered by the curve.
    pub fn flow_range(&self) -> (f64, f64) {
        let first = self.points.first().map_or(0.0, |p| p.0);
        let last = self.points.last().map_or(0.0, |p| p.0);
        (first, last)
    }

    /// Linearly interpolated head; `None` outside the curve's flow range.
    pub fn head_at(&self, flow_kg_h: f64) -> Option<f64> {
        let (q_min, q_max) = self.flow_range();
        if !flow_kg_h.is_finite() || flow_kg_h < q_min || flow_kg_h > q_max {
            return None;
        }
        self.points.windows(2).find_map(|w| {
            let (q0, h0) = w[0];
            let (q1, h1) = w[1];
            (flow_kg_h >= q0 && flow_kg_h <= q1)
                .then(|| h0 + (h1 - h0) * (flow_kg_h - q0) / (q1 - q0))
        })
    }

    /// Evenly spaced flows spanning the curve, endpoints included.
    pub fn flow_grid(&self, samples: usize) -> Vec<f64> {
        let (q_min, q_max) = self.flow_range();
        match samples {
            0 => Vec::new(),
            1 => vec![q_min],
            n => {
                let step = (q_max - q_min) / (n - 1) as f64;
                (0..n)
                    .map(|i| if i == n - 1 { q_max } else { q_min + step * i as f64 })
                    .collect()
            }
        }
    }
}

/// Quadratic network resistance: head(Q) = k·Q² (kPa, kg/h).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemCurve {
    pub k: f64,
}

impl SystemCurve {
    /// Coefficient through the design point (total flow, branch head).
    ///
    /// A non-positive flow gives a flat curve; negative heads count as zero.
    pub fn from_design_point(total_flow_kg_h: f64, branch_head_kpa: f64) -> Self {
        if total_flow_kg_h <= 0.0 {
            return Self { k: 0.0 };
        }
        let q = total_flow_kg_h.max(MIN_DESIGN_FLOW_KG_H);
        Self {
            k: branch_head_kpa.max(0.0) / (q * q),
        }
    }

    pub fn head_at(&self, flow_kg_h: f64) -> f64 {
        self.k * flow_kg_h * flow_kg_h
    }
}

/// Pump curves keyed by model and speed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PumpLibrary {
    models: BTreeMap<String, BTreeMap<String, PumpCurve>>,
}

impl PumpLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: impl Into<String>, speed: impl Into<String>, curve: PumpCurve) {
        self.models
            .entry(model.into())
            .or_default()
            .insert(speed.into(), curve);
    }

    pub fn curve(&self, model: &str, speed: &str) -> ComponentResult<&PumpCurve> {
        self.models
            .get(model)
            .and_then(|speeds| speeds.get(speed))
            .ok_or_else(|| ComponentError::UnknownPumpCurve {
                model: model.to_string(),
                speed: speed.to_string(),
            })
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn speeds<'a>(&'a self, model: &str) -> impl Iterator<Item = (&'a str, &'a PumpCurve)> {
        self.models
            .get(model)
            .into_iter()
            .flat_map(|speeds| speeds.iter().map(|(s, c)| (s.as_str(), c)))
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
