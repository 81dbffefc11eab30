//! Bisection over ΔT for the smallest temperature drop a pump can serve.
//!
//! A larger ΔT means less circulated flow, so feasibility is expected to be
//! monotone in ΔT: the search keeps the upper bracket end feasible and the
//! lower end infeasible.

use tracing::debug;

/// ΔT search configuration.
#[derive(Debug, Clone, Copy)]
pub struct DeltaTSearchConfig {
    /// Lower bracket end (K)
    pub low_k: f64,
    /// Upper bracket end, evaluated first (K)
    pub high_k: f64,
    /// Maximum bisection steps
    pub max_iterations: usize,
    /// Stop once the bracket is narrower than this (K)
    pub tolerance_k: f64,
}

impl DeltaTSearchConfig {
    /// Smallest upper bound the search starts from.
    pub const MIN_HIGH_K: f64 = 20.0;

    /// Configuration for a design ΔT; the upper bound is at least 20 K.
    pub fn for_design_delta_t(delta_t_k: f64) -> Self {
        Self {
            high_k: delta_t_k.max(Self::MIN_HIGH_K),
            ..Self::default()
        }
    }
}

impl Default for DeltaTSearchConfig {
    fn default() -> Self {
        Self {
            low_k: 0.1,
            high_k: Self::MIN_HIGH_K,
            max_iterations: 50,
            tolerance_k: 0.1,
        }
    }
}

/// Evaluation of one ΔT.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial<T> {
    /// Whether the pump serves the required flow at this ΔT.
    pub satisfied: bool,
    pub payload: T,
}

/// How a trial ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialStatus {
    Satisfied,
    Unsatisfied,
    /// Evaluation failed; counted as unsatisfied.
    Failed(String),
}

/// One step of the search, in evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaTTrial {
    pub delta_t_k: f64,
    pub status: TrialStatus,
}

/// Search result.
#[derive(Debug, Clone, PartialEq)]
pub enum DeltaTSearch<T> {
    /// Smallest satisfied ΔT found, with its evaluation.
    Accepted {
        delta_t_k: f64,
        best: T,
        iterations: usize,
        trace: Vec<DeltaTTrial>,
    },
    /// Not satisfied even at the upper bound; carries that evaluation.
    Insufficient {
        delta_t_k: f64,
        at_high: T,
        trace: Vec<DeltaTTrial>,
    },
}

impl<T> DeltaTSearch<T> {
    pub fn delta_t_k(&self) -> f64 {
        match self {
            Self::Accepted { delta_t_k, .. } | Self::Insufficient { delta_t_k, .. } => *delta_t_k,
        }
    }

    /// The evaluation to report: the best trial, or the upper bound.
    pub fn payload(&self) -> &T {
        match self {
            Self::Accepted { best, .. } => best,
            Self::Insufficient { at_high, .. } => at_high,
        }
    }

    pub fn into_payload(self) -> T {
        match self {
            Self::Accepted { best, .. } => best,
            Self::Insufficient { at_high, .. } => at_high,
        }
    }

    pub fn trace(&self) -> &[DeltaTTrial] {
        match self {
            Self::Accepted { trace, .. } | Self::Insufficient { trace, .. } => trace,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Find the smallest ΔT whose trial is satisfied.
///
/// The upper bound is evaluated first and an error there is returned as is.
/// Errors at interior points are recorded in the trace and move the lower
/// bound up.
pub fn search_min_delta_t<T, E, F>(
    config: &DeltaTSearchConfig,
    mut evaluate: F,
) -> Result<DeltaTSearch<T>, E>
where
    F: FnMut(f64) -> Result<Trial<T>, E>,
    E: std::fmt::Display,
{
    let mut trace = Vec::new();

    let high = evaluate(config.high_k)?;
    if !high.satisfied {
        debug!(delta_t = config.high_k, "pump insufficient at upper bound");
        trace.push(DeltaTTrial {
            delta_t_k: config.high_k,
            status: TrialStatus::Unsatisfied,
        });
        return Ok(DeltaTSearch::Insufficient {
            delta_t_k: config.high_k,
            at_high: high.payload,
            trace,
        });
    }
    trace.push(DeltaTTrial {
        delta_t_k: config.high_k,
        status: TrialStatus::Satisfied,
    });

    let mut best = (config.high_k, high.payload);
    let mut lo = config.low_k;
    let mut hi = config.high_k;
    let mut iterations = 0;

    for iter in 0..config.max_iterations {
        let mid = (lo + hi) / 2.0;
        let status = match evaluate(mid) {
            Ok(trial) if trial.satisfied => {
                best = (mid, trial.payload);
                hi = mid;
                TrialStatus::Satisfied
            }
            Ok(_) => {
                lo = mid;
                TrialStatus::Unsatisfied
            }
            Err(err) => {
                lo = mid;
                TrialStatus::Failed(err.to_string())
            }
        };
        debug!(iteration = iter, delta_t = mid, ?status, lo, hi, "ΔT bisection step");
        trace.push(DeltaTTrial {
            delta_t_k: mid,
            status,
        });
        iterations = iter + 1;

        if hi - lo < config.tolerance_k {
            break;
        }
    }

    let (delta_t_k, best) = best;
    Ok(DeltaTSearch::Accepted {
        delta_t_k,
        best,
        iterations,
        trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold(limit: f64) -> impl FnMut(f64) -> Result<Trial<f64>, String> {
        move |dt| {
            Ok(Trial {
                satisfied: dt >= limit,
                payload: dt * 2.0,
            })
        }
    }

    #[test]
    fn converges_to_threshold() {
        let config = DeltaTSearchConfig::default();
        let result = search_min_delta_t(&config, threshold(7.3)).unwrap();
        assert!(result.is_accepted());
        let dt = result.delta_t_k();
        assert!((7.3..7.4).contains(&dt), "got {dt}");
        assert_eq!(*result.payload(), dt * 2.0);
    }

    #[test]
    fn stops_on_bracket_width() {
        let config = DeltaTSearchConfig::default();
        let DeltaTSearch::Accepted {
            iterations, trace, ..
        } = search_min_delta_t(&config, threshold(7.3)).unwrap()
        else {
            panic!("expected accepted");
        };
        // 19.9 K halves below 0.1 K after 8 steps
        assert_eq!(iterations, 8);
        assert_eq!(trace.len(), 9);
        assert_eq!(trace[0].delta_t_k, 20.0);
    }

    #[test]
    fn respects_iteration_cap() {
        let config = DeltaTSearchConfig {
            max_iterations: 3,
            ..DeltaTSearchConfig::default()
        };
        let result = search_min_delta_t(&config, threshold(7.3)).unwrap();
        assert_eq!(result.trace().len(), 4);
    }

    #[test]
    fn insufficient_at_high_bound() {
        let config = DeltaTSearchConfig::for_design_delta_t(10.0);
        let result = search_min_delta_t(&config, threshold(25.0)).unwrap();
        assert!(!result.is_accepted());
        assert_eq!(result.delta_t_k(), 20.0);
        assert_eq!(result.into_payload(), 40.0);
    }

    #[test]
    fn high_bound_follows_design_delta_t() {
        assert_eq!(DeltaTSearchConfig::for_design_delta_t(10.0).high_k, 20.0);
        assert_eq!(DeltaTSearchConfig::for_design_delta_t(30.0).high_k, 30.0);
    }

    #[test]
    fn error_at_high_bound_aborts() {
        let config = DeltaTSearchConfig::default();
        let result: Result<DeltaTSearch<()>, String> =
            search_min_delta_t(&config, |_| Err("no diameter".to_string()));
        assert_eq!(result.unwrap_err(), "no diameter");
    }

    #[test]
    fn interior_errors_count_as_unsatisfied() {
        let config = DeltaTSearchConfig::default();
        let result = search_min_delta_t(&config, |dt| {
            if dt < 5.0 {
                Err(format!("infeasible at {dt}"))
            } else {
                Ok(Trial {
                    satisfied: true,
                    payload: (),
                })
            }
        })
        .unwrap();
        assert!((5.0..5.1).contains(&result.delta_t_k()));
        assert!(
            result
                .trace()
                .iter()
                .any(|t| matches!(t.status, TrialStatus::Failed(_)))
        );
    }
}
