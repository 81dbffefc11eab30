//! Thermostatic radiator valves: catalog tables, custom and reference characteristics.

use std::collections::BTreeMap;

use crate::common::{check_finite, kv_pressure_loss_pa};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{HydraulicResistance, checked_flow_kg_h};
use hb_core::units::constants::PA_PER_BAR;
use hb_core::units::{MassRate, Pressure, pa};

/// Name of the valve type that is not catalog-backed.
pub const CUSTOM_VALVE: &str = "Custom";

/// Fully-open kv assumed for a custom valve without a configured maximum.
pub const DEFAULT_CUSTOM_KV_MAX: f64 = 0.7;

/// Default position count of a custom valve given only its kv.
pub const DEFAULT_CUSTOM_POSITIONS: u32 = 8;

/// Reference characteristic kv(p) = a·p² + b·p + c.
pub const REFERENCE_POLY_A: f64 = 0.0114;
pub const REFERENCE_POLY_B: f64 = -0.0086;
pub const REFERENCE_POLY_C: f64 = 0.0446;

/// Position reported when the reference polynomial has no real root.
const REFERENCE_POLY_FALLBACK: f64 = 0.1;

/// Floor on the throttling pressure (bar) when sizing kv.
pub const MIN_VALVE_DP_BAR: f64 = 1e-9;

/// kv a valve must present to drop `dp_pa` at the given flow.
///
/// A branch that needs no throttling asks for a very large kv.
pub fn kv_needed(mass_flow_kg_h: f64, dp_pa: f64) -> f64 {
    let dp_bar = (dp_pa / PA_PER_BAR).max(MIN_VALVE_DP_BAR);
    (mass_flow_kg_h / 1000.0) / dp_bar.sqrt()
}

/// One catalog valve: kv per discrete position, position 0 most restrictive.
#[derive(Debug, Clone, PartialEq)]
pub struct ValveCatalogEntry {
    pub kv_values: Vec<f64>,
    pub description: String,
}

/// Lookup table of catalog valves by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValveCatalog {
    entries: BTreeMap<String, ValveCatalogEntry>,
}

impl ValveCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a valve. The kv table must be non-empty, positive and non-decreasing.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        entry: ValveCatalogEntry,
    ) -> ComponentResult<()> {
        if entry.kv_values.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "valve kv table must not be empty",
            });
        }
        for &kv in &entry.kv_values {
            check_finite(kv, "valve kv")?;
            if kv <= 0.0 {
                return Err(ComponentError::InvalidArg {
                    what: "valve kv values must be positive",
                });
            }
        }
        if entry.kv_values.windows(2).any(|w| w[1] < w[0]) {
            return Err(ComponentError::InvalidArg {
                what: "valve kv values must be non-decreasing",
            });
        }
        self.entries.insert(name.into(), entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ValveCatalogEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        name == CUSTOM_VALVE || self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValveCatalogEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a valve name into its characteristic.
    ///
    /// `custom` carries (kv_max, position count) for the custom valve; without it
    /// the reference polynomial is used.
    pub fn characteristic(
        &self,
        name: &str,
        custom: Option<(f64, u32)>,
    ) -> ComponentResult<ValveCharacteristic> {
        if name == CUSTOM_VALVE {
            return match custom {
                Some((kv_max, positions)) => ValveCharacteristic::custom(kv_max, positions),
                None => Ok(ValveCharacteristic::ReferencePolynomial),
            };
        }
        self.get(name)
            .map(|entry| ValveCharacteristic::Catalog {
                name: name.to_string(),
                kv_values: entry.kv_values.clone(),
            })
            .ok_or_else(|| ComponentError::UnknownValve {
                name: name.to_string(),
            })
    }
}

/// Mapping between valve position and kv.
#[derive(Debug, Clone, PartialEq)]
pub enum ValveCharacteristic {
    /// Discrete kv table from the catalog.
    Catalog { name: String, kv_values: Vec<f64> },
    /// Positions 0..=n mapped linearly onto 0..=`kv_max`.
    Custom { kv_max: f64, positions: u32 },
    /// Fixed reference polynomial, used when no custom range is configured.
    ReferencePolynomial,
}

impl ValveCharacteristic {
    pub fn custom(kv_max: f64, positions: u32) -> ComponentResult<Self> {
        check_finite(kv_max, "valve kv max")?;
        if kv_max <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "valve kv max must be positive",
            });
        }
        if positions == 0 {
            return Err(ComponentError::InvalidArg {
                what: "valve position count must be positive",
            });
        }
        Ok(Self::Custom { kv_max, positions })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Catalog { name, .. } => name,
            Self::Custom { .. } | Self::ReferencePolynomial => CUSTOM_VALVE,
        }
    }

    /// kv of the fully-open valve.
    pub fn open_kv(&self) -> f64 {
        match self {
            Self::Catalog { kv_values, .. } => kv_values.last().copied().unwrap_or(0.0),
            Self::Custom { kv_max, .. } => *kv_max,
            Self::ReferencePolynomial => DEFAULT_CUSTOM_KV_MAX,
        }
    }

    /// Most-open position whose kv still satisfies `kv_needed`.
    ///
    /// Catalog valves saturate at their last position.
    pub fn position_for_kv(&self, kv_needed: f64) -> u32 {
        match self {
            Self::Catalog { kv_values, .. } => kv_values
                .iter()
                .position(|&kv| kv >= kv_needed)
                .unwrap_or(kv_values.len().saturating_sub(1)) as u32,
            Self::Custom { kv_max, positions } => {
                let ratio_kv = (kv_needed / kv_max).clamp(0.0, 1.0);
                let ratio_pos = ratio_kv.sqrt().clamp(0.0, 1.0);
                (ratio_pos * f64::from(*positions)).ceil() as u32
            }
            Self::ReferencePolynomial => {
                let disc = REFERENCE_POLY_B * REFERENCE_POLY_B
                    - 4.0 * REFERENCE_POLY_A * (REFERENCE_POLY_C - kv_needed);
                let position = if disc <= 0.0 {
                    REFERENCE_POLY_FALLBACK
                } else {
                    (-REFERENCE_POLY_B + disc.sqrt()) / (2.0 * REFERENCE_POLY_A)
                };
                position.ceil().max(0.0) as u32
            }
        }
    }

    /// kv delivered at a position.
    pub fn kv_at_position(&self, position: u32) -> f64 {
        match self {
            Self::Catalog { kv_values, .. } => {
                let idx = (position as usize).min(kv_values.len().saturating_sub(1));
                kv_values.get(idx).copied().unwrap_or(0.0)
            }
            Self::Custom { kv_max, positions } => {
                kv_max * f64::from(position.min(*positions)) / f64::from(*positions)
            }
            Self::ReferencePolynomial => {
                let p = f64::from(position);
                REFERENCE_POLY_A * p * p + REFERENCE_POLY_B * p + REFERENCE_POLY_C
            }
        }
    }

    /// Fully-open setting of this valve.
    pub fn open(&self) -> ValveSetting {
        ValveSetting::new(self.name(), self.open_kv())
    }
}

/// A valve fixed at a resolved kv.
#[derive(Debug, Clone, PartialEq)]
pub struct ValveSetting {
    name: String,
    pub kv: f64,
}

impl ValveSetting {
    pub fn new(name: impl Into<String>, kv: f64) -> Self {
        Self {
            name: name.into(),
            kv,
        }
    }
}

impl HydraulicResistance for ValveSetting {
    fn name(&self) -> &str {
        &self.name
    }

    fn pressure_loss(&self, mdot: MassRate) -> ComponentResult<Pressure> {
        let flow = checked_flow_kg_h(mdot)?;
        Ok(pa(kv_pressure_loss_pa(flow, self.kv)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hb_core::units::{kg_per_h, to_pa};

    fn danfoss_15() -> ValveCharacteristic {
        ValveCharacteristic::Catalog {
            name: "Danfoss RA-N 15 (1/2)".into(),
            kv_values: vec![0.04, 0.08, 0.12, 0.20, 0.30, 0.40, 0.51, 0.73],
        }
    }

    #[test]
    fn kv_needed_reference() {
        // 100 kg/h across 0.1 bar
        assert!((kv_needed(100.0, 10_000.0) - 0.316_227_766).abs() < 1e-6);
        // no throttling asks for a huge kv
        assert!(kv_needed(100.0, 0.0) > 1000.0);
    }

    #[test]
    fn catalog_position_lookup() {
        let valve = danfoss_15();
        assert_eq!(valve.position_for_kv(0.01), 0);
        assert_eq!(valve.position_for_kv(0.12), 2);
        assert_eq!(valve.position_for_kv(0.13), 3);
        assert_eq!(valve.position_for_kv(5.0), 7);
        assert_eq!(valve.kv_at_position(3), 0.20);
        assert_eq!(valve.kv_at_position(42), 0.73);
        assert_eq!(valve.open_kv(), 0.73);
    }

    #[test]
    fn custom_position_lookup() {
        let valve = ValveCharacteristic::custom(1.0, 10).unwrap();
        // sqrt(0.25) * 10 = 5
        assert_eq!(valve.position_for_kv(0.25), 5);
        assert_eq!(valve.position_for_kv(0.26), 6);
        assert_eq!(valve.position_for_kv(3.0), 10);
        assert_eq!(valve.position_for_kv(0.0), 0);
        assert!((valve.kv_at_position(5) - 0.5).abs() < 1e-12);
        assert_eq!(valve.kv_at_position(10), 1.0);
        assert_eq!(valve.kv_at_position(99), 1.0);

        let default = ValveCharacteristic::custom(0.7, 8).unwrap();
        assert!((default.kv_at_position(4) - 0.35).abs() < 1e-12);
    }

    #[test]
    fn custom_setting_covers_needed_kv() {
        let valve = ValveCharacteristic::custom(0.7, 8).unwrap();
        for needed in [0.01, 0.1, 0.33, 0.5, 0.69, 0.7] {
            let pos = valve.position_for_kv(needed);
            assert!(pos <= 8);
            assert!(valve.kv_at_position(pos) >= needed - 1e-12);
        }
    }

    #[test]
    fn custom_rejects_bad_range() {
        assert!(ValveCharacteristic::custom(0.0, 8).is_err());
        assert!(ValveCharacteristic::custom(0.7, 0).is_err());
    }

    #[test]
    fn reference_polynomial() {
        let valve = ValveCharacteristic::ReferencePolynomial;
        // kv below the polynomial minimum has no real root
        assert_eq!(valve.position_for_kv(0.0), 1);
        // a·p² + b·p + c = 0.2 at p ≈ 4.08
        assert_eq!(valve.position_for_kv(0.2), 5);
        assert!(valve.kv_at_position(5) >= 0.2);
        assert_eq!(valve.open_kv(), DEFAULT_CUSTOM_KV_MAX);
    }

    #[test]
    fn catalog_resolution() {
        let mut catalog = ValveCatalog::new();
        catalog
            .insert(
                "Comap",
                ValveCatalogEntry {
                    kv_values: vec![0.028, 0.08, 0.125, 0.24, 0.335, 0.49],
                    description: "Comap – 6-position TRV".into(),
                },
            )
            .unwrap();
        assert!(catalog.contains("Comap"));
        assert!(catalog.contains(CUSTOM_VALVE));
        assert_eq!(catalog.characteristic("Comap", None).unwrap().open_kv(), 0.49);
        assert_eq!(
            catalog.characteristic(CUSTOM_VALVE, None).unwrap(),
            ValveCharacteristic::ReferencePolynomial
        );
        assert!(matches!(
            catalog.characteristic(CUSTOM_VALVE, Some((0.7, 8))).unwrap(),
            ValveCharacteristic::Custom { .. }
        ));
        assert!(matches!(
            catalog.characteristic("Nope", None),
            Err(ComponentError::UnknownValve { .. })
        ));
    }

    #[test]
    fn catalog_rejects_bad_tables() {
        let mut catalog = ValveCatalog::new();
        let empty = ValveCatalogEntry {
            kv_values: vec![],
            description: String::new(),
        };
        assert!(catalog.insert("empty", empty).is_err());
        let decreasing = ValveCatalogEntry {
            kv_values: vec![0.5, 0.2],
            description: String::new(),
        };
        assert!(catalog.insert("dec", decreasing).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn setting_pressure_loss() {
        let setting = ValveSetting::new("v", 0.5);
        let dp = to_pa(setting.pressure_loss(kg_per_h(50.0)).unwrap());
        // 97180 * (0.05 / 0.5)^2
        assert!((dp - 971.8).abs() < 1e-9);
        let closed = ValveSetting::new("v", 0.0);
        assert!(to_pa(closed.pressure_loss(kg_per_h(50.0)).unwrap()).is_infinite());
        assert_eq!(to_pa(closed.pressure_loss(kg_per_h(0.0)).unwrap()), 0.0);
    }
}
