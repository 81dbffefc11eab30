//! Core traits for hydraulic elements.

use crate::common::{
    KV_COLLECTOR_M3_H, KV_RADIATOR_M3_H, check_finite, kv_pressure_loss_pa,
};
use crate::error::{ComponentError, ComponentResult};
use hb_core::units::{MassRate, Pressure, pa, to_kg_per_h};

/// Trait for elements that resist flow in a radiator or collector circuit.
///
/// Elements are deterministic functions of their parameters and the mass flow,
/// so any number of trial evaluations can share them.
pub trait HydraulicResistance: Send + Sync {
    /// Element name for debugging and identification.
    fn name(&self) -> &str;

    /// Pressure loss across the element for the given mass flow.
    ///
    /// Infeasible resistances (non-positive kv) yield +∞ rather than a negative loss.
    fn pressure_loss(&self, mdot: MassRate) -> ComponentResult<Pressure>;
}

/// Validate a mass flow and return it in kg/h.
pub(crate) fn checked_flow_kg_h(mdot: MassRate) -> ComponentResult<f64> {
    let flow = to_kg_per_h(mdot);
    check_finite(flow, "mass flow rate")?;
    if flow < 0.0 {
        return Err(ComponentError::NonPhysical {
            what: "mass flow rate must be non-negative",
        });
    }
    Ok(flow)
}

/// Element with a constant flow coefficient (radiator body, collector body).
#[derive(Debug, Clone, PartialEq)]
pub struct FixedKv {
    name: String,
    /// Flow coefficient (m³/h at 1 bar)
    pub kv: f64,
}

impl FixedKv {
    pub fn new(name: impl Into<String>, kv: f64) -> Self {
        Self {
            name: name.into(),
            kv,
        }
    }

    /// Radiator body with the standard kv of 2.0.
    pub fn radiator_body() -> Self {
        Self::new("radiator body", KV_RADIATOR_M3_H)
    }

    /// Collector body with the standard kv of 14.66.
    pub fn collector_body() -> Self {
        Self::new("collector body", KV_COLLECTOR_M3_H)
    }
}

impl HydraulicResistance for FixedKv {
    fn name(&self) -> &str {
        &self.name
    }

    fn pressure_loss(&self, mdot: MassRate) -> ComponentResult<Pressure> {
        let flow = checked_flow_kg_h(mdot)?;
        Ok(pa(kv_pressure_loss_pa(flow, self.kv)))
    }
}
