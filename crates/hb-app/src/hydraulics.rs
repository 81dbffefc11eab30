//! Diameter selection, circuit losses and network aggregation.
//!
//! Losses follow the reference rounding: piping rounded to 0.1 Pa, then the
//! circuit total (rounded piping + raw body loss) rounded again.

use std::collections::HashMap;

use hb_components::common::PRESSURE_LOSS_BOILER_PA;
use hb_components::{FixedKv, HydraulicResistance, Pipe, select_diameter};
use hb_core::units::{kg_per_h, m, mm, to_liters, to_mm, to_pa};
use hb_core::{round1, round2};
use hb_network::{Network, NetworkBuilder, collector_flows, total_pressure_losses};

use crate::error::{AppError, AppResult};
use crate::input::DesignInput;
use crate::thermal_design::ThermalDesign;

/// Circuit hydraulics of one radiator.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiatorHydraulics {
    pub diameter_mm: f64,
    pub water_volume_l: f64,
    pub dp_piping_pa: f64,
    pub dp_body_pa: f64,
    /// Piping plus radiator body.
    pub dp_circuit_pa: f64,
    /// Circuit plus downstream collectors plus boiler.
    pub dp_total_pa: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectorHydraulics {
    pub name: String,
    pub circuit_length_m: f64,
    pub mass_flow_kg_h: f64,
    pub diameter_mm: f64,
    pub water_volume_l: f64,
    pub dp_pa: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HydraulicDesign {
    /// Indexed like the radiator table.
    pub radiators: Vec<RadiatorHydraulics>,
    /// Canonical collector order.
    pub collectors: Vec<CollectorHydraulics>,
    pub total_flow_kg_h: f64,
    /// Largest branch loss; the index circuit.
    pub max_total_pa: f64,
}

impl HydraulicDesign {
    pub fn totals(&self) -> Vec<f64> {
        self.radiators.iter().map(|r| r.dp_total_pa).collect()
    }

    pub fn total_water_volume_l(&self) -> f64 {
        let radiators: f64 = self.radiators.iter().map(|r| r.water_volume_l).sum();
        let collectors: f64 = self.collectors.iter().map(|c| c.water_volume_l).sum();
        round2(radiators + collectors)
    }
}

/// Freeze the collector/radiator topology of an input.
pub fn build_network(input: &DesignInput) -> AppResult<Network> {
    let mut builder = NetworkBuilder::new();
    for collector in &input.collectors {
        builder.add_collector(collector.name.clone());
    }
    for radiator in &input.radiators {
        builder.add_radiator(radiator.id, radiator.collector.clone());
    }
    Ok(builder.build()?)
}

struct CircuitLoss {
    piping: f64,
    body: f64,
    circuit: f64,
    water_volume_l: f64,
}

fn circuit_loss(
    pipe: &Pipe,
    body: &FixedKv,
    flow_kg_h: f64,
) -> hb_components::ComponentResult<CircuitLoss> {
    let mdot = kg_per_h(flow_kg_h);
    let piping = round1(to_pa(pipe.pressure_loss(mdot)?));
    let body_raw = to_pa(body.pressure_loss(mdot)?);
    Ok(CircuitLoss {
        piping,
        body: round1(body_raw),
        circuit: round1(piping + body_raw),
        water_volume_l: round2(to_liters(pipe.water_volume())),
    })
}

fn radiator_diameter_mm(input: &DesignInput, index: usize, flow_kg_h: f64) -> AppResult<f64> {
    let radiator = &input.radiators[index];
    if input.config.fix_diameter {
        return radiator.fixed_diameter_mm.ok_or_else(|| {
            AppError::Incomplete(format!(
                "radiator {} needs a fixed diameter when diameters are fixed",
                radiator.id
            ))
        });
    }
    select_diameter(kg_per_h(flow_kg_h))
        .map(to_mm)
        .map_err(|e| AppError::radiator(radiator.id, e.detail()))
}

/// Size every circuit and aggregate losses over the network.
pub fn size(
    input: &DesignInput,
    network: &Network,
    thermal: &ThermalDesign,
) -> AppResult<HydraulicDesign> {
    let flows = thermal.flows();
    let radiator_body = FixedKv::radiator_body();

    let mut radiators = Vec::with_capacity(input.radiators.len());
    let mut circuits = Vec::with_capacity(input.radiators.len());
    for (i, radiator) in input.radiators.iter().enumerate() {
        let diameter_mm = radiator_diameter_mm(input, i, flows[i])?;
        let pipe = Pipe::new(
            format!("radiator {}", radiator.id),
            m(radiator.circuit_length_m),
            mm(diameter_mm),
        );
        let loss = circuit_loss(&pipe, &radiator_body, flows[i])
            .map_err(|e| AppError::radiator(radiator.id, e.detail()))?;
        circuits.push(loss.circuit);
        radiators.push(RadiatorHydraulics {
            diameter_mm,
            water_volume_l: loss.water_volume_l,
            dp_piping_pa: loss.piping,
            dp_body_pa: loss.body,
            dp_circuit_pa: loss.circuit,
            dp_total_pa: 0.0,
        });
    }

    let lengths: HashMap<&str, f64> = input
        .collectors
        .iter()
        .map(|c| (c.name.as_str(), c.circuit_length_m))
        .collect();
    let collector_body = FixedKv::collector_body();
    let collector_flow = collector_flows(network, &flows)?;

    let mut collectors = Vec::with_capacity(network.collectors().len());
    for (node, &flow) in network.collectors().iter().zip(&collector_flow) {
        let circuit_length_m = lengths.get(node.name.as_str()).copied().unwrap_or(0.0);
        let diameter = select_diameter(kg_per_h(flow))
            .map_err(|e| AppError::collector(&node.name, e.detail()))?;
        let pipe = Pipe::new(format!("collector {}", node.name), m(circuit_length_m), diameter);
        let loss = circuit_loss(&pipe, &collector_body, flow)
            .map_err(|e| AppError::collector(&node.name, e.detail()))?;
        collectors.push(CollectorHydraulics {
            name: node.name.clone(),
            circuit_length_m,
            mass_flow_kg_h: round1(flow),
            diameter_mm: to_mm(diameter),
            water_volume_l: loss.water_volume_l,
            dp_pa: loss.circuit,
        });
    }

    let collector_dp: Vec<f64> = collectors.iter().map(|c| c.dp_pa).collect();
    let totals = total_pressure_losses(network, &circuits, &collector_dp, PRESSURE_LOSS_BOILER_PA)?;
    for (row, total) in radiators.iter_mut().zip(totals) {
        row.dp_total_pa = round1(total);
    }

    let max_total_pa = radiators
        .iter()
        .map(|r| r.dp_total_pa)
        .fold(0.0, f64::max);

    Ok(HydraulicDesign {
        radiators,
        collectors,
        total_flow_kg_h: round1(flows.iter().sum()),
        max_total_pa,
    })
}
