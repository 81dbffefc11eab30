//! Collector flow aggregation and downstream pressure accumulation.
//!
//! Tables are indexed like the network: radiator tables in input order,
//! collector tables in canonical order.

use crate::error::NetworkResult;
use crate::network::Network;
use crate::validate::expect_len;

/// Sum radiator flows into their collectors.
pub fn collector_flows(network: &Network, radiator_flows: &[f64]) -> NetworkResult<Vec<f64>> {
    expect_len("radiator flows", radiator_flows, network.radiators().len())?;
    Ok((0..network.collectors().len())
        .map(|c| network.members(c).iter().map(|&r| radiator_flows[r]).sum())
        .collect())
}

/// For each collector, the summed loss of itself and every collector after it.
pub fn downstream_losses(network: &Network, collector_losses: &[f64]) -> NetworkResult<Vec<f64>> {
    expect_len("collector losses", collector_losses, network.collectors().len())?;
    Ok((0..network.collectors().len())
        .map(|c| network.downstream(c).map(|d| collector_losses[d]).sum())
        .collect())
}

/// Total branch loss per radiator: own circuit + downstream collectors + boiler.
pub fn total_pressure_losses(
    network: &Network,
    circuit_losses: &[f64],
    collector_losses: &[f64],
    boiler_loss: f64,
) -> NetworkResult<Vec<f64>> {
    expect_len("circuit losses", circuit_losses, network.radiators().len())?;
    let downstream = downstream_losses(network, collector_losses)?;
    Ok(network
        .radiators()
        .iter()
        .zip(circuit_losses)
        .map(|(radiator, own)| own + downstream[radiator.collector] + boiler_loss)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NetworkBuilder;
    use crate::error::NetworkError;
    use hb_core::RadiatorId;

    fn network() -> Network {
        let mut builder = NetworkBuilder::new();
        builder.add_collector("C2").add_collector("C1").add_collector("C3");
        for (nr, col) in [(1, "C1"), (2, "C1"), (3, "C2"), (4, "C3")] {
            builder.add_radiator(RadiatorId::new(nr).unwrap(), col);
        }
        builder.build().unwrap()
    }

    #[test]
    fn flows_sum_per_collector() {
        let flows = collector_flows(&network(), &[10.0, 20.0, 5.0, 1.5]).unwrap();
        assert_eq!(flows, vec![30.0, 5.0, 1.5]);
    }

    #[test]
    fn downstream_is_suffix_sum() {
        let down = downstream_losses(&network(), &[100.0, 200.0, 400.0]).unwrap();
        assert_eq!(down, vec![700.0, 600.0, 400.0]);
    }

    #[test]
    fn totals_include_boiler_once() {
        let totals =
            total_pressure_losses(&network(), &[1.0, 2.0, 3.0, 4.0], &[100.0, 200.0, 400.0], 350.0)
                .unwrap();
        assert_eq!(totals, vec![1051.0, 1052.0, 953.0, 754.0]);
    }

    #[test]
    fn length_mismatch_is_reported() {
        let err = collector_flows(&network(), &[1.0]).unwrap_err();
        assert!(matches!(err, NetworkError::LengthMismatch { expected: 4, actual: 1, .. }));
    }
}
