//! Incremental network builder.

use hb_core::RadiatorId;

use crate::error::NetworkResult;
use crate::network::{CollectorNode, Network, RadiatorNode};
use crate::validate;

/// Builder for constructing a network incrementally.
///
/// Use `add_collector` and `add_radiator` to describe the topology in any
/// order, then call `build()` to validate and freeze it into a `Network`.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    collectors: Vec<String>,
    radiators: Vec<(RadiatorId, String)>,
}

impl NetworkBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collector by name.
    pub fn add_collector(&mut self, name: impl Into<String>) -> &mut Self {
        self.collectors.push(name.into());
        self
    }

    /// Add a radiator hanging off the named collector.
    pub fn add_radiator(&mut self, id: RadiatorId, collector: impl Into<String>) -> &mut Self {
        self.radiators.push((id, collector.into()));
        self
    }

    /// Build and validate the network.
    ///
    /// Collectors are sorted by name and membership lists are built per collector.
    pub fn build(self) -> NetworkResult<Network> {
        validate::validate_structure(&self.collectors, &self.radiators)?;

        let mut names = self.collectors;
        names.sort();
        let collectors: Vec<CollectorNode> = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| CollectorNode { index, name })
            .collect();

        let mut radiators = Vec::with_capacity(self.radiators.len());
        for (id, collector) in &self.radiators {
            // validated above, so the lookup always hits
            let index = collectors
                .binary_search_by(|c| c.name.as_str().cmp(collector.as_str()))
                .unwrap_or_default();
            radiators.push(RadiatorNode {
                id: *id,
                collector: index,
            });
        }

        let (member_offsets, members) = Self::build_membership(collectors.len(), &radiators);

        Ok(Network {
            collectors,
            radiators,
            member_offsets,
            members,
        })
    }

    /// Build compact membership lists: for each collector, its radiators.
    fn build_membership(
        collector_count: usize,
        radiators: &[RadiatorNode],
    ) -> (Vec<usize>, Vec<usize>) {
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); collector_count];
        for (i, radiator) in radiators.iter().enumerate() {
            groups[radiator.collector].push(i);
        }

        let mut offsets = Vec::with_capacity(collector_count + 1);
        let mut flat = Vec::with_capacity(radiators.len());
        offsets.push(0);
        for group in groups {
            flat.extend(group);
            offsets.push(flat.len());
        }

        (offsets, flat)
    }
}
