//! Core network data structures.

use std::ops::Range;

use hb_core::RadiatorId;

/// A collector in canonical position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorNode {
    /// Position in name order.
    pub index: usize,
    pub name: String,
}

/// A radiator and the collector it hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiatorNode {
    pub id: RadiatorId,
    /// Index into [`Network::collectors`].
    pub collector: usize,
}

/// The network: a validated, immutable collector/radiator topology.
///
/// The network stores:
/// - Collectors sorted by name (their index is their canonical position).
/// - Radiators in input order.
/// - Compact membership: for each collector, the radiators that name it.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) collectors: Vec<CollectorNode>,
    pub(crate) radiators: Vec<RadiatorNode>,

    /// Collector i's radiators are in members[member_offsets[i]..member_offsets[i+1]].
    pub(crate) member_offsets: Vec<usize>,

    /// Flat list of radiator indices, grouped by collector, input order within a group.
    pub(crate) members: Vec<usize>,
}

impl Network {
    /// Collectors in canonical order.
    pub fn collectors(&self) -> &[CollectorNode] {
        &self.collectors
    }

    /// Radiators in input order.
    pub fn radiators(&self) -> &[RadiatorNode] {
        &self.radiators
    }

    pub fn collector(&self, index: usize) -> Option<&CollectorNode> {
        self.collectors.get(index)
    }

    pub fn collector_index(&self, name: &str) -> Option<usize> {
        self.collectors
            .binary_search_by(|c| c.name.as_str().cmp(name))
            .ok()
    }

    pub fn radiator_index(&self, id: RadiatorId) -> Option<usize> {
        self.radiators.iter().position(|r| r.id == id)
    }

    /// Radiator indices belonging to a collector.
    pub fn members(&self, collector: usize) -> &[usize] {
        if collector >= self.collectors.len() {
            return &[];
        }
        let start = self.member_offsets[collector];
        let end = self.member_offsets[collector + 1];
        &self.members[start..end]
    }

    /// Collectors whose losses a branch through `collector` accumulates.
    pub fn downstream(&self, collector: usize) -> Range<usize> {
        collector.min(self.collectors.len())..self.collectors.len()
    }

    /// Index of the last collector in canonical order.
    pub fn last_collector(&self) -> Option<usize> {
        self.collectors.len().checked_sub(1)
    }
}
