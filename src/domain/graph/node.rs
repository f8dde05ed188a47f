use indexmap::IndexSet;
use std::collections::BTreeSet;

use crate::domain::utils::id::{EdgeId, NodeId};

/// A router of the IGP topology.
#[derive(Debug, Clone)]
pub struct NetworkNode {
    pub id: NodeId,
    pub name: String,

    /// Outgoing edges in insertion order. The order decides ties during path calculation.
    edges: IndexSet<EdgeId>,

    /// Flexible algorithms this router participates in.
    flex_algos: BTreeSet<u32>,
}

impl NetworkNode {
    pub fn new(id: NodeId, name: impl Into<String>, flex_algos: impl IntoIterator<Item = u32>) -> Self {
        Self { id, name: name.into(), edges: IndexSet::new(), flex_algos: flex_algos.into_iter().collect() }
    }

    pub fn get_edges(&self) -> impl Iterator<Item = &EdgeId> {
        self.edges.iter()
    }

    pub fn has_edge(&self, edge_id: &EdgeId) -> bool {
        self.edges.contains(edge_id)
    }

    pub fn get_flex_algos(&self) -> &BTreeSet<u32> {
        &self.flex_algos
    }

    pub fn set_flex_algos(&mut self, flex_algos: impl IntoIterator<Item = u32>) {
        self.flex_algos = flex_algos.into_iter().collect();
    }

    /// Algorithm 0 is the default SPF topology which every router is part of.
    pub fn supports_flex_algo(&self, algorithm: u32) -> bool {
        algorithm == 0 || self.flex_algos.contains(&algorithm)
    }

    pub(super) fn add_edge(&mut self, edge_id: EdgeId) {
        self.edges.insert(edge_id);
    }

    pub(super) fn remove_edge(&mut self, edge_id: &EdgeId) {
        self.edges.shift_remove(edge_id);
    }

    /// Copy without edges, used when building subgraphs.
    pub(super) fn detached(&self) -> Self {
        Self { id: self.id.clone(), name: self.name.clone(), edges: IndexSet::new(), flex_algos: self.flex_algos.clone() }
    }
}
