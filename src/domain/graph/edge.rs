use std::collections::{BTreeSet, HashMap};

use crate::domain::graph::weight_key::WeightKey;
use crate::domain::utils::id::{EdgeId, NodeId};
use crate::error::{Error, Result};

/// A unidirectional link between two routers.
///
/// `from` and `to` are ids into the owning [`Topology`](super::topology::Topology),
/// the edge never owns its endpoints.
#[derive(Debug, Clone)]
pub struct NetworkEdge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    weights: HashMap<WeightKey, f64>,

    /// Keys whose value was computed by the topology rather than reported with the link.
    derived_weights: BTreeSet<WeightKey>,

    /// Derived by the topology: an edge belongs to algorithm A only if `from` advertises A.
    flex_algos: BTreeSet<u32>,
}

impl NetworkEdge {
    pub fn new(id: EdgeId, from: NodeId, to: NodeId, weights: HashMap<WeightKey, f64>) -> Self {
        Self { id, from, to, weights, derived_weights: BTreeSet::new(), flex_algos: BTreeSet::new() }
    }

    pub fn get_weight(&self, key: WeightKey) -> Result<f64> {
        self.weights.get(&key).copied().ok_or_else(|| Error::WeightNotFound { edge: self.id.clone(), key })
    }

    /// Returns the weight or `default` when the edge does not carry the metric.
    pub fn get_weight_or(&self, key: WeightKey, default: f64) -> f64 {
        self.weights.get(&key).copied().unwrap_or(default)
    }

    pub fn set_weight(&mut self, key: WeightKey, value: f64) {
        self.derived_weights.remove(&key);
        self.weights.insert(key, value);
    }

    /// Reported values are kept, derived ones may be recomputed.
    pub fn is_reported(&self, key: WeightKey) -> bool {
        self.weights.contains_key(&key) && !self.derived_weights.contains(&key)
    }

    pub(super) fn set_derived_weight(&mut self, key: WeightKey, value: f64) {
        self.derived_weights.insert(key);
        self.weights.insert(key, value);
    }

    pub(super) fn remove_derived_weight(&mut self, key: WeightKey) {
        if self.derived_weights.remove(&key) {
            self.weights.remove(&key);
        }
    }

    pub fn get_weights(&self) -> &HashMap<WeightKey, f64> {
        &self.weights
    }

    pub fn set_weights(&mut self, weights: HashMap<WeightKey, f64>) {
        self.derived_weights.clear();
        self.weights = weights;
    }

    pub fn get_flex_algos(&self) -> &BTreeSet<u32> {
        &self.flex_algos
    }

    pub(super) fn set_flex_algos(&mut self, flex_algos: BTreeSet<u32>) {
        self.flex_algos = flex_algos;
    }
}
