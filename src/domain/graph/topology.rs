use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::graph::edge::NetworkEdge;
use crate::domain::graph::node::NetworkNode;
use crate::domain::graph::weight_key::WeightKey;
use crate::domain::utils::id::{EdgeId, NodeId};
use crate::error::{Error, Result};

/// Read access to a topology as needed by the path calculations.
pub trait Graph {
    fn get_node(&self, node_id: &NodeId) -> Option<&NetworkNode>;
    fn get_edge(&self, edge_id: &EdgeId) -> Option<&NetworkEdge>;

    /// All nodes in insertion order.
    fn get_nodes(&self) -> Vec<&NetworkNode>;

    fn node_exists(&self, node_id: &NodeId) -> bool {
        self.get_node(node_id).is_some()
    }

    fn edge_exists(&self, edge_id: &EdgeId) -> bool {
        self.get_edge(edge_id).is_some()
    }
}

/// Node and edge store of the network plus the per flexible algorithm subgraph index.
///
/// A `Topology` is never shared directly. It lives behind the mutex of a [`NetworkGraph`]
/// and calculations work on the guard, so a rebuilt subgraph index is only observable
/// once [`Topology::update_sub_graphs`] has finished.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    nodes: IndexMap<NodeId, NetworkNode>,
    edges: IndexMap<EdgeId, NetworkEdge>,
    sub_graphs: BTreeMap<u32, Topology>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: NetworkNode) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(Error::NodeAlreadyExists(node.id));
        }

        log::debug!("Adding node {} ({})", node.id, node.name);
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Removes the node together with all edges starting or ending at it.
    pub fn delete_node(&mut self, node_id: &NodeId) -> Result<NetworkNode> {
        if !self.nodes.contains_key(node_id) {
            return Err(Error::NodeNotFound(node_id.clone()));
        }

        let incident: Vec<EdgeId> =
            self.edges.values().filter(|edge| edge.from == *node_id || edge.to == *node_id).map(|edge| edge.id.clone()).collect();

        for edge_id in incident {
            self.delete_edge(&edge_id)?;
        }

        log::debug!("Deleting node {}", node_id);
        self.nodes.shift_remove(node_id).ok_or_else(|| Error::NodeNotFound(node_id.clone()))
    }

    /// Updates name and advertised algorithms of a node and re-derives the algorithms of its outgoing edges.
    pub fn update_node(&mut self, node_id: &NodeId, name: impl Into<String>, flex_algos: impl IntoIterator<Item = u32>) -> Result<()> {
        let node = self.nodes.get_mut(node_id).ok_or_else(|| Error::NodeNotFound(node_id.clone()))?;
        node.name = name.into();
        node.set_flex_algos(flex_algos);

        let flex_algos = node.get_flex_algos().clone();
        let outgoing: Vec<EdgeId> = node.get_edges().cloned().collect();

        for edge_id in outgoing {
            if let Some(edge) = self.edges.get_mut(&edge_id) {
                edge.set_flex_algos(flex_algos.clone());
            }
        }
        Ok(())
    }

    /// Inserts an edge. Both endpoints must exist and the edge id must be unused.
    pub fn add_edge(&mut self, mut edge: NetworkEdge) -> Result<()> {
        if self.edges.contains_key(&edge.id) {
            return Err(Error::EdgeAlreadyExists(edge.id));
        }
        if !self.nodes.contains_key(&edge.to) {
            return Err(Error::EdgeEndpointMissing { edge: edge.id, node: edge.to });
        }

        let Some(from) = self.nodes.get_mut(&edge.from) else {
            return Err(Error::EdgeEndpointMissing { edge: edge.id, node: edge.from });
        };

        edge.set_flex_algos(from.get_flex_algos().clone());
        from.add_edge(edge.id.clone());

        log::debug!("Adding edge {}: {} -> {}", edge.id, edge.from, edge.to);
        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    pub fn delete_edge(&mut self, edge_id: &EdgeId) -> Result<NetworkEdge> {
        let edge = self.edges.shift_remove(edge_id).ok_or_else(|| Error::EdgeNotFound(edge_id.clone()))?;

        if let Some(from) = self.nodes.get_mut(&edge.from) {
            from.remove_edge(edge_id);
        }

        log::debug!("Deleted edge {}", edge_id);
        Ok(edge)
    }

    pub fn update_edge_weights(&mut self, edge_id: &EdgeId, weights: HashMap<WeightKey, f64>) -> Result<()> {
        let edge = self.edges.get_mut(edge_id).ok_or_else(|| Error::EdgeNotFound(edge_id.clone()))?;
        edge.set_weights(weights);
        Ok(())
    }

    pub fn get_edges(&self) -> impl Iterator<Item = &NetworkEdge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Rebuilds the flexible algorithm index from the current nodes and edges.
    ///
    /// A subgraph for algorithm A holds every node advertising A and every edge tagged
    /// with A whose endpoints are both part of the subgraph.
    pub fn update_sub_graphs(&mut self) {
        let algorithms: BTreeSet<u32> = self.nodes.values().flat_map(|node| node.get_flex_algos().iter().copied()).collect();
        let mut sub_graphs = BTreeMap::new();

        for algorithm in algorithms {
            let mut sub_graph = Topology::new();

            for node in self.nodes.values().filter(|node| node.get_flex_algos().contains(&algorithm)) {
                sub_graph.nodes.insert(node.id.clone(), node.detached());
            }

            for edge in self.edges.values().filter(|edge| edge.get_flex_algos().contains(&algorithm)) {
                if sub_graph.nodes.contains_key(&edge.from) && sub_graph.nodes.contains_key(&edge.to) {
                    // Endpoints were checked above, the insert cannot fail.
                    let _ = sub_graph.add_edge(edge.clone());
                }
            }

            log::debug!("Subgraph for flex algo {}: {} nodes, {} edges", algorithm, sub_graph.node_count(), sub_graph.edge_count());
            sub_graphs.insert(algorithm, sub_graph);
        }

        self.sub_graphs = sub_graphs;
    }

    pub fn get_sub_graph(&self, algorithm: u32) -> Option<&Topology> {
        self.sub_graphs.get(&algorithm)
    }

    pub fn get_sub_graph_algorithms(&self) -> Vec<u32> {
        self.sub_graphs.keys().copied().collect()
    }

    /// Derives normalized latency, jitter and packet loss by min-max scaling the raw
    /// metric across all edges. Values reported with a link are left untouched; derived
    /// ones are recomputed, so every call rescales them against the current range.
    pub fn normalize_weights(&mut self) {
        for raw_key in [WeightKey::Latency, WeightKey::Jitter, WeightKey::PacketLoss] {
            let Some(normalized_key) = raw_key.normalized() else {
                continue;
            };

            let values: Vec<f64> = self.edges.values().filter_map(|edge| edge.get_weights().get(&raw_key).copied()).collect();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            for edge in self.edges.values_mut() {
                if edge.is_reported(normalized_key) {
                    continue;
                }
                match edge.get_weights().get(&raw_key).copied() {
                    Some(raw) => {
                        let normalized = if max > min { (raw - min) / (max - min) } else { 0.0 };
                        edge.set_derived_weight(normalized_key, normalized);
                    }
                    None => edge.remove_derived_weight(normalized_key),
                }
            }
        }
    }
}

impl Graph for Topology {
    fn get_node(&self, node_id: &NodeId) -> Option<&NetworkNode> {
        self.nodes.get(node_id)
    }

    fn get_edge(&self, edge_id: &EdgeId) -> Option<&NetworkEdge> {
        self.edges.get(edge_id)
    }

    fn get_nodes(&self) -> Vec<&NetworkNode> {
        self.nodes.values().collect()
    }
}

/// Shared handle to the live topology.
///
/// One mutex guards every mutation and every calculation read. The manager holds the
/// guard returned by [`NetworkGraph::lock`] for a whole setup, calculate, transform sequence.
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    inner: Arc<Mutex<Topology>>,
}

impl NetworkGraph {
    pub fn new(topology: Topology) -> Self {
        Self { inner: Arc::new(Mutex::new(topology)) }
    }

    pub fn lock(&self) -> MutexGuard<'_, Topology> {
        self.inner.lock().expect("Graph mutex poisoned")
    }

    pub fn add_node(&self, node: NetworkNode) -> Result<()> {
        self.lock().add_node(node)
    }

    pub fn delete_node(&self, node_id: &NodeId) -> Result<NetworkNode> {
        self.lock().delete_node(node_id)
    }

    pub fn add_edge(&self, edge: NetworkEdge) -> Result<()> {
        self.lock().add_edge(edge)
    }

    pub fn delete_edge(&self, edge_id: &EdgeId) -> Result<NetworkEdge> {
        self.lock().delete_edge(edge_id)
    }

    pub fn node_exists(&self, node_id: &NodeId) -> bool {
        self.lock().node_exists(node_id)
    }

    pub fn edge_exists(&self, edge_id: &EdgeId) -> bool {
        self.lock().edge_exists(edge_id)
    }

    pub fn update_sub_graphs(&self) {
        self.lock().update_sub_graphs();
    }
}
