use std::collections::HashMap;

use crate::domain::calculation::calculation_mode::CalculationMode;
use crate::domain::calculation::calculation_options::CalculationOptions;
use crate::domain::calculation::edge_weight::EdgeWeightCalculator;
use crate::domain::calculation::priority_queue::IndexedPriorityQueue;
use crate::domain::graph::edge::NetworkEdge;
use crate::domain::graph::topology::Graph;
use crate::domain::graph::weight_key::WeightKey;
use crate::domain::path::path::Path;
use crate::domain::utils::id::{EdgeId, NodeId};
use crate::error::{Error, Result};

/// Metrics a calculation starts from at its source node.
///
/// A service function chain seeds every leg after the first with the totals of the
/// previous leg, so the last leg ends with the totals of the whole chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceNodeMetrics {
    /// Reported cost, in the same unit as [`Path::total_cost`].
    pub cost: f64,
    pub delay: f64,
    pub jitter: f64,
    /// Packet loss in percent.
    pub packet_loss: f64,
}

impl From<&Path> for SourceNodeMetrics {
    fn from(path: &Path) -> Self {
        Self { cost: path.total_cost, delay: path.total_delay, jitter: path.total_jitter, packet_loss: path.total_packet_loss }
    }
}

/// Raw metrics accumulated up to a node alongside the optimized cost.
#[derive(Debug, Clone, Copy, Default)]
struct NodeMetrics {
    delay: f64,
    jitter: f64,
    /// Fraction of packets lost so far (0..=1).
    packet_loss: f64,
}

impl NodeMetrics {
    fn extend(&self, edge: &NetworkEdge) -> Self {
        let edge_loss = edge.get_weight_or(WeightKey::PacketLoss, 0.0) / 100.0;

        Self {
            delay: self.delay + edge.get_weight_or(WeightKey::Latency, 0.0),
            jitter: self.jitter + edge.get_weight_or(WeightKey::Jitter, 0.0),
            packet_loss: 1.0 - (1.0 - self.packet_loss) * (1.0 - edge_loss),
        }
    }
}

/// Constrained single pair shortest path search.
///
/// A Dijkstra variant whose aggregation (sum, min or max) is chosen by the
/// [`CalculationMode`]. Constraints are enforced before an edge is relaxed, so an
/// edge violating a bound never becomes part of the predecessor chain.
pub struct ShortestPathCalculation<'a> {
    graph: &'a dyn Graph,
    source: NodeId,
    destination: NodeId,
    mode: CalculationMode,
    weights: EdgeWeightCalculator,
    max_constraints: &'a HashMap<WeightKey, f64>,
    min_constraints: &'a HashMap<WeightKey, f64>,
    initial_metrics: Option<SourceNodeMetrics>,

    queue: IndexedPriorityQueue,
    node_metrics: HashMap<NodeId, NodeMetrics>,
    edge_to_previous: HashMap<NodeId, EdgeId>,
    final_costs: HashMap<NodeId, f64>,
}

impl<'a> ShortestPathCalculation<'a> {
    pub fn new(graph: &'a dyn Graph, options: &'a CalculationOptions, source: NodeId, destination: NodeId) -> Self {
        Self {
            graph,
            source,
            destination,
            mode: options.calculation_mode,
            weights: options.edge_weight_calculator(),
            max_constraints: &options.max_constraints,
            min_constraints: &options.min_constraints,
            initial_metrics: None,
            queue: options.calculation_mode.create_queue(),
            node_metrics: HashMap::new(),
            edge_to_previous: HashMap::new(),
            final_costs: HashMap::new(),
        }
    }

    /// Starts the source at carried over totals instead of the mode's defaults.
    pub fn set_initial_source_node_metrics(&mut self, cost: f64, delay: f64, jitter: f64, packet_loss: f64) {
        self.initial_metrics = Some(SourceNodeMetrics { cost, delay, jitter, packet_loss });
    }

    pub fn execute(&mut self) -> Result<Path> {
        if !self.graph.node_exists(&self.source) {
            return Err(Error::NodeNotInGraph(self.source.clone()));
        }
        if !self.graph.node_exists(&self.destination) {
            return Err(Error::NodeNotInGraph(self.destination.clone()));
        }

        self.initialize();

        while let Some(item) = self.queue.pop() {
            let reached = item.node_id == self.source || self.edge_to_previous.contains_key(&item.node_id);
            self.final_costs.insert(item.node_id.clone(), item.cost);

            if item.node_id == self.destination {
                break;
            }
            // Remaining queue entries were never reached from the source.
            if !reached {
                break;
            }

            self.relax(&item.node_id, item.cost);
        }

        self.reconstruct()
    }

    fn initialize(&mut self) {
        let source_cost = match self.initial_metrics {
            Some(metrics) => self.weights.to_internal_cost(metrics.cost),
            None => self.mode.default_source_cost(),
        };
        let source_metrics = match self.initial_metrics {
            Some(metrics) => NodeMetrics { delay: metrics.delay, jitter: metrics.jitter, packet_loss: metrics.packet_loss / 100.0 },
            None => NodeMetrics::default(),
        };

        // The source goes first so it wins ties against unreached nodes.
        self.queue.push(self.source.clone(), source_cost);
        self.node_metrics.insert(self.source.clone(), source_metrics);

        let unreached_cost = self.mode.unreached_cost();
        for node in self.graph.get_nodes() {
            if node.id != self.source {
                self.queue.push(node.id.clone(), unreached_cost);
            }
        }
    }

    fn relax(&mut self, node_id: &NodeId, cost: f64) {
        let graph = self.graph;
        let Some(node) = graph.get_node(node_id) else {
            return;
        };
        let current_metrics = self.node_metrics.get(node_id).copied().unwrap_or_default();

        for edge_id in node.get_edges() {
            let Some(edge) = graph.get_edge(edge_id) else {
                continue;
            };
            let Some(neighbour_cost) = self.queue.get_cost(&edge.to) else {
                continue;
            };
            if !self.is_within_constraints(edge) {
                log::trace!("Edge {} skipped, constraints violated", edge.id);
                continue;
            }

            let weight = match self.weights.get_relaxation_weight(edge) {
                Ok(weight) => weight,
                Err(e) => {
                    log::debug!("Edge {} skipped: {}", edge.id, e);
                    continue;
                }
            };

            let candidate = self.mode.combine(cost, weight);
            if self.mode.is_improvement(candidate, neighbour_cost) {
                self.queue.update(&edge.to, candidate);
                self.edge_to_previous.insert(edge.to.clone(), edge.id.clone());
                self.node_metrics.insert(edge.to.clone(), current_metrics.extend(edge));
            }
        }
    }

    fn is_within_constraints(&self, edge: &NetworkEdge) -> bool {
        for (key, max) in self.max_constraints {
            match edge.get_weight(*key) {
                Ok(value) if value <= *max => {}
                _ => return false,
            }
        }

        for (key, min) in self.min_constraints {
            match edge.get_weight(*key) {
                Ok(value) if value >= *min => {}
                _ => return false,
            }
        }
        true
    }

    fn path_not_found(&self) -> Error {
        Error::PathNotFound { from: self.source.clone(), to: self.destination.clone() }
    }

    fn reconstruct(&self) -> Result<Path> {
        let mut edges: Vec<EdgeId> = Vec::new();
        let mut bottleneck: Option<(EdgeId, f64)> = None;
        let mut current = self.destination.clone();
        let node_count = self.graph.get_nodes().len();

        while current != self.source {
            let Some(edge_id) = self.edge_to_previous.get(&current) else {
                log::debug!("NoPathFound: {} => {}, chain broken at {}", self.source, self.destination, current);
                return Err(self.path_not_found());
            };
            let Some(edge) = self.graph.get_edge(edge_id) else {
                return Err(self.path_not_found());
            };

            let available = edge.get_weight_or(WeightKey::AvailableBandwidth, f64::INFINITY);
            if bottleneck.as_ref().is_none_or(|(_, value)| available < *value) {
                bottleneck = Some((edge.id.clone(), available));
            }

            edges.push(edge.id.clone());
            current = edge.from.clone();

            if edges.len() > node_count {
                return Err(self.path_not_found());
            }
        }

        if edges.is_empty() {
            return Err(self.path_not_found());
        }
        edges.reverse();

        let internal_cost = self.final_costs.get(&self.destination).copied().ok_or_else(|| self.path_not_found())?;
        let metrics = self.node_metrics.get(&self.destination).copied().unwrap_or_default();

        let mut path = Path::new(edges);
        path.total_cost = match self.mode {
            CalculationMode::Sum => self.weights.to_reported_cost(internal_cost),
            CalculationMode::Min | CalculationMode::Max => internal_cost,
        };
        path.total_delay = metrics.delay;
        path.total_jitter = metrics.jitter;
        path.total_packet_loss = metrics.packet_loss * 100.0;

        if let Some((edge_id, value)) = bottleneck {
            path.bottleneck_edge = Some(edge_id);
            path.bottleneck_value = value;
        }

        log::debug!(
            "Path found {} => {}: {} edges, cost {}, delay {}, bottleneck {}",
            self.source,
            self.destination,
            path.len(),
            path.total_cost,
            path.total_delay,
            path.bottleneck_value
        );

        Ok(path)
    }
}
