use crate::domain::calculation::calculation_mode::CalculationMode;
use crate::domain::calculation::calculation_options::{CalculationOptions, ServiceFunctionChainOptions};
use crate::domain::calculation::shortest_path_calculation::{ShortestPathCalculation, SourceNodeMetrics};
use crate::domain::graph::topology::Graph;
use crate::domain::path::path::{Path, ServiceWaypoint};
use crate::domain::utils::id::{EdgeId, NodeId};
use crate::error::{Error, Result};

/// Best feasible chain found so far.
struct Candidate {
    sequence: Vec<NodeId>,
    sub_paths: Vec<Path>,
    total_cost: f64,
}

/// Shortest path through an ordered list of service waypoints.
///
/// Every waypoint sequence is evaluated leg by leg. Each leg after the first starts
/// from the totals of the previous one, so the last leg carries the totals of the
/// whole chain. A sequence is abandoned as soon as its running total can no longer
/// beat the best complete sequence.
pub struct ServiceFunctionChainCalculation<'a> {
    graph: &'a dyn Graph,
    options: &'a CalculationOptions,
    sfc: &'a ServiceFunctionChainOptions,
    evaluated_sequences: usize,
    selected_sequence: Option<Vec<NodeId>>,
}

impl<'a> ServiceFunctionChainCalculation<'a> {
    pub fn new(graph: &'a dyn Graph, options: &'a CalculationOptions, sfc: &'a ServiceFunctionChainOptions) -> Self {
        Self { graph, options, sfc, evaluated_sequences: 0, selected_sequence: None }
    }

    /// Number of waypoint sequences the last [`execute`](Self::execute) looked at, pruned ones included.
    pub fn evaluated_sequences(&self) -> usize {
        self.evaluated_sequences
    }

    /// Waypoints of the chain the last [`execute`](Self::execute) picked.
    pub fn get_selected_sequence(&self) -> Option<&[NodeId]> {
        self.selected_sequence.as_deref()
    }

    pub fn execute(&mut self) -> Result<Path> {
        let mode = self.options.calculation_mode;
        let mut best: Option<Candidate> = None;
        self.evaluated_sequences = 0;
        self.selected_sequence = None;

        let sfc = self.sfc;
        for sequence in &sfc.sequences {
            self.evaluated_sequences += 1;

            let Some((sub_paths, total_cost)) = self.evaluate_sequence(sequence, mode, best.as_ref().map(|b| b.total_cost))? else {
                continue;
            };

            if best.as_ref().is_none_or(|b| mode.is_improvement(total_cost, b.total_cost)) {
                log::debug!("Sfc: sequence {:?} is the new best with cost {}", sequence, total_cost);
                best = Some(Candidate { sequence: sequence.clone(), sub_paths, total_cost });
            }
        }

        let Some(best) = best else {
            log::debug!(
                "NoPathFound: {} => {}, none of {} service sequences is feasible",
                self.options.source_node,
                self.options.destination_node,
                self.evaluated_sequences
            );
            return Err(Error::PathNotFound { from: self.options.source_node.clone(), to: self.options.destination_node.clone() });
        };

        let path = self.merge(&best.sequence, best.sub_paths);
        self.selected_sequence = Some(best.sequence);
        Ok(path)
    }

    /// Computes all legs of one sequence. `None` when a leg is infeasible or the
    /// running total falls behind `bound`.
    fn evaluate_sequence(&self, sequence: &[NodeId], mode: CalculationMode, bound: Option<f64>) -> Result<Option<(Vec<Path>, f64)>> {
        let waypoints: Vec<&NodeId> =
            std::iter::once(&self.options.source_node).chain(sequence.iter()).chain(std::iter::once(&self.options.destination_node)).collect();

        let mut sub_paths: Vec<Path> = Vec::with_capacity(waypoints.len() - 1);
        let mut carried: Option<SourceNodeMetrics> = None;

        for leg in waypoints.windows(2) {
            let (from, to) = (leg[0], leg[1]);
            if from == to {
                continue;
            }

            let mut calculation = ShortestPathCalculation::new(self.graph, self.options, from.clone(), to.clone());
            if let Some(metrics) = carried {
                calculation.set_initial_source_node_metrics(metrics.cost, metrics.delay, metrics.jitter, metrics.packet_loss);
            }

            let sub_path = match calculation.execute() {
                Ok(path) => path,
                Err(Error::PathNotFound { .. }) => {
                    log::debug!("Sfc: leg {} => {} of sequence {:?} is infeasible", from, to, sequence);
                    return Ok(None);
                }
                Err(e) => return Err(e),
            };

            if let Some(bound) = bound {
                if mode.is_beyond_bound(sub_path.total_cost, bound) {
                    log::trace!("Sfc: sequence {:?} pruned at {} with partial cost {}", sequence, to, sub_path.total_cost);
                    return Ok(None);
                }
            }

            carried = Some(SourceNodeMetrics::from(&sub_path));
            sub_paths.push(sub_path);
        }

        match sub_paths.last() {
            Some(last) => {
                let total_cost = last.total_cost;
                Ok(Some((sub_paths, total_cost)))
            }
            None => Ok(None),
        }
    }

    /// Joins the legs of `sequence` and records where each service of the chain is applied.
    fn merge(&self, sequence: &[NodeId], sub_paths: Vec<Path>) -> Path {
        let mut edges = Vec::new();
        let mut bottleneck: Option<(EdgeId, f64)> = None;
        let mut totals = SourceNodeMetrics { cost: 0.0, delay: 0.0, jitter: 0.0, packet_loss: 0.0 };
        let mut service_waypoints = Vec::with_capacity(sequence.len());

        let waypoints: Vec<&NodeId> =
            std::iter::once(&self.options.source_node).chain(sequence.iter()).chain(std::iter::once(&self.options.destination_node)).collect();
        let mut sub_paths = sub_paths.into_iter();

        for (index, leg) in waypoints.windows(2).enumerate() {
            // Degenerate legs have no sub path.
            if leg[0] != leg[1] {
                if let Some(sub_path) = sub_paths.next() {
                    if let Some(edge_id) = &sub_path.bottleneck_edge {
                        // Strict comparison keeps the first of equal bottlenecks.
                        if bottleneck.as_ref().is_none_or(|(_, value)| sub_path.bottleneck_value < *value) {
                            bottleneck = Some((edge_id.clone(), sub_path.bottleneck_value));
                        }
                    }
                    totals = SourceNodeMetrics::from(&sub_path);
                    edges.extend(sub_path.edges);
                }
            }

            // The leg ends at the waypoint of service `index`.
            let Some(router) = sequence.get(index) else {
                continue;
            };
            match self.sfc.service_sids.get(index).and_then(|sids| sids.get(router)) {
                Some(sid) => service_waypoints.push(ServiceWaypoint::new(edges.len(), router.clone(), sid.clone())),
                None => log::warn!("Sfc: no SID of service {} known on router {}", index, router),
            }
        }

        let mut path = Path::new(edges);
        path.total_cost = totals.cost;
        path.total_delay = totals.delay;
        path.total_jitter = totals.jitter;
        path.total_packet_loss = totals.packet_loss;
        path.service_waypoints = service_waypoints;

        if let Some((edge_id, value)) = bottleneck {
            path.bottleneck_edge = Some(edge_id);
            path.bottleneck_value = value;
        }

        path
    }
}
