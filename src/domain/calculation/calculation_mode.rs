use serde::Serialize;

use crate::domain::calculation::priority_queue::IndexedPriorityQueue;

/// How edge weights are aggregated along a path and which aggregate is preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CalculationMode {
    /// Minimize the sum of the edge weights.
    Sum,
    /// Minimize the smallest edge weight along the path.
    Min,
    /// Maximize the smallest edge weight along the path.
    Max,
}

impl CalculationMode {
    /// Initial cost of the source when no carried over cost is supplied.
    pub fn default_source_cost(&self) -> f64 {
        match self {
            CalculationMode::Sum => 0.0,
            CalculationMode::Min | CalculationMode::Max => f64::INFINITY,
        }
    }

    /// Initial cost of every node except the source.
    pub fn unreached_cost(&self) -> f64 {
        match self {
            CalculationMode::Sum | CalculationMode::Min => f64::INFINITY,
            CalculationMode::Max => 0.0,
        }
    }

    /// Cost at the far end of an edge, given the cost at its near end.
    pub fn combine(&self, current: f64, edge_weight: f64) -> f64 {
        match self {
            CalculationMode::Sum => current + edge_weight,
            CalculationMode::Min | CalculationMode::Max => current.min(edge_weight),
        }
    }

    /// Strict improvement test used for relaxation and for comparing whole paths.
    pub fn is_improvement(&self, candidate: f64, current: f64) -> bool {
        match self {
            CalculationMode::Sum | CalculationMode::Min => candidate < current,
            CalculationMode::Max => candidate > current,
        }
    }

    /// Whether a partial service chain total can no longer beat the best complete one.
    ///
    /// Sum totals only grow and max mode bottlenecks only shrink with every further leg.
    /// Min mode bottlenecks may still drop, so they are never pruned.
    pub fn is_beyond_bound(&self, partial: f64, best: f64) -> bool {
        match self {
            CalculationMode::Sum => partial > best,
            CalculationMode::Max => partial < best,
            CalculationMode::Min => false,
        }
    }

    pub fn create_queue(&self) -> IndexedPriorityQueue {
        match self {
            CalculationMode::Sum | CalculationMode::Min => IndexedPriorityQueue::min(),
            CalculationMode::Max => IndexedPriorityQueue::max(),
        }
    }
}
