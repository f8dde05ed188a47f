use crate::domain::utils::id::{EdgeId, NodeId};

/// Service SID applied at a waypoint of a service function chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceWaypoint {
    /// Number of path edges travelled before the service is applied; 0 is the source router.
    pub position: usize,
    pub router: NodeId,
    pub sid: String,
}

impl ServiceWaypoint {
    pub fn new(position: usize, router: NodeId, sid: impl Into<String>) -> Self {
        Self { position, router, sid: sid.into() }
    }
}

/// Result of one path calculation.
///
/// The meaning of `total_cost` depends on the calculation mode: the accumulated
/// weight for sum mode, the bottleneck of the optimized metric for min and max mode.
/// Delay, jitter and packet loss are always the raw aggregates along the path.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub edges: Vec<EdgeId>,
    pub total_cost: f64,

    /// Accumulated latency.
    pub total_delay: f64,

    /// Accumulated jitter.
    pub total_jitter: f64,

    /// Compounded packet loss in percent.
    pub total_packet_loss: f64,

    /// Edge with the lowest available bandwidth.
    pub bottleneck_edge: Option<EdgeId>,
    pub bottleneck_value: f64,

    /// Services in chain order, non-decreasing in position. Only filled for service function chains.
    pub service_waypoints: Vec<ServiceWaypoint>,
}

impl Path {
    pub fn new(edges: Vec<EdgeId>) -> Self {
        Self {
            edges,
            total_cost: 0.0,
            total_delay: 0.0,
            total_jitter: 0.0,
            total_packet_loss: 0.0,
            bottleneck_edge: None,
            bottleneck_value: f64::INFINITY,
            service_waypoints: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
