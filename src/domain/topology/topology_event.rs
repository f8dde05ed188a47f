use std::collections::HashMap;

use crate::domain::graph::weight_key::WeightKey;

/// A router as reported by the topology gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEvent {
    pub router_id: String,
    pub name: String,
    pub flex_algos: Vec<u32>,
}

/// A unidirectional link from `local_router` to `remote_router`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkEvent {
    pub id: String,
    pub local_router: String,
    pub remote_router: String,
    pub weights: HashMap<WeightKey, f64>,
}

/// An IPv6 prefix announced by a router.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixEvent {
    pub router_id: String,
    pub prefix: String,
}

/// An SRv6 SID. Without a service name it is the router's locator SID for `algorithm`.
#[derive(Debug, Clone, PartialEq)]
pub struct SidEvent {
    pub router_id: String,
    pub sid: String,
    pub algorithm: u32,
    pub service_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopologyEvent {
    NodeAdded(NodeEvent),
    NodeUpdated(NodeEvent),
    NodeDeleted(NodeEvent),
    LinkAdded(LinkEvent),
    LinkUpdated(LinkEvent),
    LinkDeleted(LinkEvent),
    PrefixAdded(PrefixEvent),
    PrefixDeleted(PrefixEvent),
    SidAdded(SidEvent),
    SidDeleted(SidEvent),
}

impl TopologyEvent {
    /// Events that change nodes or edges and therefore require a subgraph rebuild.
    pub fn changes_graph(&self) -> bool {
        matches!(
            self,
            TopologyEvent::NodeAdded(_)
                | TopologyEvent::NodeUpdated(_)
                | TopologyEvent::NodeDeleted(_)
                | TopologyEvent::LinkAdded(_)
                | TopologyEvent::LinkUpdated(_)
                | TopologyEvent::LinkDeleted(_)
        )
    }
}
