use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::cache::network_cache::{CacheState, NetworkCache};
use crate::domain::graph::edge::NetworkEdge;
use crate::domain::graph::node::NetworkNode;
use crate::domain::graph::topology::{Graph, NetworkGraph, Topology};
use crate::domain::topology::topology_event::{LinkEvent, NodeEvent, PrefixEvent, SidEvent, TopologyEvent};
use crate::domain::utils::id::{EdgeId, NodeId};
use crate::domain::utils::network_address::get_network_address;
use crate::error::Result;

/// Applies topology events to the live graph and cache.
///
/// A batch is applied under the graph and cache locks, taken in the same order as the
/// calculation manager takes them. Subgraphs are rebuilt once per batch, after which
/// the session controller is signalled.
#[derive(Debug, Clone)]
pub struct TopologyProcessor {
    graph: NetworkGraph,
    cache: NetworkCache,
    update_tx: Option<mpsc::Sender<()>>,
}

impl TopologyProcessor {
    pub fn new(graph: NetworkGraph, cache: NetworkCache) -> Self {
        Self { graph, cache, update_tx: None }
    }

    pub fn with_update_signal(graph: NetworkGraph, cache: NetworkCache, update_tx: mpsc::Sender<()>) -> Self {
        Self { graph, cache, update_tx: Some(update_tx) }
    }

    /// Applies a batch and returns how many events took effect.
    pub fn process_events(&self, events: Vec<TopologyEvent>) -> usize {
        if events.is_empty() {
            return 0;
        }

        let applied = {
            let mut topology = self.graph.lock();
            let mut cache = self.cache.lock();

            let mut applied = 0;
            let mut graph_changed = false;

            for event in events {
                let changes_graph = event.changes_graph();
                match Self::apply(event, &mut topology, &mut cache) {
                    Ok(()) => {
                        applied += 1;
                        graph_changed |= changes_graph;
                    }
                    Err(e) => log::warn!("EventSkipped: {}", e),
                }
            }

            if graph_changed {
                topology.normalize_weights();
                topology.update_sub_graphs();
            }

            log::debug!("Topology now has {} nodes and {} edges", topology.node_count(), topology.edge_count());
            applied
        };

        if applied > 0 {
            self.signal_update();
        }
        applied
    }

    /// Consumes event batches until the sender side is dropped.
    pub async fn run(self, mut event_rx: mpsc::Receiver<Vec<TopologyEvent>>) {
        while let Some(events) = event_rx.recv().await {
            let count = events.len();
            let applied = self.process_events(events);
            log::info!("Applied {} of {} topology events", applied, count);
        }
        log::info!("Topology event channel closed");
    }

    fn signal_update(&self) {
        let Some(update_tx) = &self.update_tx else {
            return;
        };

        match update_tx.try_send(()) {
            Ok(()) => {}
            // An update is already pending, the controller will see this batch as well.
            Err(TrySendError::Full(())) => log::trace!("Update signal already pending"),
            Err(TrySendError::Closed(())) => log::debug!("Update receiver dropped"),
        }
    }

    fn apply(event: TopologyEvent, topology: &mut Topology, cache: &mut CacheState) -> Result<()> {
        match event {
            TopologyEvent::NodeAdded(node) | TopologyEvent::NodeUpdated(node) => Self::upsert_node(node, topology),
            TopologyEvent::NodeDeleted(node) => {
                topology.delete_node(&NodeId::new(node.router_id.as_str()))?;
                cache.remove_router(&node.router_id);
                Ok(())
            }
            TopologyEvent::LinkAdded(link) | TopologyEvent::LinkUpdated(link) => Self::upsert_link(link, topology),
            TopologyEvent::LinkDeleted(link) => topology.delete_edge(&EdgeId::new(link.id)).map(|_| ()),
            TopologyEvent::PrefixAdded(prefix) => Self::add_prefix(prefix, cache),
            TopologyEvent::PrefixDeleted(prefix) => {
                let network_address = get_network_address(&prefix.prefix)?;
                cache.remove_network_address(&network_address);
                Ok(())
            }
            TopologyEvent::SidAdded(sid) => Self::add_sid(sid, cache),
            TopologyEvent::SidDeleted(sid) => {
                let removed = match &sid.service_name {
                    Some(_) => cache.remove_service_sid(&sid.sid),
                    None => cache.remove_sr_algorithm_sid(&sid.router_id, sid.algorithm, &sid.sid),
                };
                if !removed {
                    log::debug!("Sid {} of router {} was not cached", sid.sid, sid.router_id);
                }
                Ok(())
            }
        }
    }

    fn upsert_node(node: NodeEvent, topology: &mut Topology) -> Result<()> {
        let node_id = NodeId::new(node.router_id);

        if topology.node_exists(&node_id) {
            topology.update_node(&node_id, node.name, node.flex_algos)
        } else {
            topology.add_node(NetworkNode::new(node_id, node.name, node.flex_algos))
        }
    }

    fn upsert_link(link: LinkEvent, topology: &mut Topology) -> Result<()> {
        let edge_id = EdgeId::new(link.id);

        if topology.edge_exists(&edge_id) {
            return topology.update_edge_weights(&edge_id, link.weights);
        }

        let edge = NetworkEdge::new(edge_id, NodeId::new(link.local_router), NodeId::new(link.remote_router), link.weights);
        topology.add_edge(edge)
    }

    fn add_prefix(prefix: PrefixEvent, cache: &mut CacheState) -> Result<()> {
        let network_address = get_network_address(&prefix.prefix)?;
        cache.store_network_address(network_address, prefix.router_id);
        Ok(())
    }

    /// The /64 of every SID belongs to the advertising router, so it is cached as a prefix too.
    fn add_sid(sid: SidEvent, cache: &mut CacheState) -> Result<()> {
        let network_address = get_network_address(&sid.sid)?;
        cache.store_network_address(network_address, sid.router_id.as_str());

        match sid.service_name {
            Some(service_name) => cache.store_service_sid(service_name, sid.sid),
            None => cache.store_sr_algorithm_sid(sid.router_id, sid.algorithm, sid.sid),
        }
        Ok(())
    }
}
