#![allow(dead_code)]

use std::collections::HashMap;

use hawkeye::config::HawkEyeConfig;
use hawkeye::domain::cache::cache_trait::Cache;
use hawkeye::domain::cache::network_cache::{CacheState, NetworkCache};
use hawkeye::domain::graph::edge::NetworkEdge;
use hawkeye::domain::graph::node::NetworkNode;
use hawkeye::domain::graph::topology::{NetworkGraph, Topology};
use hawkeye::domain::graph::weight_key::WeightKey;
use hawkeye::domain::service::calculation_manager::CalculationManager;
use hawkeye::domain::utils::id::{EdgeId, NodeId};

pub const FLEX_ALGO: u32 = 128;

/// Routers taking part in flex algo 128. Routers 4 and 7 do not.
pub const FLEX_ALGO_ROUTERS: [u32; 6] = [1, 2, 3, 5, 6, 8];

/// (from, to, igp metric, latency, jitter, packet loss %, available bandwidth)
pub const DIAMOND_EDGES: [(u32, u32, f64, f64, f64, f64, f64); 12] = [
    (1, 2, 2.0, 10.0, 1.0, 0.5, 100.0),
    (1, 3, 1.0, 20.0, 2.0, 0.1, 80.0),
    (1, 4, 3.0, 5.0, 3.0, 1.0, 60.0),
    (2, 5, 2.0, 10.0, 1.0, 0.5, 90.0),
    (3, 5, 4.0, 15.0, 2.0, 0.2, 70.0),
    (3, 6, 2.0, 10.0, 4.0, 0.1, 50.0),
    (4, 7, 1.0, 5.0, 1.0, 1.0, 40.0),
    (7, 6, 1.0, 5.0, 1.0, 0.3, 100.0),
    (6, 7, 1.0, 5.0, 1.0, 0.3, 100.0),
    (5, 8, 3.0, 10.0, 1.0, 0.5, 30.0),
    (6, 8, 4.0, 10.0, 2.0, 0.2, 90.0),
    (7, 8, 2.0, 20.0, 3.0, 0.1, 60.0),
];

pub const MAXIMUM_LINK_BANDWIDTH: f64 = 100.0;

pub fn node(n: u32) -> NodeId {
    NodeId::new(n.to_string())
}

pub fn edge(from: u32, to: u32) -> EdgeId {
    EdgeId::new(format!("{}-{}", from, to))
}

pub fn edges(hops: &[(u32, u32)]) -> Vec<EdgeId> {
    hops.iter().map(|(from, to)| edge(*from, *to)).collect()
}

/// Client address inside the loopback network of router `n`.
pub fn address(n: u32) -> String {
    format!("2001:db8:{}::1", n)
}

pub fn loopback_network(n: u32) -> String {
    format!("2001:db8:{}::", n)
}

pub fn locator_sid(n: u32, algorithm: u32) -> String {
    if algorithm == 0 { format!("fc00:0:{}::", n) } else { format!("fc00:0:{}:{:x}::", n, algorithm) }
}

pub fn service_sid(n: u32, function: u32) -> String {
    format!("fc00:0:{}::{:x}", n, function)
}

pub fn weights(igp: f64, latency: f64, jitter: f64, packet_loss: f64, available_bandwidth: f64) -> HashMap<WeightKey, f64> {
    HashMap::from([
        (WeightKey::IgpMetric, igp),
        (WeightKey::Latency, latency),
        (WeightKey::Jitter, jitter),
        (WeightKey::PacketLoss, packet_loss),
        (WeightKey::AvailableBandwidth, available_bandwidth),
        (WeightKey::MaximumLinkBandwidth, MAXIMUM_LINK_BANDWIDTH),
        (WeightKey::UtilizedBandwidth, MAXIMUM_LINK_BANDWIDTH - available_bandwidth),
    ])
}

pub fn add_router(topology: &mut Topology, n: u32, flex_algos: &[u32]) {
    topology.add_node(NetworkNode::new(node(n), format!("router-{}", n), flex_algos.iter().copied())).unwrap();
}

pub fn add_link(topology: &mut Topology, from: u32, to: u32, link_weights: HashMap<WeightKey, f64>) {
    topology.add_edge(NetworkEdge::new(edge(from, to), node(from), node(to), link_weights)).unwrap();
}

/// Node 1 fans out to 2, 3 and 4, everything converges on 8.
///
/// ```text
///        +-- 2 ---- 5 --+
///       /         /      \
///  1 --+--- 3 ---+        +-- 8
///       \         \      /
///        +-- 4 -- 7 <-> 6
/// ```
pub fn diamond_topology() -> Topology {
    let mut topology = Topology::new();

    for n in 1..=8 {
        let flex_algos: &[u32] = if FLEX_ALGO_ROUTERS.contains(&n) { &[FLEX_ALGO] } else { &[] };
        add_router(&mut topology, n, flex_algos);
    }

    for (from, to, igp, latency, jitter, loss, bandwidth) in DIAMOND_EDGES {
        add_link(&mut topology, from, to, weights(igp, latency, jitter, loss, bandwidth));
    }

    topology.normalize_weights();
    topology.update_sub_graphs();
    topology
}

/// Loopback prefixes and locator SIDs of the diamond routers.
pub fn diamond_cache() -> CacheState {
    let mut cache = CacheState::new();

    for n in 1..=8 {
        cache.store_network_address(loopback_network(n), n.to_string());
        cache.store_sr_algorithm_sid(n.to_string(), 0, locator_sid(n, 0));
        cache.store_network_address(locator_sid(n, 0), n.to_string());

        if FLEX_ALGO_ROUTERS.contains(&n) {
            cache.store_sr_algorithm_sid(n.to_string(), FLEX_ALGO, locator_sid(n, FLEX_ALGO));
            cache.store_network_address(locator_sid(n, FLEX_ALGO), n.to_string());
        }
    }
    cache
}

/// Offers `service` at function `function` of every router in `routers`.
pub fn add_service(cache: &mut CacheState, service: &str, routers: &[u32], function: u32) {
    for n in routers {
        cache.store_service_sid(service, service_sid(*n, function));
    }
}

pub fn diamond_manager(cache: CacheState) -> (NetworkGraph, NetworkCache, CalculationManager) {
    let graph = NetworkGraph::new(diamond_topology());
    let cache = NetworkCache::new(cache);
    let manager = CalculationManager::new(graph.clone(), cache.clone(), HawkEyeConfig::default());
    (graph, cache, manager)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
}

/// Hand written cache for tests that do not need the real tables.
#[derive(Debug, Default, Clone)]
pub struct MockCache {
    pub routers: HashMap<String, String>,
    pub algorithm_sids: HashMap<(String, u32), String>,
    pub services: HashMap<String, Vec<String>>,
}

impl MockCache {
    pub fn diamond() -> Self {
        let mut mock = MockCache::default();
        for n in 1..=8 {
            mock.routers.insert(loopback_network(n), n.to_string());
            mock.routers.insert(locator_sid(n, 0), n.to_string());
            mock.algorithm_sids.insert((n.to_string(), 0), locator_sid(n, 0));
            mock.algorithm_sids.insert((n.to_string(), FLEX_ALGO), locator_sid(n, FLEX_ALGO));
        }
        mock
    }

    pub fn with_service(mut self, service: &str, routers: &[u32], function: u32) -> Self {
        self.services.insert(service.to_string(), routers.iter().map(|n| service_sid(*n, function)).collect());
        self
    }
}

impl Cache for MockCache {
    fn get_router_id_from_network_address(&self, network_address: &str) -> Option<String> {
        self.routers.get(network_address).cloned()
    }

    fn get_sr_algorithm_sid(&self, router_id: &str, algorithm: u32) -> Option<String> {
        self.algorithm_sids.get(&(router_id.to_string(), algorithm)).cloned()
    }

    fn get_service_sids(&self, service_name: &str) -> Vec<String> {
        self.services.get(service_name).cloned().unwrap_or_default()
    }

    fn does_service_sid_exist(&self, sid: &str) -> bool {
        self.services.values().any(|sids| sids.iter().any(|known| known == sid))
    }
}
