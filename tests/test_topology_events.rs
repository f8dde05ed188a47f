mod common;

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use common::*;
use hawkeye::domain::cache::cache_trait::Cache;
use hawkeye::domain::cache::network_cache::NetworkCache;
use hawkeye::domain::graph::topology::{Graph, NetworkGraph};
use hawkeye::domain::graph::weight_key::WeightKey;
use hawkeye::domain::topology::topology_event::{LinkEvent, NodeEvent, PrefixEvent, SidEvent, TopologyEvent};
use hawkeye::domain::topology::topology_processor::TopologyProcessor;

fn router(n: u32, flex_algos: &[u32]) -> NodeEvent {
    NodeEvent { router_id: n.to_string(), name: format!("router-{}", n), flex_algos: flex_algos.to_vec() }
}

fn link(from: u32, to: u32, igp: f64, latency: f64) -> LinkEvent {
    LinkEvent {
        id: edge(from, to).to_string(),
        local_router: from.to_string(),
        remote_router: to.to_string(),
        weights: HashMap::from([(WeightKey::IgpMetric, igp), (WeightKey::Latency, latency)]),
    }
}

fn prefix(n: u32) -> PrefixEvent {
    PrefixEvent { router_id: n.to_string(), prefix: loopback_network(n) }
}

fn locator(n: u32, algorithm: u32) -> SidEvent {
    SidEvent { router_id: n.to_string(), sid: locator_sid(n, algorithm), algorithm, service_name: None }
}

fn service(n: u32, name: &str) -> SidEvent {
    SidEvent { router_id: n.to_string(), sid: service_sid(n, 0x10), algorithm: 0, service_name: Some(name.to_string()) }
}

fn empty_processor() -> (NetworkGraph, NetworkCache, TopologyProcessor) {
    let graph = NetworkGraph::default();
    let cache = NetworkCache::default();
    let processor = TopologyProcessor::new(graph.clone(), cache.clone());
    (graph, cache, processor)
}

fn two_routers() -> Vec<TopologyEvent> {
    vec![
        TopologyEvent::NodeAdded(router(1, &[FLEX_ALGO])),
        TopologyEvent::NodeAdded(router(2, &[FLEX_ALGO])),
        TopologyEvent::LinkAdded(link(1, 2, 10.0, 5.0)),
        TopologyEvent::LinkAdded(link(2, 1, 10.0, 15.0)),
        TopologyEvent::PrefixAdded(prefix(1)),
        TopologyEvent::SidAdded(locator(1, 0)),
        TopologyEvent::SidAdded(locator(2, 0)),
    ]
}

#[test]
fn test_batch_builds_graph_and_cache() {
    let (graph, cache, processor) = empty_processor();

    assert_eq!(processor.process_events(two_routers()), 7);

    let topology = graph.lock();
    assert_eq!(topology.node_count(), 2);
    assert_eq!(topology.edge_count(), 2);
    assert_eq!(topology.get_sub_graph(FLEX_ALGO).map(|sub_graph| sub_graph.edge_count()), Some(2));
    assert_close(topology.get_edge(&edge(2, 1)).unwrap().get_weight(WeightKey::NormalizedLatency).unwrap(), 1.0);

    let cache = cache.lock();
    assert_eq!(cache.get_router_id_from_network_address(&loopback_network(1)), Some("1".to_string()));
    assert_eq!(cache.get_sr_algorithm_sid("2", 0), Some(locator_sid(2, 0)));
    // The locator network identifies the router as well.
    assert_eq!(cache.get_router_id_from_network_address(&locator_sid(2, 0)), Some("2".to_string()));
}

#[test]
fn test_repeated_add_updates_in_place() {
    let (graph, _, processor) = empty_processor();
    processor.process_events(two_routers());

    let applied = processor.process_events(vec![
        TopologyEvent::NodeAdded(router(2, &[])),
        TopologyEvent::LinkAdded(link(1, 2, 3.0, 5.0)),
    ]);

    assert_eq!(applied, 2);
    let topology = graph.lock();
    assert_eq!(topology.node_count(), 2);
    assert_close(topology.get_edge(&edge(1, 2)).unwrap().get_weight(WeightKey::IgpMetric).unwrap(), 3.0);

    let sub_graph = topology.get_sub_graph(FLEX_ALGO).unwrap();
    assert!(!sub_graph.node_exists(&node(2)));
    assert_eq!(sub_graph.edge_count(), 0);
}

#[test]
fn test_later_batches_rescale_normalized_weights() {
    let (graph, _, processor) = empty_processor();
    let routers = (1..=4).map(|n| TopologyEvent::NodeAdded(router(n, &[]))).collect();
    processor.process_events(routers);

    processor.process_events(vec![TopologyEvent::LinkAdded(link(1, 2, 1.0, 10.0)), TopologyEvent::LinkAdded(link(2, 3, 1.0, 20.0))]);
    processor.process_events(vec![TopologyEvent::LinkAdded(link(3, 4, 1.0, 40.0))]);

    let topology = graph.lock();
    let normalized = |from, to| topology.get_edge(&edge(from, to)).unwrap().get_weight(WeightKey::NormalizedLatency).unwrap();
    assert_close(normalized(1, 2), 0.0);
    assert_close(normalized(2, 3), 10.0 / 30.0);
    assert_close(normalized(3, 4), 1.0);
}

#[test]
fn test_node_deletion_cleans_up() {
    let (graph, cache, processor) = empty_processor();
    processor.process_events(two_routers());
    processor.process_events(vec![TopologyEvent::SidAdded(service(1, "fw")), TopologyEvent::SidAdded(service(2, "fw"))]);

    assert_eq!(processor.process_events(vec![TopologyEvent::NodeDeleted(router(1, &[]))]), 1);

    assert!(!graph.node_exists(&node(1)));
    assert_eq!(graph.lock().edge_count(), 0);

    let cache = cache.lock();
    assert_eq!(cache.get_router_id_from_network_address(&loopback_network(1)), None);
    assert_eq!(cache.get_sr_algorithm_sid("1", 0), None);
    assert_eq!(cache.get_sr_algorithm_sid("2", 0), Some(locator_sid(2, 0)));
    assert!(!cache.does_service_sid_exist(&service_sid(1, 0x10)));
    assert_eq!(cache.get_service_sids("fw"), vec![service_sid(2, 0x10)]);
}

#[test]
fn test_invalid_events_are_skipped() {
    let (graph, _, processor) = empty_processor();
    processor.process_events(two_routers());

    let applied = processor.process_events(vec![
        TopologyEvent::LinkAdded(link(1, 9, 1.0, 1.0)),
        TopologyEvent::LinkDeleted(link(2, 3, 1.0, 1.0)),
        TopologyEvent::PrefixAdded(PrefixEvent { router_id: "1".to_string(), prefix: "not-an-address".to_string() }),
        TopologyEvent::LinkDeleted(link(2, 1, 1.0, 1.0)),
    ]);

    assert_eq!(applied, 1);
    assert_eq!(graph.lock().edge_count(), 1);
}

#[test]
fn test_service_sids_come_and_go() {
    let (_, cache, processor) = empty_processor();
    processor.process_events(two_routers());

    processor.process_events(vec![TopologyEvent::SidAdded(service(2, "fw"))]);
    {
        let cache = cache.lock();
        assert_eq!(cache.get_service_sids("fw"), vec![service_sid(2, 0x10)]);
        assert!(cache.does_service_sid_exist(&service_sid(2, 0x10)));
    }

    processor.process_events(vec![TopologyEvent::SidDeleted(service(2, "fw"))]);
    let cache = cache.lock();
    assert!(cache.get_service_sids("fw").is_empty());
    assert!(!cache.does_service_sid_exist(&service_sid(2, 0x10)));
}

#[test]
fn test_locator_is_only_withdrawn_when_it_matches() {
    let (_, cache, processor) = empty_processor();
    processor.process_events(two_routers());

    let outdated = SidEvent { sid: "fc00:0:99::".to_string(), ..locator(2, 0) };
    processor.process_events(vec![TopologyEvent::SidDeleted(outdated)]);
    assert_eq!(cache.lock().get_sr_algorithm_sid("2", 0), Some(locator_sid(2, 0)));

    processor.process_events(vec![TopologyEvent::SidDeleted(locator(2, 0)), TopologyEvent::PrefixDeleted(prefix(1))]);
    let cache = cache.lock();
    assert_eq!(cache.get_sr_algorithm_sid("2", 0), None);
    assert_eq!(cache.get_router_id_from_network_address(&loopback_network(1)), None);
}

#[test]
fn test_update_signals_are_coalesced() {
    let graph = NetworkGraph::default();
    let cache = NetworkCache::default();
    let (update_tx, mut update_rx) = mpsc::channel(1);
    let processor = TopologyProcessor::with_update_signal(graph, cache, update_tx);

    processor.process_events(two_routers());
    processor.process_events(vec![TopologyEvent::LinkUpdated(link(1, 2, 4.0, 5.0))]);
    processor.process_events(vec![TopologyEvent::PrefixAdded(prefix(2))]);

    assert_eq!(update_rx.try_recv(), Ok(()));
    assert_eq!(update_rx.try_recv(), Err(TryRecvError::Empty));

    // Nothing applied, nothing signalled.
    processor.process_events(vec![TopologyEvent::LinkDeleted(link(5, 6, 1.0, 1.0))]);
    assert_eq!(update_rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_processor_task_drains_the_channel() {
    let (graph, _, processor) = empty_processor();
    let (event_tx, event_rx) = mpsc::channel(4);

    let task = tokio::spawn(processor.run(event_rx));
    event_tx.send(two_routers()).await.unwrap();
    event_tx.send(vec![TopologyEvent::LinkDeleted(link(1, 2, 1.0, 1.0))]).await.unwrap();
    drop(event_tx);
    task.await.unwrap();

    assert_eq!(graph.lock().edge_count(), 1);
    assert!(graph.edge_exists(&edge(2, 1)));
}
