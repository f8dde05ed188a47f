mod common;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use common::*;
use hawkeye::domain::graph::topology::NetworkGraph;
use hawkeye::domain::intent::{Intent, IntentType};
use hawkeye::domain::path::path_request::PathRequest;
use hawkeye::domain::session::session_controller::{SessionController, SessionEvent, SessionTable};
use hawkeye::error::Error;

struct Harness {
    graph: NetworkGraph,
    request_tx: mpsc::Sender<PathRequest>,
    update_tx: mpsc::Sender<()>,
    event_rx: mpsc::Receiver<SessionEvent>,
    sessions: SessionTable,
    controller: JoinHandle<()>,
}

impl Harness {
    fn start() -> Self {
        let (graph, _, manager) = diamond_manager(diamond_cache());
        let (request_tx, request_rx) = mpsc::channel(16);
        let (update_tx, update_rx) = mpsc::channel(1);
        let (event_tx, event_rx) = mpsc::channel(16);

        let controller = SessionController::new(manager, request_rx, update_rx, event_tx);
        let sessions = controller.get_session_table();
        let controller = tokio::spawn(controller.run());

        Harness { graph, request_tx, update_tx, event_rx, sessions, controller }
    }

    async fn next_event(&mut self) -> SessionEvent {
        tokio::time::timeout(Duration::from_secs(5), self.event_rx.recv()).await.expect("no session event in time").expect("event channel closed")
    }
}

fn low_latency(token: CancellationToken) -> PathRequest {
    PathRequest::with_cancellation_token(address(1), address(8), vec![Intent::of(IntentType::LowLatency)], token)
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn test_first_request_opens_a_session() {
    let mut harness = Harness::start();
    let request = low_latency(CancellationToken::new());
    let fingerprint = request.fingerprint();

    harness.request_tx.send(request).await.unwrap();

    match harness.next_event().await {
        SessionEvent::PathCalculated { fingerprint: received, result, cached } => {
            assert_eq!(received, fingerprint);
            assert!(!cached);
            assert_eq!(result.sid_list, vec![locator_sid(4, 0), locator_sid(7, 0), locator_sid(6, 0), locator_sid(8, 0)]);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert!(harness.sessions.contains(&fingerprint));
}

#[tokio::test]
async fn test_duplicate_request_is_answered_from_the_session() {
    let mut harness = Harness::start();

    harness.request_tx.send(low_latency(CancellationToken::new())).await.unwrap();
    harness.request_tx.send(low_latency(CancellationToken::new())).await.unwrap();

    let first = harness.next_event().await;
    let second = harness.next_event().await;

    assert!(matches!(first, SessionEvent::PathCalculated { cached: false, .. }));
    assert!(matches!(second, SessionEvent::PathCalculated { cached: true, .. }));
    assert_eq!(first.get_fingerprint(), second.get_fingerprint());
    assert_eq!(first.get_result(), second.get_result());
    assert_eq!(harness.sessions.len(), 1);
}

#[tokio::test]
async fn test_cancelled_stream_closes_the_session() {
    let mut harness = Harness::start();
    let token = CancellationToken::new();

    harness.request_tx.send(low_latency(token.clone())).await.unwrap();
    harness.next_event().await;
    assert_eq!(harness.sessions.len(), 1);

    token.cancel();
    let sessions = harness.sessions.clone();
    wait_until(|| sessions.is_empty()).await;

    // The same request afterwards is calculated again.
    harness.request_tx.send(low_latency(CancellationToken::new())).await.unwrap();
    assert!(matches!(harness.next_event().await, SessionEvent::PathCalculated { cached: false, .. }));
}

#[tokio::test]
async fn test_cancelled_session_is_not_reused() {
    let mut harness = Harness::start();
    let token = CancellationToken::new();

    harness.request_tx.send(low_latency(token.clone())).await.unwrap();
    harness.next_event().await;

    token.cancel();
    harness.request_tx.send(low_latency(CancellationToken::new())).await.unwrap();

    assert!(matches!(harness.next_event().await, SessionEvent::PathCalculated { cached: false, .. }));
}

#[tokio::test]
async fn test_topology_change_updates_open_sessions() {
    let mut harness = Harness::start();

    harness.request_tx.send(low_latency(CancellationToken::new())).await.unwrap();
    harness.next_event().await;

    harness.graph.delete_edge(&edge(4, 7)).unwrap();
    harness.update_tx.send(()).await.unwrap();

    match harness.next_event().await {
        SessionEvent::PathUpdated { result, .. } => {
            assert_eq!(result.sid_list, vec![locator_sid(2, 0), locator_sid(5, 0), locator_sid(8, 0)]);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_calculation_is_reported() {
    let mut harness = Harness::start();
    let request = PathRequest::new(address(42), address(8), vec![Intent::of(IntentType::LowLatency)]);

    harness.request_tx.send(request).await.unwrap();

    match harness.next_event().await {
        SessionEvent::CalculationFailed { error, .. } => assert!(matches!(error, Error::SourceRouterNotFound(_))),
        other => panic!("unexpected event {:?}", other),
    }
    assert!(harness.sessions.is_empty());
}

#[tokio::test]
async fn test_controller_stops_when_requests_end() {
    let harness = Harness::start();
    let Harness { request_tx, controller, .. } = harness;

    drop(request_tx);
    tokio::time::timeout(Duration::from_secs(5), controller).await.expect("controller did not stop").unwrap();
}
