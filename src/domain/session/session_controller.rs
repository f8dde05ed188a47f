use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::path::path_request::PathRequest;
use crate::domain::path::path_result::PathResult;
use crate::domain::service::calculation_manager::CalculationManager;
use crate::domain::session::stream_session::StreamSession;
use crate::domain::utils::id::SessionId;
use crate::error::Error;

/// Outcome of a request or a topology update, sent to the transport layer.
#[derive(Debug)]
pub enum SessionEvent {
    /// First answer to a request. `cached` is set when an open session with the same
    /// fingerprint answered it without a calculation.
    PathCalculated { fingerprint: String, result: PathResult, cached: bool },

    /// An open session switched to a new path after a topology change.
    PathUpdated { fingerprint: String, result: PathResult },

    CalculationFailed { fingerprint: String, error: Error },
}

impl SessionEvent {
    pub fn get_fingerprint(&self) -> &str {
        match self {
            SessionEvent::PathCalculated { fingerprint, .. }
            | SessionEvent::PathUpdated { fingerprint, .. }
            | SessionEvent::CalculationFailed { fingerprint, .. } => fingerprint,
        }
    }

    pub fn get_result(&self) -> Option<&PathResult> {
        match self {
            SessionEvent::PathCalculated { result, .. } | SessionEvent::PathUpdated { result, .. } => Some(result),
            SessionEvent::CalculationFailed { .. } => None,
        }
    }
}

/// Open sessions by request fingerprint.
///
/// Shared between the controller loop and the cancellation watchers. The controller
/// never iterates the live map, it works on [`SessionTable::snapshot`].
#[derive(Debug, Clone, Default)]
pub struct SessionTable {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<StreamSession>>>>>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Mutex<StreamSession>>>> {
        self.inner.lock().expect("Session table mutex poisoned")
    }

    pub fn get(&self, fingerprint: &str) -> Option<Arc<Mutex<StreamSession>>> {
        self.lock().get(fingerprint).cloned()
    }

    pub fn insert(&self, fingerprint: String, session: StreamSession) {
        self.lock().insert(fingerprint, Arc::new(Mutex::new(session)));
    }

    /// Removes the entry only if it still belongs to session `id`.
    pub fn remove_session(&self, fingerprint: &str, id: &SessionId) -> bool {
        let mut sessions = self.lock();

        let owned = sessions.get(fingerprint).is_some_and(|session| session.lock().expect("Session mutex poisoned").id == *id);
        if owned {
            sessions.remove(fingerprint);
        }
        owned
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.lock().contains_key(fingerprint)
    }

    pub fn snapshot(&self) -> Vec<(String, Arc<Mutex<StreamSession>>)> {
        self.lock().iter().map(|(fingerprint, session)| (fingerprint.clone(), Arc::clone(session))).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Event loop serving new path requests and topology update signals one at a time.
///
/// The loop stops once every request sender is dropped.
pub struct SessionController {
    manager: CalculationManager,
    sessions: SessionTable,
    request_rx: mpsc::Receiver<PathRequest>,
    update_rx: mpsc::Receiver<()>,
    event_tx: mpsc::Sender<SessionEvent>,
}

impl SessionController {
    pub fn new(
        manager: CalculationManager,
        request_rx: mpsc::Receiver<PathRequest>,
        update_rx: mpsc::Receiver<()>,
        event_tx: mpsc::Sender<SessionEvent>,
    ) -> Self {
        Self { manager, sessions: SessionTable::new(), request_rx, update_rx, event_tx }
    }

    /// Handle to the open sessions, valid after the controller was moved into its task.
    pub fn get_session_table(&self) -> SessionTable {
        self.sessions.clone()
    }

    pub async fn run(mut self) {
        log::info!("Session controller started");

        loop {
            tokio::select! {
                request = self.request_rx.recv() => match request {
                    Some(request) => {
                        let event = self.handle_request(request);
                        self.send(event).await;
                    }
                    None => {
                        log::info!("Request channel closed, stopping session controller");
                        break;
                    }
                },

                Some(()) = self.update_rx.recv() => {
                    let events = self.handle_update();
                    for event in events {
                        self.send(event).await;
                    }
                }
            }
        }
    }

    fn handle_request(&mut self, request: PathRequest) -> SessionEvent {
        let fingerprint = request.fingerprint();

        if let Some(session) = self.sessions.get(&fingerprint) {
            let session = session.lock().expect("Session mutex poisoned");
            if !session.is_cancelled() {
                log::debug!("Session {} answers duplicate request", session.id);
                return SessionEvent::PathCalculated { fingerprint, result: session.get_result().clone(), cached: true };
            }
        }

        match self.manager.calculate_best_path(&request) {
            Ok(result) => {
                let token = request.get_cancellation_token();
                let session = StreamSession::new(request, result.clone());
                let id = session.id.clone();

                log::info!("Session {} opened with SIDs {:?}", id, result.sid_list);
                self.sessions.insert(fingerprint.clone(), session);
                self.spawn_watcher(fingerprint.clone(), id, token);

                SessionEvent::PathCalculated { fingerprint, result, cached: false }
            }
            Err(error) => {
                log::warn!("CalculationFailed: {} => {}: {}", request.ipv6_source_address, request.ipv6_destination_address, error);
                SessionEvent::CalculationFailed { fingerprint, error }
            }
        }
    }

    /// Drops the session once the client stream behind `token` goes away.
    fn spawn_watcher(&self, fingerprint: String, id: SessionId, token: CancellationToken) {
        let sessions = self.sessions.clone();

        tokio::spawn(async move {
            token.cancelled().await;
            if sessions.remove_session(&fingerprint, &id) {
                log::info!("Session {} closed", id);
            }
        });
    }

    fn handle_update(&self) -> Vec<SessionEvent> {
        let snapshot = self.sessions.snapshot();
        log::debug!("Topology changed, rechecking {} sessions", snapshot.len());

        let mut events = Vec::new();
        for (fingerprint, session) in snapshot {
            let mut session = session.lock().expect("Session mutex poisoned");
            if session.is_cancelled() {
                continue;
            }

            match self.manager.calculate_path_update(&mut session) {
                Ok(Some(result)) => events.push(SessionEvent::PathUpdated { fingerprint, result }),
                Ok(None) => {}
                Err(e) => log::warn!("UpdateFailed: session {}: {}", session.id, e),
            }
        }
        events
    }

    async fn send(&self, event: SessionEvent) {
        if self.event_tx.send(event).await.is_err() {
            log::warn!("Event receiver dropped, discarding session event");
        }
    }
}
