//! Shared application state: the session table.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use anyhow::Result;
use lotus::io::config::LotusConfig;
use lotus::server::McpSession;
use tokio::sync::{RwLock, broadcast};
use tracing::info;
use uuid::Uuid;

/// Header carrying the session id on every request after `initialize`.
pub const SESSION_HEADER: &str = "mcp-session-id";

/// Lifecycle events broadcast to open SSE streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Session deleted by the client.
    Closed { session_id: String },
    /// Session dropped by the idle sweeper.
    Evicted { session_id: String },
}

impl SessionEvent {
    pub fn session_id(&self) -> &str {
        match self {
            SessionEvent::Closed { session_id } | SessionEvent::Evicted { session_id } => {
                session_id
            }
        }
    }
}

/// One client's journey plus its last activity time.
pub struct SessionSlot {
    pub session: McpSession,
    pub last_seen: Instant,
}

impl SessionSlot {
    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }
}

pub type SharedSlot = Arc<Mutex<SessionSlot>>;

/// Shared state accessible from all request handlers.
///
/// The table lock is only held to look up, insert or remove; each session's
/// own lock serializes its submissions and is never held across an await.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<LotusConfig>,
    sessions: Arc<RwLock<HashMap<String, SharedSlot>>>,
    /// Broadcast sender for session lifecycle events.
    pub event_tx: Arc<broadcast::Sender<SessionEvent>>,
}

impl AppState {
    pub fn new(config: LotusConfig) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            config: Arc::new(config),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            event_tx: Arc::new(event_tx),
        }
    }

    /// A fresh, not yet registered session built from the config.
    pub fn new_session(&self) -> Result<McpSession> {
        McpSession::from_config(&self.config)
    }

    /// Register an initialized session under a new id.
    pub async fn insert_session(&self, session: McpSession) -> (String, SharedSlot) {
        let session_id = Uuid::new_v4().to_string();
        let slot = Arc::new(Mutex::new(SessionSlot {
            session,
            last_seen: Instant::now(),
        }));
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), slot.clone());
        info!(session_id = %session_id, "session initialized");
        (session_id, slot)
    }

    pub async fn session(&self, session_id: &str) -> Option<SharedSlot> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Remove a session. Returns false if it was unknown.
    pub async fn remove_session(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            info!(session_id = %session_id, "session closed");
            let _ = self.event_tx.send(SessionEvent::Closed {
                session_id: session_id.to_string(),
            });
        }
        removed
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions idle for longer than the configured timeout as of `now`.
    /// Returns the evicted ids.
    pub async fn evict_idle(&self, now: Instant) -> Vec<String> {
        let timeout = Duration::from_secs(self.config.http.session_idle_timeout_secs);
        let mut sessions = self.sessions.write().await;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, slot)| {
                let last_seen = lock_slot(slot).last_seen;
                now.saturating_duration_since(last_seen) > timeout
            })
            .map(|(session_id, _)| session_id.clone())
            .collect();
        for session_id in &expired {
            sessions.remove(session_id);
            info!(session_id = %session_id, "session evicted after idle timeout");
            let _ = self.event_tx.send(SessionEvent::Evicted {
                session_id: session_id.clone(),
            });
        }
        expired
    }
}

/// Lock a session slot. A panic in another request must not wedge the
/// session, so a poisoned lock is taken over as is.
pub fn lock_slot(slot: &SharedSlot) -> MutexGuard<'_, SessionSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
