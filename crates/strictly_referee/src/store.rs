//! Game state persistence keyed by session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use strictly_rps::GameState;
use tracing::{debug, info, instrument};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Somewhere to keep a snapshot between rounds.
pub trait StateStore: Send {
    /// Stores `state` under `session_id`, replacing any previous snapshot.
    fn save(&self, session_id: &str, state: GameState);

    /// Returns the snapshot stored under `session_id`, if any.
    fn load(&self, session_id: &str) -> Option<GameState>;

    /// Forgets `session_id`. Deleting an unknown session does nothing.
    fn delete(&self, session_id: &str);
}

/// In-memory store. Snapshots are lost when the process exits.
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    sessions: Arc<Mutex<HashMap<SessionId, GameState>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory state store");
        Self::default()
    }

    /// Lists the stored session IDs.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let ids: Vec<_> = self.lock().keys().cloned().collect();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, GameState>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateStore for InMemoryStore {
    #[instrument(skip(self, state), fields(round = state.current_round()))]
    fn save(&self, session_id: &str, state: GameState) {
        self.lock().insert(session_id.to_string(), state);
        debug!("Session saved");
    }

    #[instrument(skip(self))]
    fn load(&self, session_id: &str) -> Option<GameState> {
        let state = self.lock().get(session_id).cloned();
        if state.is_none() {
            debug!("Session not found");
        }
        state
    }

    #[instrument(skip(self))]
    fn delete(&self, session_id: &str) {
        if self.lock().remove(session_id).is_some() {
            debug!("Session deleted");
        }
    }
}
