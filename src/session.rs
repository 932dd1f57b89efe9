//! Session store - per-browser sticky inputs
//!
//! Each session owns its sticky values and last displayed result.
//! Nothing here is shared between sessions.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::binder::{PredictionResult, StickyValues};

#[derive(Debug, Clone)]
pub struct SessionState {
    pub sticky: StickyValues,
    pub last_result: Option<PredictionResult>,
    last_seen: Instant,
}

impl SessionState {
    fn new() -> Self {
        Self {
            sticky: StickyValues::new(),
            last_result: None,
            last_seen: Instant::now(),
        }
    }
}

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionState>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Mark a presented session as active.
    ///
    /// Returns false when the id is unknown or already expired.
    pub fn touch(&self, id: Uuid) -> bool {
        let mut sessions = self.sessions.write();
        let Some(state) = sessions.get_mut(&id) else { return false };
        if state.last_seen.elapsed() <= self.idle_timeout {
            state.last_seen = Instant::now();
            return true;
        }
        sessions.remove(&id);
        false
    }

    /// Run `f` against one session, storing it on first write.
    ///
    /// Idle sessions are pruned whenever a new one is stored.
    pub fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut sessions = self.sessions.write();

        if !sessions.contains_key(&id) {
            let timeout = self.idle_timeout;
            let before = sessions.len();
            sessions.retain(|_, s| s.last_seen.elapsed() <= timeout);
            let pruned = before - sessions.len();
            if pruned > 0 {
                tracing::debug!("Pruned {} idle sessions", pruned);
            }
        }

        let state = sessions.entry(id).or_insert_with(SessionState::new);
        state.last_seen = Instant::now();
        f(state)
    }

    pub fn snapshot(&self, id: Uuid) -> Option<SessionState> {
        self.sessions.read().get(&id).cloned()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.sessions.read().contains_key(&id)
    }

    /// Number of stored sessions, idle ones included until pruned
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }
}
