//! In-memory session store keyed by transport user id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use tokio::sync::Mutex as AsyncMutex;

use crate::session::Session;

/// Owns all active sessions.
///
/// The outer std `Mutex` guards only the map and is never held across an
/// await point. Each session sits behind its own `tokio::sync::Mutex`: the
/// engine holds that lock for the full handling of one inbound event
/// (including suspension on external calls), which serializes events per
/// user without any lock shared across users.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, Arc<AsyncMutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Return the user's session, creating a fresh `Idle` one on demand.
    pub fn get_or_create(&self, user_id: i64) -> Arc<AsyncMutex<Session>> {
        let mut sessions = self.sessions.lock().expect("session map lock poisoned");
        Arc::clone(
            sessions
                .entry(user_id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(Session::new(user_id)))),
        )
    }

    /// Discard the user's session entirely.
    ///
    /// The next `get_or_create` yields a new `Idle` session. A handler still
    /// holding the old session's `Arc` keeps a detached copy; that is fine
    /// because the map entry is gone and nothing routes new events to it.
    pub fn reset(&self, user_id: i64) {
        let mut sessions = self.sessions.lock().expect("session map lock poisoned");
        if sessions.remove(&user_id).is_some() {
            tracing::debug!(user_id, "Session removed from store");
        }
    }

    pub fn exists(&self, user_id: i64) -> bool {
        self.sessions
            .lock()
            .expect("session map lock poisoned")
            .contains_key(&user_id)
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .expect("session map lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop sessions with no activity for longer than `max_age`.
    ///
    /// A session whose lock is currently held (an event is in flight) is
    /// never evicted. Returns the number of sessions removed.
    pub fn evict_stale(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut sessions = self.sessions.lock().expect("session map lock poisoned");
        let before = sessions.len();
        sessions.retain(|_, slot| match slot.try_lock() {
            Ok(session) => session.last_activity_at() >= cutoff,
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, "Stale sessions evicted");
        }
        evicted
    }
}

// =============================================================================
// Tests
// =============================================================================
