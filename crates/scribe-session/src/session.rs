//! The per-user session entity.

use chrono::{DateTime, Utc};

use scribe_core::error::{Result, ScribeError};
use scribe_core::types::Turn;

use crate::state::SessionState;

/// One user's conversational state across messages.
///
/// The transcript is append-only; the only other mutation is a wholesale
/// reset back to `Idle`. State changes go through [`Session::transition`] so
/// legality is checked in one place.
#[derive(Debug, Clone)]
pub struct Session {
    user_id: i64,
    state: SessionState,
    turns: Vec<Turn>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh `Idle` session for a user.
    pub fn new(user_id: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            state: SessionState::Idle,
            turns: Vec::new(),
            created_at: now,
            last_activity_at: now,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Read-only view of the transcript, in conversation order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    /// Append one turn to the transcript.
    pub fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.touch();
    }

    /// Attempt to move the session to `target`.
    ///
    /// Returns `ScribeError::Protocol` if the transition is not permitted
    /// from the current state; the session is left unchanged in that case.
    pub fn transition(&mut self, target: SessionState) -> Result<()> {
        if self.state.can_transition_to(&target) {
            tracing::debug!(user_id = self.user_id, "Session state: {} -> {}", self.state, target);
            self.state = target;
            self.touch();
            Ok(())
        } else {
            Err(ScribeError::Protocol(format!(
                "invalid session transition: {} -> {}",
                self.state, target
            )))
        }
    }

    /// Discard the transcript and return to `Idle`, starting a new cycle.
    ///
    /// Valid from any state (used for cancel and for post-delivery teardown),
    /// so it bypasses the forward-only transition table.
    pub fn reset(&mut self) {
        tracing::debug!(user_id = self.user_id, from = %self.state, "Session reset to Idle");
        self.state = SessionState::Idle;
        self.turns.clear();
        self.touch();
    }

    fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }
}

// =============================================================================
// Tests
// =============================================================================
