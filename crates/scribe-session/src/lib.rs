//! Per-user conversation sessions for the brief bot.
//!
//! A session tracks one user's transcript and its position in the
//! collect-then-generate protocol. The store owns all sessions; the engine
//! borrows exactly one for the duration of one inbound event.

pub mod session;
pub mod state;
pub mod store;

pub use session::Session;
pub use state::SessionState;
pub use store::SessionStore;
