//! Shared foundation for the Scribe bots.
//!
//! Defines the conversation data model (roles, turns, documents), the error
//! taxonomy used across crates, and environment-based configuration.

pub mod config;
pub mod error;
pub mod types;

pub use config::ScribeConfig;
pub use error::{
    GenerationError, Result, ScribeError, TranscriptionError, TransportError,
};
pub use types::{ChatMessage, Document, Role, Turn};
