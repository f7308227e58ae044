//! Hosted language-model clients: text generation and speech-to-text.
//!
//! Both services are reached through trait seams so the engine can be tested
//! with fakes; the real implementation speaks the OpenAI-compatible HTTP API.

use async_trait::async_trait;

use scribe_core::error::{GenerationError, TranscriptionError};
use scribe_core::types::ChatMessage;

pub mod client;

pub use client::OpenAiClient;

/// External text-completion service.
///
/// Given a role-tagged message list, returns a single text completion. No
/// retries happen at this seam; callers decide what a failure means for
/// their state.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GenerationError>;
}

/// External speech-to-text service.
///
/// `filename` carries the container hint (e.g. `voice.ogg`) the service uses
/// to decode the audio bytes.
#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    async fn transcribe(&self, audio: &[u8], filename: &str)
        -> Result<String, TranscriptionError>;
}
