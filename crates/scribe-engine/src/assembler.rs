//! Builds the one-shot generation request from a frozen transcript and
//! formats the result for delivery.

use chrono::{DateTime, Local};

use scribe_core::error::GenerationError;
use scribe_core::types::{ChatMessage, Document, Turn};

/// Turns a completed session's transcript into a generation request, and the
/// generation result into a deliverable artifact.
pub struct DocumentAssembler {
    system_prompt: String,
}

impl DocumentAssembler {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    /// Prepend the fixed system instruction to the transcript.
    ///
    /// For N turns in, the request has exactly N+1 messages, in original
    /// order. The input is not mutated.
    pub fn build_request(&self, turns: &[Turn]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(ChatMessage::system(&self.system_prompt));
        messages.extend(turns.iter().map(ChatMessage::from));
        messages
    }

    /// Wrap raw model output into a titled artifact.
    ///
    /// The filename and title derive from the generation timestamp since the
    /// output carries no guaranteed structure. Empty output is surfaced as a
    /// failure rather than delivered as a malformed artifact.
    pub fn render(
        &self,
        generated_text: &str,
        now: DateTime<Local>,
    ) -> Result<Document, GenerationError> {
        let body = generated_text.trim();
        if body.is_empty() {
            return Err(GenerationError::Malformed(
                "empty document body".to_string(),
            ));
        }

        Ok(Document {
            title: format!("Feature Brief {}", now.format("%Y-%m-%d %H:%M")),
            filename: format!("brief-{}.md", now.format("%Y%m%d-%H%M%S")),
            body: body.to_string(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
