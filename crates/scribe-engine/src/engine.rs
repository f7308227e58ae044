//! The conversation engine: central coordinator for the trigger/state
//! protocol.
//!
//! Each inbound event produces exactly one synchronous decision (one or more
//! outbound messages) and returns; the engine never blocks the transport.
//! Per-user serialization comes from the session's async mutex: the lock is
//! held for the full handling of one event, and contention from a second
//! event for the same user is answered with a wait notice instead of
//! queueing.

use std::sync::Arc;

use chrono::Local;

use scribe_core::error::{Result, ScribeError};
use scribe_core::types::{ChatMessage, Document, Role, Turn};
use scribe_llm::{GenerationClient, TranscriptionClient};
use scribe_session::{Session, SessionState, SessionStore};

use crate::assembler::DocumentAssembler;
use crate::event::{Command, EventPayload, InboundEvent};
use crate::notices;
use crate::prompts::PromptConfig;

/// Filename hint passed to the transcription service for Telegram voice
/// notes (OGG/Opus).
const VOICE_FILENAME: &str = "voice.ogg";

/// An outbound decision for the transport to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Plain text message.
    Text(String),
    /// A generated document to send as a file.
    File(Document),
}

impl Outbound {
    fn text(text: impl Into<String>) -> Self {
        Outbound::Text(text.into())
    }
}

/// Owns the turn-taking protocol over borrowed sessions.
pub struct ConversationEngine {
    store: Arc<SessionStore>,
    generation: Arc<dyn GenerationClient>,
    transcription: Arc<dyn TranscriptionClient>,
    assembler: DocumentAssembler,
    clarify_prompt: String,
}

impl ConversationEngine {
    pub fn new(
        store: Arc<SessionStore>,
        generation: Arc<dyn GenerationClient>,
        transcription: Arc<dyn TranscriptionClient>,
        prompts: PromptConfig,
    ) -> Self {
        Self {
            store,
            generation,
            transcription,
            assembler: DocumentAssembler::new(prompts.brief_system),
            clarify_prompt: prompts.clarify_system,
        }
    }

    /// Handle one inbound event and return the outbound messages to deliver.
    ///
    /// Collaborator failures (generation, transcription) become user notices
    /// here; an `Err` from this method means an internal fault, not a user
    /// mistake.
    pub async fn handle_event(&self, event: InboundEvent) -> Result<Vec<Outbound>> {
        let slot = self.store.get_or_create(event.user_id);
        let mut session = match slot.try_lock() {
            Ok(guard) => guard,
            // Another event for this user is in flight; reject, don't queue.
            Err(_) => return Ok(vec![Outbound::text(notices::PLEASE_WAIT)]),
        };

        match event.payload {
            EventPayload::Command(command) => self.handle_command(&mut session, command).await,
            EventPayload::Text(text) => self.handle_text(&mut session, &text).await,
            EventPayload::Voice(audio) => {
                match self.transcription.transcribe(&audio, VOICE_FILENAME).await {
                    Ok(text) => {
                        tracing::debug!(
                            user_id = event.user_id,
                            chars = text.len(),
                            "Voice message transcribed"
                        );
                        self.handle_text(&mut session, &text).await
                    }
                    Err(e) => {
                        tracing::warn!(user_id = event.user_id, error = %e, "Transcription failed");
                        Ok(vec![Outbound::text(notices::VOICE_FAILED)])
                    }
                }
            }
        }
    }

    async fn handle_command(
        &self,
        session: &mut Session,
        command: Command,
    ) -> Result<Vec<Outbound>> {
        match command {
            Command::Start | Command::NewTask => match session.state() {
                SessionState::Idle => {
                    session.reset();
                    session.transition(SessionState::Collecting)?;
                    Ok(vec![Outbound::text(notices::WELCOME)])
                }
                SessionState::Generating => Ok(vec![Outbound::text(notices::PLEASE_WAIT)]),
                _ => Ok(vec![Outbound::text(notices::ALREADY_IN_PROGRESS)]),
            },
            Command::Generate => self.handle_generate(session).await,
            Command::Cancel => {
                if session.state() == SessionState::Idle {
                    Ok(vec![Outbound::text(notices::NOTHING_TO_CANCEL)])
                } else {
                    session.reset();
                    Ok(vec![Outbound::text(notices::CANCELLED)])
                }
            }
            Command::Help => Ok(vec![Outbound::text(notices::HELP)]),
        }
    }

    async fn handle_text(&self, session: &mut Session, text: &str) -> Result<Vec<Outbound>> {
        match session.state() {
            SessionState::Generating => Ok(vec![Outbound::text(notices::PLEASE_WAIT)]),
            SessionState::Idle => {
                // Implicit start: first message opens the session.
                session.transition(SessionState::Collecting)?;
                self.collect_exchange(session, text).await
            }
            SessionState::Collecting | SessionState::ReadyToGenerate => {
                self.collect_exchange(session, text).await
            }
        }
    }

    /// One collecting exchange: forward the transcript plus the new message,
    /// and append the user/assistant pair only after the completion
    /// succeeds, so a failed call leaves the transcript untouched.
    async fn collect_exchange(&self, session: &mut Session, text: &str) -> Result<Vec<Outbound>> {
        let mut messages = Vec::with_capacity(session.turns().len() + 2);
        messages.push(ChatMessage::system(&self.clarify_prompt));
        messages.extend(session.turns().iter().map(ChatMessage::from));
        messages.push(ChatMessage {
            role: Role::User,
            content: text.to_string(),
        });

        match self.generation.complete(&messages).await {
            Ok(reply) => {
                session.push_turn(Turn::user(text));
                session.push_turn(Turn::assistant(reply.clone()));
                Ok(vec![Outbound::Text(reply)])
            }
            Err(e) => {
                tracing::warn!(user_id = session.user_id(), error = %e, "Clarifying exchange failed");
                Ok(vec![Outbound::text(notices::GENERATION_RETRY)])
            }
        }
    }

    async fn handle_generate(&self, session: &mut Session) -> Result<Vec<Outbound>> {
        match session.state() {
            SessionState::Generating => return Ok(vec![Outbound::text(notices::PLEASE_WAIT)]),
            SessionState::Collecting | SessionState::ReadyToGenerate
                if !session.turns().is_empty() => {}
            _ => return Ok(vec![Outbound::text(notices::NOTHING_TO_GENERATE)]),
        }

        // Freeze the transcript, then hand off to the assembler.
        if session.state() == SessionState::Collecting {
            session.transition(SessionState::ReadyToGenerate)?;
        }
        session.transition(SessionState::Generating)?;

        let request = self.assembler.build_request(session.turns());
        let rendered = match self.generation.complete(&request).await {
            Ok(raw) => self.assembler.render(&raw, Local::now()),
            Err(e) => Err(e),
        };

        match rendered {
            Ok(document) => {
                tracing::info!(
                    user_id = session.user_id(),
                    filename = %document.filename,
                    "Brief generated"
                );
                session.reset();
                Ok(vec![
                    Outbound::text(notices::BRIEF_READY),
                    Outbound::File(document),
                ])
            }
            Err(e) => {
                tracing::warn!(user_id = session.user_id(), error = %e, "Brief generation failed");
                // Back to the last stable state, transcript intact.
                session.transition(SessionState::Collecting)?;
                Ok(vec![Outbound::text(notices::GENERATION_RETRY)])
            }
        }
    }
}

impl std::fmt::Debug for ConversationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationEngine")
            .field("sessions", &self.store.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
