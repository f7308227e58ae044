//! The feature-brief bot: wires the Telegram transport to the conversation
//! engine.
//!
//! The poll loop never awaits a user's turn inline. Each update is handled
//! on its own task, so one user's long generation call cannot delay another
//! user's reply; same-user overlap is resolved by the engine itself.

use std::sync::Arc;
use std::time::Duration;

use scribe_core::config::ScribeConfig;
use scribe_core::error::Result;
use scribe_engine::{notices, Command, ConversationEngine, InboundEvent, Outbound, PromptConfig};
use scribe_llm::client::OpenAiClient;
use scribe_llm::{GenerationClient, TranscriptionClient};
use scribe_session::SessionStore;
use scribe_telegram::update::{extract_inbound, next_offset, InboundKind};
use scribe_telegram::TelegramClient;

/// Backoff between failed poll attempts.
const ERROR_BACKOFF: Duration = Duration::from_secs(3);
/// How often stale sessions are evicted.
const EVICTION_INTERVAL: Duration = Duration::from_secs(60 * 60);
/// Sessions idle longer than this are evicted.
const SESSION_MAX_AGE_HOURS: i64 = 24;

/// Run the brief bot until the process is stopped.
pub async fn run(config: ScribeConfig) -> Result<()> {
    let telegram = Arc::new(TelegramClient::new(&config)?);
    let openai = Arc::new(OpenAiClient::new(&config)?);
    let store = Arc::new(SessionStore::new());
    let prompts = PromptConfig::from_env();

    let engine = Arc::new(ConversationEngine::new(
        Arc::clone(&store),
        Arc::clone(&openai) as Arc<dyn GenerationClient>,
        Arc::clone(&openai) as Arc<dyn TranscriptionClient>,
        prompts,
    ));

    // Background eviction of abandoned sessions.
    let eviction_store = Arc::clone(&store);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(EVICTION_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            eviction_store.evict_stale(chrono::Duration::hours(SESSION_MAX_AGE_HOURS));
        }
    });

    tracing::info!("Brief bot started");

    let mut offset: Option<i64> = None;
    loop {
        let updates = match telegram.get_updates(offset).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "Poll failed");
                tokio::time::sleep(ERROR_BACKOFF).await;
                continue;
            }
        };

        for update in updates {
            offset = next_offset(offset, update.update_id);
            let Some(inbound) = extract_inbound(&update) else {
                continue;
            };

            let engine = Arc::clone(&engine);
            let telegram = Arc::clone(&telegram);
            tokio::spawn(async move {
                handle_inbound(&engine, &telegram, inbound.chat_id, inbound.kind).await;
            });
        }
    }
}

async fn handle_inbound(
    engine: &ConversationEngine,
    telegram: &TelegramClient,
    chat_id: i64,
    kind: InboundKind,
) {
    let event = match kind {
        InboundKind::Text(text) => match Command::parse(&text) {
            Some(command) => InboundEvent::command(chat_id, command),
            None if text.trim_start().starts_with('/') => {
                // Unknown command, not free text. Say nothing.
                tracing::debug!(chat_id, "Ignoring unrecognized command");
                return;
            }
            None => InboundEvent::text(chat_id, text),
        },
        InboundKind::Voice(file_id) => match telegram.download_voice(&file_id).await {
            Ok(audio) => InboundEvent::voice(chat_id, audio),
            Err(e) => {
                tracing::warn!(chat_id, error = %e, "Voice download failed");
                deliver(telegram, chat_id, Outbound::Text(notices::VOICE_FAILED.to_string()))
                    .await;
                return;
            }
        },
    };

    match engine.handle_event(event).await {
        Ok(outbounds) => {
            for outbound in outbounds {
                deliver(telegram, chat_id, outbound).await;
            }
        }
        Err(e) => {
            tracing::error!(chat_id, error = %e, "Event handling failed");
        }
    }
}

/// Deliver one outbound message, logging delivery failures without retrying.
async fn deliver(telegram: &TelegramClient, chat_id: i64, outbound: Outbound) {
    let result = match &outbound {
        Outbound::Text(text) => telegram.send_message(chat_id, text).await,
        Outbound::File(document) => telegram.send_document(chat_id, document).await,
    };
    if let Err(e) = result {
        tracing::warn!(chat_id, error = %e, "Delivery failed");
    }
}
