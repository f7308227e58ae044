//! The server-time bot: replies to any text message with the current time.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};

use scribe_core::config::ScribeConfig;
use scribe_core::error::Result;
use scribe_telegram::update::{extract_inbound, next_offset, InboundKind};
use scribe_telegram::TelegramClient;

const ERROR_BACKOFF: Duration = Duration::from_secs(3);

const WELCOME: &str = "Hi! I show the current server time. Send me any message and I will \
reply with the time.";

fn format_time_reply(now: DateTime<Local>) -> String {
    format!(
        "\u{1F550} Current server time: {}",
        now.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Run the time bot until the process is stopped.
pub async fn run(config: ScribeConfig) -> Result<()> {
    let telegram = Arc::new(TelegramClient::new(&config)?);

    tracing::info!("Time bot started");

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

            let reply = match &inbound.kind {
                InboundKind::Text(text) if text.trim() == "/start" => WELCOME.to_string(),
                // Other commands are not part of this bot's vocabulary.
                InboundKind::Text(text) if text.trim_start().starts_with('/') => continue,
                InboundKind::Text(_) => format_time_reply(Local::now()),
                InboundKind::Voice(_) => continue,
            };

            if let Err(e) = telegram.send_message(inbound.chat_id, &reply).await {
                tracing::warn!(chat_id = inbound.chat_id, error = %e, "Delivery failed");
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_time_reply() {
        let now = Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(
            format_time_reply(now),
            "\u{1F550} Current server time: 2025-03-14 09:26:53"
        );
    }

    #[test]
    fn test_format_time_reply_zero_pads() {
        let now = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert!(format_time_reply(now).ends_with("2025-01-02 03:04:05"));
    }
}
