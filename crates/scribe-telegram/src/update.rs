//! Update payload parsing for the Bot API.

use serde::Deserialize;

/// The getUpdates response envelope.
#[derive(Debug, Deserialize)]
pub struct UpdatesResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Vec<Update>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One update from the Bot API.
#[derive(Debug, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<Message>,
}

/// A Telegram message payload, reduced to the fields the bots read.
#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice: Option<Voice>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
}

/// Voice note metadata carried by a message.
#[derive(Debug, Deserialize)]
pub struct Voice {
    pub file_id: String,
    #[serde(default)]
    pub duration: Option<i64>,
}

/// What an update contained, once reduced to something a bot can act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundKind {
    Text(String),
    /// A voice note, identified by its Bot API file id. The audio itself is
    /// downloaded separately.
    Voice(String),
}

/// A usable inbound message extracted from an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub chat_id: i64,
    pub kind: InboundKind,
}

/// Extract a text or voice message from an update.
///
/// Messages from other bots, updates without a message, and messages that
/// carry neither text nor voice all yield `None`.
pub fn extract_inbound(update: &Update) -> Option<Inbound> {
    let message = update.message.as_ref()?;

    if message.from.as_ref().is_some_and(|from| from.is_bot) {
        return None;
    }

    let kind = if let Some(text) = message.text.as_ref().filter(|t| !t.is_empty()) {
        InboundKind::Text(text.clone())
    } else if let Some(voice) = message.voice.as_ref() {
        InboundKind::Voice(voice.file_id.clone())
    } else {
        return None;
    };

    Some(Inbound {
        chat_id: message.chat.id,
        kind,
    })
}

/// Advance the poll offset past a consumed update.
///
/// The offset never moves backwards, so a reordered batch cannot cause an
/// update to be re-fetched.
pub fn next_offset(current: Option<i64>, update_id: Option<i64>) -> Option<i64> {
    let Some(update_id) = update_id else {
        return current;
    };
    let next = update_id.saturating_add(1);
    Some(current.map_or(next, |current_value| current_value.max(next)))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_message() {
        let json = r#"{
            "update_id": 42,
            "message": {
                "text": "hello",
                "chat": { "id": 123 },
                "from": { "id": 456, "is_bot": false }
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let inbound = extract_inbound(&update).unwrap();
        assert_eq!(inbound.chat_id, 123);
        assert_eq!(inbound.kind, InboundKind::Text("hello".to_string()));
    }

    #[test]
    fn test_extract_voice_message() {
        let json = r#"{
            "update_id": 43,
            "message": {
                "chat": { "id": 123 },
                "from": { "id": 456, "is_bot": false },
                "voice": { "file_id": "AwACAgI", "duration": 4 }
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let inbound = extract_inbound(&update).unwrap();
        assert_eq!(inbound.kind, InboundKind::Voice("AwACAgI".to_string()));
    }

    #[test]
    fn test_text_takes_precedence_over_voice() {
        let json = r#"{
            "message": {
                "text": "typed",
                "chat": { "id": 1 },
                "voice": { "file_id": "AwACAgI" }
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let inbound = extract_inbound(&update).unwrap();
        assert_eq!(inbound.kind, InboundKind::Text("typed".to_string()));
    }

    #[test]
    fn test_extract_skips_bot_senders() {
        let json = r#"{
            "message": {
                "text": "ignore me",
                "chat": { "id": 123 },
                "from": { "id": 456, "is_bot": true }
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert!(extract_inbound(&update).is_none());
    }

    #[test]
    fn test_extract_skips_unusable_updates() {
        let empty: Update = serde_json::from_str(r#"{"update_id": 7}"#).unwrap();
        assert!(extract_inbound(&empty).is_none());

        let sticker: Update = serde_json::from_str(
            r#"{"message": {"chat": {"id": 1}, "from": {"id": 2, "is_bot": false}}}"#,
        )
        .unwrap();
        assert!(extract_inbound(&sticker).is_none());

        let blank_text: Update =
            serde_json::from_str(r#"{"message": {"chat": {"id": 1}, "text": ""}}"#).unwrap();
        assert!(extract_inbound(&blank_text).is_none());
    }

    #[test]
    fn test_next_offset_is_monotonic() {
        let mut offset = None;
        offset = next_offset(offset, Some(10));
        assert_eq!(offset, Some(11));
        offset = next_offset(offset, Some(9));
        assert_eq!(offset, Some(11));
        offset = next_offset(offset, Some(15));
        assert_eq!(offset, Some(16));
    }

    #[test]
    fn test_next_offset_ignores_missing_update_id() {
        assert_eq!(next_offset(None, None), None);
        assert_eq!(next_offset(Some(7), None), Some(7));
    }

    #[test]
    fn test_updates_response_envelope() {
        let json = r#"{"ok": true, "result": [{"update_id": 1}, {"update_id": 2}]}"#;
        let response: UpdatesResponse = serde_json::from_str(json).unwrap();
        assert!(response.ok);
        assert_eq!(response.result.len(), 2);

        let json = r#"{"ok": false, "description": "Unauthorized"}"#;
        let response: UpdatesResponse = serde_json::from_str(json).unwrap();
        assert!(!response.ok);
        assert!(response.result.is_empty());
        assert_eq!(response.description.as_deref(), Some("Unauthorized"));
    }
}
