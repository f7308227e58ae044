//! HTTP client for the Telegram Bot API.

use std::time::Duration;

use reqwest::multipart;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::debug;

use scribe_core::config::ScribeConfig;
use scribe_core::error::{ScribeError, TransportError};
use scribe_core::types::Document;

use crate::update::{Update, UpdatesResponse};

/// Long-poll timeout passed to getUpdates.
const POLL_TIMEOUT_SECS: u64 = 30;
/// Client-side request timeout. Must exceed the poll timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(POLL_TIMEOUT_SECS + 10);

/// A client bound to one bot token.
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(config: &ScribeConfig) -> Result<Self, ScribeError> {
        let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(proxy_url) = &config.proxy_url {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| ScribeError::Config(format!("invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }
        let http = builder
            .build()
            .map_err(|e| ScribeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.telegram_api_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.bot_token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.base_url, self.bot_token, file_path)
    }

    /// Long-poll for new updates.
    ///
    /// Blocks for up to the poll timeout when no updates are pending; the
    /// caller owns the offset and advances it per consumed update.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TransportError> {
        let mut url = format!("{}?timeout={}", self.api_url("getUpdates"), POLL_TIMEOUT_SECS);
        if let Some(offset) = offset {
            url.push_str("&offset=");
            url.push_str(&offset.to_string());
        }

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError(format!("getUpdates request failed: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("getUpdates body read failed: {e}")))?;

        let payload = parse_updates(status, &body)?;
        debug!(count = payload.len(), "Polled updates");
        Ok(payload)
    }

    /// Send a plain text message to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        let body = json!({
            "chat_id": chat_id,
            "text": text,
        });

        let response = self
            .http
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError(format!("sendMessage request failed: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("sendMessage body read failed: {e}")))?;

        check_envelope("sendMessage", status, &body)
    }

    /// Send a document as a file attachment, with its title as the caption.
    pub async fn send_document(
        &self,
        chat_id: i64,
        document: &Document,
    ) -> Result<(), TransportError> {
        let part = multipart::Part::bytes(document.body.clone().into_bytes())
            .file_name(document.filename.clone())
            .mime_str("text/markdown")
            .map_err(|e| TransportError(format!("sendDocument part build failed: {e}")))?;
        let form = multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", document.title.clone())
            .part("document", part);

        let response = self
            .http
            .post(self.api_url("sendDocument"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError(format!("sendDocument request failed: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("sendDocument body read failed: {e}")))?;

        check_envelope("sendDocument", status, &body)
    }

    /// Download a voice note's audio bytes.
    ///
    /// Two round-trips: getFile resolves the file id to a server path, then
    /// the file endpoint serves the bytes.
    pub async fn download_voice(&self, file_id: &str) -> Result<Vec<u8>, TransportError> {
        let body = json!({ "file_id": file_id });
        let response = self
            .http
            .post(self.api_url("getFile"))
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError(format!("getFile request failed: {e}")))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError(format!("getFile body read failed: {e}")))?;
        let file_path = parse_file_path(status, &text)?;

        let response = self
            .http
            .get(self.file_url(&file_path))
            .send()
            .await
            .map_err(|e| TransportError(format!("file download request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(TransportError(format!(
                "file download returned HTTP {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError(format!("file download read failed: {e}")))?;

        debug!(bytes = bytes.len(), "Voice note downloaded");
        Ok(bytes.to_vec())
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Check a Bot API response envelope, surfacing its `description` on failure.
fn check_envelope(method: &str, status: StatusCode, body: &str) -> Result<(), TransportError> {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let ok = parsed
        .get("ok")
        .and_then(|v| v.as_bool())
        .unwrap_or(status.is_success());
    if ok {
        return Ok(());
    }

    let description = parsed
        .get("description")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("HTTP {status}"));
    Err(TransportError(format!("{method} failed: {description}")))
}

fn parse_updates(status: StatusCode, body: &str) -> Result<Vec<Update>, TransportError> {
    if !status.is_success() {
        return Err(TransportError(format!("getUpdates returned HTTP {status}")));
    }
    let payload: UpdatesResponse = serde_json::from_str(body)
        .map_err(|e| TransportError(format!("getUpdates response parse failed: {e}")))?;
    if !payload.ok {
        let description = payload
            .description
            .unwrap_or_else(|| "getUpdates returned ok=false".to_string());
        return Err(TransportError(format!("getUpdates failed: {description}")));
    }
    Ok(payload.result)
}

fn parse_file_path(status: StatusCode, body: &str) -> Result<String, TransportError> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|e| TransportError(format!("getFile response parse failed: {e}")))?;
    let ok = parsed
        .get("ok")
        .and_then(|v| v.as_bool())
        .unwrap_or(status.is_success());
    if !ok {
        let description = parsed
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or("getFile returned ok=false");
        return Err(TransportError(format!("getFile failed: {description}")));
    }
    parsed
        .get("result")
        .and_then(|r| r.get("file_path"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| TransportError("getFile response missing file_path".to_string()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> TelegramClient {
        let config = ScribeConfig {
            bot_token: "token".to_string(),
            openai_api_key: "sk-test".to_string(),
            model: "gpt-4-turbo".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            telegram_api_url: "http://localhost:8081/".to_string(),
            proxy_url: None,
        };
        TelegramClient::new(&config).unwrap()
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let client = test_client();
        assert_eq!(
            client.api_url("sendMessage"),
            "http://localhost:8081/bottoken/sendMessage"
        );
    }

    #[test]
    fn test_file_url_shape() {
        let client = test_client();
        assert_eq!(
            client.file_url("voice/file_7.oga"),
            "http://localhost:8081/file/bottoken/voice/file_7.oga"
        );
    }

    #[test]
    fn test_invalid_proxy_is_a_config_error() {
        let config = ScribeConfig {
            bot_token: "token".to_string(),
            openai_api_key: "sk-test".to_string(),
            model: "gpt-4-turbo".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            telegram_api_url: "https://api.telegram.org".to_string(),
            proxy_url: Some("not a url".to_string()),
        };
        assert!(matches!(
            TelegramClient::new(&config),
            Err(ScribeError::Config(_))
        ));
    }

    #[test]
    fn test_check_envelope_ok() {
        let body = r#"{"ok": true, "result": {"message_id": 9}}"#;
        assert!(check_envelope("sendMessage", StatusCode::OK, body).is_ok());
    }

    #[test]
    fn test_check_envelope_surfaces_description() {
        let body = r#"{"ok": false, "description": "Bad Request: chat not found"}"#;
        let err = check_envelope("sendMessage", StatusCode::BAD_REQUEST, body).unwrap_err();
        assert!(err.to_string().contains("chat not found"));
    }

    #[test]
    fn test_check_envelope_falls_back_to_http_status() {
        let err = check_envelope("sendMessage", StatusCode::BAD_GATEWAY, "").unwrap_err();
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_parse_updates_success() {
        let body = r#"{"ok": true, "result": [{"update_id": 5}]}"#;
        let updates = parse_updates(StatusCode::OK, body).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, Some(5));
    }

    #[test]
    fn test_parse_updates_not_ok() {
        let body = r#"{"ok": false, "description": "Unauthorized"}"#;
        let err = parse_updates(StatusCode::OK, body).unwrap_err();
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[test]
    fn test_parse_updates_garbage_body() {
        assert!(parse_updates(StatusCode::OK, "not json").is_err());
    }

    #[test]
    fn test_parse_file_path_success() {
        let body = r#"{"ok": true, "result": {"file_id": "x", "file_path": "voice/file_7.oga"}}"#;
        let path = parse_file_path(StatusCode::OK, body).unwrap();
        assert_eq!(path, "voice/file_7.oga");
    }

    #[test]
    fn test_parse_file_path_missing_field() {
        let body = r#"{"ok": true, "result": {"file_id": "x"}}"#;
        let err = parse_file_path(StatusCode::OK, body).unwrap_err();
        assert!(err.to_string().contains("file_path"));
    }

    #[test]
    fn test_parse_file_path_not_ok() {
        let body = r#"{"ok": false, "description": "file is too big"}"#;
        let err = parse_file_path(StatusCode::OK, body).unwrap_err();
        assert!(err.to_string().contains("too big"));
    }
}
