//! OpenAI-compatible HTTP client for completions and transcription.
//!
//! One client instance serves both the clarifying-question dialogue and the
//! final brief generation, plus Whisper voice transcription. Status and body
//! parsing live in pure helpers so the error mapping is testable without a
//! live server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scribe_core::config::ScribeConfig;
use scribe_core::error::{GenerationError, ScribeError, TranscriptionError};
use scribe_core::types::ChatMessage;

use crate::{GenerationClient, TranscriptionClient};

/// Request timeout for completion and transcription calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Whisper model used for voice transcription.
const TRANSCRIPTION_MODEL: &str = "whisper-1";
/// Default completion length cap, sized for the generated brief.
const DEFAULT_MAX_TOKENS: u32 = 2000;
/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Client for an OpenAI-compatible API.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiClient {
    /// Build a client from configuration.
    ///
    /// Honors the optional outbound proxy; an unparseable proxy address is a
    /// configuration error.
    pub fn new(config: &ScribeConfig) -> Result<Self, ScribeError> {
        let mut builder = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("scribe/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| ScribeError::Config(format!("invalid PROXY_URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Generation client configured with outbound proxy");
        }

        let http = builder
            .build()
            .map_err(|e| ScribeError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, messages = messages.len(), model = %self.model, "Requesting completion");

        let body = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Unreachable(describe_request_error(&e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::Unreachable(describe_request_error(&e)))?;

        let completion = parse_completion(status, &text)?;
        tracing::debug!(%request_id, chars = completion.len(), "Completion received");
        Ok(completion)
    }
}

#[async_trait]
impl TranscriptionClient for OpenAiClient {
    async fn transcribe(
        &self,
        audio: &[u8],
        filename: &str,
    ) -> Result<String, TranscriptionError> {
        tracing::debug!(bytes = audio.len(), filename, "Requesting transcription");

        let part = multipart::Part::bytes(audio.to_vec()).file_name(filename.to_string());
        let form = multipart::Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .part("file", part);

        let response = self
            .http
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::Service(describe_request_error(&e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TranscriptionError::Service(describe_request_error(&e)))?;

        parse_transcription(status, &text)
    }
}

// ---------------------------------------------------------------------------
// Pure parsing helpers
// ---------------------------------------------------------------------------

/// Map a completion response to text or a `GenerationError`.
fn parse_completion(status: StatusCode, body: &str) -> Result<String, GenerationError> {
    match status {
        StatusCode::TOO_MANY_REQUESTS => return Err(GenerationError::RateLimited),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            return Err(GenerationError::Unauthorized)
        }
        s if s.is_server_error() => {
            return Err(GenerationError::Unreachable(format!("HTTP {}", s)))
        }
        s if !s.is_success() => {
            return Err(GenerationError::Malformed(format!(
                "HTTP {}: {}",
                s,
                truncate(body, 200)
            )))
        }
        _ => {}
    }

    let parsed: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::Malformed(format!("invalid response body: {}", e)))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::Malformed("empty completion".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Map a transcription response to text or a `TranscriptionError`.
fn parse_transcription(status: StatusCode, body: &str) -> Result<String, TranscriptionError> {
    if status == StatusCode::BAD_REQUEST {
        return Err(TranscriptionError::UnreadableAudio);
    }
    if !status.is_success() {
        return Err(TranscriptionError::Service(format!(
            "HTTP {}: {}",
            status,
            truncate(body, 200)
        )));
    }

    let parsed: TranscriptionResponse = serde_json::from_str(body)
        .map_err(|e| TranscriptionError::Service(format!("invalid response body: {}", e)))?;

    let text = parsed.text.trim().to_string();
    if text.is_empty() {
        return Err(TranscriptionError::UnreadableAudio);
    }
    Ok(text)
}

fn describe_request_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timeout".to_string()
    } else if err.is_connect() {
        "connection error".to_string()
    } else {
        err.to_string()
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// =============================================================================
// Tests
// =============================================================================
