use thiserror::Error;

/// Failure delivering a message through the chat transport.
///
/// Deliveries are not retried: the caller logs the error and drops the
/// outbound message.
#[derive(Debug, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// Failure converting a voice message to text.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// The audio payload could not be decoded or understood.
    #[error("audio could not be transcribed")]
    UnreadableAudio,
    /// The transcription service itself failed.
    #[error("transcription service error: {0}")]
    Service(String),
}

/// Failure obtaining a completion from the text-generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation service rate limited the request")]
    RateLimited,
    #[error("generation service rejected the credential")]
    Unauthorized,
    #[error("generation service unreachable: {0}")]
    Unreachable(String),
    #[error("generation service returned a malformed response: {0}")]
    Malformed(String),
}

/// Top-level error type for the Scribe system.
///
/// Subsystem errors convert into this umbrella via `#[from]` so the `?`
/// operator works across crate boundaries. Only `Config` is process-fatal;
/// everything else is handled per event.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScribeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for Scribe operations.
pub type Result<T> = std::result::Result<T, ScribeError>;
