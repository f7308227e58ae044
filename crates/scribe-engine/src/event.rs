//! Transport-neutral inbound events and command parsing.

/// A recognized bot command, mapped 1:1 to an engine trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    NewTask,
    Generate,
    Cancel,
    Help,
}

impl Command {
    /// Parse a message as a slash command.
    ///
    /// Accepts the `@botname` suffix Telegram appends in group chats and
    /// ignores anything after the first whitespace. Returns `None` for
    /// non-commands and unrecognized commands alike.
    pub fn parse(text: &str) -> Option<Command> {
        let token = text.trim().split_whitespace().next()?;
        if !token.starts_with('/') {
            return None;
        }
        let name = token.split('@').next().unwrap_or(token);
        match name {
            "/start" => Some(Command::Start),
            "/new" | "/new_task" => Some(Command::NewTask),
            "/generate" => Some(Command::Generate),
            "/cancel" => Some(Command::Cancel),
            "/help" => Some(Command::Help),
            _ => None,
        }
    }
}

/// The payload of one inbound user event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// A recognized command.
    Command(Command),
    /// Free text (already transcribed if it arrived as voice upstream).
    Text(String),
    /// Raw voice audio, to be transcribed before entering the protocol.
    Voice(Vec<u8>),
}

/// One inbound event from the transport, keyed by its user identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub user_id: i64,
    pub payload: EventPayload,
}

impl InboundEvent {
    pub fn command(user_id: i64, command: Command) -> Self {
        Self {
            user_id,
            payload: EventPayload::Command(command),
        }
    }

    pub fn text(user_id: i64, text: impl Into<String>) -> Self {
        Self {
            user_id,
            payload: EventPayload::Text(text.into()),
        }
    }

    pub fn voice(user_id: i64, audio: Vec<u8>) -> Self {
        Self {
            user_id,
            payload: EventPayload::Voice(audio),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
