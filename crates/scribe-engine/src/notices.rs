//! Fixed user-facing texts for protocol notices.

pub const WELCOME: &str = "Hi! Describe the feature you have in mind. You can type or send a \
voice message. I will ask clarifying questions; when you feel I have enough, send /generate to \
receive your brief.";

pub const ALREADY_IN_PROGRESS: &str =
    "A brief is already in progress. Keep answering, send /generate to finish, or /cancel to \
start over.";

pub const NOTHING_TO_GENERATE: &str =
    "There is nothing to generate yet. Tell me about your feature idea first.";

pub const PLEASE_WAIT: &str = "Still working on your previous message, please wait a moment.";

pub const CANCELLED: &str = "Cancelled. Send /start whenever you want to begin a new brief.";

pub const NOTHING_TO_CANCEL: &str = "There is nothing to cancel.";

pub const GENERATION_RETRY: &str =
    "The writing service is unavailable right now. Please send that again in a moment.";

pub const VOICE_FAILED: &str =
    "I could not understand that voice message. Please type it instead.";

pub const BRIEF_READY: &str = "Here is your brief.";

pub const HELP: &str = "I turn a short conversation into a Markdown feature brief.\n\n\
/start - begin a new brief\n\
/new - same as /start\n\
/generate - write the brief from what we discussed\n\
/cancel - discard the current conversation\n\
/help - show this message";
