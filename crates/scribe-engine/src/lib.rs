//! Turn-taking conversation engine for the brief bot.
//!
//! Implements the command/state protocol: collect a feature idea and answers
//! to model-driven clarifying questions, then, on an explicit trigger,
//! assemble the transcript into a generation request and deliver the
//! resulting Markdown brief.

pub mod assembler;
pub mod engine;
pub mod event;
pub mod notices;
pub mod prompts;

pub use assembler::DocumentAssembler;
pub use engine::{ConversationEngine, Outbound};
pub use event::{Command, EventPayload, InboundEvent};
pub use prompts::PromptConfig;
