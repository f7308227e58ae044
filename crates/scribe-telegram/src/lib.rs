//! Telegram Bot API transport.
//!
//! Long-polling `getUpdates` for inbound traffic, plus the outbound methods
//! the bots need (`sendMessage`, `sendDocument`) and voice-note download via
//! `getFile`. Everything above this crate works with transport-neutral
//! events; everything Telegram-specific stays here.

pub mod client;
pub mod update;

pub use client::TelegramClient;
pub use update::{Inbound, InboundKind, Update};
