//! Prompt configuration for the two generation call sites.
//!
//! The policy for clarifying questions (what to ask, when to acknowledge)
//! lives entirely in the prompt text, not in code, so it can be tuned
//! without touching the engine. Defaults are built in; a TOML file can
//! override either prompt.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use scribe_core::error::{Result, ScribeError};

/// System prompt for the clarifying-question dialogue.
pub const DEFAULT_CLARIFY_PROMPT: &str = "You are a product assistant collecting requirements \
for a feature brief. The user describes a feature idea. Ask one short, focused clarifying \
question at a time, or briefly acknowledge an answer that needs no follow-up. Do not write the \
brief yet; the user will explicitly ask for it when ready.";

/// System prompt for the final brief generation.
pub const DEFAULT_BRIEF_PROMPT: &str = "You are an expert at writing product requirement \
documents. From the following conversation between a user and an assistant, write a complete \
feature brief in Markdown with these sections: Summary, Problem, Proposed Solution, User \
Stories, Acceptance Criteria, Open Questions. Base every statement on the conversation; mark \
anything uncertain as an open question. Output only the Markdown document.";

/// The two system prompts the engine hands to the generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Used for every exchange while collecting answers.
    pub clarify_system: String,
    /// Used once, for the brief-generation request.
    pub brief_system: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            clarify_system: DEFAULT_CLARIFY_PROMPT.to_string(),
            brief_system: DEFAULT_BRIEF_PROMPT.to_string(),
        }
    }
}

impl PromptConfig {
    /// Load prompt overrides from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PromptConfig =
            toml::from_str(&content).map_err(|e| ScribeError::Config(e.to_string()))?;
        info!(path = %path.display(), "Prompt configuration loaded");
        Ok(config)
    }

    /// Load overrides, falling back to the built-in prompts on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load prompts, using defaults");
                Self::default()
            }
        }
    }

    /// Resolve prompts from the `SCRIBE_PROMPTS` environment variable, if set.
    pub fn from_env() -> Self {
        match std::env::var("SCRIBE_PROMPTS") {
            Ok(path) => Self::load_or_default(Path::new(&path)),
            Err(_) => Self::default(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_default_prompts_are_nonempty() {
        let config = PromptConfig::default();
        assert!(!config.clarify_system.is_empty());
        assert!(!config.brief_system.is_empty());
        assert_ne!(config.clarify_system, config.brief_system);
    }

    #[test]
    fn test_load_full_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "clarify_system = \"ask things\"\nbrief_system = \"write things\""
        )
        .unwrap();

        let config = PromptConfig::load(file.path()).unwrap();
        assert_eq!(config.clarify_system, "ask things");
        assert_eq!(config.brief_system, "write things");
    }

    #[test]
    fn test_load_partial_override_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "clarify_system = \"ask things\"").unwrap();

        let config = PromptConfig::load(file.path()).unwrap();
        assert_eq!(config.clarify_system, "ask things");
        assert_eq!(config.brief_system, DEFAULT_BRIEF_PROMPT);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = PromptConfig::load(Path::new("/nonexistent/prompts.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_falls_back_on_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "clarify_system = [[[").unwrap();

        let config = PromptConfig::load_or_default(file.path());
        assert_eq!(config.clarify_system, DEFAULT_CLARIFY_PROMPT);
    }
}
