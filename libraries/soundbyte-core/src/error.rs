/// Core error types for SoundByte
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using `SoundByteError`
pub type Result<T> = std::result::Result<T, SoundByteError>;

/// Core error type for SoundByte
#[derive(Error, Debug)]
pub enum SoundByteError {
    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl SoundByteError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Segoe MDL2 code points used as icons next to user-facing messages.
pub mod glyph {
    pub const ERROR: &str = "\u{E783}";
    pub const WARNING: &str = "\u{E7BA}";
    pub const ACCOUNT: &str = "\u{E77B}";
    pub const INFO: &str = "\u{E946}";
    pub const PLAY: &str = "\u{E768}";
    pub const PAUSE: &str = "\u{E769}";
}

/// A failure (or informational notice) ready to be shown to the user.
///
/// Every error that crosses into UI code is reduced to this triple; the UI
/// renders it as a dialog or inline banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMessage {
    pub title: String,
    pub description: String,
    pub glyph: String,
}

impl UserMessage {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        glyph: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            glyph: glyph.into(),
        }
    }
}

impl std::fmt::Display for UserMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}
