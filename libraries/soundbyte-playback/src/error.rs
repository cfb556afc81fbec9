//! Error types for playback management

use soundbyte_client::ClientError;
use soundbyte_core::{glyph, UserMessage};
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Nothing was given to play
    #[error("There are no tracks in this list to play")]
    EmptyTrackList,

    /// Every track was skipped while building the queue
    #[error("None of the tracks in this list can be streamed")]
    NoPlayableTracks,

    /// The starting track never appeared in the engine's queue
    #[error("Could not find track {track_id} in the queue after {attempts} attempts")]
    SeekTimedOut { track_id: String, attempts: u32 },

    /// Media engine error
    #[error("Media engine error: {0}")]
    Engine(String),

    /// API error while preparing playback
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl PlaybackError {
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Reduce the error to what the user should see.
    pub fn user_message(&self) -> UserMessage {
        match self {
            PlaybackError::Client(e) => e.user_message(),
            other => UserMessage::new("Could not play", other.to_string(), glyph::ERROR),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
