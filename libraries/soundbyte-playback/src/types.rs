//! Core types for playback management

use serde::{Deserialize, Serialize};
use soundbyte_core::{glyph, Track};
use std::time::Duration;

/// Session token that forces a rebuild even when it repeats.
pub const END_OF_LIST: &str = "eol";

/// Playback state as reported by the media engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Nothing loaded, or playback ran off the end of the queue
    #[default]
    None,

    /// Source is being opened
    Opening,

    /// Waiting for enough data to play
    Buffering,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

impl EngineState {
    /// Whether the UI should show its loading indicator.
    pub fn is_loading(self) -> bool {
        matches!(self, EngineState::Opening | EngineState::Buffering)
    }

    /// Glyph for the play/pause button: the action a press would take.
    pub fn play_pause_glyph(self) -> &'static str {
        match self {
            EngineState::Playing => glyph::PAUSE,
            _ => glyph::PLAY,
        }
    }
}

/// One entry handed to the media engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Correlates the engine's current item back to a track (the track id)
    pub tag: String,

    /// Streamable source URL
    pub source_url: String,

    pub title: String,

    pub artist: String,

    pub thumbnail: Option<String>,

    pub duration: Duration,
}

impl MediaItem {
    pub fn for_track(track: &Track, source_url: impl Into<String>) -> Self {
        Self {
            tag: track.id.clone(),
            source_url: source_url.into(),
            title: track.title.clone(),
            artist: track.artist().to_string(),
            thumbnail: track.artwork_or_avatar().map(str::to_owned),
            duration: track.duration(),
        }
    }
}

/// Everything the now-playing UI binds to
///
/// Every field is derived from engine events; nothing here is set by the
/// code that queues tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub state: EngineState,
    pub is_loading: bool,
    pub glyph: &'static str,
    pub current_track: Option<Track>,
    pub elapsed: Duration,
    pub remaining: Duration,
    pub shuffle: bool,
    pub repeat: bool,
}

impl Default for NowPlaying {
    fn default() -> Self {
        let state = EngineState::None;
        Self {
            state,
            is_loading: state.is_loading(),
            glyph: state.play_pause_glyph(),
            current_track: None,
            elapsed: Duration::ZERO,
            remaining: Duration::ZERO,
            shuffle: false,
            repeat: false,
        }
    }
}

impl NowPlaying {
    pub(crate) fn apply_state(&mut self, state: EngineState) {
        self.state = state;
        self.is_loading = state.is_loading();
        self.glyph = state.play_pause_glyph();
    }
}

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The engine moved to another track
    TrackChanged(Track),

    /// The queue was torn down and built again
    QueueRebuilt {
        session_token: String,
        tracks: usize,
    },

    /// The queue for this token was already loaded and kept
    QueueReused { session_token: String },
}
