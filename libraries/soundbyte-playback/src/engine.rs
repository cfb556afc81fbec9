//! Media engine abstraction
//!
//! Decoding, buffering and output belong to the host platform. The session
//! only drives an engine through this trait and observes its events.

use crate::error::Result;
use crate::types::{EngineState, MediaItem};
use async_trait::async_trait;
use std::time::Duration;

/// Platform media engine
///
/// Implementors own the actual player. Every call may complete before the
/// engine has caught up: in particular `item_tags` can lag behind
/// `load_queue` while the engine prepares its playlist.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    async fn play(&self) -> Result<()>;

    async fn pause(&self) -> Result<()>;

    /// Stop playback and unload the current item
    async fn stop(&self) -> Result<()>;

    /// Replace the engine's queue
    async fn load_queue(&self, items: Vec<MediaItem>) -> Result<()>;

    /// Tags of the items the engine currently holds, in playback order
    async fn item_tags(&self) -> Vec<String>;

    /// Make the item at `index` current
    async fn move_to(&self, index: usize) -> Result<()>;

    async fn next(&self) -> Result<()>;

    async fn previous(&self) -> Result<()>;

    /// Seek within the current item
    async fn seek(&self, position: Duration) -> Result<()>;

    async fn set_shuffle(&self, enabled: bool) -> Result<()>;

    async fn set_repeat(&self, enabled: bool) -> Result<()>;
}

/// Notifications emitted by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Playback state changed
    StateChanged(EngineState),

    /// The engine moved to another item (`None` when nothing is current)
    CurrentItemChanged { tag: Option<String> },

    /// Periodic position update
    PositionChanged {
        position: Duration,
        duration: Duration,
    },
}
