//! Now-playing surfaces (tiles, jump lists, system media overlays).

use async_trait::async_trait;
use soundbyte_core::Track;

/// Fire-and-forget sinks that mirror the current track outside the app.
///
/// Failures are logged by the session and never reach playback.
#[async_trait]
pub trait NowPlayingSurfaces: Send + Sync {
    async fn update_now_playing(&self, track: &Track) -> anyhow::Result<()>;

    async fn add_recent_item(&self, track: &Track) -> anyhow::Result<()>;
}

/// Surfaces for hosts that have none.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSurfaces;

#[async_trait]
impl NowPlayingSurfaces for NoSurfaces {
    async fn update_now_playing(&self, _track: &Track) -> anyhow::Result<()> {
        Ok(())
    }

    async fn add_recent_item(&self, _track: &Track) -> anyhow::Result<()> {
        Ok(())
    }
}
