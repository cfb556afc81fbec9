//! Playback queue and queue construction
//!
//! The session holds one [`PlaybackQueue`]: the tracks handed to the engine
//! plus the session token naming the list they came from. Building the
//! engine-facing items is delegated to a [`QueueBuilder`].

use crate::error::Result;
use crate::keys::ApiKeyResolver;
use crate::types::MediaItem;
use async_trait::async_trait;
use soundbyte_client::ApiClient;
use soundbyte_core::{ApiSettings, ServiceType, Track};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Tracks currently loaded into the engine
///
/// Unique by track id. The current track is not stored here; it is derived
/// from the engine's item-changed notifications.
#[derive(Debug, Clone, Default)]
pub struct PlaybackQueue {
    tracks: Vec<Track>,
    session_token: Option<String>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue with a freshly built list
    pub fn replace(&mut self, session_token: impl Into<String>, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.session_token = Some(session_token.into());
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn position(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track_id)
    }

    pub fn get(&self, track_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    /// Overwrite the stored copy of a track (e.g. after refreshing its uploader)
    pub fn update(&mut self, track: &Track) -> bool {
        match self.tracks.iter_mut().find(|t| t.id == track.id) {
            Some(slot) => {
                slot.clone_from(track);
                true
            }
            None => false,
        }
    }
}

/// Result of building a queue
#[derive(Debug, Clone, Default)]
pub struct BuiltQueue {
    /// Tracks that made it into the queue, in order
    pub tracks: Vec<Track>,

    /// Engine items, one per track
    pub items: Vec<MediaItem>,
}

/// Turns a track list into engine items
#[async_trait]
pub trait QueueBuilder: Send + Sync {
    async fn build(&self, tracks: &[Track]) -> Result<BuiltQueue>;
}

/// Builds provider stream URLs for every track
///
/// Resolves a working SoundCloud key once per build, drops duplicate and
/// unstreamable tracks, and caps the queue at `max_tracks`.
pub struct StreamQueueBuilder {
    resolver: ApiKeyResolver,
    soundcloud_url: String,
    fanburst_url: String,
    fanburst_key: String,
    max_tracks: usize,
}

impl StreamQueueBuilder {
    pub fn new(api: Arc<dyn ApiClient>, settings: &ApiSettings, max_tracks: usize) -> Self {
        Self {
            resolver: ApiKeyResolver::new(api, settings),
            soundcloud_url: settings.soundcloud_url.trim_end_matches('/').to_string(),
            fanburst_url: settings.fanburst_url.trim_end_matches('/').to_string(),
            fanburst_key: settings.fanburst_client_id.clone(),
            max_tracks: max_tracks.max(1),
        }
    }

    fn stream_url(&self, track: &Track, soundcloud_key: &str) -> std::result::Result<Url, String> {
        if track.id.trim().is_empty() {
            return Err("track has no id".into());
        }
        if !track.streamable {
            return Err("track is not streamable".into());
        }

        let (base, key) = match track.service {
            ServiceType::SoundCloud => (&self.soundcloud_url, soundcloud_key),
            ServiceType::Fanburst => (&self.fanburst_url, self.fanburst_key.as_str()),
        };

        let mut url = Url::parse(&format!("{}/tracks/{}/stream", base, track.id))
            .map_err(|e| e.to_string())?;
        if !key.is_empty() {
            url.query_pairs_mut().append_pair("client_id", key);
        }
        Ok(url)
    }
}

#[async_trait]
impl QueueBuilder for StreamQueueBuilder {
    async fn build(&self, tracks: &[Track]) -> Result<BuiltQueue> {
        let needs_key = tracks.iter().any(|t| t.service == ServiceType::SoundCloud);
        let key = if needs_key {
            self.resolver.resolve().await
        } else {
            String::new()
        };

        let mut seen = HashSet::new();
        let mut built = BuiltQueue::default();

        for track in tracks {
            if built.tracks.len() >= self.max_tracks {
                debug!(limit = self.max_tracks, "Queue limit reached");
                break;
            }
            if !seen.insert(track.id.as_str()) {
                continue;
            }

            match self.stream_url(track, &key) {
                Ok(url) => {
                    built.items.push(MediaItem::for_track(track, url.as_str()));
                    built.tracks.push(track.clone());
                }
                Err(reason) => {
                    warn!(track_id = %track.id, reason = %reason, "Skipping track");
                }
            }
        }

        info!(
            requested = tracks.len(),
            queued = built.tracks.len(),
            "Built playback queue"
        );
        Ok(built)
    }
}
