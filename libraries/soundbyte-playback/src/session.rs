//! Playback session - core orchestration
//!
//! Owns the single playback queue, drives the media engine when a list is
//! started, and mirrors engine events into UI-facing state.

use crate::{
    engine::{EngineEvent, MediaEngine},
    error::{PlaybackError, Result},
    queue::{PlaybackQueue, QueueBuilder},
    surfaces::{NoSurfaces, NowPlayingSurfaces},
    types::{EngineState, NowPlaying, SessionEvent, END_OF_LIST},
};
use soundbyte_client::{ApiClient, CredentialStore, Resources};
use soundbyte_core::{PlaybackSettings, Telemetry, Track, TracingTelemetry};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Process-wide owner of "what is playing"
///
/// Construct one per application and share it behind an `Arc`.
///
/// UI state is published on two channels:
/// - [`now_playing`](Self::now_playing): a `watch` of [`NowPlaying`], always
///   holding the latest derived state
/// - [`subscribe`](Self::subscribe): a `broadcast` of [`SessionEvent`]s
pub struct PlaybackSession {
    engine: Arc<dyn MediaEngine>,
    builder: Arc<dyn QueueBuilder>,
    api: Arc<dyn ApiClient>,
    credentials: Arc<CredentialStore>,
    surfaces: Arc<dyn NowPlayingSurfaces>,
    telemetry: Arc<dyn Telemetry>,
    settings: PlaybackSettings,

    queue: Mutex<PlaybackQueue>,
    /// Serialises `start_playback`
    start_lock: tokio::sync::Mutex<()>,

    now_playing: watch::Sender<NowPlaying>,
    events: broadcast::Sender<SessionEvent>,
}

impl PlaybackSession {
    pub fn new(
        engine: Arc<dyn MediaEngine>,
        builder: Arc<dyn QueueBuilder>,
        api: Arc<dyn ApiClient>,
        credentials: Arc<CredentialStore>,
        settings: PlaybackSettings,
    ) -> Self {
        let (now_playing, _) = watch::channel(NowPlaying::default());
        let (events, _) = broadcast::channel(32);

        Self {
            engine,
            builder,
            api,
            credentials,
            surfaces: Arc::new(NoSurfaces),
            telemetry: Arc::new(TracingTelemetry),
            settings,
            queue: Mutex::new(PlaybackQueue::new()),
            start_lock: tokio::sync::Mutex::new(()),
            now_playing,
            events,
        }
    }

    pub fn with_surfaces(mut self, surfaces: Arc<dyn NowPlayingSurfaces>) -> Self {
        self.surfaces = surfaces;
        self
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    fn queue(&self) -> MutexGuard<'_, PlaybackQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    // ===== Observation =====

    pub fn now_playing(&self) -> watch::Receiver<NowPlaying> {
        self.now_playing.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn current_track(&self) -> Option<Track> {
        self.now_playing.borrow().current_track.clone()
    }

    pub fn session_token(&self) -> Option<String> {
        self.queue().session_token().map(str::to_owned)
    }

    /// Copy of the queued tracks, in queue order
    pub fn queued_tracks(&self) -> Vec<Track> {
        self.queue().tracks().to_vec()
    }

    // ===== Starting playback =====

    /// Play `tracks`, identified as the list `session_token`.
    ///
    /// The queue is reused when `session_token` matches the loaded one (and
    /// is not `"eol"`); otherwise it is rebuilt. With a `starting_track` and
    /// no shuffle, the engine is moved to that track before playing.
    ///
    /// Fails without touching the engine when `tracks` is empty.
    pub async fn start_playback(
        &self,
        tracks: &[Track],
        session_token: &str,
        shuffle: bool,
        starting_track: Option<&Track>,
    ) -> Result<()> {
        if tracks.is_empty() {
            return Err(PlaybackError::EmptyTrackList);
        }

        let _guard = self.start_lock.lock().await;

        // Stop the old queue from playing over the rebuild
        self.engine.pause().await?;

        let reuse =
            session_token != END_OF_LIST && self.queue().session_token() == Some(session_token);

        if reuse {
            debug!(session_token = %session_token, "Reusing loaded queue");
            self.emit(SessionEvent::QueueReused {
                session_token: session_token.to_string(),
            });
        } else {
            self.rebuild_queue(tracks, session_token).await?;
        }

        self.set_shuffle(shuffle).await?;

        if let Some(track) = starting_track {
            if !shuffle {
                self.seek_to_track(&track.id).await?;
            }
        }

        self.engine.play().await?;

        self.telemetry.track_event(
            "playback_started",
            &[
                ("session_token", session_token.to_string()),
                ("shuffle", shuffle.to_string()),
                ("reused", reuse.to_string()),
            ],
        );
        Ok(())
    }

    async fn rebuild_queue(&self, tracks: &[Track], session_token: &str) -> Result<()> {
        let built = self.builder.build(tracks).await?;
        if built.items.is_empty() {
            return Err(PlaybackError::NoPlayableTracks);
        }

        let count = built.tracks.len();
        self.engine.load_queue(built.items).await?;
        self.queue().replace(session_token, built.tracks);

        info!(session_token = %session_token, tracks = count, "Queue rebuilt");
        self.emit(SessionEvent::QueueRebuilt {
            session_token: session_token.to_string(),
            tracks: count,
        });
        Ok(())
    }

    /// Move the engine to `track_id`, waiting for the engine to list it.
    async fn seek_to_track(&self, track_id: &str) -> Result<()> {
        let attempts = self.settings.seek_attempts.max(1);
        let delay = Duration::from_millis(self.settings.seek_delay_ms);

        for attempt in 1..=attempts {
            let tags = self.engine.item_tags().await;
            if let Some(index) = tags.iter().position(|tag| tag == track_id) {
                debug!(track_id = %track_id, index, attempt, "Seeking to starting track");
                return self.engine.move_to(index).await;
            }

            if attempt < attempts {
                tokio::time::sleep(delay).await;
            }
        }

        warn!(track_id = %track_id, attempts, "Starting track never appeared in queue");
        Err(PlaybackError::SeekTimedOut {
            track_id: track_id.to_string(),
            attempts,
        })
    }

    // ===== Transport =====

    pub async fn toggle_play_pause(&self) -> Result<()> {
        let playing = self.now_playing.borrow().state == EngineState::Playing;
        if playing {
            self.engine.pause().await
        } else {
            self.engine.play().await
        }
    }

    pub async fn next(&self) -> Result<()> {
        self.engine.next().await
    }

    pub async fn previous(&self) -> Result<()> {
        self.engine.previous().await
    }

    pub async fn stop(&self) -> Result<()> {
        self.engine.stop().await
    }

    /// Jump within the current track.
    pub async fn seek(&self, position: Duration) -> Result<()> {
        self.engine.seek(position).await
    }

    pub async fn set_shuffle(&self, enabled: bool) -> Result<()> {
        self.engine.set_shuffle(enabled).await?;
        self.now_playing.send_modify(|now| now.shuffle = enabled);
        Ok(())
    }

    pub async fn set_repeat(&self, enabled: bool) -> Result<()> {
        self.engine.set_repeat(enabled).await?;
        self.now_playing.send_modify(|now| now.repeat = enabled);
        Ok(())
    }

    // ===== Engine events =====

    /// Pump engine events into the session until the sender is dropped.
    pub fn attach(self: &Arc<Self>, mut events: mpsc::Receiver<EngineEvent>) -> JoinHandle<()> {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                session.handle_engine_event(event).await;
            }
            debug!("Engine event stream closed");
        })
    }

    /// Apply one engine notification to the UI-facing state.
    pub async fn handle_engine_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::StateChanged(state) => {
                self.now_playing.send_modify(|now| now.apply_state(state));
            }
            EngineEvent::PositionChanged { position, duration } => {
                self.now_playing.send_modify(|now| {
                    now.elapsed = position;
                    now.remaining = duration.saturating_sub(position);
                });
            }
            EngineEvent::CurrentItemChanged { tag: None } => {
                self.now_playing.send_modify(|now| {
                    now.current_track = None;
                    now.elapsed = Duration::ZERO;
                    now.remaining = Duration::ZERO;
                });
            }
            EngineEvent::CurrentItemChanged { tag: Some(tag) } => {
                self.on_track_changed(&tag).await;
            }
        }
    }

    async fn on_track_changed(&self, tag: &str) {
        let Some(track) = self.queue().get(tag).cloned() else {
            debug!(tag = %tag, "Current item is not in the queue");
            return;
        };

        self.now_playing.send_modify(|now| {
            now.current_track = Some(track.clone());
            now.elapsed = Duration::ZERO;
            now.remaining = Duration::ZERO;
        });
        self.emit(SessionEvent::TrackChanged(track.clone()));

        let track = self.refresh_uploader(track).await;

        if let Err(e) = self.surfaces.update_now_playing(&track).await {
            warn!(track_id = %track.id, error = %e, "Failed to update now playing surface");
        }
        if let Err(e) = self.surfaces.add_recent_item(&track).await {
            warn!(track_id = %track.id, error = %e, "Failed to add recent item");
        }

        self.telemetry.track_event(
            "track_changed",
            &[
                ("track_id", track.id.clone()),
                ("service", track.service.to_string()),
            ],
        );
    }

    /// Fetch the uploader's current profile. Failures keep the old copy.
    async fn refresh_uploader(&self, mut track: Track) -> Track {
        let Some(user_id) = track.user.as_ref().map(|u| u.id.clone()) else {
            return track;
        };

        let resources = Resources::new(self.api.as_ref(), &self.credentials);
        match resources.get_user(&user_id).await {
            Ok(user) => {
                track.user = Some(user);
                self.queue().update(&track);
                self.now_playing.send_if_modified(|now| match &mut now.current_track {
                    Some(current) if current.id == track.id => {
                        current.clone_from(&track);
                        true
                    }
                    _ => false,
                });
            }
            Err(e) => {
                debug!(user_id = %user_id, error = %e, "Could not refresh uploader");
            }
        }
        track
    }
}
