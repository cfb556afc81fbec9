//! End-to-end tests for the playback session
//!
//! The media engine, queue builder, API client and surfaces are hand-written
//! fakes that record every call, so each test can assert exactly what the
//! session asked of its collaborators.

use async_trait::async_trait;
use soundbyte_client::{ApiClient, ApiRequest, ClientError, CredentialStore};
use soundbyte_core::{glyph, ApiSettings, PlaybackSettings, Telemetry, Track, User};
use soundbyte_playback::{
    BuiltQueue, EngineEvent, EngineState, MediaEngine, MediaItem, NowPlayingSurfaces,
    PlaybackError, PlaybackSession, QueueBuilder, SessionEvent, StreamQueueBuilder,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

// ============================================================================
// Fakes
// ============================================================================

/// Engine that logs every call.
///
/// `item_tags` answers with an empty list for the first `lag` calls after
/// each `load_queue`, like an engine still preparing its playlist.
#[derive(Default)]
struct MockEngine {
    log: Arc<Mutex<Vec<String>>>,
    items: Mutex<Vec<MediaItem>>,
    lag: usize,
    tag_calls: AtomicUsize,
}

impl MockEngine {
    fn lagging(lag: usize) -> Self {
        Self {
            lag,
            ..Self::default()
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.log.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn loaded(&self) -> Vec<MediaItem> {
        self.items.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaEngine for MockEngine {
    async fn play(&self) -> soundbyte_playback::Result<()> {
        self.record("play");
        Ok(())
    }

    async fn pause(&self) -> soundbyte_playback::Result<()> {
        self.record("pause");
        Ok(())
    }

    async fn stop(&self) -> soundbyte_playback::Result<()> {
        self.record("stop");
        Ok(())
    }

    async fn load_queue(&self, items: Vec<MediaItem>) -> soundbyte_playback::Result<()> {
        self.record(format!("load_queue({})", items.len()));
        *self.items.lock().unwrap() = items;
        self.tag_calls.store(0, Ordering::SeqCst);
        Ok(())
    }

    async fn item_tags(&self) -> Vec<String> {
        let call = self.tag_calls.fetch_add(1, Ordering::SeqCst);
        if call < self.lag {
            return Vec::new();
        }
        self.items.lock().unwrap().iter().map(|i| i.tag.clone()).collect()
    }

    async fn move_to(&self, index: usize) -> soundbyte_playback::Result<()> {
        self.record(format!("move_to({})", index));
        Ok(())
    }

    async fn next(&self) -> soundbyte_playback::Result<()> {
        self.record("next");
        Ok(())
    }

    async fn previous(&self) -> soundbyte_playback::Result<()> {
        self.record("previous");
        Ok(())
    }

    async fn seek(&self, position: Duration) -> soundbyte_playback::Result<()> {
        self.record(format!("seek({:?})", position));
        Ok(())
    }

    async fn set_shuffle(&self, enabled: bool) -> soundbyte_playback::Result<()> {
        self.record(format!("set_shuffle({})", enabled));
        Ok(())
    }

    async fn set_repeat(&self, enabled: bool) -> soundbyte_playback::Result<()> {
        self.record(format!("set_repeat({})", enabled));
        Ok(())
    }
}

/// Builder that counts builds and queues every track as-is.
#[derive(Default)]
struct CountingBuilder {
    builds: Arc<AtomicUsize>,
}

#[async_trait]
impl QueueBuilder for CountingBuilder {
    async fn build(&self, tracks: &[Track]) -> soundbyte_playback::Result<BuiltQueue> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(BuiltQueue {
            tracks: tracks.to_vec(),
            items: tracks
                .iter()
                .map(|t| MediaItem::for_track(t, format!("fake://{}", t.id)))
                .collect(),
        })
    }
}

/// API fake: answers canary probes for a set of working keys and serves
/// user profiles from a map.
#[derive(Default)]
struct FakeApi {
    working_keys: Vec<String>,
    probes: Mutex<Vec<String>>,
    users: HashMap<String, serde_json::Value>,
    user_lookups: AtomicUsize,
}

impl FakeApi {
    fn with_working_keys(keys: &[&str]) -> Self {
        Self {
            working_keys: keys.iter().map(|k| k.to_string()).collect(),
            ..Self::default()
        }
    }

    fn with_user(mut self, id: &str, username: &str) -> Self {
        self.users.insert(
            id.to_string(),
            serde_json::json!({"id": id, "username": username}),
        );
        self
    }
}

#[async_trait]
impl ApiClient for FakeApi {
    async fn get_json(&self, request: &ApiRequest) -> soundbyte_client::Result<serde_json::Value> {
        if let Some(id) = request.endpoint.strip_prefix("/users/") {
            self.user_lookups.fetch_add(1, Ordering::SeqCst);
            return self.users.get(id).cloned().ok_or(ClientError::ServerError {
                status: 404,
                message: "not found".into(),
            });
        }
        Err(ClientError::ServerUnreachable("offline".into()))
    }

    async fn put(&self, _request: &ApiRequest, _body: Option<serde_json::Value>) -> soundbyte_client::Result<bool> {
        Ok(false)
    }

    async fn delete(&self, _request: &ApiRequest) -> soundbyte_client::Result<bool> {
        Ok(false)
    }

    async fn exists(&self, request: &ApiRequest) -> soundbyte_client::Result<bool> {
        let key = request.param_value("client_id").unwrap_or_default().to_string();
        self.probes.lock().unwrap().push(key.clone());
        Ok(self.working_keys.contains(&key))
    }
}

/// Surfaces that count calls and optionally fail every one of them.
#[derive(Default)]
struct RecordingSurfaces {
    updates: Arc<AtomicUsize>,
    recents: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait]
impl NowPlayingSurfaces for RecordingSurfaces {
    async fn update_now_playing(&self, _track: &Track) -> anyhow::Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("tile API unavailable");
        }
        Ok(())
    }

    async fn add_recent_item(&self, _track: &Track) -> anyhow::Result<()> {
        self.recents.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("jump list unavailable");
        }
        Ok(())
    }
}

#[derive(Default)]
struct CountingTelemetry {
    events: Mutex<Vec<String>>,
}

impl Telemetry for CountingTelemetry {
    fn track_event(&self, name: &str, _properties: &[(&str, String)]) {
        self.events.lock().unwrap().push(name.to_string());
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn fast_settings(seek_attempts: u32) -> PlaybackSettings {
    PlaybackSettings {
        seek_attempts,
        seek_delay_ms: 1,
        max_queue_tracks: 500,
    }
}

fn track(id: &str) -> Track {
    Track::new(id, format!("Track {}", id))
}

fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| track(id)).collect()
}

struct Harness {
    session: Arc<PlaybackSession>,
    engine: Arc<MockEngine>,
    builds: Arc<AtomicUsize>,
}

fn harness_with(engine: MockEngine, api: FakeApi, settings: PlaybackSettings) -> Harness {
    let engine = Arc::new(engine);
    let builder = CountingBuilder::default();
    let builds = builder.builds.clone();

    let session = PlaybackSession::new(
        engine.clone(),
        Arc::new(builder),
        Arc::new(api),
        Arc::new(CredentialStore::new()),
        settings,
    );

    Harness {
        session: Arc::new(session),
        engine,
        builds,
    }
}

fn harness() -> Harness {
    harness_with(MockEngine::default(), FakeApi::default(), fast_settings(50))
}

// ============================================================================
// 1. Starting Playback
// ============================================================================

mod start_playback {
    use super::*;

    #[tokio::test]
    async fn empty_list_fails_without_touching_engine() {
        let h = harness();

        let err = h.session.start_playback(&[], "list-A", false, None).await.unwrap_err();

        assert!(matches!(err, PlaybackError::EmptyTrackList));
        assert!(!err.to_string().is_empty());
        assert!(h.engine.calls().is_empty());
        assert_eq!(h.builds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn pauses_before_anything_else() {
        let h = harness();

        h.session
            .start_playback(&tracks(&["1", "2"]), "list-A", false, None)
            .await
            .unwrap();

        let calls = h.engine.calls();
        assert_eq!(calls.first().map(String::as_str), Some("pause"));
        assert_eq!(calls.last().map(String::as_str), Some("play"));
        assert!(calls.contains(&"load_queue(2)".to_string()));
    }

    #[tokio::test]
    async fn same_token_reuses_queue() {
        let h = harness();
        let mut events = h.session.subscribe();

        h.session
            .start_playback(&tracks(&["1", "2"]), "list-A", false, None)
            .await
            .unwrap();
        h.session
            .start_playback(&tracks(&["3", "4"]), "list-A", false, None)
            .await
            .unwrap();

        assert_eq!(h.builds.load(Ordering::SeqCst), 1);
        assert_eq!(
            h.engine.calls().iter().filter(|c| c.starts_with("load_queue")).count(),
            1
        );
        // The reused queue keeps the first list
        let queued: Vec<String> = h.session.queued_tracks().into_iter().map(|t| t.id).collect();
        assert_eq!(queued, vec!["1", "2"]);

        assert!(matches!(events.try_recv().unwrap(), SessionEvent::QueueRebuilt { tracks: 2, .. }));
        assert!(matches!(events.try_recv().unwrap(), SessionEvent::QueueReused { .. }));
    }

    #[tokio::test]
    async fn new_token_rebuilds() {
        let h = harness();

        h.session
            .start_playback(&tracks(&["1"]), "list-A", false, None)
            .await
            .unwrap();
        h.session
            .start_playback(&tracks(&["2"]), "list-B", false, None)
            .await
            .unwrap();

        assert_eq!(h.builds.load(Ordering::SeqCst), 2);
        assert_eq!(h.session.session_token().as_deref(), Some("list-B"));
    }

    #[tokio::test]
    async fn end_of_list_token_always_rebuilds() {
        let h = harness();

        for _ in 0..3 {
            h.session
                .start_playback(&tracks(&["1"]), "eol", false, None)
                .await
                .unwrap();
        }

        assert_eq!(h.builds.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn shuffle_is_mirrored_to_engine_and_ui() {
        let h = harness();

        h.session
            .start_playback(&tracks(&["1", "2"]), "list-A", true, None)
            .await
            .unwrap();

        assert!(h.engine.calls().contains(&"set_shuffle(true)".to_string()));
        assert!(h.session.now_playing().borrow().shuffle);
    }
}

// ============================================================================
// 2. Seeking To The Starting Track
// ============================================================================

mod starting_track {
    use super::*;

    #[tokio::test]
    async fn positions_engine_before_playing() {
        let h = harness_with(MockEngine::lagging(3), FakeApi::default(), fast_settings(50));
        let list = tracks(&["1", "2", "3"]);

        h.session
            .start_playback(&list, "list-A", false, Some(&list[1]))
            .await
            .unwrap();

        let calls = h.engine.calls();
        let seek = calls.iter().position(|c| c == "move_to(1)").expect("engine was moved");
        let play = calls.iter().rposition(|c| c == "play").expect("engine was started");
        assert!(seek < play);
    }

    #[tokio::test]
    async fn gives_up_after_bounded_attempts() {
        let h = harness_with(MockEngine::lagging(1_000), FakeApi::default(), fast_settings(3));
        let list = tracks(&["1", "2", "3"]);

        let err = h
            .session
            .start_playback(&list, "list-A", false, Some(&list[2]))
            .await
            .unwrap_err();

        match err {
            PlaybackError::SeekTimedOut { track_id, attempts } => {
                assert_eq!(track_id, "3");
                assert_eq!(attempts, 3);
            }
            other => panic!("Expected SeekTimedOut, got {:?}", other),
        }
        assert!(!h.engine.calls().contains(&"play".to_string()));
    }

    #[tokio::test]
    async fn shuffle_skips_seek() {
        let h = harness();
        let list = tracks(&["1", "2", "3"]);

        h.session
            .start_playback(&list, "list-A", true, Some(&list[2]))
            .await
            .unwrap();

        assert!(!h.engine.calls().iter().any(|c| c.starts_with("move_to")));
    }
}

// ============================================================================
// 3. Queue Construction
// ============================================================================

mod queue_construction {
    use super::*;

    fn api_settings() -> ApiSettings {
        ApiSettings {
            soundcloud_client_id: "primary".to_string(),
            backup_client_ids: vec!["k1".to_string(), "k2".to_string()],
            fanburst_client_id: "fb".to_string(),
            ..ApiSettings::default()
        }
    }

    #[tokio::test]
    async fn falls_back_to_first_working_backup_key() {
        let api = Arc::new(FakeApi::with_working_keys(&["k2"]));
        let builder = StreamQueueBuilder::new(api.clone(), &api_settings(), 500);

        let built = builder.build(&tracks(&["1", "2", "3"])).await.unwrap();

        assert_eq!(built.items.len(), 3);
        for item in &built.items {
            assert!(item.source_url.ends_with("client_id=k2"), "{}", item.source_url);
        }
        // One resolution per build, not per track
        assert_eq!(*api.probes.lock().unwrap(), vec!["primary", "k1", "k2"]);
    }

    #[tokio::test]
    async fn primary_key_is_the_last_resort() {
        let api = Arc::new(FakeApi::with_working_keys(&[]));
        let builder = StreamQueueBuilder::new(api.clone(), &api_settings(), 500);

        let built = builder.build(&tracks(&["1"])).await.unwrap();

        assert_eq!(
            built.items[0].source_url,
            "https://api.soundcloud.com/tracks/1/stream?client_id=primary"
        );
    }

    #[tokio::test]
    async fn skips_duplicates_and_unstreamable_tracks() {
        let api = Arc::new(FakeApi::with_working_keys(&["primary"]));
        let builder = StreamQueueBuilder::new(api, &api_settings(), 500);

        let mut blocked = track("3");
        blocked.streamable = false;
        let list = vec![track("1"), track("2"), track("1"), blocked, track("")];

        let built = builder.build(&list).await.unwrap();

        let ids: Vec<&str> = built.tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(built.items.len(), built.tracks.len());
    }

    #[tokio::test]
    async fn caps_queue_length() {
        let api = Arc::new(FakeApi::with_working_keys(&["primary"]));
        let builder = StreamQueueBuilder::new(api, &api_settings(), 2);

        let built = builder.build(&tracks(&["1", "2", "3", "4"])).await.unwrap();

        assert_eq!(built.tracks.len(), 2);
    }

    #[tokio::test]
    async fn fanburst_tracks_use_fanburst_key_without_probing() {
        let api = Arc::new(FakeApi::default());
        let builder = StreamQueueBuilder::new(api.clone(), &api_settings(), 500);

        let mut fanburst = track("fb-1");
        fanburst.service = soundbyte_core::ServiceType::Fanburst;

        let built = builder.build(&[fanburst]).await.unwrap();

        assert_eq!(
            built.items[0].source_url,
            "https://api.fanburst.com/tracks/fb-1/stream?client_id=fb"
        );
        assert!(api.probes.lock().unwrap().is_empty());
    }
}

// ============================================================================
// 4. Engine Events
// ============================================================================

mod engine_events {
    use super::*;

    fn track_by(id: &str, user_id: &str, username: &str) -> Track {
        let mut track = track(id);
        track.user = Some(User::new(user_id, username));
        track
    }

    #[tokio::test]
    async fn state_changes_drive_derived_ui() {
        let h = harness();
        let now = h.session.now_playing();

        h.session
            .handle_engine_event(EngineEvent::StateChanged(EngineState::Buffering))
            .await;
        assert!(now.borrow().is_loading);
        assert_eq!(now.borrow().glyph, glyph::PLAY);

        h.session
            .handle_engine_event(EngineEvent::StateChanged(EngineState::Playing))
            .await;
        assert!(!now.borrow().is_loading);
        assert_eq!(now.borrow().glyph, glyph::PAUSE);
    }

    #[tokio::test]
    async fn position_updates_elapsed_and_remaining() {
        let h = harness();

        h.session
            .handle_engine_event(EngineEvent::PositionChanged {
                position: Duration::from_secs(30),
                duration: Duration::from_secs(200),
            })
            .await;

        let now = h.session.now_playing().borrow().clone();
        assert_eq!(now.elapsed, Duration::from_secs(30));
        assert_eq!(now.remaining, Duration::from_secs(170));
    }

    #[tokio::test]
    async fn item_change_sets_track_and_refreshes_uploader() {
        let engine = MockEngine::default();
        let api = FakeApi::default().with_user("u1", "Renamed Artist");
        let h = harness_with(engine, api, fast_settings(50));

        let list = vec![track_by("1", "u1", "Old Name"), track("2")];
        h.session.start_playback(&list, "list-A", false, None).await.unwrap();

        h.session
            .handle_engine_event(EngineEvent::PositionChanged {
                position: Duration::from_secs(10),
                duration: Duration::from_secs(100),
            })
            .await;
        let mut events = h.session.subscribe();

        h.session
            .handle_engine_event(EngineEvent::CurrentItemChanged {
                tag: Some("1".into()),
            })
            .await;

        let now = h.session.now_playing().borrow().clone();
        let current = now.current_track.expect("current track set");
        assert_eq!(current.id, "1");
        assert_eq!(current.artist(), "Renamed Artist");
        assert_eq!(now.elapsed, Duration::ZERO);
        assert_eq!(now.remaining, Duration::ZERO);

        // Queue copy stays in step with the current copy
        let queued = h.session.queued_tracks();
        assert_eq!(queued[0].artist(), "Renamed Artist");

        assert!(matches!(events.try_recv().unwrap(), SessionEvent::TrackChanged(t) if t.id == "1"));
    }

    #[tokio::test]
    async fn uploader_refresh_failure_is_swallowed() {
        let h = harness();
        let list = vec![track_by("1", "missing", "Original")];
        h.session.start_playback(&list, "list-A", false, None).await.unwrap();

        h.session
            .handle_engine_event(EngineEvent::CurrentItemChanged {
                tag: Some("1".into()),
            })
            .await;

        assert_eq!(h.session.current_track().unwrap().artist(), "Original");
    }

    #[tokio::test]
    async fn surface_failures_never_reach_playback() {
        let surfaces = RecordingSurfaces {
            fail: true,
            ..RecordingSurfaces::default()
        };
        let updates = surfaces.updates.clone();
        let recents = surfaces.recents.clone();
        let telemetry = Arc::new(CountingTelemetry::default());

        let engine = Arc::new(MockEngine::default());
        let session = PlaybackSession::new(
            engine.clone(),
            Arc::new(CountingBuilder::default()),
            Arc::new(FakeApi::default()),
            Arc::new(CredentialStore::new()),
            fast_settings(50),
        )
        .with_surfaces(Arc::new(surfaces))
        .with_telemetry(telemetry.clone());

        session
            .start_playback(&tracks(&["1"]), "list-A", false, None)
            .await
            .unwrap();
        session
            .handle_engine_event(EngineEvent::CurrentItemChanged {
                tag: Some("1".into()),
            })
            .await;

        assert_eq!(session.current_track().unwrap().id, "1");
        assert_eq!(updates.load(Ordering::SeqCst), 1);
        assert_eq!(recents.load(Ordering::SeqCst), 1);
        assert!(telemetry.events.lock().unwrap().contains(&"track_changed".to_string()));
    }

    #[tokio::test]
    async fn unknown_item_is_ignored() {
        let h = harness();
        h.session
            .start_playback(&tracks(&["1"]), "list-A", false, None)
            .await
            .unwrap();

        h.session
            .handle_engine_event(EngineEvent::CurrentItemChanged {
                tag: Some("99".into()),
            })
            .await;

        assert!(h.session.current_track().is_none());
    }

    #[tokio::test]
    async fn attached_pump_applies_events() {
        let h = harness();
        let mut now = h.session.now_playing();
        let (tx, rx) = mpsc::channel(8);

        let pump = h.session.attach(rx);
        tx.send(EngineEvent::StateChanged(EngineState::Playing)).await.unwrap();

        tokio::time::timeout(Duration::from_secs(1), now.changed())
            .await
            .expect("state published")
            .unwrap();
        assert_eq!(now.borrow().state, EngineState::Playing);

        drop(tx);
        pump.await.unwrap();
    }

    #[tokio::test]
    async fn toggle_follows_reported_state() {
        let h = harness();

        h.session.toggle_play_pause().await.unwrap();
        h.session
            .handle_engine_event(EngineEvent::StateChanged(EngineState::Playing))
            .await;
        h.session.toggle_play_pause().await.unwrap();

        assert_eq!(h.engine.calls(), vec!["play", "pause"]);
    }

    #[tokio::test]
    async fn seek_reaches_engine() {
        let h = harness();

        h.session.seek(Duration::from_secs(42)).await.unwrap();

        assert_eq!(h.engine.calls(), vec!["seek(42s)"]);
    }
}
