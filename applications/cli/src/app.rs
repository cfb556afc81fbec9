//! Application root: builds every service once and runs commands against them.

use crate::cli::Command;
use crate::headless::HeadlessEngine;
use anyhow::{Context, Result};
use soundbyte_client::{ApiClient, CredentialStore, SoundByteClient};
use soundbyte_collections::{ChartKind, Collections, PagedCollection};
use soundbyte_core::{ServiceType, SoundByteConfig, StreamContent, StreamItem, Telemetry, Track, TracingTelemetry};
use soundbyte_playback::{ApiKeyResolver, NowPlaying, PlaybackSession, StreamQueueBuilder};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Single instances of everything the commands need.
///
/// Built once in `main` and passed by reference; nothing is global.
pub struct AppContext {
    pub config: SoundByteConfig,
    pub credentials: Arc<CredentialStore>,
    pub client: Arc<SoundByteClient>,
    pub telemetry: Arc<dyn Telemetry>,
    pub collections: Collections,
    pub engine: Arc<HeadlessEngine>,
    pub session: Arc<PlaybackSession>,
}

impl AppContext {
    /// Wire up the application. Must be called inside a tokio runtime.
    pub fn new(config: SoundByteConfig, token: Option<String>) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let credentials = Arc::new(CredentialStore::new());
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            credentials.connect(ServiceType::SoundCloud, token);
        }

        let client = Arc::new(
            SoundByteClient::new(config.api.clone(), Arc::clone(&credentials))
                .context("Failed to create API client")?,
        );
        let api: Arc<dyn ApiClient> = client.clone();
        let telemetry: Arc<dyn Telemetry> = Arc::new(TracingTelemetry);

        let collections = Collections::new(Arc::clone(&api), Arc::clone(&credentials), &config.collections);

        let (engine, engine_events) = HeadlessEngine::new();
        let engine = Arc::new(engine);
        let builder = StreamQueueBuilder::new(
            Arc::clone(&api),
            &config.api,
            config.playback.max_queue_tracks,
        );
        let session = Arc::new(
            PlaybackSession::new(
                engine.clone(),
                Arc::new(builder),
                api,
                Arc::clone(&credentials),
                config.playback.clone(),
            )
            .with_telemetry(Arc::clone(&telemetry)),
        );
        session.attach(engine_events);

        info!(
            connected = credentials.is_connected(ServiceType::SoundCloud),
            "SoundByte initialized"
        );

        Ok(Self {
            config,
            credentials,
            client,
            telemetry,
            collections,
            engine,
            session,
        })
    }

    /// Run one command, writing its report to `out`.
    pub async fn run(&self, command: Command, out: &mut dyn Write) -> Result<()> {
        debug!(command = ?command, "Running command");
        let name = command_name(&command);

        match command {
            Command::Stream { pages } => {
                let stream = self.collections.stream();
                let items = load_pages(&stream, pages, out).await?;
                for item in &items {
                    writeln!(out, "{}", format_stream_item(item))?;
                }
            }
            Command::Likes { user, pages } => {
                let likes = match &user {
                    Some(user) => self.collections.user_likes(user),
                    None => self.collections.my_likes(),
                };
                print_tracks(&load_pages(&likes, pages, out).await?, out)?;
            }
            Command::Search {
                query,
                fanburst,
                pages,
            } => {
                let results = if fanburst {
                    self.collections.fanburst_search(&query)
                } else {
                    self.collections.search_tracks(&query)
                };
                print_tracks(&load_pages(&results, pages, out).await?, out)?;
            }
            Command::Charts { genre, kind, pages } => {
                self.charts(kind, genre.as_deref().unwrap_or_default(), pages, out)
                    .await?;
            }
            Command::ResolveKey => {
                let resolver = ApiKeyResolver::new(self.client.clone(), &self.config.api);
                let key = resolver.resolve().await;
                writeln!(out, "Streaming with client id {}", key)?;
            }
            Command::Play {
                playlist_id,
                shuffle,
                start,
            } => self.play(&playlist_id, shuffle, start.as_deref(), out).await?,
        }

        self.telemetry.track_event("command", &[("name", name.to_string())]);
        Ok(())
    }

    async fn charts(&self, kind: ChartKind, genre: &str, pages: u32, out: &mut dyn Write) -> Result<()> {
        let charts = self.collections.charts(kind, genre);
        let tracks = load_pages(&charts, pages, out).await?;
        for (rank, track) in tracks.iter().enumerate() {
            writeln!(out, "{:>3}. {}", rank + 1, format_track(track))?;
        }
        Ok(())
    }

    async fn play(
        &self,
        playlist_id: &str,
        shuffle: bool,
        start: Option<&str>,
        out: &mut dyn Write,
    ) -> Result<()> {
        let playlist = self
            .client
            .resources()
            .get_playlist(playlist_id)
            .await
            .with_context(|| format!("Failed to load playlist {}", playlist_id))?;

        let starting = match start {
            Some(id) => Some(
                playlist
                    .tracks
                    .iter()
                    .find(|t| t.id == id)
                    .with_context(|| format!("Track {} is not in this playlist", id))?,
            ),
            None => None,
        };

        let mut now_playing = self.session.now_playing();
        self.session
            .start_playback(&playlist.tracks, &playlist.session_token(), shuffle, starting)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;

        // Engine events arrive asynchronously
        if !wait_for_current_track(&mut now_playing, Duration::from_secs(2)).await {
            debug!(playlist_id = %playlist_id, "Engine reported no current track");
        }

        writeln!(out, "Queued \"{}\":", playlist.title)?;
        let current = self.engine.current_index();
        for (index, item) in self.engine.queue().iter().enumerate() {
            let marker = if Some(index) == current { ">" } else { " " };
            writeln!(out, "{} {:>3}. {} - {}", marker, index + 1, item.artist, item.title)?;
        }

        if let Some(track) = self.session.current_track() {
            writeln!(out, "Now playing: {}", format_track(&track))?;
        }
        Ok(())
    }
}

/// Wait until the session reports a current track. False on timeout or
/// when the session is gone.
async fn wait_for_current_track(now_playing: &mut watch::Receiver<NowPlaying>, limit: Duration) -> bool {
    match tokio::time::timeout(limit, now_playing.wait_for(|now| now.current_track.is_some())).await {
        Ok(Ok(_)) => true,
        Ok(Err(_)) => {
            debug!("Session closed while waiting for a current track");
            false
        }
        Err(_) => {
            debug!(waited = ?limit, "Timed out waiting for a current track");
            false
        }
    }
}

/// Load up to `pages` pages, reporting any notice the collection raises.
async fn load_pages<T>(collection: &PagedCollection<T>, pages: u32, out: &mut dyn Write) -> Result<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
{
    let mut notices = collection.subscribe();

    for _ in 0..pages.max(1) {
        if !collection.has_more() {
            break;
        }
        collection.load_next_page().await;
    }

    while let Ok(notice) = notices.try_recv() {
        writeln!(out, "{}", notice.user_message())?;
    }
    Ok(collection.items())
}

fn print_tracks(tracks: &[Track], out: &mut dyn Write) -> Result<()> {
    for track in tracks {
        writeln!(out, "{}", format_track(track))?;
    }
    Ok(())
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
    } else {
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

pub fn format_track(track: &Track) -> String {
    let artist = track.artist();
    if artist.is_empty() {
        format!("{} [{}]", track.title, format_duration(track.duration()))
    } else {
        format!(
            "{} - {} [{}]",
            artist,
            track.title,
            format_duration(track.duration())
        )
    }
}

fn format_stream_item(item: &StreamItem) -> String {
    let prefix = if item.is_repost() { "(repost) " } else { "" };
    match &item.content {
        StreamContent::Track(track) => format!("{}{}", prefix, format_track(track)),
        StreamContent::Playlist(playlist) => format!(
            "{}Playlist: {} ({} tracks)",
            prefix,
            playlist.title,
            playlist.track_count.unwrap_or(playlist.tracks.len() as u64)
        ),
        StreamContent::Unsupported => format!("{:?}", item.kind),
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Stream { .. } => "stream",
        Command::Likes { .. } => "likes",
        Command::Search { .. } => "search",
        Command::Charts { .. } => "charts",
        Command::ResolveKey => "resolve-key",
        Command::Play { .. } => "play",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::from_secs(59)), "0:59");
        assert_eq!(format_duration(Duration::from_secs(215)), "3:35");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1:02:05");
    }

    #[test]
    fn track_lines() {
        let mut track = Track::new("1", "Night Drive");
        track.duration = 215_000;
        assert_eq!(format_track(&track), "Night Drive [3:35]");

        track.user = Some(soundbyte_core::User::new("2", "Forss"));
        assert_eq!(format_track(&track), "Forss - Night Drive [3:35]");
    }

    #[tokio::test]
    async fn waiting_for_track_times_out_quietly() {
        let (_tx, mut rx) = watch::channel(NowPlaying::default());
        assert!(!wait_for_current_track(&mut rx, Duration::from_millis(20)).await);
    }

    #[tokio::test]
    async fn waiting_for_track_sees_update() {
        let (tx, mut rx) = watch::channel(NowPlaying::default());
        tx.send_modify(|now| now.current_track = Some(Track::new("1", "One")));
        assert!(wait_for_current_track(&mut rx, Duration::from_millis(20)).await);
    }

    #[tokio::test]
    async fn waiting_for_track_stops_when_session_is_gone() {
        let (tx, mut rx) = watch::channel(NowPlaying::default());
        drop(tx);
        assert!(!wait_for_current_track(&mut rx, Duration::from_secs(1)).await);
    }
}
