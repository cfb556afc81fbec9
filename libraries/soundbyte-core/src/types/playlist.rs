/// Playlist domain type
use crate::types::{deserialize_id, Track, User};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A SoundCloud playlist (or set)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default)]
    pub title: String,

    pub artwork_url: Option<String>,

    pub permalink_url: Option<String>,

    /// Total duration in milliseconds
    #[serde(default)]
    pub duration: u64,

    pub track_count: Option<u64>,

    pub likes_count: Option<u64>,

    pub created_at: Option<String>,

    pub user: Option<User>,

    /// Embedded tracks; list endpoints may omit these
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Playlist {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration)
    }

    /// Artwork of the playlist, or of its first track that has one
    pub fn artwork(&self) -> Option<&str> {
        self.artwork_url
            .as_deref()
            .or_else(|| self.tracks.iter().find_map(|t| t.artwork_url.as_deref()))
    }

    /// Playback session token identifying this playlist's queue
    pub fn session_token(&self) -> String {
        format!("playlist-{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_with_tracks() {
        let json = r#"{
            "id": 123,
            "title": "Late Nights",
            "duration": 600000,
            "track_count": 2,
            "tracks": [
                {"id": 1, "title": "One", "artwork_url": "https://a/1-large.jpg"},
                {"id": 2, "title": "Two"}
            ]
        }"#;

        let playlist: Playlist = serde_json::from_str(json).unwrap();
        assert_eq!(playlist.tracks.len(), 2);
        assert_eq!(playlist.artwork(), Some("https://a/1-large.jpg"));
        assert_eq!(playlist.session_token(), "playlist-123");
        assert_eq!(playlist.duration().as_secs(), 600);
    }

    #[test]
    fn tracks_default_to_empty() {
        let playlist: Playlist = serde_json::from_str(r#"{"id": 9, "title": "Bare"}"#).unwrap();
        assert!(playlist.tracks.is_empty());
        assert!(playlist.artwork().is_none());
    }
}
