/// Track domain type
use crate::types::{deserialize_id, ServiceType, User};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A streamable track
///
/// Mirrors the SoundCloud track schema. Tracks held by a playlist, a
/// collection and the playback queue are independent copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Provider-assigned identifier
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// Provider the track is streamed from
    #[serde(default)]
    pub service: ServiceType,

    #[serde(default)]
    pub title: String,

    /// Artwork in the provider's default ("large") size
    pub artwork_url: Option<String>,

    /// Duration in milliseconds
    #[serde(default)]
    pub duration: u64,

    pub permalink_url: Option<String>,

    pub genre: Option<String>,

    #[serde(alias = "favoritings_count")]
    pub likes_count: Option<u64>,

    pub playback_count: Option<u64>,

    pub comment_count: Option<u64>,

    pub reposts_count: Option<u64>,

    /// Raw creation timestamp as sent by the API (see [`Track::created_at`])
    #[serde(rename = "created_at")]
    pub created_at_raw: Option<String>,

    /// Uploader
    pub user: Option<User>,

    #[serde(default = "default_streamable")]
    pub streamable: bool,
}

fn default_streamable() -> bool {
    true
}

impl Track {
    /// Create a SoundCloud track with minimal metadata
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            service: ServiceType::SoundCloud,
            title: title.into(),
            artwork_url: None,
            duration: 0,
            permalink_url: None,
            genre: None,
            likes_count: None,
            playback_count: None,
            comment_count: None,
            reposts_count: None,
            created_at_raw: None,
            user: None,
            streamable: true,
        }
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration)
    }

    /// Uploader name, or an empty string when the track has no user attached
    pub fn artist(&self) -> &str {
        self.user.as_ref().map_or("", |u| u.username.as_str())
    }

    /// Artwork to display, falling back to the uploader's avatar
    pub fn artwork_or_avatar(&self) -> Option<&str> {
        self.artwork_url
            .as_deref()
            .or_else(|| self.user.as_ref().and_then(|u| u.avatar_url.as_deref()))
    }

    /// Artwork URL rewritten to the 500x500 variant
    pub fn high_res_artwork(&self) -> Option<String> {
        self.artwork_or_avatar()
            .map(|url| url.replace("large", "t500x500"))
    }

    /// Parse the creation timestamp.
    ///
    /// The v1 API uses `2017/05/01 12:00:00 +0000`, the v2 API RFC 3339.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created_at_raw.as_deref()?)
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y/%m/%d %H:%M:%S %z") {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y/%m/%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
