/// Stream (activity feed) entry
use crate::types::{Playlist, Track};
use serde::{Deserialize, Serialize};

/// One entry of the signed-in user's stream
///
/// The `origin` object's shape depends on `type`; it is decoded into the
/// matching record instead of being kept as loose JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStreamItem", into = "RawStreamItem")]
pub struct StreamItem {
    pub kind: StreamItemKind,
    pub created_at: Option<String>,
    pub content: StreamContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamItemKind {
    Track,
    TrackRepost,
    Playlist,
    PlaylistRepost,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StreamContent {
    Track(Track),
    Playlist(Playlist),
    Unsupported,
}

impl StreamItem {
    pub fn is_repost(&self) -> bool {
        matches!(
            self.kind,
            StreamItemKind::TrackRepost | StreamItemKind::PlaylistRepost
        )
    }

    pub fn track(&self) -> Option<&Track> {
        match &self.content {
            StreamContent::Track(track) => Some(track),
            _ => None,
        }
    }

    pub fn playlist(&self) -> Option<&Playlist> {
        match &self.content {
            StreamContent::Playlist(playlist) => Some(playlist),
            _ => None,
        }
    }
}

/// Wire shape: `type` plus an untyped `origin`
#[derive(Serialize, Deserialize)]
struct RawStreamItem {
    #[serde(rename = "type")]
    kind: StreamItemKind,
    created_at: Option<String>,
    #[serde(default)]
    origin: serde_json::Value,
}

impl TryFrom<RawStreamItem> for StreamItem {
    type Error = serde_json::Error;

    fn try_from(raw: RawStreamItem) -> Result<Self, Self::Error> {
        let content = match raw.kind {
            StreamItemKind::Track | StreamItemKind::TrackRepost => {
                StreamContent::Track(serde_json::from_value(raw.origin)?)
            }
            StreamItemKind::Playlist | StreamItemKind::PlaylistRepost => {
                StreamContent::Playlist(serde_json::from_value(raw.origin)?)
            }
            StreamItemKind::Other => StreamContent::Unsupported,
        };

        Ok(Self {
            kind: raw.kind,
            created_at: raw.created_at,
            content,
        })
    }
}

impl From<StreamItem> for RawStreamItem {
    fn from(item: StreamItem) -> Self {
        let origin = match item.content {
            StreamContent::Track(track) => serde_json::to_value(track),
            StreamContent::Playlist(playlist) => serde_json::to_value(playlist),
            StreamContent::Unsupported => Ok(serde_json::Value::Null),
        };

        Self {
            kind: item.kind,
            created_at: item.created_at,
            origin: origin.unwrap_or_default(),
        }
    }
}
