/// Comment domain type
use crate::types::{deserialize_id, deserialize_optional_id, User};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A timed comment on a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default)]
    pub body: String,

    /// Position in the track the comment is attached to, in milliseconds
    pub timestamp: Option<u64>,

    pub created_at: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub track_id: Option<String>,

    pub user: Option<User>,
}

impl Comment {
    pub fn position(&self) -> Option<Duration> {
        self.timestamp.map(Duration::from_millis)
    }
}
