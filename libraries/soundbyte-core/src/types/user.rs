/// User domain type
use crate::types::deserialize_id;
use serde::{Deserialize, Serialize};

/// A SoundCloud (or Fanburst) account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default)]
    pub username: String,

    pub full_name: Option<String>,

    pub avatar_url: Option<String>,

    pub permalink_url: Option<String>,

    pub description: Option<String>,

    pub country: Option<String>,

    pub track_count: Option<u64>,

    pub playlist_count: Option<u64>,

    pub followers_count: Option<u64>,

    pub followings_count: Option<u64>,

    #[serde(alias = "public_favorites_count")]
    pub likes_count: Option<u64>,
}

impl User {
    /// Create a user with only the identifying fields set
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            full_name: None,
            avatar_url: None,
            permalink_url: None,
            description: None,
            country: None,
            track_count: None,
            playlist_count: None,
            followers_count: None,
            followings_count: None,
            likes_count: None,
        }
    }
}
