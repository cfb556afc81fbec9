/// Typed Fanburst schema
use crate::types::{deserialize_id, ServiceType, Track, User};
use serde::{Deserialize, Serialize};

/// A track as returned by the Fanburst search endpoint
///
/// Every field beyond `id` is optional; Fanburst omits keys freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanburstTrack {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// Duration in seconds
    pub duration: Option<u64>,

    pub url: Option<String>,

    pub published_at: Option<String>,

    pub images: Option<FanburstImages>,

    pub user: Option<FanburstUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FanburstImages {
    pub square_150: Option<String>,
    pub square_250: Option<String>,
    pub square_500: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanburstUser {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: Option<String>,
    pub permalink: Option<String>,
    pub url: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<FanburstUser> for User {
    fn from(user: FanburstUser) -> Self {
        let mut converted = User::new(
            user.id,
            user.name.or(user.permalink).unwrap_or_default(),
        );
        converted.avatar_url = user.avatar_url;
        converted.permalink_url = user.url;
        converted
    }
}

impl From<FanburstTrack> for Track {
    fn from(track: FanburstTrack) -> Self {
        let artwork_url = track
            .images
            .and_then(|images| images.square_500.or(images.square_250).or(images.square_150));

        let mut converted = Track::new(track.id, track.title);
        converted.service = ServiceType::Fanburst;
        converted.duration = track.duration.unwrap_or(0).saturating_mul(1000);
        converted.artwork_url = artwork_url;
        converted.permalink_url = track.url;
        converted.created_at_raw = track.published_at;
        converted.user = track.user.map(User::from);
        converted
    }
}
