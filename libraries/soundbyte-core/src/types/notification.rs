/// Notification domain type
use crate::types::{Track, User};
use serde::{Deserialize, Serialize};

/// Activity on the signed-in user's own content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,

    pub created_at: Option<String>,

    #[serde(default)]
    pub origin: NotificationOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    /// Someone liked one of the user's tracks
    Favoriting,
    Comment,
    /// Someone followed the user
    Affiliation,
    Repost,
    #[serde(other)]
    Other,
}

/// Fields shared by every notification origin; which ones are present
/// depends on the notification kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationOrigin {
    pub user: Option<User>,
    pub track: Option<Track>,
    /// Comment text for `comment` notifications
    pub body: Option<String>,
}
