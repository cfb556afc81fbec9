mod comment;
mod fanburst;
mod ids;
mod notification;
mod playlist;
mod service;
mod stream_item;
mod track;
mod user;

pub use comment::Comment;
pub use fanburst::{FanburstImages, FanburstTrack, FanburstUser};
pub use notification::{Notification, NotificationKind, NotificationOrigin};
pub use playlist::Playlist;
pub use service::ServiceType;
pub use stream_item::{StreamContent, StreamItem, StreamItemKind};
pub use track::Track;
pub use user::User;

pub(crate) use ids::{deserialize_id, deserialize_optional_id};
