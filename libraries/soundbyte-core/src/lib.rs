//! SoundByte Core
//!
//! Provider-agnostic records, configuration and error presentation shared by
//! every SoundByte crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `User`, `Comment`, `Notification`,
//!   `StreamItem`, plus the typed Fanburst schema
//! - **Configuration**: `SoundByteConfig`, loaded from TOML and `SOUNDBYTE__*`
//!   environment variables
//! - **Error Presentation**: `UserMessage` (title / description / glyph) used
//!   by every user-visible failure
//! - **Telemetry**: a fire-and-forget `Telemetry` contract
//!
//! # Example
//!
//! ```rust
//! use soundbyte_core::types::Track;
//!
//! let json = r#"{"id": 42, "title": "Night Drive", "duration": 215000}"#;
//! let track: Track = serde_json::from_str(json).unwrap();
//!
//! assert_eq!(track.id, "42");
//! assert_eq!(track.duration().as_secs(), 215);
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use config::{ApiSettings, CollectionSettings, PlaybackSettings, SoundByteConfig};
pub use error::{glyph, Result, SoundByteError, UserMessage};
pub use telemetry::{Telemetry, TracingTelemetry};

pub use types::{
    Comment, FanburstTrack, Notification, NotificationKind, Playlist, ServiceType, StreamContent,
    StreamItem, StreamItemKind, Track, User,
};
