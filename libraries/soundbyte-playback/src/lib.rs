//! SoundByte - Playback Session Management
//!
//! Coordinates what is playing for SoundByte.
//!
//! This crate provides:
//! - The playback session: queue reuse or rebuild per session token, seek to
//!   a starting track with bounded retries, transport controls
//! - Stream URL construction for SoundCloud and Fanburst tracks
//! - API key selection with canary probing and backup keys
//! - UI state derived from media engine events (`watch` + `broadcast`)
//!
//! # Architecture
//!
//! `soundbyte-playback` never decodes audio. The host platform supplies a
//! [`MediaEngine`]; the session only drives it and observes its
//! [`EngineEvent`]s. Tiles and system overlays plug in through
//! [`NowPlayingSurfaces`], and are always best-effort.
//!
//! # Example
//!
//! ```rust,ignore
//! use soundbyte_playback::{PlaybackSession, StreamQueueBuilder};
//! use std::sync::Arc;
//!
//! let builder = Arc::new(StreamQueueBuilder::new(api.clone(), &config.api, 500));
//! let session = Arc::new(PlaybackSession::new(
//!     engine,
//!     builder,
//!     api,
//!     credentials,
//!     config.playback.clone(),
//! ));
//! session.attach(engine_events);
//!
//! if let Err(e) = session.start_playback(&tracks, "playlist-123", false, None).await {
//!     eprintln!("{}", e);
//! }
//! ```

#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod keys;
pub mod queue;
pub mod session;
pub mod surfaces;
pub mod types;

pub use engine::{EngineEvent, MediaEngine};
pub use error::{PlaybackError, Result};
pub use keys::ApiKeyResolver;
pub use queue::{BuiltQueue, PlaybackQueue, QueueBuilder, StreamQueueBuilder};
pub use session::PlaybackSession;
pub use surfaces::{NoSurfaces, NowPlayingSurfaces};
pub use types::{EngineState, MediaItem, NowPlaying, SessionEvent, END_OF_LIST};
