//! SoundByte command-line front end.
//!
//! [`AppContext`] is the application root: it owns the single instances of
//! configuration, credentials, API client, telemetry and playback session,
//! and runs [`Command`]s against them.

#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod headless;

pub use app::AppContext;
pub use cli::{Cli, Command};
pub use headless::HeadlessEngine;
