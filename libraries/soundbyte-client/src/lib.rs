//! SoundByte API Client
//!
//! HTTP client library for the SoundCloud and Fanburst REST APIs.
//!
//! # Features
//!
//! - **Requests**: `get` / `put` / `delete` / `exists` behind the [`ApiClient`] trait
//! - **Authentication**: bearer token attached whenever the [`CredentialStore`]
//!   reports the request's service as connected
//! - **Typed decoding**: [`fetch`] deserializes JSON into any serde shape
//! - **Resources**: track/user/playlist lookup, likes and follows
//!
//! # Example
//!
//! ```ignore
//! use soundbyte_client::{fetch, ApiRequest, CredentialStore, SoundByteClient};
//! use soundbyte_core::{ApiSettings, Track};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Arc::new(CredentialStore::new());
//!     let client = SoundByteClient::new(ApiSettings::default(), credentials)?;
//!
//!     let track: Track = fetch(&client, &ApiRequest::soundcloud("/tracks/293")).await?;
//!     println!("{} by {}", track.title, track.artist());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod credentials;
mod error;
mod resources;
mod types;

// Re-export main types
pub use client::{fetch, ApiClient, SoundByteClient};
pub use credentials::CredentialStore;
pub use error::{ClientError, Result};
pub use resources::Resources;
pub use types::{ApiRequest, ApiVersion, LinkedPage};
