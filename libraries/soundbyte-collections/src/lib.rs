//! SoundByte Collections
//!
//! Incrementally loaded remote lists for virtualized views.
//!
//! Every list SoundByte shows (stream, likes, search results, charts,
//! comments...) is one generic [`PagedCollection`] over a [`PageSource`].
//! Per-endpoint differences are configuration on [`EndpointSource`]:
//!
//! - the continuation rule ([`Continuation::Offset`], [`Continuation::Cursor`]
//!   or locally counted [`Continuation::PageNumber`])
//! - the response shape ([`PageShape`])
//! - whether a connected account is required
//!
//! # Failure model
//!
//! `load_more` returns a count, never an error. Any failure ends the list
//! for the session (`"eol"`) and raises a [`CollectionNotice`] for the UI.
//!
//! # Example
//!
//! ```rust,ignore
//! use soundbyte_collections::Collections;
//!
//! let catalog = Collections::new(api, credentials, &config.collections);
//! let likes = catalog.my_likes();
//!
//! while likes.has_more() {
//!     likes.load_next_page().await;
//! }
//! println!("{} liked tracks", likes.len());
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod collection;
pub mod source;
pub mod token;

pub use catalog::{ChartKind, Collections, ALL_MUSIC};
pub use collection::{CollectionNotice, PagedCollection};
pub use source::{EndpointSource, Page, PageShape, PageSource};
pub use token::{Continuation, ContinuationToken, END_OF_LIST};
