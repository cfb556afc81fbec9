//! Command-line arguments.

use clap::{Parser, Subcommand};
use soundbyte_collections::ChartKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "soundbyte")]
#[command(about = "Browse and play SoundCloud and Fanburst from the terminal", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SoundCloud access token obtained from the login flow
    #[arg(long, env = "SOUNDBYTE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show your stream (requires a token)
    Stream {
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Show liked tracks
    Likes {
        /// Whose likes to show; defaults to your own (requires a token)
        #[arg(short, long)]
        user: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Search for tracks
    Search {
        query: String,
        /// Search Fanburst instead of SoundCloud
        #[arg(long)]
        fanburst: bool,
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Show the charts
    Charts {
        /// Genre, e.g. "techno"; all music when omitted
        #[arg(short, long)]
        genre: Option<String>,
        /// top or trending
        #[arg(short, long, default_value = "top")]
        kind: ChartKind,
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Find a client id that can currently stream
    ResolveKey,
    /// Queue a playlist on a headless engine and report what would play
    Play {
        playlist_id: String,
        #[arg(long)]
        shuffle: bool,
        /// Track id to start from
        #[arg(long)]
        start: Option<String>,
    },
}
