/// SoundByte configuration
use crate::error::{Result, SoundByteError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SoundByteConfig {
    #[serde(default = "default_api")]
    pub api: ApiSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_collections")]
    pub collections: CollectionSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_soundcloud_url")]
    pub soundcloud_url: String,

    /// Base URL of the alternate (v2) SoundCloud API used by charts and history
    #[serde(default = "default_soundcloud_v2_url")]
    pub soundcloud_v2_url: String,

    #[serde(default = "default_fanburst_url")]
    pub fanburst_url: String,

    #[serde(default)]
    pub soundcloud_client_id: String,

    /// Tried in order when the primary client id fails the canary probe
    #[serde(default)]
    pub backup_client_ids: Vec<String>,

    #[serde(default)]
    pub fanburst_client_id: String,

    /// Track whose stream endpoint is probed to test a client id
    #[serde(default = "default_canary_track_id")]
    pub canary_track_id: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// How many times to look for the starting track in a freshly built queue
    #[serde(default = "default_seek_attempts")]
    pub seek_attempts: u32,

    #[serde(default = "default_seek_delay_ms")]
    pub seek_delay_ms: u64,

    /// Upper bound on the number of tracks handed to the media engine
    #[serde(default = "default_max_queue_tracks")]
    pub max_queue_tracks: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectionSettings {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl SoundByteConfig {
    /// Load configuration from an optional TOML file and the environment.
    ///
    /// Environment variables use the `SOUNDBYTE` prefix and `__` between
    /// sections, e.g. `SOUNDBYTE_API__SOUNDCLOUD_CLIENT_ID`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if path.exists() {
                debug!(path = %path.display(), "Loading configuration file");
                settings = settings.add_source(config::File::from(path));
            } else {
                return Err(SoundByteError::config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("SOUNDBYTE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("api.backup_client_ids")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| SoundByteError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| SoundByteError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.soundcloud_client_id.is_empty() {
            return Err(SoundByteError::config(
                "SoundCloud client id is required (set SOUNDBYTE_API__SOUNDCLOUD_CLIENT_ID)",
            ));
        }

        for url in [
            &self.api.soundcloud_url,
            &self.api.soundcloud_v2_url,
            &self.api.fanburst_url,
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SoundByteError::config(format!(
                    "API base URL must start with http:// or https://: {}",
                    url
                )));
            }
        }

        if self.playback.seek_attempts == 0 {
            return Err(SoundByteError::config("playback.seek_attempts must be at least 1"));
        }

        Ok(())
    }
}

// Default values
fn default_api() -> ApiSettings {
    ApiSettings {
        soundcloud_url: default_soundcloud_url(),
        soundcloud_v2_url: default_soundcloud_v2_url(),
        fanburst_url: default_fanburst_url(),
        soundcloud_client_id: String::new(),
        backup_client_ids: Vec::new(),
        fanburst_client_id: String::new(),
        canary_track_id: default_canary_track_id(),
    }
}

fn default_soundcloud_url() -> String {
    "https://api.soundcloud.com".to_string()
}

fn default_soundcloud_v2_url() -> String {
    "https://api-v2.soundcloud.com".to_string()
}

fn default_fanburst_url() -> String {
    "https://api.fanburst.com".to_string()
}

fn default_canary_track_id() -> u64 {
    320_126_814
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        seek_attempts: default_seek_attempts(),
        seek_delay_ms: default_seek_delay_ms(),
        max_queue_tracks: default_max_queue_tracks(),
    }
}

fn default_seek_attempts() -> u32 {
    50
}

fn default_seek_delay_ms() -> u64 {
    200
}

fn default_max_queue_tracks() -> usize {
    500
}

fn default_collections() -> CollectionSettings {
    CollectionSettings {
        page_size: default_page_size(),
    }
}

fn default_page_size() -> u32 {
    50
}

impl Default for SoundByteConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            playback: default_playback(),
            collections: default_collections(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        default_api()
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        default_playback()
    }
}

impl Default for CollectionSettings {
    fn default() -> Self {
        default_collections()
    }
}
