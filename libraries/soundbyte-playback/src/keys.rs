//! Streaming API key selection.

use soundbyte_client::{ApiClient, ApiRequest};
use soundbyte_core::ApiSettings;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Picks a SoundCloud client id that can currently stream.
///
/// Keys get rate limited independently, so each candidate is probed against
/// a known-stable canary track: the primary key first, then the backups in
/// order. When every probe fails the primary key is returned anyway.
pub struct ApiKeyResolver {
    api: Arc<dyn ApiClient>,
    primary: String,
    backups: Vec<String>,
    canary_track_id: u64,
}

impl ApiKeyResolver {
    pub fn new(api: Arc<dyn ApiClient>, settings: &ApiSettings) -> Self {
        Self {
            api,
            primary: settings.soundcloud_client_id.clone(),
            backups: settings.backup_client_ids.clone(),
            canary_track_id: settings.canary_track_id,
        }
    }

    fn canary(&self, key: &str) -> ApiRequest {
        ApiRequest::soundcloud(format!("/tracks/{}/stream", self.canary_track_id))
            .param("client_id", key)
    }

    /// Probe the candidates and return the first working key.
    pub async fn resolve(&self) -> String {
        let candidates = std::iter::once(&self.primary).chain(self.backups.iter());

        for (index, key) in candidates.enumerate() {
            if key.is_empty() {
                continue;
            }

            match self.api.exists(&self.canary(key)).await {
                Ok(true) => {
                    if index > 0 {
                        info!(backup = index, "Primary key rejected, streaming with backup key");
                    }
                    return key.clone();
                }
                Ok(false) => debug!(candidate = index, "Canary probe rejected key"),
                Err(e) => debug!(candidate = index, error = %e, "Canary probe failed"),
            }
        }

        warn!("No API key passed the canary probe, falling back to the primary key");
        self.primary.clone()
    }
}
