//! Request descriptors and shared response shapes.

use serde::{Deserialize, Serialize};
use soundbyte_core::ServiceType;

/// Which API generation a request targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiVersion {
    /// The public v1 API
    #[default]
    Primary,
    /// The v2 API used by charts and play history
    Alternate,
}

/// One API call, independent of how it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub service: ServiceType,
    /// Path relative to the service base URL, or an absolute URL
    pub endpoint: String,
    pub params: Vec<(String, String)>,
    pub version: ApiVersion,
}

impl ApiRequest {
    pub fn new(service: ServiceType, endpoint: impl Into<String>) -> Self {
        Self {
            service,
            endpoint: endpoint.into(),
            params: Vec::new(),
            version: ApiVersion::Primary,
        }
    }

    pub fn soundcloud(endpoint: impl Into<String>) -> Self {
        Self::new(ServiceType::SoundCloud, endpoint)
    }

    pub fn fanburst(endpoint: impl Into<String>) -> Self {
        Self::new(ServiceType::Fanburst, endpoint)
    }

    /// Append a query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Target the alternate (v2) API.
    pub fn alternate_version(mut self) -> Self {
        self.version = ApiVersion::Alternate;
        self
    }

    /// Set a query parameter, replacing any existing value for the key.
    pub fn set_param(&mut self, key: &str, value: impl ToString) {
        self.params.retain(|(k, _)| k != key);
        self.params.push((key.to_string(), value.to_string()));
    }

    /// First value of a query parameter.
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_absolute(&self) -> bool {
        self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")
    }
}

/// A page from a `linked_partitioning` list endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkedPage<T> {
    #[serde(default = "Vec::new")]
    pub collection: Vec<T>,
    /// Link to the next page; absent on the last page
    pub next_href: Option<String>,
}
