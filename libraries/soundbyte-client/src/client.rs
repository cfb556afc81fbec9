//! HTTP client for SoundCloud and Fanburst.

use crate::credentials::CredentialStore;
use crate::error::{ClientError, Result};
use crate::resources::Resources;
use crate::types::{ApiRequest, ApiVersion};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use soundbyte_core::{ApiSettings, ServiceType};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// The operations every API consumer is written against.
///
/// [`SoundByteClient`] is the production implementation; tests substitute
/// fakes that count invocations.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// GET an endpoint and return its JSON body.
    async fn get_json(&self, request: &ApiRequest) -> Result<serde_json::Value>;

    /// PUT to an endpoint; `true` when the server accepted it.
    async fn put(&self, request: &ApiRequest, body: Option<serde_json::Value>) -> Result<bool>;

    /// DELETE an endpoint; `true` when the server accepted it.
    async fn delete(&self, request: &ApiRequest) -> Result<bool>;

    /// Whether the endpoint answers with a success status.
    async fn exists(&self, request: &ApiRequest) -> Result<bool>;
}

/// GET an endpoint and deserialize it into `T`.
///
/// A body that does not match `T` becomes [`ClientError::ParseError`].
pub async fn fetch<T, A>(api: &A, request: &ApiRequest) -> Result<T>
where
    T: DeserializeOwned,
    A: ApiClient + ?Sized,
{
    let value = api.get_json(request).await?;
    serde_json::from_value(value).map_err(|e| {
        ClientError::ParseError(format!("Failed to parse {}: {}", request.endpoint, e))
    })
}

/// Main client for the SoundCloud and Fanburst REST APIs.
///
/// # Example
///
/// ```ignore
/// use soundbyte_client::{ApiRequest, CredentialStore, SoundByteClient, ApiClient};
/// use soundbyte_core::{ApiSettings, ServiceType};
/// use std::sync::Arc;
///
/// let credentials = Arc::new(CredentialStore::with_token(ServiceType::SoundCloud, "token"));
/// let client = SoundByteClient::new(ApiSettings::default(), credentials)?;
///
/// let me = client.get_json(&ApiRequest::soundcloud("/me")).await?;
/// println!("Logged in as {}", me["username"]);
/// ```
pub struct SoundByteClient {
    http: Client,
    settings: ApiSettings,
    credentials: Arc<CredentialStore>,
}

impl SoundByteClient {
    /// Create a new client with the given API settings.
    pub fn new(settings: ApiSettings, credentials: Arc<CredentialStore>) -> Result<Self> {
        let settings = ApiSettings {
            soundcloud_url: normalize_base_url(&settings.soundcloud_url)?,
            soundcloud_v2_url: normalize_base_url(&settings.soundcloud_v2_url)?,
            fanburst_url: normalize_base_url(&settings.fanburst_url)?,
            ..settings
        };

        // Create HTTP client with reasonable defaults
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("SoundByte/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            settings,
            credentials,
        })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Typed resource helpers bound to this client.
    pub fn resources(&self) -> Resources<'_> {
        Resources::new(self, &self.credentials)
    }

    fn base_url(&self, service: ServiceType, version: ApiVersion) -> &str {
        match (service, version) {
            (ServiceType::SoundCloud, ApiVersion::Primary) => &self.settings.soundcloud_url,
            (ServiceType::SoundCloud, ApiVersion::Alternate) => &self.settings.soundcloud_v2_url,
            (ServiceType::Fanburst, _) => &self.settings.fanburst_url,
        }
    }

    fn client_id(&self, service: ServiceType) -> &str {
        match service {
            ServiceType::SoundCloud => &self.settings.soundcloud_client_id,
            ServiceType::Fanburst => &self.settings.fanburst_client_id,
        }
    }

    /// Resolve the full URL of a request, with every parameter encoded.
    pub fn build_url(&self, request: &ApiRequest) -> Result<Url> {
        let raw = if request.is_absolute() {
            request.endpoint.clone()
        } else {
            let endpoint = request.endpoint.trim_start_matches('/');
            format!(
                "{}/{}",
                self.base_url(request.service, request.version),
                endpoint
            )
        };

        let mut url = Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", raw, e)))?;

        let has_client_id = request.param_value("client_id").is_some()
            || url.query_pairs().any(|(k, _)| k == "client_id");

        {
            let mut query = url.query_pairs_mut();
            for (key, value) in &request.params {
                query.append_pair(key, value);
            }
            let client_id = self.client_id(request.service);
            if !has_client_id && !client_id.is_empty() {
                query.append_pair("client_id", client_id);
            }
        }

        // `query_pairs_mut` leaves a dangling `?` when nothing was appended
        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok(url)
    }

    fn authorize(&self, builder: RequestBuilder, service: ServiceType) -> RequestBuilder {
        match self.credentials.token(service) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        builder.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ClientError::ServerUnreachable(e.to_string())
            } else {
                ClientError::Request(e)
            }
        })
    }
}

#[async_trait]
impl ApiClient for SoundByteClient {
    async fn get_json(&self, request: &ApiRequest) -> Result<serde_json::Value> {
        let url = self.build_url(request)?;
        debug!(url = %redact(&url), "GET");

        let builder = self.authorize(self.http.get(url), request.service);
        let response = self.send(builder).await?;
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                ClientError::ParseError(format!(
                    "Failed to parse response from {}: {}",
                    request.endpoint, e
                ))
            })
        } else if status.as_u16() == 401 {
            warn!(endpoint = %request.endpoint, "Request rejected: unauthorized");
            Err(ClientError::Unauthorized)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ClientError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }

    async fn put(&self, request: &ApiRequest, body: Option<serde_json::Value>) -> Result<bool> {
        let url = self.build_url(request)?;
        debug!(url = %redact(&url), "PUT");

        let mut builder = self.authorize(self.http.put(url), request.service);
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = self.send(builder).await?;
        Ok(response.status().is_success())
    }

    async fn delete(&self, request: &ApiRequest) -> Result<bool> {
        let url = self.build_url(request)?;
        debug!(url = %redact(&url), "DELETE");

        let builder = self.authorize(self.http.delete(url), request.service);
        let response = self.send(builder).await?;
        Ok(response.status().is_success())
    }

    async fn exists(&self, request: &ApiRequest) -> Result<bool> {
        let url = self.build_url(request)?;
        debug!(url = %redact(&url), "Checking existence");

        let builder = self.authorize(self.http.get(url), request.service);
        let response = self.send(builder).await?;
        Ok(response.status().is_success())
    }
}

fn normalize_base_url(url: &str) -> Result<String> {
    if url.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let url = url.trim_end_matches('/').to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    Ok(url)
}

/// Strip the client id before a URL is logged.
fn redact(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if k == "client_id" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), value)
        })
        .collect();

    if pairs.is_empty() {
        return redacted.to_string();
    }

    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ApiSettings {
        ApiSettings {
            soundcloud_client_id: "primary".to_string(),
            fanburst_client_id: "fb-key".to_string(),
            ..ApiSettings::default()
        }
    }

    fn client() -> SoundByteClient {
        SoundByteClient::new(settings(), Arc::new(CredentialStore::new())).expect("valid settings")
    }

    #[test]
    fn test_url_validation() {
        let credentials = Arc::new(CredentialStore::new());

        let mut bad = settings();
        bad.soundcloud_url = String::new();
        assert!(SoundByteClient::new(bad, credentials.clone()).is_err());

        let mut bad = settings();
        bad.fanburst_url = "ftp://fanburst.com".to_string();
        assert!(SoundByteClient::new(bad, credentials.clone()).is_err());

        assert!(SoundByteClient::new(settings(), credentials).is_ok());
    }

    #[test]
    fn test_url_normalization() {
        let mut custom = settings();
        custom.soundcloud_url = "https://api.example.com///".to_string();
        let client = SoundByteClient::new(custom, Arc::new(CredentialStore::new())).unwrap();

        assert_eq!(client.settings().soundcloud_url, "https://api.example.com");
    }

    #[test]
    fn build_url_appends_client_id_and_encodes() {
        let url = client()
            .build_url(&ApiRequest::soundcloud("/tracks").param("q", "deep house & techno"))
            .unwrap();

        assert_eq!(url.host_str(), Some("api.soundcloud.com"));
        assert_eq!(url.path(), "/tracks");
        assert_eq!(
            url.query(),
            Some("q=deep+house+%26+techno&client_id=primary")
        );
    }

    #[test]
    fn build_url_keeps_explicit_client_id() {
        let url = client()
            .build_url(&ApiRequest::soundcloud("/tracks/1/stream").param("client_id", "backup"))
            .unwrap();

        assert_eq!(url.query(), Some("client_id=backup"));
    }

    #[test]
    fn build_url_selects_base_by_service_and_version() {
        let client = client();

        let charts = client
            .build_url(&ApiRequest::soundcloud("/charts").alternate_version())
            .unwrap();
        assert_eq!(charts.host_str(), Some("api-v2.soundcloud.com"));

        let search = client
            .build_url(&ApiRequest::fanburst("/tracks/search"))
            .unwrap();
        assert_eq!(search.host_str(), Some("api.fanburst.com"));
        assert_eq!(search.query(), Some("client_id=fb-key"));
    }

    #[test]
    fn build_url_uses_absolute_endpoint_verbatim() {
        let url = client()
            .build_url(&ApiRequest::soundcloud(
                "https://api.soundcloud.com/me/activities?cursor=abc&client_id=primary",
            ))
            .unwrap();

        assert_eq!(url.query(), Some("cursor=abc&client_id=primary"));
    }

    #[test]
    fn redact_hides_client_id() {
        let url = Url::parse("https://api.soundcloud.com/tracks?q=x&client_id=secret").unwrap();
        let redacted = redact(&url);
        assert!(!redacted.contains("secret"));
        assert!(redacted.contains("q=x"));
    }
}
