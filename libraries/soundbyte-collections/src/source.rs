//! Page sources: where a collection gets its pages from.

use crate::token::Continuation;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use soundbyte_client::{fetch, ApiClient, ApiRequest, LinkedPage, Result};
use soundbyte_core::ServiceType;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// One fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Token for the following page; `None` when the server signalled the end
    pub next: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next: Option<String>) -> Self {
        Self { items, next }
    }

    /// A final page.
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// Fetches pages of one remote list.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    /// Service whose account must be connected before fetching, if any.
    fn requires_login(&self) -> Option<ServiceType> {
        None
    }

    /// Fetch up to `count` items starting at `cursor` (`None` = first page).
    async fn fetch_page(&self, cursor: Option<&str>, count: u32) -> Result<Page<T>>;
}

/// A response body that can be split into items and a next-page link.
pub trait PageShape<T>: DeserializeOwned + Send {
    fn into_parts(self) -> (Vec<T>, Option<String>);
}

impl<T> PageShape<T> for LinkedPage<T>
where
    T: DeserializeOwned + Send,
{
    fn into_parts(self) -> (Vec<T>, Option<String>) {
        (self.collection, self.next_href)
    }
}

impl<T> PageShape<T> for Vec<T>
where
    T: DeserializeOwned + Send,
{
    fn into_parts(self) -> (Vec<T>, Option<String>) {
        (self, None)
    }
}

/// A [`PageSource`] backed by one REST list endpoint.
///
/// Every per-endpoint quirk lives in configuration: the base request, the
/// [`Continuation`] rule, the response shape `P` and the login requirement.
pub struct EndpointSource<T, P = LinkedPage<T>> {
    api: Arc<dyn ApiClient>,
    request: ApiRequest,
    continuation: Continuation,
    login: Option<ServiceType>,
    _shape: PhantomData<fn() -> (T, P)>,
}

impl<T, P> EndpointSource<T, P> {
    pub fn new(api: Arc<dyn ApiClient>, request: ApiRequest, continuation: Continuation) -> Self {
        Self {
            api,
            request,
            continuation,
            login: None,
            _shape: PhantomData,
        }
    }

    /// Gate fetching on a connected account for `service`.
    pub fn requiring_login(mut self, service: ServiceType) -> Self {
        self.login = Some(service);
        self
    }

    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    fn page_request(&self, cursor: Option<&str>, count: u32) -> ApiRequest {
        let mut request = self.request.clone();
        match self.continuation {
            Continuation::PageNumber => {
                request.set_param("per_page", count);
                request.set_param("page", cursor.unwrap_or("1"));
            }
            Continuation::Offset | Continuation::Cursor => {
                request.set_param("limit", count);
                request.set_param("linked_partitioning", 1);
                if let Some(cursor) = cursor {
                    request.set_param(self.continuation.param_name(), cursor);
                }
            }
        }
        request
    }
}

#[async_trait]
impl<T, P> PageSource<T> for EndpointSource<T, P>
where
    T: Send + 'static,
    P: PageShape<T> + 'static,
{
    fn requires_login(&self) -> Option<ServiceType> {
        self.login
    }

    async fn fetch_page(&self, cursor: Option<&str>, count: u32) -> Result<Page<T>> {
        let request = self.page_request(cursor, count);
        let shape: P = fetch(self.api.as_ref(), &request).await?;
        let (items, next_href) = shape.into_parts();

        let next = match self.continuation {
            // A short page is the last one
            Continuation::PageNumber if items.len() < count as usize => None,
            Continuation::PageNumber => Some(Continuation::next_page_number(cursor)),
            Continuation::Offset | Continuation::Cursor => {
                self.continuation.extract(next_href.as_deref())
            }
        };

        debug!(
            endpoint = %self.request.endpoint,
            items = items.len(),
            next = ?next,
            "Fetched page"
        );
        Ok(Page::new(items, next))
    }
}
