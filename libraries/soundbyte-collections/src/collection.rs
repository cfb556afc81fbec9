//! The incrementally loaded collection.

use crate::source::PageSource;
use crate::token::ContinuationToken;
use soundbyte_client::{ClientError, CredentialStore};
use soundbyte_core::{glyph, UserMessage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Something the UI should tell the user about a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionNotice {
    /// The collection needs a connected account; no request was made
    LoginRequired,
    /// The list exists but has no items
    NothingHere,
    /// A page failed to load
    Failed(UserMessage),
}

impl CollectionNotice {
    pub fn user_message(&self) -> UserMessage {
        match self {
            CollectionNotice::LoginRequired => UserMessage::new(
                "Please log in",
                "Connect your account to see this content.",
                glyph::ACCOUNT,
            ),
            CollectionNotice::NothingHere => UserMessage::new(
                "Nothing here",
                "There is nothing to show here yet.",
                glyph::INFO,
            ),
            CollectionNotice::Failed(message) => message.clone(),
        }
    }
}

struct State<T> {
    items: Vec<T>,
    token: ContinuationToken,
    /// Bumped by every reset; pages fetched under an older generation are dropped
    generation: u64,
}

/// Clears the in-flight flag when a fetch ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A remote list exposed as an appendable sequence.
///
/// `load_more` never fails: transport, parse and login problems all end the
/// list for this session and are reported through [`CollectionNotice`]s.
/// Only [`refresh`](Self::refresh) makes the collection loadable again.
pub struct PagedCollection<T> {
    name: String,
    page_size: u32,
    source: RwLock<Arc<dyn PageSource<T>>>,
    credentials: Arc<CredentialStore>,
    state: Mutex<State<T>>,
    in_flight: AtomicBool,
    notices: broadcast::Sender<CollectionNotice>,
}

impl<T> PagedCollection<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(
        name: impl Into<String>,
        source: Arc<dyn PageSource<T>>,
        credentials: Arc<CredentialStore>,
        page_size: u32,
    ) -> Self {
        let (notices, _) = broadcast::channel(16);
        Self {
            name: name.into(),
            page_size: page_size.max(1),
            source: RwLock::new(source),
            credentials,
            state: Mutex::new(State {
                items: Vec::new(),
                token: ContinuationToken::Unloaded,
                generation: 0,
            }),
            in_flight: AtomicBool::new(false),
            notices,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, notice: CollectionNotice) {
        // Nobody listening is fine
        let _ = self.notices.send(notice);
    }

    /// Receive notices raised by later loads.
    pub fn subscribe(&self) -> broadcast::Receiver<CollectionNotice> {
        self.notices.subscribe()
    }

    /// Load the next page with the configured page size.
    pub async fn load_next_page(&self) -> usize {
        self.load_more(self.page_size).await
    }

    /// Fetch the next page and append it. Returns how many items were added.
    pub async fn load_more(&self, requested: u32) -> usize {
        let (generation, cursor) = {
            let state = self.state();
            if state.token.is_end() {
                return 0;
            }
            (state.generation, state.token.cursor().map(str::to_owned))
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(collection = %self.name, "Load already in progress");
            return 0;
        }
        let _in_flight = InFlight(&self.in_flight);

        let source = Arc::clone(&self.source.read().unwrap_or_else(PoisonError::into_inner));

        if let Some(service) = source.requires_login() {
            if !self.credentials.is_connected(service) {
                info!(collection = %self.name, service = %service, "Login required");
                self.finish(generation);
                self.notify(CollectionNotice::LoginRequired);
                return 0;
            }
        }

        let result = source.fetch_page(cursor.as_deref(), requested.max(1)).await;

        let mut state = self.state();
        if state.generation != generation {
            debug!(collection = %self.name, "Discarding page fetched before reset");
            return 0;
        }

        match result {
            Ok(page) if page.items.is_empty() => {
                state.token = ContinuationToken::EndOfList;
                let was_empty = state.items.is_empty();
                drop(state);

                debug!(collection = %self.name, "Empty page, end of list");
                if was_empty {
                    self.notify(CollectionNotice::NothingHere);
                }
                0
            }
            Ok(page) => {
                let added = page.items.len();
                state.items.extend(page.items);
                state.token = match page.next {
                    Some(next) => ContinuationToken::Next(next),
                    None => ContinuationToken::EndOfList,
                };
                debug!(
                    collection = %self.name,
                    added,
                    total = state.items.len(),
                    token = %state.token,
                    "Page loaded"
                );
                added
            }
            Err(e) => {
                state.token = ContinuationToken::EndOfList;
                drop(state);

                let notice = match e {
                    ClientError::AuthRequired(_) => CollectionNotice::LoginRequired,
                    other => {
                        warn!(collection = %self.name, error = %other, "Failed to load page");
                        CollectionNotice::Failed(other.user_message())
                    }
                };
                self.notify(notice);
                0
            }
        }
    }

    fn finish(&self, generation: u64) {
        let mut state = self.state();
        if state.generation == generation {
            state.token = ContinuationToken::EndOfList;
        }
    }

    pub fn has_more(&self) -> bool {
        !self.state().token.is_end()
    }

    /// Discard items and token; the next load starts from the first page.
    pub fn refresh(&self) {
        let mut state = self.state();
        state.items.clear();
        state.token = ContinuationToken::Unloaded;
        state.generation += 1;
        debug!(collection = %self.name, "Collection reset");
    }

    /// Point the collection at a different list (new query, filter or genre).
    pub fn reset_with(&self, source: Arc<dyn PageSource<T>>) {
        *self.source.write().unwrap_or_else(PoisonError::into_inner) = source;
        self.refresh();
    }

    /// Snapshot of the loaded items, in arrival order.
    pub fn items(&self) -> Vec<T> {
        self.state().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().items.is_empty()
    }

    pub fn continuation_token(&self) -> ContinuationToken {
        self.state().token.clone()
    }
}
