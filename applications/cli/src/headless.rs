//! A media engine that plays nothing.
//!
//! Used for dry runs: it accepts a queue, reports the same events a real
//! engine would, and logs what it would have streamed.

use async_trait::async_trait;
use soundbyte_playback::{EngineEvent, EngineState, MediaEngine, MediaItem, Result};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Deck {
    items: Vec<MediaItem>,
    current: Option<usize>,
    state: EngineState,
    shuffle: bool,
    repeat: bool,
}

pub struct HeadlessEngine {
    deck: Mutex<Deck>,
    events: mpsc::Sender<EngineEvent>,
}

impl HeadlessEngine {
    /// Create the engine and the receiving end of its event stream.
    pub fn new() -> (Self, mpsc::Receiver<EngineEvent>) {
        let (events, receiver) = mpsc::channel(64);
        let engine = Self {
            deck: Mutex::new(Deck::default()),
            events,
        };
        (engine, receiver)
    }

    fn deck(&self) -> MutexGuard<'_, Deck> {
        self.deck.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Items currently loaded, in playback order.
    pub fn queue(&self) -> Vec<MediaItem> {
        self.deck().items.clone()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.deck().current
    }

    async fn emit(&self, event: EngineEvent) {
        if self.events.send(event).await.is_err() {
            debug!("No session attached to headless engine");
        }
    }

    async fn set_state(&self, state: EngineState) {
        self.deck().state = state;
        self.emit(EngineEvent::StateChanged(state)).await;
    }

    /// Make `index` current and announce it.
    async fn select(&self, index: Option<usize>) {
        let item = {
            let mut deck = self.deck();
            deck.current = index;
            index.and_then(|i| deck.items.get(i).cloned())
        };

        if let Some(item) = &item {
            info!(
                tag = %item.tag,
                title = %item.title,
                url = %item.source_url,
                "Now streaming (dry run)"
            );
        }
        self.emit(EngineEvent::CurrentItemChanged {
            tag: item.as_ref().map(|i| i.tag.clone()),
        })
        .await;
        if let Some(item) = item {
            self.emit(EngineEvent::PositionChanged {
                position: Duration::ZERO,
                duration: item.duration,
            })
            .await;
        }
    }

    fn step(&self, forward: bool) -> Option<usize> {
        let deck = self.deck();
        let len = deck.items.len();
        let current = deck.current?;
        match (forward, deck.repeat) {
            (true, _) if current + 1 < len => Some(current + 1),
            (true, true) => Some(0),
            (false, _) if current > 0 => Some(current - 1),
            (false, true) => len.checked_sub(1),
            _ => None,
        }
    }
}

#[async_trait]
impl MediaEngine for HeadlessEngine {
    async fn play(&self) -> Result<()> {
        let needs_item = {
            let deck = self.deck();
            deck.current.is_none() && !deck.items.is_empty()
        };

        self.set_state(EngineState::Opening).await;
        if needs_item {
            self.select(Some(0)).await;
        }
        self.set_state(EngineState::Playing).await;
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        let playing = self.deck().state == EngineState::Playing;
        if playing {
            self.set_state(EngineState::Paused).await;
        }
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.select(None).await;
        self.set_state(EngineState::None).await;
        Ok(())
    }

    async fn load_queue(&self, items: Vec<MediaItem>) -> Result<()> {
        info!(items = items.len(), "Loading queue (dry run)");
        {
            let mut deck = self.deck();
            deck.items = items;
            deck.current = None;
        }
        Ok(())
    }

    async fn item_tags(&self) -> Vec<String> {
        self.deck().items.iter().map(|i| i.tag.clone()).collect()
    }

    async fn move_to(&self, index: usize) -> Result<()> {
        let len = self.deck().items.len();
        if index >= len {
            return Err(soundbyte_playback::PlaybackError::engine(format!(
                "index {} out of range for queue of {}",
                index, len
            )));
        }
        self.select(Some(index)).await;
        Ok(())
    }

    async fn next(&self) -> Result<()> {
        match self.step(true) {
            Some(index) => self.select(Some(index)).await,
            None => self.stop().await?,
        }
        Ok(())
    }

    async fn previous(&self) -> Result<()> {
        if let Some(index) = self.step(false) {
            self.select(Some(index)).await;
        }
        Ok(())
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        let duration = {
            let deck = self.deck();
            deck.current.and_then(|i| deck.items.get(i)).map(|i| i.duration)
        };
        if let Some(duration) = duration {
            self.emit(EngineEvent::PositionChanged {
                position: position.min(duration),
                duration,
            })
            .await;
        }
        Ok(())
    }

    async fn set_shuffle(&self, enabled: bool) -> Result<()> {
        self.deck().shuffle = enabled;
        Ok(())
    }

    async fn set_repeat(&self, enabled: bool) -> Result<()> {
        self.deck().repeat = enabled;
        Ok(())
    }
}
