//! Shared test fixtures for the event bus integration suite.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future;
use futures::stream::{BoxStream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use sirocco_core::data::Ticker;
use sirocco_core::error::FeedError;
use sirocco_core::feed::{FeedKey, InstrumentSpec, MarketEvent, TickerEvent};
use sirocco_core::traits::FeedManager;
use sirocco_core::types::{AssetCode, ExchangeId, Price, SubscriberId, Timestamp};

/// Upstream double: records every union it is driven to and exposes
/// controllable per-key event channels.
pub struct RecordingFeedManager {
    calls: Mutex<Vec<HashSet<FeedKey>>>,
    senders: Mutex<HashMap<FeedKey, broadcast::Sender<MarketEvent>>>,
    fail_next: AtomicBool,
}

impl RecordingFeedManager {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            senders: Mutex::new(HashMap::new()),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Number of `update_subscriptions` calls accepted so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// The most recent union pushed upstream, if any.
    pub fn last_call(&self) -> Option<HashSet<FeedKey>> {
        self.calls.lock().last().cloned()
    }

    /// Makes the next `update_subscriptions` call fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Emits an event on one key's feed. Returns false if nothing is
    /// currently subscribed to that feed.
    pub fn emit(&self, key: &FeedKey, event: MarketEvent) -> bool {
        self.sender(key).send(event).is_ok()
    }

    fn sender(&self, key: &FeedKey) -> broadcast::Sender<MarketEvent> {
        self.senders
            .lock()
            .entry(key.clone())
            .or_insert_with(|| broadcast::channel(64).0)
            .clone()
    }
}

impl FeedManager for RecordingFeedManager {
    fn update_subscriptions(&self, keys: HashSet<FeedKey>) -> Result<(), FeedError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(FeedError::internal("injected failure"));
        }
        self.calls.lock().push(keys);
        Ok(())
    }

    fn stream(&self, key: &FeedKey) -> BoxStream<'static, MarketEvent> {
        let receiver = self.sender(key).subscribe();
        BroadcastStream::new(receiver)
            .filter_map(|result| future::ready(result.ok()))
            .boxed()
    }
}

pub fn subscriber(name: &str) -> SubscriberId {
    SubscriberId::new(name).unwrap()
}

pub fn instrument(base: &str) -> InstrumentSpec {
    InstrumentSpec::new(
        ExchangeId::new("binance").unwrap(),
        AssetCode::new(base).unwrap(),
        AssetCode::new("USDT").unwrap(),
    )
}

pub fn ticker_key(base: &str) -> FeedKey {
    FeedKey::ticker(instrument(base))
}

pub fn ticker_event(base: &str, last: i64) -> MarketEvent {
    let last = Price::new(last.into()).unwrap();
    MarketEvent::Ticker(TickerEvent {
        instrument: instrument(base),
        ticker: Ticker::new(last, last, last, Timestamp::new_unchecked(1_704_067_200_000)),
    })
}
