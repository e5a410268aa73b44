//! The market event bus.
//!
//! Multiplexes many logical subscribers onto a minimal set of upstream
//! feeds. The bus owns two pieces of shared state - the demand ledger and
//! the callback table - guarded together by one reader/writer lock:
//!
//! - Writers (`change_subscriptions`, `clear_subscriptions`,
//!   `add_subscription`, `remove_subscription`, `register_callback`,
//!   `unregister_callbacks`) are serialized.
//! - Readers (stream getters and snapshots) proceed concurrently.
//!
//! When a subscription change flips a key absent<->present globally, the
//! new union is pushed to the upstream feed manager *inside* the write
//! critical section. Releasing the lock first would let a second writer
//! observe a union the upstream has not heard about and issue a stale
//! notification of its own; keeping the call inside the section linearizes
//! upstream notifications with state changes. The upstream contract
//! requires `update_subscriptions` to return promptly for exactly this
//! reason.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future;
use futures::stream::{BoxStream, StreamExt};
use parking_lot::RwLock;
use tracing::{debug, info};

use sirocco_core::feed::{
    FeedKey, MarketDataKind, MarketEvent, OpenOrdersEvent, OrderBookEvent, TickerEvent, TradeEvent,
};
use sirocco_core::traits::FeedManager;
use sirocco_core::types::SubscriberId;

use crate::binder::{spawn_callback, CallbackHandle};
use crate::error::EventBusError;
use crate::ledger::{DemandLedger, HoldOutcome, ReleaseOutcome};
use crate::stream::{FeedStream, LatestWins};

/// Shared state guarded by the bus lock.
///
/// The ledger and the callback table mutate together so that registration
/// and subscription changes stay mutually consistent.
#[derive(Default)]
struct BusState {
    demand: DemandLedger,
    callbacks: HashMap<SubscriberId, Vec<CallbackHandle>>,
}

/// Market-data event bus.
///
/// Subscribers declare the feed keys they want; the bus reference-counts
/// the demand, drives the upstream [`FeedManager`] to the union of all
/// subscribers' keys, and projects per-subscriber merged event streams.
///
/// All methods may be called concurrently from arbitrary threads. Stream
/// getters return lazy handles and never block behind event delivery;
/// consumer backpressure is absorbed per upstream feed by the latest-wins
/// policy (see [`LatestWins`]).
///
/// # Examples
///
/// ```ignore
/// use std::collections::HashSet;
/// use sirocco_bus::MarketEventBus;
///
/// let bus = MarketEventBus::new(manager);
/// bus.change_subscriptions(&subscriber, HashSet::from([key]))?;
/// let mut tickers = bus.get_tickers(&subscriber);
/// while let Some(event) = tickers.next().await {
///     println!("{}: {}", event.instrument, event.ticker.last);
/// }
/// ```
pub struct MarketEventBus {
    manager: Arc<dyn FeedManager>,
    state: RwLock<BusState>,
}

impl MarketEventBus {
    /// Creates a new bus driving the given upstream feed manager.
    #[must_use]
    pub fn new(manager: Arc<dyn FeedManager>) -> Self {
        Self {
            manager,
            state: RwLock::new(BusState::default()),
        }
    }

    // -- Reconciliation --------------------------------------------------

    /// Replaces `subscriber`'s holdings with `target`.
    ///
    /// Computes the add/remove delta against the subscriber's current
    /// holdings and applies it atomically. If any key transitioned
    /// absent<->present globally, the upstream manager is notified with the
    /// new union before the lock is released.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::UpstreamNotify`] if the upstream rejected
    /// the new union. The in-memory state is already updated when this is
    /// returned; the next successful call reconverges the upstream.
    pub fn change_subscriptions(
        &self,
        subscriber: &SubscriberId,
        target: HashSet<FeedKey>,
    ) -> Result<(), EventBusError> {
        info!(subscriber = %subscriber, target = target.len(), "changing subscriptions");
        let mut state = self.state.write();
        self.apply_target(&mut state, subscriber, &target)
    }

    /// Removes all of `subscriber`'s holdings.
    ///
    /// Equivalent to [`change_subscriptions`](Self::change_subscriptions)
    /// with an empty target.
    pub fn clear_subscriptions(&self, subscriber: &SubscriberId) -> Result<(), EventBusError> {
        self.change_subscriptions(subscriber, HashSet::new())
    }

    /// Adds a single key to `subscriber`'s holdings.
    pub fn add_subscription(
        &self,
        subscriber: &SubscriberId,
        key: FeedKey,
    ) -> Result<(), EventBusError> {
        let mut state = self.state.write();
        let mut target = state.demand.holdings(subscriber);
        target.insert(key);
        self.apply_target(&mut state, subscriber, &target)
    }

    /// Removes a single key from `subscriber`'s holdings.
    pub fn remove_subscription(
        &self,
        subscriber: &SubscriberId,
        key: &FeedKey,
    ) -> Result<(), EventBusError> {
        let mut state = self.state.write();
        let mut target = state.demand.holdings(subscriber);
        target.remove(key);
        self.apply_target(&mut state, subscriber, &target)
    }

    /// Applies `target` as the subscriber's holdings and notifies upstream
    /// if the global union changed. Must be called with the write lock held.
    fn apply_target(
        &self,
        state: &mut BusState,
        subscriber: &SubscriberId,
        target: &HashSet<FeedKey>,
    ) -> Result<(), EventBusError> {
        let current = state.demand.holdings(subscriber);
        let mut union_changed = false;

        for key in current.difference(target) {
            if state.demand.release(subscriber, key) == ReleaseOutcome::LastGlobalHolder {
                union_changed = true;
            }
        }
        for key in target.difference(&current) {
            if state.demand.hold(subscriber, key.clone()) == HoldOutcome::FirstGlobalHolder {
                union_changed = true;
            }
        }

        if union_changed {
            let union = state.demand.all_keys();
            debug!(feeds = union.len(), "feed union changed, updating upstream");
            self.manager.update_subscriptions(union)?;
        }
        Ok(())
    }

    // -- Stream projection -----------------------------------------------

    /// Returns the merged ticker stream for `subscriber`.
    ///
    /// The merge covers the ticker keys the subscriber holds at call time;
    /// later subscription changes do not affect the returned stream. With
    /// no ticker holdings, the stream completes on first poll.
    #[must_use]
    pub fn get_tickers(&self, subscriber: &SubscriberId) -> FeedStream<TickerEvent> {
        let state = self.state.read();
        self.project(
            &state,
            subscriber,
            MarketDataKind::Ticker,
            MarketEvent::into_ticker,
        )
    }

    /// Returns the merged order book stream for `subscriber`.
    #[must_use]
    pub fn get_order_books(&self, subscriber: &SubscriberId) -> FeedStream<OrderBookEvent> {
        let state = self.state.read();
        self.project(
            &state,
            subscriber,
            MarketDataKind::OrderBook,
            MarketEvent::into_order_book,
        )
    }

    /// Returns the merged open orders stream for `subscriber`.
    #[must_use]
    pub fn get_open_orders(&self, subscriber: &SubscriberId) -> FeedStream<OpenOrdersEvent> {
        let state = self.state.read();
        self.project(
            &state,
            subscriber,
            MarketDataKind::OpenOrders,
            MarketEvent::into_open_orders,
        )
    }

    /// Returns the merged trade stream for `subscriber`.
    #[must_use]
    pub fn get_trades(&self, subscriber: &SubscriberId) -> FeedStream<TradeEvent> {
        let state = self.state.read();
        self.project(
            &state,
            subscriber,
            MarketDataKind::Trades,
            MarketEvent::into_trade,
        )
    }

    /// Returns the untyped merged stream of one data kind for `subscriber`.
    #[must_use]
    pub fn get_events(
        &self,
        subscriber: &SubscriberId,
        kind: MarketDataKind,
    ) -> FeedStream<MarketEvent> {
        let state = self.state.read();
        self.project(&state, subscriber, kind, Some)
    }

    /// Builds the merged projection from a snapshot of the ledger. Works
    /// under either lock mode; callers pass their own guard's state.
    fn project<E: Send + 'static>(
        &self,
        state: &BusState,
        subscriber: &SubscriberId,
        kind: MarketDataKind,
        select: fn(MarketEvent) -> Option<E>,
    ) -> FeedStream<E> {
        let keys = state.demand.holdings_of_kind(subscriber, kind);
        debug!(subscriber = %subscriber, kind = %kind, feeds = keys.len(), "projecting stream");

        let upstreams: Vec<BoxStream<'static, E>> = keys
            .iter()
            .map(|key| {
                LatestWins::new(self.manager.stream(key))
                    .filter_map(move |event| future::ready(select(event)))
                    .boxed()
            })
            .collect();
        FeedStream::merge(keys, upstreams)
    }

    // -- Callback binding ------------------------------------------------

    /// Subscribes `subscriber` to `key` and routes matching events to
    /// `callback` on a dedicated task.
    ///
    /// The callback receives the subscriber's merged stream of the key's
    /// data kind as held at registration time, so a subscriber binding two
    /// keys of one kind sees both feeds on each callback. A panicking
    /// callback is logged and torn down alone; other callbacks and
    /// subscribers are unaffected.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::NoRuntime`] outside a tokio runtime, or
    /// [`EventBusError::UpstreamNotify`] if adding the key required an
    /// upstream update that failed.
    pub fn register_callback<C>(
        &self,
        key: FeedKey,
        subscriber: &SubscriberId,
        callback: C,
    ) -> Result<(), EventBusError>
    where
        C: Fn(MarketEvent) + Send + Sync + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| EventBusError::NoRuntime)?;

        info!(subscriber = %subscriber, key = %key, "registering callback");
        let mut state = self.state.write();

        let mut target = state.demand.holdings(subscriber);
        target.insert(key.clone());
        self.apply_target(&mut state, subscriber, &target)?;

        let stream = self.project(&state, subscriber, key.kind, Some);
        let handle = spawn_callback(&runtime, key, subscriber.clone(), stream, callback);
        state
            .callbacks
            .entry(subscriber.clone())
            .or_default()
            .push(handle);
        Ok(())
    }

    /// Cancels every callback registered for `subscriber`, then clears its
    /// subscriptions.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::UpstreamNotify`] if clearing the holdings
    /// required an upstream update that failed; the callbacks are cancelled
    /// regardless.
    pub fn unregister_callbacks(&self, subscriber: &SubscriberId) -> Result<(), EventBusError> {
        info!(subscriber = %subscriber, "unregistering callbacks");
        let mut state = self.state.write();

        if let Some(handles) = state.callbacks.remove(subscriber) {
            for mut handle in handles {
                handle.cancel();
            }
        }
        self.apply_target(&mut state, subscriber, &HashSet::new())
    }

    // -- Snapshots -------------------------------------------------------

    /// Returns a snapshot of `subscriber`'s held keys.
    #[must_use]
    pub fn holdings(&self, subscriber: &SubscriberId) -> HashSet<FeedKey> {
        self.state.read().demand.holdings(subscriber)
    }

    /// Returns a snapshot of `subscriber`'s held keys of one kind.
    #[must_use]
    pub fn holdings_of_kind(
        &self,
        subscriber: &SubscriberId,
        kind: MarketDataKind,
    ) -> Vec<FeedKey> {
        self.state.read().demand.holdings_of_kind(subscriber, kind)
    }

    /// Returns a snapshot of the union of all subscribers' keys.
    #[must_use]
    pub fn all_keys(&self) -> HashSet<FeedKey> {
        self.state.read().demand.all_keys()
    }

    /// Returns the number of distinct subscribers holding `key`.
    #[must_use]
    pub fn refcount(&self, key: &FeedKey) -> usize {
        self.state.read().demand.refcount(key)
    }

    /// Returns the number of subscribers holding at least one key.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.read().demand.subscriber_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use sirocco_core::error::FeedError;
    use sirocco_core::feed::InstrumentSpec;
    use sirocco_core::types::{AssetCode, ExchangeId};

    /// Upstream double that records every union it is driven to and never
    /// produces events.
    #[derive(Default)]
    struct RecordingFeedManager {
        calls: Mutex<Vec<HashSet<FeedKey>>>,
        fail_next: AtomicBool,
    }

    impl RecordingFeedManager {
        fn call_count(&self) -> usize {
            self.calls.lock().len()
        }

        fn last_call(&self) -> Option<HashSet<FeedKey>> {
            self.calls.lock().last().cloned()
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

        fn stream(&self, _key: &FeedKey) -> BoxStream<'static, MarketEvent> {
            stream::pending().boxed()
        }
    }

    fn setup() -> (Arc<RecordingFeedManager>, MarketEventBus) {
        let manager = Arc::new(RecordingFeedManager::default());
        let bus = MarketEventBus::new(Arc::clone(&manager) as Arc<dyn FeedManager>);
        (manager, bus)
    }

    fn subscriber(name: &str) -> SubscriberId {
        SubscriberId::new_unchecked(name)
    }

    fn key(base: &str) -> FeedKey {
        FeedKey::ticker(InstrumentSpec::new(
            ExchangeId::new_unchecked("binance"),
            AssetCode::new_unchecked(base),
            AssetCode::new_unchecked("USDT"),
        ))
    }

    #[test]
    fn test_change_subscriptions_notifies_once() {
        let (manager, bus) = setup();
        let target = HashSet::from([key("BTC")]);

        bus.change_subscriptions(&subscriber("a"), target.clone())
            .unwrap();

        assert_eq!(manager.call_count(), 1);
        assert_eq!(manager.last_call().unwrap(), target);
        assert_eq!(bus.all_keys(), target);
    }

    #[test]
    fn test_idempotent_change_skips_upstream() {
        let (manager, bus) = setup();
        let target = HashSet::from([key("BTC")]);

        bus.change_subscriptions(&subscriber("a"), target.clone())
            .unwrap();
        bus.change_subscriptions(&subscriber("a"), target).unwrap();

        assert_eq!(manager.call_count(), 1);
    }

    #[test]
    fn test_shared_key_notifies_only_on_edges() {
        let (manager, bus) = setup();
        let target = HashSet::from([key("BTC")]);

        bus.change_subscriptions(&subscriber("a"), target.clone())
            .unwrap();
        bus.change_subscriptions(&subscriber("b"), target.clone())
            .unwrap();
        assert_eq!(manager.call_count(), 1);
        assert_eq!(bus.refcount(&key("BTC")), 2);

        bus.clear_subscriptions(&subscriber("a")).unwrap();
        assert_eq!(manager.call_count(), 1);
        assert_eq!(bus.refcount(&key("BTC")), 1);

        bus.clear_subscriptions(&subscriber("b")).unwrap();
        assert_eq!(manager.call_count(), 2);
        assert!(manager.last_call().unwrap().is_empty());
    }

    #[test]
    fn test_add_remove_single_key() {
        let (manager, bus) = setup();
        let sub = subscriber("a");

        bus.add_subscription(&sub, key("BTC")).unwrap();
        bus.add_subscription(&sub, key("ETH")).unwrap();
        assert_eq!(bus.holdings(&sub).len(), 2);
        assert_eq!(manager.call_count(), 2);

        // Adding an already-held key is a no-op upstream.
        bus.add_subscription(&sub, key("BTC")).unwrap();
        assert_eq!(manager.call_count(), 2);

        bus.remove_subscription(&sub, &key("BTC")).unwrap();
        assert_eq!(bus.holdings(&sub), HashSet::from([key("ETH")]));
        assert_eq!(manager.call_count(), 3);
    }

    #[test]
    fn test_disjoint_swap_transitions_union() {
        let (manager, bus) = setup();
        let sub = subscriber("a");

        bus.change_subscriptions(&sub, HashSet::from([key("BTC"), key("ETH")]))
            .unwrap();
        bus.change_subscriptions(&sub, HashSet::from([key("ETH"), key("SOL")]))
            .unwrap();

        assert_eq!(manager.call_count(), 2);
        assert_eq!(
            manager.last_call().unwrap(),
            HashSet::from([key("ETH"), key("SOL")])
        );
    }

    #[test]
    fn test_upstream_failure_surfaced_state_kept() {
        let (manager, bus) = setup();
        let sub = subscriber("a");

        manager.fail_next.store(true, Ordering::SeqCst);
        let result = bus.change_subscriptions(&sub, HashSet::from([key("BTC")]));

        assert!(matches!(result, Err(EventBusError::UpstreamNotify(_))));
        // In-memory state already moved; a retry re-issues the notification.
        assert_eq!(bus.holdings(&sub), HashSet::from([key("BTC")]));

        bus.change_subscriptions(&sub, HashSet::from([key("BTC"), key("ETH")]))
            .unwrap();
        assert_eq!(manager.call_count(), 1);
        assert_eq!(
            manager.last_call().unwrap(),
            HashSet::from([key("BTC"), key("ETH")])
        );
    }

    #[tokio::test]
    async fn test_stream_snapshot_at_call_time() {
        let (_manager, bus) = setup();
        let sub = subscriber("a");

        bus.change_subscriptions(&sub, HashSet::from([key("BTC"), key("ETH")]))
            .unwrap();
        let stream = bus.get_tickers(&sub);
        assert_eq!(stream.keys().len(), 2);

        // A later change does not alter the already-returned stream.
        bus.change_subscriptions(&sub, HashSet::from([key("SOL")]))
            .unwrap();
        assert_eq!(stream.keys().len(), 2);

        let fresh = bus.get_tickers(&sub);
        assert_eq!(fresh.keys(), &[key("SOL")]);
    }

    #[tokio::test]
    async fn test_stream_empty_for_unknown_subscriber() {
        let (_manager, bus) = setup();
        let mut stream = bus.get_tickers(&subscriber("nobody"));
        assert!(stream.is_empty());
        assert_eq!(stream.next().await, None);
    }

    #[test]
    fn test_register_callback_outside_runtime() {
        let (_manager, bus) = setup();
        let result = bus.register_callback(key("BTC"), &subscriber("a"), |_event| {});
        assert!(matches!(result, Err(EventBusError::NoRuntime)));
    }
}
