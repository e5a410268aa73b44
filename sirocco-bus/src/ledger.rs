//! Reference-counted demand ledger.
//!
//! The ledger tracks which subscribers hold which feed keys, in two indices
//! that must transition together:
//! - Forward: feed key -> reference count (number of distinct holders)
//! - Reverse: subscriber -> set of held keys
//!
//! A key has an entry if and only if at least one subscriber holds it; the
//! refcount always equals the number of distinct holders.
//!
//! # Thread Safety
//!
//! The ledger is not thread-safe by itself; [`MarketEventBus`](crate::bus::MarketEventBus)
//! guards it (together with the callback table) behind a single
//! reader/writer lock so both indices mutate atomically.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use sirocco_core::feed::{FeedKey, MarketDataKind};
use sirocco_core::types::SubscriberId;

/// Result of holding a key for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// The key was not held by anyone; a new upstream feed is needed.
    FirstGlobalHolder,
    /// Other subscribers already hold the key; the refcount was incremented.
    AdditionalHolder,
    /// This subscriber already held the key; nothing changed.
    AlreadyHeld,
}

/// Result of releasing a key for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// No holders remain; the upstream feed can be closed.
    LastGlobalHolder,
    /// Other subscribers still hold the key.
    StillHeld,
    /// This subscriber did not hold the key; nothing changed.
    NotHeld,
}

/// Reference-counted mapping of feed demand across subscribers.
#[derive(Debug, Default)]
pub struct DemandLedger {
    /// Forward index: key -> number of distinct holders
    refcounts: HashMap<FeedKey, usize>,
    /// Reverse index: subscriber -> held keys
    holdings: HashMap<SubscriberId, HashSet<FeedKey>>,
}

impl DemandLedger {
    /// Creates a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key` to `subscriber`'s holdings.
    ///
    /// Idempotent per `(subscriber, key)`: holding an already-held key
    /// returns [`HoldOutcome::AlreadyHeld`] and changes nothing.
    pub fn hold(&mut self, subscriber: &SubscriberId, key: FeedKey) -> HoldOutcome {
        let held = self.holdings.entry(subscriber.clone()).or_default();
        if !held.insert(key.clone()) {
            debug!(subscriber = %subscriber, key = %key, "already subscribed");
            return HoldOutcome::AlreadyHeld;
        }

        let count = self.refcounts.entry(key.clone()).or_insert(0);
        *count += 1;
        info!(subscriber = %subscriber, key = %key, refcount = *count, "subscribed");
        if *count == 1 {
            HoldOutcome::FirstGlobalHolder
        } else {
            HoldOutcome::AdditionalHolder
        }
    }

    /// Removes `key` from `subscriber`'s holdings.
    ///
    /// Releasing a key the subscriber does not hold returns
    /// [`ReleaseOutcome::NotHeld`] and changes nothing. A missing refcount
    /// for a live holding is an internal inconsistency; it is logged and
    /// treated as the last holder departing, so the upstream feed gets
    /// closed rather than leaked.
    pub fn release(&mut self, subscriber: &SubscriberId, key: &FeedKey) -> ReleaseOutcome {
        let Some(held) = self.holdings.get_mut(subscriber) else {
            warn!(subscriber = %subscriber, key = %key, "release for unknown subscriber");
            return ReleaseOutcome::NotHeld;
        };
        if !held.remove(key) {
            warn!(subscriber = %subscriber, key = %key, "release of key not held");
            return ReleaseOutcome::NotHeld;
        }
        if held.is_empty() {
            self.holdings.remove(subscriber);
        }

        let Some(count) = self.refcounts.get_mut(key) else {
            warn!(subscriber = %subscriber, key = %key, "refcount missing for live holding");
            return ReleaseOutcome::LastGlobalHolder;
        };
        *count -= 1;
        if *count == 0 {
            self.refcounts.remove(key);
            info!(subscriber = %subscriber, key = %key, "unsubscribed, feed no longer needed");
            ReleaseOutcome::LastGlobalHolder
        } else {
            info!(subscriber = %subscriber, key = %key, refcount = *count, "unsubscribed");
            ReleaseOutcome::StillHeld
        }
    }

    /// Returns a snapshot of the keys held by `subscriber`.
    #[must_use]
    pub fn holdings(&self, subscriber: &SubscriberId) -> HashSet<FeedKey> {
        self.holdings.get(subscriber).cloned().unwrap_or_default()
    }

    /// Returns a snapshot of `subscriber`'s held keys of one data kind,
    /// in stable (sorted) order.
    #[must_use]
    pub fn holdings_of_kind(&self, subscriber: &SubscriberId, kind: MarketDataKind) -> Vec<FeedKey> {
        let mut keys: Vec<FeedKey> = self
            .holdings
            .get(subscriber)
            .map(|held| held.iter().filter(|key| key.kind == kind).cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Returns a snapshot of the union of all subscribers' keys.
    ///
    /// This is the set the upstream feed manager should be driven to.
    #[must_use]
    pub fn all_keys(&self) -> HashSet<FeedKey> {
        self.refcounts.keys().cloned().collect()
    }

    /// Returns the number of distinct subscribers holding `key`.
    #[must_use]
    pub fn refcount(&self, key: &FeedKey) -> usize {
        self.refcounts.get(key).copied().unwrap_or(0)
    }

    /// Returns the number of subscribers currently holding at least one key.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.holdings.len()
    }

    /// Returns the number of distinct keys held across all subscribers.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.refcounts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sirocco_core::feed::InstrumentSpec;
    use sirocco_core::types::{AssetCode, ExchangeId};

    fn subscriber(name: &str) -> SubscriberId {
        SubscriberId::new_unchecked(name)
    }

    fn instrument(base: &str) -> InstrumentSpec {
        InstrumentSpec::new(
            ExchangeId::new_unchecked("binance"),
            AssetCode::new_unchecked(base),
            AssetCode::new_unchecked("USDT"),
        )
    }

    fn btc_ticker() -> FeedKey {
        FeedKey::ticker(instrument("BTC"))
    }

    fn eth_ticker() -> FeedKey {
        FeedKey::ticker(instrument("ETH"))
    }

    #[test]
    fn test_hold_first_and_additional() {
        let mut ledger = DemandLedger::new();

        assert_eq!(
            ledger.hold(&subscriber("a"), btc_ticker()),
            HoldOutcome::FirstGlobalHolder
        );
        assert_eq!(
            ledger.hold(&subscriber("b"), btc_ticker()),
            HoldOutcome::AdditionalHolder
        );
        assert_eq!(ledger.refcount(&btc_ticker()), 2);
    }

    #[test]
    fn test_hold_idempotent() {
        let mut ledger = DemandLedger::new();

        ledger.hold(&subscriber("a"), btc_ticker());
        assert_eq!(
            ledger.hold(&subscriber("a"), btc_ticker()),
            HoldOutcome::AlreadyHeld
        );
        assert_eq!(ledger.refcount(&btc_ticker()), 1);
        assert_eq!(ledger.holdings(&subscriber("a")).len(), 1);
    }

    #[test]
    fn test_release_last_and_still_held() {
        let mut ledger = DemandLedger::new();

        ledger.hold(&subscriber("a"), btc_ticker());
        ledger.hold(&subscriber("b"), btc_ticker());

        assert_eq!(
            ledger.release(&subscriber("a"), &btc_ticker()),
            ReleaseOutcome::StillHeld
        );
        assert_eq!(ledger.refcount(&btc_ticker()), 1);

        assert_eq!(
            ledger.release(&subscriber("b"), &btc_ticker()),
            ReleaseOutcome::LastGlobalHolder
        );
        assert_eq!(ledger.refcount(&btc_ticker()), 0);
        assert!(ledger.all_keys().is_empty());
    }

    #[test]
    fn test_release_not_held() {
        let mut ledger = DemandLedger::new();

        assert_eq!(
            ledger.release(&subscriber("a"), &btc_ticker()),
            ReleaseOutcome::NotHeld
        );

        ledger.hold(&subscriber("a"), btc_ticker());
        assert_eq!(
            ledger.release(&subscriber("a"), &eth_ticker()),
            ReleaseOutcome::NotHeld
        );
        assert_eq!(ledger.refcount(&btc_ticker()), 1);
    }

    #[test]
    fn test_release_missing_refcount_is_conservative() {
        let mut ledger = DemandLedger::new();

        // Corrupt the forward index to simulate the inconsistency.
        ledger.hold(&subscriber("a"), btc_ticker());
        ledger.refcounts.remove(&btc_ticker());

        assert_eq!(
            ledger.release(&subscriber("a"), &btc_ticker()),
            ReleaseOutcome::LastGlobalHolder
        );
        assert!(ledger.holdings(&subscriber("a")).is_empty());
    }

    #[test]
    fn test_subscriber_entry_removed_when_empty() {
        let mut ledger = DemandLedger::new();

        ledger.hold(&subscriber("a"), btc_ticker());
        assert_eq!(ledger.subscriber_count(), 1);

        ledger.release(&subscriber("a"), &btc_ticker());
        assert_eq!(ledger.subscriber_count(), 0);
    }

    #[test]
    fn test_holdings_of_kind_filters_and_sorts() {
        let mut ledger = DemandLedger::new();
        let sub = subscriber("a");

        ledger.hold(&sub, FeedKey::trades(instrument("BTC")));
        ledger.hold(&sub, eth_ticker());
        ledger.hold(&sub, btc_ticker());

        let tickers = ledger.holdings_of_kind(&sub, MarketDataKind::Ticker);
        assert_eq!(tickers, vec![btc_ticker(), eth_ticker()]);

        let books = ledger.holdings_of_kind(&sub, MarketDataKind::OrderBook);
        assert!(books.is_empty());
    }

    #[test]
    fn test_all_keys_is_union() {
        let mut ledger = DemandLedger::new();

        ledger.hold(&subscriber("a"), btc_ticker());
        ledger.hold(&subscriber("a"), eth_ticker());
        ledger.hold(&subscriber("b"), btc_ticker());

        let union = ledger.all_keys();
        assert_eq!(union.len(), 2);
        assert!(union.contains(&btc_ticker()));
        assert!(union.contains(&eth_ticker()));
    }
}
