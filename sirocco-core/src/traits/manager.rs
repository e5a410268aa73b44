//! Upstream feed manager trait.

use std::collections::HashSet;

use futures::stream::BoxStream;

use crate::error::FeedError;
use crate::feed::{FeedKey, MarketEvent};

/// Upstream subscription manager consumed by the event bus.
///
/// Implementations own the actual exchange connections. The bus
/// deduplicates demand at the [`FeedKey`] level and drives the manager to
/// keep its upstream connections matching exactly the union of all
/// subscribers' keys; the manager is free to deduplicate underlying
/// transport connections further.
///
/// # Contract
///
/// - [`update_subscriptions`](Self::update_subscriptions) is invoked while
///   the bus holds its write lock. Implementations must return promptly
///   (enqueue reconnection work rather than performing it inline) and must
///   not call back into the bus, or they will deadlock it.
/// - [`stream`](Self::stream) returns a lazy sequence for one key; nothing
///   flows until the caller polls it, and dropping it releases whatever the
///   manager allocated for that subscription. Every event yielded carries
///   the key's data kind.
pub trait FeedManager: Send + Sync {
    /// Reconciles upstream connections to match exactly `keys`.
    ///
    /// Idempotent: calling with an unchanged set is a no-op for the
    /// manager's connection state.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] if the new subscription set could not be
    /// accepted. The bus surfaces the failure to its caller without rolling
    /// back its own state; a later successful call reconverges.
    fn update_subscriptions(&self, keys: HashSet<FeedKey>) -> Result<(), FeedError>;

    /// Returns a lazy event stream for one feed key.
    ///
    /// Each call returns a freshly subscribable sequence; the manager
    /// decides whether calls share an underlying connection.
    fn stream(&self, key: &FeedKey) -> BoxStream<'static, MarketEvent>;
}

impl<M: FeedManager + ?Sized> FeedManager for std::sync::Arc<M> {
    fn update_subscriptions(&self, keys: HashSet<FeedKey>) -> Result<(), FeedError> {
        (**self).update_subscriptions(keys)
    }

    fn stream(&self, key: &FeedKey) -> BoxStream<'static, MarketEvent> {
        (**self).stream(key)
    }
}
