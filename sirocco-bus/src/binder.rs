//! Callback binding internals.
//!
//! Couples a subscription's lifetime to a user callback: each registered
//! callback gets a dedicated tokio task that drives the subscriber's
//! projected stream into the callback. Panics in the callback are caught
//! and tear down only that callback's task; other subscribers and other
//! callbacks are unaffected.

use std::panic::{catch_unwind, AssertUnwindSafe};

use futures::StreamExt;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use sirocco_core::feed::{FeedKey, MarketEvent};
use sirocco_core::types::SubscriberId;

use crate::stream::FeedStream;

/// Handle for one bound callback.
///
/// Dropping or cancelling the handle aborts the delivery task; the task's
/// stream is dropped with it, releasing its upstream subscriptions.
#[derive(Debug)]
pub(crate) struct CallbackHandle {
    key: FeedKey,
    subscriber: SubscriberId,
    task: Option<JoinHandle<()>>,
    cancelled: bool,
}

impl CallbackHandle {
    /// Cancels the delivery task.
    ///
    /// Teardown problems never propagate; anything unexpected is logged.
    pub(crate) fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        if let Some(task) = self.task.take() {
            task.abort();
        }
        debug!(subscriber = %self.subscriber, key = %self.key, "callback cancelled");
    }
}

impl Drop for CallbackHandle {
    fn drop(&mut self) {
        if !self.cancelled {
            if let Some(task) = self.task.take() {
                task.abort();
            }
        }
    }
}

/// Spawns the delivery task for one callback registration.
pub(crate) fn spawn_callback<C>(
    runtime: &Handle,
    key: FeedKey,
    subscriber: SubscriberId,
    stream: FeedStream<MarketEvent>,
    callback: C,
) -> CallbackHandle
where
    C: Fn(MarketEvent) + Send + Sync + 'static,
{
    let task = runtime.spawn(deliver(stream, key.clone(), subscriber.clone(), callback));
    CallbackHandle {
        key,
        subscriber,
        task: Some(task),
        cancelled: false,
    }
}

/// Drives a projected stream into a callback until the stream completes,
/// the task is aborted, or the callback panics.
async fn deliver<C>(
    mut stream: FeedStream<MarketEvent>,
    key: FeedKey,
    subscriber: SubscriberId,
    callback: C,
) where
    C: Fn(MarketEvent) + Send + Sync + 'static,
{
    while let Some(event) = stream.next().await {
        if catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
            warn!(
                subscriber = %subscriber,
                key = %key,
                "callback panicked, tearing down its delivery"
            );
            return;
        }
    }
    debug!(subscriber = %subscriber, key = %key, "callback stream completed");
}
