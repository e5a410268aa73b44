//! Merged event streams with per-upstream latest-wins backpressure.
//!
//! [`FeedStream`] is what subscribers consume: a merge of the per-key
//! upstream streams a subscriber held at projection time. Each upstream is
//! wrapped in a [`LatestWins`] adapter before merging, so a slow consumer
//! loses only stale events from the feeds that outpaced it; it never stalls
//! the bus or other subscribers.
//!
//! The merge preserves per-key ordering and imposes no ordering across
//! keys. One upstream ending does not end the merge; the merged stream
//! completes only when every upstream has completed. Dropping the stream
//! releases the upstream subscriptions it was built from.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{BoxStream, SelectAll, Stream};
use tracing::trace;

use sirocco_core::feed::FeedKey;

// ---------------------------------------------------------------------------
// LatestWins
// ---------------------------------------------------------------------------

/// Stream adapter that retains only the most recent pending item.
///
/// Each poll drains the inner stream of everything it has ready and yields
/// only the newest item; anything older is dropped. A consumer that keeps
/// up sees every item (at most one is ever pending between its polls); a
/// consumer that lags sees the latest item per poll and silently skips the
/// backlog.
///
/// The adapter is applied per upstream feed before merging, so lag on one
/// feed never costs events from another.
pub struct LatestWins<S: Stream> {
    inner: S,
    pending: Option<S::Item>,
    done: bool,
    dropped: u64,
}

impl<S: Stream> LatestWins<S> {
    /// Wraps a stream in the latest-wins policy.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending: None,
            done: false,
            dropped: 0,
        }
    }

    /// Returns how many stale items have been dropped so far.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl<S> Stream for LatestWins<S>
where
    S: Stream + Unpin,
    S::Item: Unpin,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.done {
            return Poll::Ready(this.pending.take());
        }

        loop {
            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(item)) => {
                    if this.pending.replace(item).is_some() {
                        this.dropped += 1;
                        trace!(dropped = this.dropped, "consumer lagging, superseding stale event");
                    }
                }
                Poll::Ready(None) => {
                    this.done = true;
                    return Poll::Ready(this.pending.take());
                }
                Poll::Pending => {
                    return match this.pending.take() {
                        Some(item) => Poll::Ready(Some(item)),
                        None => Poll::Pending,
                    };
                }
            }
        }
    }
}

impl<S: Stream> std::fmt::Debug for LatestWins<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatestWins")
            .field("done", &self.done)
            .field("dropped", &self.dropped)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// FeedStream
// ---------------------------------------------------------------------------

/// Merged event stream for one `(subscriber, data kind)` projection.
///
/// The set of upstream feeds merged is the subscriber's holdings of the
/// kind at the moment the stream was requested; later subscription changes
/// do not alter an already-returned stream. Callers wanting a live view
/// re-request the stream after each change.
///
/// The stream is lazy (nothing flows until polled), yields items from any
/// upstream as they arrive, and completes once all upstreams complete -
/// immediately, if it was projected from an empty holding set.
pub struct FeedStream<E> {
    keys: Vec<FeedKey>,
    inner: SelectAll<BoxStream<'static, E>>,
    terminated: bool,
}

impl<E> FeedStream<E> {
    /// Builds a merged stream over the given per-key upstreams.
    ///
    /// `keys` records which feeds the merge was projected from; it is
    /// diagnostic only.
    pub(crate) fn merge(
        keys: Vec<FeedKey>,
        upstreams: impl IntoIterator<Item = BoxStream<'static, E>>,
    ) -> Self {
        let mut inner = SelectAll::new();
        for upstream in upstreams {
            inner.push(upstream);
        }
        Self {
            keys,
            inner,
            terminated: false,
        }
    }

    /// Returns the feed keys this stream was projected from.
    #[must_use]
    pub fn keys(&self) -> &[FeedKey] {
        &self.keys
    }

    /// Returns true if the projection covered no feeds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true if all upstreams have completed.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

impl<E> Stream for FeedStream<E> {
    type Item = E;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.terminated {
            return Poll::Ready(None);
        }

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(None) => {
                this.terminated = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl<E> std::fmt::Debug for FeedStream<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedStream")
            .field("keys", &self.keys)
            .field("terminated", &self.terminated)
            .finish_non_exhaustive()
    }
}
