//! Bus error types.

use thiserror::Error;

use sirocco_core::error::FeedError;

/// Event bus error.
///
/// Internal bookkeeping inconsistencies are not errors at this level; they
/// are logged and absorbed by the ledger. What surfaces here is what the
/// caller can act on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventBusError {
    /// The upstream feed manager rejected the new subscription union.
    ///
    /// The bus's in-memory state was already updated when this is returned;
    /// retrying with the same target is a no-op for the bus but re-issues
    /// the upstream notification.
    #[error("upstream subscription update failed: {0}")]
    UpstreamNotify(#[from] FeedError),

    /// Callback registration was attempted outside a tokio runtime.
    #[error("callback registration requires a running tokio runtime")]
    NoRuntime,
}
