//! Error types shared across the workspace.
//!
//! Validation errors for value construction live with the types that raise
//! them ([`crate::types::ValidationError`]); this module holds the errors
//! that cross the seam between the bus and its upstream feed manager.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upstream feed manager error.
///
/// Raised by [`FeedManager::update_subscriptions`](crate::traits::FeedManager::update_subscriptions)
/// when a new subscription set cannot be accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedError {
    /// The manager rejected the requested subscription set
    #[error("subscription update rejected: {reason}")]
    SubscriptionRejected {
        /// Reason for rejection
        reason: String,
    },

    /// Connectivity to a venue was lost
    #[error("connection lost to exchange: {exchange}")]
    ConnectionLost {
        /// Exchange that dropped
        exchange: String,
    },

    /// Internal manager error
    #[error("internal feed manager error: {reason}")]
    Internal {
        /// Reason for failure
        reason: String,
    },
}

impl FeedError {
    /// Creates a subscription-rejected error.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::SubscriptionRejected {
            reason: reason.into(),
        }
    }

    /// Creates a connection-lost error.
    #[must_use]
    pub fn connection_lost(exchange: impl Into<String>) -> Self {
        Self::ConnectionLost {
            exchange: exchange.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }
}
