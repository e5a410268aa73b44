//! # Sirocco Bus
//!
//! Subscription registry and market-data event bus.
//!
//! This crate provides:
//! - [`DemandLedger`] - reference-counted demand aggregation across subscribers
//! - [`MarketEventBus`] - the bus itself: atomic subscription reconciliation
//!   against an upstream [`FeedManager`](sirocco_core::traits::FeedManager),
//!   per-subscriber stream projection, and callback binding
//! - [`FeedStream`] / [`LatestWins`] - merged event streams with per-upstream
//!   latest-wins backpressure
//!
//! # Architecture
//!
//! ```text
//! subscribers ──► MarketEventBus ──► FeedManager (upstream)
//!                   │    │
//!                   │    └── DemandLedger (refcounts + holdings)
//!                   └─────── FeedStream per (subscriber, kind)
//! ```
//!
//! Subscription changes mutate the ledger and, when the global key union
//! changes, push the new union upstream inside the same critical section, so
//! upstream reconfigurations are linearized with state changes. Stream
//! projection reads a snapshot of the caller's holdings at call time.

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]

/// Reference-counted demand ledger
pub mod ledger;

/// The market event bus
pub mod bus;

/// Merged event streams and backpressure adapters
pub mod stream;

/// Bus error types
pub mod error;

mod binder;

pub use bus::MarketEventBus;
pub use error::EventBusError;
pub use ledger::{DemandLedger, HoldOutcome, ReleaseOutcome};
pub use stream::{FeedStream, LatestWins};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bus::MarketEventBus;
    pub use crate::error::EventBusError;
    pub use crate::ledger::{DemandLedger, HoldOutcome, ReleaseOutcome};
    pub use crate::stream::{FeedStream, LatestWins};
    pub use sirocco_core::prelude::*;
}
