//! Market data payload structures.
//!
//! Payloads are produced by the upstream feed manager and carried through
//! the event bus opaquely; the bus never inspects them beyond routing.
//!
//! # Types
//!
//! - [`Ticker`] - Top-of-book quote and last trade
//! - [`OrderBook`] / [`BookLevel`] - Aggregated depth snapshot
//! - [`OpenOrder`] / [`OrderSide`] - A resting order on the venue
//! - [`Trade`] - An executed trade

mod order;
mod order_book;
mod ticker;
mod trade;

pub use order::{OpenOrder, OrderSide};
pub use order_book::{BookLevel, OrderBook};
pub use ticker::Ticker;
pub use trade::Trade;
