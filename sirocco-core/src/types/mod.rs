//! `NewType` wrappers for identifiers and financial primitives.
//!
//! This module provides type-safe wrappers around strings and decimal
//! values to prevent mixing incompatible types at compile time.
//!
//! # Types
//!
//! - [`ExchangeId`] - Exchange identifiers ("binance", "kraken")
//! - [`AssetCode`] - Asset codes ("BTC", "USDT")
//! - [`SubscriberId`] - Logical consumer identifiers
//! - [`Price`] - Asset price values
//! - [`Quantity`] - Trading quantities
//! - [`Timestamp`] - Unix millisecond timestamps

mod asset;
mod exchange;
mod price;
mod quantity;
mod subscriber;
mod timestamp;

pub use asset::AssetCode;
pub use exchange::ExchangeId;
pub use price::Price;
pub use quantity::Quantity;
pub use subscriber::SubscriberId;
pub use timestamp::Timestamp;

/// Validation error for `NewType` construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Exchange id is empty
    #[error("exchange id cannot be empty")]
    EmptyExchangeId,

    /// Exchange id format is invalid
    #[error("invalid exchange id: {0}")]
    InvalidExchangeId(String),

    /// Asset code is empty
    #[error("asset code cannot be empty")]
    EmptyAssetCode,

    /// Asset code format is invalid
    #[error("invalid asset code: {0}")]
    InvalidAssetCode(String),

    /// Subscriber id is empty or blank
    #[error("subscriber id cannot be empty")]
    EmptySubscriberId,

    /// Price value carries a negative sign
    #[error("price must be non-negative, got {0}")]
    InvalidPrice(rust_decimal::Decimal),

    /// Quantity value carries a negative sign
    #[error("quantity must be non-negative, got {0}")]
    InvalidQuantity(rust_decimal::Decimal),

    /// Timestamp precedes the Unix epoch
    #[error("timestamp must not precede the Unix epoch, got {0}")]
    PreEpochTimestamp(i64),
}
