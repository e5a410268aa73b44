//! Feed keys - the unit of upstream demand.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::InstrumentSpec;

/// Kind of market data carried by a feed.
///
/// A closed enumeration; extend it by adding variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketDataKind {
    /// Top-of-book ticker updates
    Ticker,
    /// Order book depth snapshots
    OrderBook,
    /// Open orders for the authenticated account
    OpenOrders,
    /// Executed trades
    Trades,
}

impl MarketDataKind {
    /// All kinds, for iteration.
    pub const ALL: [Self; 4] = [Self::Ticker, Self::OrderBook, Self::OpenOrders, Self::Trades];
}

impl fmt::Display for MarketDataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ticker => write!(f, "ticker"),
            Self::OrderBook => write!(f, "order_book"),
            Self::OpenOrders => write!(f, "open_orders"),
            Self::Trades => write!(f, "trades"),
        }
    }
}

/// Feed key - one instrument paired with one data kind.
///
/// The key is the unit at which upstream feeds are opened and
/// reference-counted. Equality and hashing are structural; the derived
/// total order keeps key sets stable when rendered in logs.
///
/// # Examples
///
/// ```
/// use sirocco_core::feed::{FeedKey, InstrumentSpec, MarketDataKind};
/// use sirocco_core::types::{AssetCode, ExchangeId};
///
/// let spec = InstrumentSpec::new(
///     ExchangeId::new("binance").unwrap(),
///     AssetCode::new("BTC").unwrap(),
///     AssetCode::new("USDT").unwrap(),
/// );
/// let key = FeedKey::ticker(spec);
/// assert_eq!(key.kind, MarketDataKind::Ticker);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeedKey {
    /// Instrument the feed covers
    pub instrument: InstrumentSpec,
    /// Kind of data the feed carries
    pub kind: MarketDataKind,
}

impl FeedKey {
    /// Creates a new feed key.
    #[must_use]
    pub fn new(instrument: InstrumentSpec, kind: MarketDataKind) -> Self {
        Self { instrument, kind }
    }

    /// Creates a ticker feed key for an instrument.
    #[must_use]
    pub fn ticker(instrument: InstrumentSpec) -> Self {
        Self::new(instrument, MarketDataKind::Ticker)
    }

    /// Creates an order book feed key for an instrument.
    #[must_use]
    pub fn order_book(instrument: InstrumentSpec) -> Self {
        Self::new(instrument, MarketDataKind::OrderBook)
    }

    /// Creates an open orders feed key for an instrument.
    #[must_use]
    pub fn open_orders(instrument: InstrumentSpec) -> Self {
        Self::new(instrument, MarketDataKind::OpenOrders)
    }

    /// Creates a trades feed key for an instrument.
    #[must_use]
    pub fn trades(instrument: InstrumentSpec) -> Self {
        Self::new(instrument, MarketDataKind::Trades)
    }
}

impl fmt::Display for FeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.instrument, self.kind)
    }
}
