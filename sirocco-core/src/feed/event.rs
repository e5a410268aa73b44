//! Market event model.
//!
//! Each event carries the originating [`InstrumentSpec`] alongside its
//! payload, so consumers of a merged stream can tell feeds apart without
//! side-channel state.

use serde::{Deserialize, Serialize};

use crate::data::{OpenOrder, OrderBook, Ticker, Trade};

use super::{InstrumentSpec, MarketDataKind};

/// Ticker update for one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerEvent {
    /// Originating instrument
    pub instrument: InstrumentSpec,
    /// Ticker payload
    pub ticker: Ticker,
}

/// Order book snapshot for one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookEvent {
    /// Originating instrument
    pub instrument: InstrumentSpec,
    /// Depth snapshot payload
    pub order_book: OrderBook,
}

/// Open orders snapshot for one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOrdersEvent {
    /// Originating instrument
    pub instrument: InstrumentSpec,
    /// Orders currently resting on the venue
    pub orders: Vec<OpenOrder>,
}

/// Executed trade on one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    /// Originating instrument
    pub instrument: InstrumentSpec,
    /// Trade payload
    pub trade: Trade,
}

/// Any market event, tagged by data kind.
///
/// This is the item type of the per-key streams produced by the upstream
/// feed manager; the bus projects it into the typed per-kind streams it
/// hands to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarketEvent {
    /// Ticker update
    Ticker(TickerEvent),
    /// Order book snapshot
    OrderBook(OrderBookEvent),
    /// Open orders snapshot
    OpenOrders(OpenOrdersEvent),
    /// Executed trade
    Trade(TradeEvent),
}

impl MarketEvent {
    /// Returns the instrument this event originated from.
    #[must_use]
    pub fn instrument(&self) -> &InstrumentSpec {
        match self {
            Self::Ticker(e) => &e.instrument,
            Self::OrderBook(e) => &e.instrument,
            Self::OpenOrders(e) => &e.instrument,
            Self::Trade(e) => &e.instrument,
        }
    }

    /// Returns the data kind of this event.
    #[must_use]
    pub fn kind(&self) -> MarketDataKind {
        match self {
            Self::Ticker(_) => MarketDataKind::Ticker,
            Self::OrderBook(_) => MarketDataKind::OrderBook,
            Self::OpenOrders(_) => MarketDataKind::OpenOrders,
            Self::Trade(_) => MarketDataKind::Trades,
        }
    }

    /// Extracts the ticker event, if this is one.
    #[must_use]
    pub fn into_ticker(self) -> Option<TickerEvent> {
        match self {
            Self::Ticker(e) => Some(e),
            _ => None,
        }
    }

    /// Extracts the order book event, if this is one.
    #[must_use]
    pub fn into_order_book(self) -> Option<OrderBookEvent> {
        match self {
            Self::OrderBook(e) => Some(e),
            _ => None,
        }
    }

    /// Extracts the open orders event, if this is one.
    #[must_use]
    pub fn into_open_orders(self) -> Option<OpenOrdersEvent> {
        match self {
            Self::OpenOrders(e) => Some(e),
            _ => None,
        }
    }

    /// Extracts the trade event, if this is one.
    #[must_use]
    pub fn into_trade(self) -> Option<TradeEvent> {
        match self {
            Self::Trade(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TickerEvent> for MarketEvent {
    fn from(event: TickerEvent) -> Self {
        Self::Ticker(event)
    }
}

impl From<OrderBookEvent> for MarketEvent {
    fn from(event: OrderBookEvent) -> Self {
        Self::OrderBook(event)
    }
}

impl From<OpenOrdersEvent> for MarketEvent {
    fn from(event: OpenOrdersEvent) -> Self {
        Self::OpenOrders(event)
    }
}

impl From<TradeEvent> for MarketEvent {
    fn from(event: TradeEvent) -> Self {
        Self::Trade(event)
    }
}
