//! Feed keys and the market event model.
//!
//! A feed is identified by a [`FeedKey`] - the pairing of an
//! [`InstrumentSpec`] with a [`MarketDataKind`]. The key is the unit at
//! which upstream connections are opened and reference-counted by the bus.
//!
//! Events flow upstream-to-downstream as [`MarketEvent`] values; each
//! variant carries the originating instrument alongside its payload.

mod event;
mod instrument;
mod key;

pub use event::{MarketEvent, OpenOrdersEvent, OrderBookEvent, TickerEvent, TradeEvent};
pub use instrument::InstrumentSpec;
pub use key::{FeedKey, MarketDataKind};
