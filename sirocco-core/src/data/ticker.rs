//! Ticker (top-of-book) data structure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, Timestamp};

/// Ticker data - best bid/ask and the last traded price for an instrument.
///
/// # Examples
///
/// ```
/// use sirocco_core::data::Ticker;
/// use sirocco_core::types::{Price, Timestamp};
/// use rust_decimal_macros::dec;
///
/// let ticker = Ticker::new(
///     Price::new(dec!(41999)).unwrap(),
///     Price::new(dec!(42001)).unwrap(),
///     Price::new(dec!(42000)).unwrap(),
///     Timestamp::now(),
/// );
/// assert_eq!(ticker.spread(), dec!(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    /// Best bid price
    pub bid: Price,
    /// Best ask price
    pub ask: Price,
    /// Last traded price
    pub last: Price,
    /// Quote timestamp
    pub timestamp: Timestamp,
}

impl Ticker {
    /// Creates a new ticker.
    #[must_use]
    pub fn new(bid: Price, ask: Price, last: Price, timestamp: Timestamp) -> Self {
        Self {
            bid,
            ask,
            last,
            timestamp,
        }
    }

    /// Returns the bid/ask spread.
    #[must_use]
    pub fn spread(&self) -> Decimal {
        self.ask.as_decimal() - self.bid.as_decimal()
    }

    /// Returns the mid price, halfway between best bid and best ask.
    #[must_use]
    pub fn mid_price(&self) -> Price {
        self.bid.midpoint(self.ask)
    }
}
