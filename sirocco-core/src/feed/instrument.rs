//! Instrument specification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{AssetCode, ExchangeId};

/// Instrument specification - a trading pair on a specific exchange.
///
/// Equality and hashing are structural over all three fields, so the same
/// pair on two exchanges is two distinct instruments.
///
/// # Examples
///
/// ```
/// use sirocco_core::feed::InstrumentSpec;
/// use sirocco_core::types::{AssetCode, ExchangeId};
///
/// let spec = InstrumentSpec::new(
///     ExchangeId::new("binance").unwrap(),
///     AssetCode::new("BTC").unwrap(),
///     AssetCode::new("USDT").unwrap(),
/// );
/// assert_eq!(format!("{spec}"), "binance:BTC/USDT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstrumentSpec {
    /// Venue the instrument trades on
    pub exchange: ExchangeId,
    /// Base asset of the pair
    pub base: AssetCode,
    /// Counter (quote) asset of the pair
    pub counter: AssetCode,
}

impl InstrumentSpec {
    /// Creates a new instrument specification.
    #[must_use]
    pub fn new(exchange: ExchangeId, base: AssetCode, counter: AssetCode) -> Self {
        Self {
            exchange,
            base,
            counter,
        }
    }
}

impl fmt::Display for InstrumentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.exchange, self.base, self.counter)
    }
}
