//! Order book depth data structures.

use serde::{Deserialize, Serialize};

use crate::types::{Price, Quantity, Timestamp};

/// A single price level in an order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    /// Level price
    pub price: Price,
    /// Aggregated quantity resting at this price
    pub quantity: Quantity,
}

impl BookLevel {
    /// Creates a new book level.
    #[must_use]
    pub fn new(price: Price, quantity: Quantity) -> Self {
        Self { price, quantity }
    }
}

/// Order book snapshot - aggregated depth for one instrument.
///
/// Bids are ordered best (highest) first, asks best (lowest) first, as
/// produced by the upstream feed manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Snapshot timestamp
    pub timestamp: Timestamp,
    /// Bid levels, best first
    pub bids: Vec<BookLevel>,
    /// Ask levels, best first
    pub asks: Vec<BookLevel>,
}

impl OrderBook {
    /// Creates a new order book snapshot.
    #[must_use]
    pub fn new(timestamp: Timestamp, bids: Vec<BookLevel>, asks: Vec<BookLevel>) -> Self {
        Self {
            timestamp,
            bids,
            asks,
        }
    }

    /// Returns the best bid level, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<&BookLevel> {
        self.bids.first()
    }

    /// Returns the best ask level, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<&BookLevel> {
        self.asks.first()
    }

    /// Returns true if both sides of the book are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn level(price: rust_decimal::Decimal, qty: rust_decimal::Decimal) -> BookLevel {
        BookLevel::new(Price::new(price).unwrap(), Quantity::new(qty).unwrap())
    }

    #[test]
    fn test_order_book_best_levels() {
        let book = OrderBook::new(
            Timestamp::new_unchecked(1_704_067_200_000),
            vec![level(dec!(41999), dec!(10)), level(dec!(41998), dec!(4))],
            vec![level(dec!(42001), dec!(8))],
        );

        assert_eq!(book.best_bid().unwrap().price.as_decimal(), dec!(41999));
        assert_eq!(book.best_ask().unwrap().price.as_decimal(), dec!(42001));
        assert!(!book.is_empty());
    }

    #[test]
    fn test_order_book_empty() {
        let book = OrderBook::new(Timestamp::ZERO, vec![], vec![]);
        assert!(book.is_empty());
        assert!(book.best_bid().is_none());
        assert!(book.best_ask().is_none());
    }
}
