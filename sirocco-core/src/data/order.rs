//! Open order data structures.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Price, Quantity, Timestamp};

/// Side of an order or trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// An order currently resting on a venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOrder {
    /// Venue-assigned order id
    pub id: String,
    /// Order side
    pub side: OrderSide,
    /// Limit price
    pub price: Price,
    /// Original quantity
    pub quantity: Quantity,
    /// Quantity filled so far
    pub filled: Quantity,
    /// Placement timestamp
    pub timestamp: Timestamp,
}

impl OpenOrder {
    /// Returns the quantity still resting on the book.
    ///
    /// An over-reported fill yields zero rather than a negative size.
    #[must_use]
    pub fn remaining(&self) -> Quantity {
        self.quantity.saturating_sub(self.filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_open_order_remaining() {
        let order = OpenOrder {
            id: "o-1".to_string(),
            side: OrderSide::Buy,
            price: Price::new(dec!(41000)).unwrap(),
            quantity: Quantity::new(dec!(2)).unwrap(),
            filled: Quantity::new(dec!(0.5)).unwrap(),
            timestamp: Timestamp::new_unchecked(1_704_067_200_000),
        };
        assert_eq!(order.remaining().as_decimal(), dec!(1.5));
    }

    #[test]
    fn test_order_side_display() {
        assert_eq!(format!("{}", OrderSide::Buy), "buy");
        assert_eq!(format!("{}", OrderSide::Sell), "sell");
    }
}
