//! Executed trade data structure.

use serde::{Deserialize, Serialize};

use crate::types::{Price, Quantity, Timestamp};

use super::OrderSide;

/// A trade executed on a venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Venue-assigned trade id
    pub id: String,
    /// Aggressor side
    pub side: OrderSide,
    /// Execution price
    pub price: Price,
    /// Executed quantity
    pub quantity: Quantity,
    /// Execution timestamp
    pub timestamp: Timestamp,
}

impl Trade {
    /// Creates a new trade.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        side: OrderSide,
        price: Price,
        quantity: Quantity,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            side,
            price,
            quantity,
            timestamp,
        }
    }
}
