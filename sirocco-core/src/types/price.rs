//! Price type for representing asset prices.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Price type - a non-negative quote or trade price.
///
/// Wraps a `Decimal` so prices cannot be confused with quantities or raw
/// numbers at compile time. A price is a point on a scale, not an amount:
/// the type offers comparisons and [`midpoint`](Self::midpoint) but no
/// arithmetic operators; take differences through
/// [`as_decimal`](Self::as_decimal) when a spread is needed.
///
/// # Examples
///
/// ```
/// use sirocco_core::types::Price;
/// use rust_decimal_macros::dec;
///
/// let bid = Price::new(dec!(41999)).unwrap();
/// let ask = Price::new(dec!(42001)).unwrap();
/// assert_eq!(bid.midpoint(ask).as_decimal(), dec!(42000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Creates a new `Price` from a `Decimal` value.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPrice` for negatively signed values.
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value.is_sign_negative() {
            Err(ValidationError::InvalidPrice(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Creates a new `Price` without validation.
    ///
    /// # Safety
    ///
    /// The caller must ensure the value is non-negative.
    #[must_use]
    pub const fn new_unchecked(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying `Decimal` value.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Returns true if the price is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the price halfway between `self` and `other`.
    ///
    /// This is the mid computation used for top-of-book quotes.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self((self.0 + other.0) / Decimal::TWO)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
