//! Quantity type for representing trading quantities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Quantity type - a non-negative size of an order, trade, or book level.
///
/// Wraps a `Decimal` so sizes cannot be confused with prices. Because
/// quantities are never allowed to go negative, subtraction is exposed
/// only as [`saturating_sub`](Self::saturating_sub), which floors at zero
/// - the shape fill-tracking needs.
///
/// # Examples
///
/// ```
/// use sirocco_core::types::Quantity;
/// use rust_decimal_macros::dec;
///
/// let ordered = Quantity::new(dec!(2)).unwrap();
/// let filled = Quantity::new(dec!(0.5)).unwrap();
/// assert_eq!(ordered.saturating_sub(filled).as_decimal(), dec!(1.5));
/// assert!(filled.saturating_sub(ordered).is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Zero quantity constant.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new `Quantity` from a `Decimal` value.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidQuantity` for negatively signed
    /// values.
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value.is_sign_negative() {
            Err(ValidationError::InvalidQuantity(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Creates a new `Quantity` without validation.
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

    /// Returns true if the quantity is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtracts `other`, flooring at zero instead of going negative.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        if other.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - other.0)
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quantity_new_valid() {
        let qty = Quantity::new(dec!(10)).unwrap();
        assert_eq!(qty.as_decimal(), dec!(10));
    }

    #[test]
    fn test_quantity_new_negative() {
        let result = Quantity::new(dec!(-0.5));
        assert!(matches!(result, Err(ValidationError::InvalidQuantity(_))));
    }

    #[test]
    fn test_quantity_saturating_sub() {
        let a = Quantity::new(dec!(1.5)).unwrap();
        let b = Quantity::new(dec!(0.5)).unwrap();
        assert_eq!(a.saturating_sub(b).as_decimal(), dec!(1));

        // Over-subtraction floors at zero rather than going negative.
        assert_eq!(b.saturating_sub(a), Quantity::ZERO);
        assert_eq!(a.saturating_sub(a), Quantity::ZERO);
    }

    #[test]
    fn test_quantity_zero() {
        assert!(Quantity::ZERO.is_zero());
        assert!(!Quantity::new(dec!(0.1)).unwrap().is_zero());
    }
}
