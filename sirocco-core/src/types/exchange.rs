//! Exchange identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Exchange identifier - names the venue an instrument trades on.
///
/// Wraps a `String` value with validation. Exchange ids are opaque to the
/// bus; by convention they are lowercase ("binance", "kraken").
///
/// # Examples
///
/// ```
/// use sirocco_core::types::ExchangeId;
///
/// let exchange = ExchangeId::new("binance").unwrap();
/// assert_eq!(exchange.as_str(), "binance");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeId(String);

impl ExchangeId {
    /// Creates a new `ExchangeId` from a string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyExchangeId` if the string is empty.
    /// Returns `ValidationError::InvalidExchangeId` if it contains characters
    /// other than alphanumerics, hyphens, underscores, or dots.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() {
            return Err(ValidationError::EmptyExchangeId);
        }
        if !s
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(ValidationError::InvalidExchangeId(s));
        }
        Ok(Self(s))
    }

    /// Creates a new `ExchangeId` without validation.
    ///
    /// # Safety
    ///
    /// The caller must ensure the value is a valid exchange id.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the exchange id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExchangeId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ExchangeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ExchangeId> for String {
    fn from(exchange: ExchangeId) -> Self {
        exchange.0
    }
}
