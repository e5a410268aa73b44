//! Asset code type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Asset code - one leg of a trading pair ("BTC", "USDT").
///
/// Wraps a `String` value with validation. Asset codes are opaque to the
/// bus and compared structurally, so "btc" and "BTC" are distinct.
///
/// # Examples
///
/// ```
/// use sirocco_core::types::AssetCode;
///
/// let base = AssetCode::new("BTC").unwrap();
/// assert_eq!(base.as_str(), "BTC");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetCode(String);

impl AssetCode {
    /// Creates a new `AssetCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyAssetCode` if the string is empty.
    /// Returns `ValidationError::InvalidAssetCode` if it contains characters
    /// other than alphanumerics, hyphens, or underscores.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() {
            return Err(ValidationError::EmptyAssetCode);
        }
        if !s
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidAssetCode(s));
        }
        Ok(Self(s))
    }

    /// Creates a new `AssetCode` without validation.
    ///
    /// # Safety
    ///
    /// The caller must ensure the value is a valid asset code.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the asset code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssetCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for AssetCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<AssetCode> for String {
    fn from(asset: AssetCode) -> Self {
        asset.0
    }
}
