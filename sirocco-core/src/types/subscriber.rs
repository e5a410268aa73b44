//! Subscriber identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Subscriber identifier - names a logical consumer of market data.
///
/// A subscriber may be a strategy instance, an HTTP session, or any other
/// caller; the bus only requires the id to be a non-blank string. Subscribers
/// are unknown to the bus until they first appear in a call and cease to
/// exist once they hold no subscriptions and no bound callbacks.
///
/// # Examples
///
/// ```
/// use sirocco_core::types::SubscriberId;
///
/// let subscriber = SubscriberId::new("paper-trader-1").unwrap();
/// assert_eq!(subscriber.as_str(), "paper-trader-1");
/// assert!(SubscriberId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(String);

impl SubscriberId {
    /// Creates a new `SubscriberId` from a string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptySubscriberId` if the string is empty
    /// or contains only whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::EmptySubscriberId);
        }
        Ok(Self(s))
    }

    /// Creates a new `SubscriberId` without validation.
    ///
    /// # Safety
    ///
    /// The caller must ensure the value is non-blank.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the subscriber id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubscriberId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for SubscriberId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<SubscriberId> for String {
    fn from(subscriber: SubscriberId) -> Self {
        subscriber.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_id_new_valid() {
        let subscriber = SubscriberId::new("strategy-7").unwrap();
        assert_eq!(subscriber.as_str(), "strategy-7");
    }

    #[test]
    fn test_subscriber_id_new_empty() {
        assert!(matches!(
            SubscriberId::new(""),
            Err(ValidationError::EmptySubscriberId)
        ));
    }

    #[test]
    fn test_subscriber_id_new_blank() {
        assert!(matches!(
            SubscriberId::new("   "),
            Err(ValidationError::EmptySubscriberId)
        ));
    }

    #[test]
    fn test_subscriber_id_display() {
        let subscriber = SubscriberId::new("web:session-42").unwrap();
        assert_eq!(format!("{subscriber}"), "web:session-42");
    }
}
