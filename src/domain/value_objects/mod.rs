//! Value objects shared by the catalog and checkout sides.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// URL-safe entity slug, unique within an entity type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug(String);

impl Slug {
    /// Accepts only `^[a-z0-9-]+$`.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        let ok = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !ok {
            return Err(CoreError::InvalidSlug(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowercased, trimmed language code (`"en"`, `"th"`, `"pt-br"`).
///
/// Ordered so that translation maps keyed by it iterate lexicographically,
/// which is what makes the resolver's last-resort fallback deterministic.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into().trim().to_ascii_lowercase();
        let ok = !value.is_empty()
            && value.len() <= 8
            && value.chars().all(|c| c.is_ascii_lowercase() || c == '-');
        if !ok {
            return Err(CoreError::InvalidLanguage(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO 3166-1 alpha-2 country code, canonicalized to uppercase.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        Self::canonicalize(&value).ok_or(CoreError::InvalidCountry(value))
    }

    /// Trim + uppercase; `None` for anything that is not two ASCII letters.
    ///
    /// Read paths treat `None` as "no override" rather than an error.
    pub fn canonicalize(raw: &str) -> Option<Self> {
        let value = raw.trim().to_ascii_uppercase();
        if value.len() == 2 && value.chars().all(|c| c.is_ascii_uppercase()) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Already-authenticated wallet identity. The core performs no signature
/// verification; it only filters by exact match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(CoreError::InvalidWalletAddress);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-negative monetary amount. Zero is a legal value; country overrides
/// rely on an explicit zero being distinct from "absent".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub fn new(amount: Decimal) -> Result<Self, CoreError> {
        if amount < Decimal::ZERO {
            return Err(CoreError::InvalidPrice);
        }
        Ok(Self(amount))
    }

    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn multiply(&self, qty: u32) -> Price {
        Price(self.0 * Decimal::from(qty))
    }

    pub fn add(&self, other: Price) -> Price {
        Price(self.0 + other.0)
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_rejects_uppercase_and_spaces() {
        assert!(Slug::new("summer-2024").is_ok());
        assert!(Slug::new("Summer").is_err());
        assert!(Slug::new("summer 2024").is_err());
        assert!(Slug::new("").is_err());
    }

    #[test]
    fn test_language_canonicalized() {
        let lang = LanguageCode::new(" TH ").unwrap();
        assert_eq!(lang.as_str(), "th");
    }

    #[test]
    fn test_country_canonicalize() {
        assert_eq!(CountryCode::canonicalize(" th ").unwrap().as_str(), "TH");
        assert!(CountryCode::canonicalize("THA").is_none());
        assert!(CountryCode::canonicalize("").is_none());
    }

    #[test]
    fn test_price_rejects_negative() {
        assert!(Price::new(Decimal::new(-1, 0)).is_err());
        assert!(Price::new(Decimal::ZERO).unwrap().is_zero());
    }

    #[test]
    fn test_price_multiply() {
        let p = Price::new(Decimal::new(85, 1)).unwrap();
        assert_eq!(p.multiply(2).amount(), Decimal::new(170, 1));
    }
}
