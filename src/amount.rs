//! Arbitrary-precision payment amounts.
//!
//! This module provides [`Amount`], the decimal value carried by the `amount`
//! option of every payment target.
//!
//! # Supported Formats
//!
//! - Plain numbers: `"100"`, `"123.39"`, `"-5"`, `".5"`
//! - Scientific notation: `"1e3"`, `"1.5E-2"`
//!
//! Digit group separators (`"1,000"`, `"1_000"`) and currency prefixes are
//! rejected. There is no upper bound on magnitude or precision.
//!
//! # Example
//!
//! ```rust
//! use payto_rs::amount::Amount;
//!
//! let amount = Amount::parse("123.390").unwrap();
//! assert_eq!(amount.to_string(), "123.39");
//! assert!(Amount::parse("not-a-number").is_err());
//! ```

use bigdecimal::BigDecimal;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::PaytoError;

static DECIMAL_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid regex")
});

/// A decimal amount parsed from a string.
///
/// The value is kept exactly as parsed, at any precision. Its [`Display`]
/// form is the canonical decimal string: no exponent, no trailing fractional
/// zeros. Sign and magnitude are not validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount(BigDecimal);

impl Amount {
    /// Parses a decimal or scientific-notation string into an [`Amount`].
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PaytoError::InvalidAmount`] carrying the input when it is
    /// not a number.
    pub fn parse(input: &str) -> Result<Self, PaytoError> {
        let trimmed = input.trim();
        if !DECIMAL_LITERAL.is_match(trimmed) {
            return Err(PaytoError::InvalidAmount(input.to_string()));
        }
        BigDecimal::from_str(trimmed)
            .map(Amount)
            .map_err(|_| PaytoError::InvalidAmount(input.to_string()))
    }

    /// Returns the underlying decimal value.
    pub fn as_big_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Converts to a fixed-precision [`Decimal`], if it fits without rounding.
    pub fn to_decimal(&self) -> Option<Decimal> {
        let exact = Decimal::from_str_exact(&self.to_string()).ok()?;
        let round_trip = Amount::from(exact);
        (round_trip == *self).then_some(exact)
    }

    /// Returns the number of decimal places in the canonical form.
    ///
    /// For example, `"12.340"` has scale 2 and `"1200"` has scale 0.
    pub fn scale(&self) -> u64 {
        let (_, exponent) = self.0.normalized().as_bigint_and_exponent();
        exponent.max(0).unsigned_abs()
    }
}

impl FromStr for Amount {
    type Err = PaytoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse(s)
    }
}

impl TryFrom<&str> for Amount {
    type Error = PaytoError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Amount::parse(value)
    }
}

impl From<BigDecimal> for Amount {
    fn from(value: BigDecimal) -> Self {
        Amount(value)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(BigDecimal::new(value.mantissa().into(), value.scale().into()))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(BigDecimal::from(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.normalized().to_plain_string())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::parse(&s).map_err(serde::de::Error::custom)
    }
}
