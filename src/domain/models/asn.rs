//! Autonomous system number identifier.
//!
//! The textual form is `AS` followed by the decimal AS number. Parsing is
//! strict about the prefix and canonical about the number, so `AS015169`
//! and `AS15169` name the same system.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Textual prefix every identifier carries.
const ASN_PREFIX: &str = "AS";

/// Error returned when text does not follow the `AS<number>` syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed ASN: {input:?}")]
pub struct ParseAsnError {
    /// The rejected input, verbatim.
    pub input: String,
}

/// An autonomous system number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Asn(u32);

impl Asn {
    /// Wrap a numeric AS number.
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// The numeric AS number.
    pub const fn number(self) -> u32 {
        self.0
    }
}

impl FromStr for Asn {
    type Err = ParseAsnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseAsnError { input: s.to_string() };

        let digits = s.strip_prefix(ASN_PREFIX).ok_or_else(malformed)?;
        // u32::from_str accepts a leading '+', the syntax does not
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        digits.parse::<u32>().map(Self).map_err(|_| malformed())
    }
}

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ASN_PREFIX}{}", self.0)
    }
}

impl From<u32> for Asn {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

impl Serialize for Asn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Asn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
