//! Normalized phone-target identifier.
//!
//! Charge sales are keyed by the destination phone number. Input arrives in
//! many shapes (`0912-345 6789`, `+98 912 345 6789`); the ledger keys phone
//! targets by a single normalized digit string so concurrent sales to the
//! "same" number resolve to one row.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum number of digits accepted for a phone target.
const MIN_DIGITS: usize = 4;
/// Maximum number of digits accepted for a phone target.
const MAX_DIGITS: usize = 20;

/// A normalized phone number: digits only, 4 to 20 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Msisdn(String);

impl Msisdn {
    /// Normalizes and validates a raw phone number string.
    ///
    /// Separators (spaces, dashes, dots, parentheses) and a single leading
    /// `+` are stripped; the remainder must be 4..=20 ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns an error describing the offending input if any non-separator,
    /// non-digit character remains or the digit count is out of range.
    pub fn parse(raw: &str) -> Result<Self, MsisdnError> {
        let trimmed = raw.trim();
        let without_plus = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let mut digits = String::with_capacity(without_plus.len());
        for c in without_plus.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' | '.' | '(' | ')' => {}
                _ => return Err(MsisdnError::InvalidCharacter(c)),
            }
        }

        if digits.len() < MIN_DIGITS || digits.len() > MAX_DIGITS {
            return Err(MsisdnError::InvalidLength(digits.len()));
        }

        Ok(Self(digits))
    }

    /// Returns the normalized digit string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Errors produced when normalizing a phone number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MsisdnError {
    /// A character that is neither a digit nor a recognized separator.
    #[error("invalid character in phone number: {0:?}")]
    InvalidCharacter(char),
    /// Too few or too many digits after normalization.
    #[error("phone number must contain {MIN_DIGITS} to {MAX_DIGITS} digits, got {0}")]
    InvalidLength(usize),
}

impl fmt::Display for Msisdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Msisdn {
    type Err = MsisdnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Msisdn {
    type Error = MsisdnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Msisdn> for String {
    fn from(value: Msisdn) -> Self {
        value.0
    }
}
