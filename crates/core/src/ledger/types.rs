//! Ledger domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of balance mutation a ledger entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Balance increased by an approved credit request.
    CreditIncrease,
    /// Balance decreased by a charge sale against a phone target.
    ChargeSale,
}

impl EntryKind {
    /// Returns the string representation of the entry kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreditIncrease => "credit_increase",
            Self::ChargeSale => "charge_sale",
        }
    }

    /// Parses an entry kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "credit_increase" => Some(Self::CreditIncrease),
            "charge_sale" => Some(Self::ChargeSale),
            _ => None,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated balance mutation, computed before persistence.
///
/// Postings are write-once values: there are no mutator methods, and the
/// persisted ledger entry built from a posting is never updated. The signed
/// `amount` is positive for a credit increase and negative for a charge
/// sale; `balance_after` is the seller's balance immediately after the
/// posting and is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// The kind of mutation.
    pub kind: EntryKind,
    /// Signed amount applied to the balance.
    pub amount: Decimal,
    /// Balance snapshot after applying `amount`.
    pub balance_after: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_as_str() {
        assert_eq!(EntryKind::CreditIncrease.as_str(), "credit_increase");
        assert_eq!(EntryKind::ChargeSale.as_str(), "charge_sale");
    }

    #[test]
    fn test_entry_kind_parse() {
        assert_eq!(
            EntryKind::parse("credit_increase"),
            Some(EntryKind::CreditIncrease)
        );
        assert_eq!(EntryKind::parse("charge_sale"), Some(EntryKind::ChargeSale));
        assert_eq!(EntryKind::parse("refund"), None);
    }

    #[test]
    fn test_entry_kind_display() {
        assert_eq!(EntryKind::ChargeSale.to_string(), "charge_sale");
    }
}
