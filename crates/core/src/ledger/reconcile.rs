//! Balance reconciliation against the ledger.
//!
//! The ledger is the source of truth: the stored balance must always equal
//! the sum of the signed entry amounts. Reconciliation recomputes that sum
//! and reports any drift.

use rust_decimal::Decimal;
use serde::Serialize;

/// Result of comparing a stored balance against the ledger sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    /// The balance stored on the seller row.
    pub current_balance: Decimal,
    /// The balance recomputed as the sum of signed entry amounts.
    pub computed_balance: Decimal,
    /// `current_balance - computed_balance`; zero when reconciled.
    pub difference: Decimal,
    /// Whether the stored and computed balances agree.
    pub is_reconciled: bool,
    /// Number of ledger entries included in the sum.
    pub entry_count: u64,
}

/// Compare a stored balance against a ledger-derived sum.
#[must_use]
pub fn reconcile(
    current_balance: Decimal,
    computed_balance: Decimal,
    entry_count: u64,
) -> ReconciliationReport {
    let difference = current_balance - computed_balance;
    ReconciliationReport {
        current_balance,
        computed_balance,
        difference,
        is_reconciled: difference == Decimal::ZERO,
        entry_count,
    }
}

/// Sum signed entry amounts into a computed balance.
///
/// A seller with no entries computes to zero.
#[must_use]
pub fn sum_entries<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reconciled_balance() {
        let report = reconcile(dec!(1500), dec!(1500), 3);
        assert!(report.is_reconciled);
        assert_eq!(report.difference, Decimal::ZERO);
        assert_eq!(report.entry_count, 3);
    }

    #[test]
    fn test_drifted_balance() {
        let report = reconcile(dec!(1500), dec!(1200), 2);
        assert!(!report.is_reconciled);
        assert_eq!(report.difference, dec!(300));
    }

    #[test]
    fn test_negative_difference() {
        let report = reconcile(dec!(1000), dec!(1250), 4);
        assert!(!report.is_reconciled);
        assert_eq!(report.difference, dec!(-250));
    }

    #[test]
    fn test_empty_ledger_reconciles_zero_balance() {
        let report = reconcile(Decimal::ZERO, sum_entries([]), 0);
        assert!(report.is_reconciled);
        assert_eq!(report.entry_count, 0);
    }

    #[test]
    fn test_sum_entries_mixed_signs() {
        // Two credits and a charge sale.
        let sum = sum_entries([dec!(1000000), dec!(800000), dec!(-5000)]);
        assert_eq!(sum, dec!(1795000));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn signed_money() -> impl Strategy<Value = Decimal> {
            (-100_000_000_000i64..=100_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
        }

        proptest! {
            #[test]
            fn balance_built_from_entries_always_reconciles(
                amounts in prop::collection::vec(signed_money(), 0..50)
            ) {
                let balance = sum_entries(amounts.iter().copied());
                let count = amounts.len() as u64;
                let report = reconcile(balance, sum_entries(amounts), count);
                prop_assert!(report.is_reconciled);
                prop_assert_eq!(report.difference, Decimal::ZERO);
            }

            #[test]
            fn any_drift_is_detected(
                amounts in prop::collection::vec(signed_money(), 0..50),
                drift in signed_money().prop_filter("non-zero", |d| *d != Decimal::ZERO)
            ) {
                let true_balance = sum_entries(amounts.iter().copied());
                let report = reconcile(true_balance + drift, true_balance, amounts.len() as u64);
                prop_assert!(!report.is_reconciled);
                prop_assert_eq!(report.difference, drift);
            }
        }
    }
}
