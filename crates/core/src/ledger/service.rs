//! Ledger service for balance-mutation validation.
//!
//! This module provides the core business logic for validating balance
//! changes before they are persisted to the database. The repository layer
//! reads the current balance under a row lock, asks this service for a
//! posting, and persists the posting atomically with the balance update.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryKind, Posting};

/// Ledger service for balance-mutation validation.
///
/// This service contains pure business logic with no database dependencies.
/// Given a current balance and a requested amount, it either returns the
/// posting to persist or the error to surface.
pub struct LedgerService;

impl LedgerService {
    /// Validate a credit and compute the resulting posting.
    ///
    /// The returned posting carries a positive signed amount and the balance
    /// after the increase.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` if `amount` is zero or negative.
    pub fn credit(current_balance: Decimal, amount: Decimal) -> Result<Posting, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }

        Ok(Posting {
            kind: EntryKind::CreditIncrease,
            amount,
            balance_after: current_balance + amount,
        })
    }

    /// Validate a debit and compute the resulting posting.
    ///
    /// The returned posting carries a negative signed amount and the balance
    /// after the decrease. A debit never drives the balance below zero.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` if `amount` is zero or negative,
    /// or `LedgerError::InsufficientBalance` if `current_balance` does not
    /// cover `amount`.
    pub fn debit(current_balance: Decimal, amount: Decimal) -> Result<Posting, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if current_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                available: current_balance,
                required: amount,
            });
        }

        Ok(Posting {
            kind: EntryKind::ChargeSale,
            amount: -amount,
            balance_after: current_balance - amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credit_increases_balance() {
        let posting = LedgerService::credit(dec!(1000), dec!(250)).unwrap();
        assert_eq!(posting.kind, EntryKind::CreditIncrease);
        assert_eq!(posting.amount, dec!(250));
        assert_eq!(posting.balance_after, dec!(1250));
    }

    #[test]
    fn test_credit_from_zero() {
        let posting = LedgerService::credit(Decimal::ZERO, dec!(1000000)).unwrap();
        assert_eq!(posting.balance_after, dec!(1000000));
    }

    #[test]
    fn test_credit_zero_amount() {
        assert!(matches!(
            LedgerService::credit(dec!(1000), Decimal::ZERO),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_credit_negative_amount() {
        assert!(matches!(
            LedgerService::credit(dec!(1000), dec!(-50)),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_debit_decreases_balance() {
        let posting = LedgerService::debit(dec!(1000), dec!(400)).unwrap();
        assert_eq!(posting.kind, EntryKind::ChargeSale);
        assert_eq!(posting.amount, dec!(-400));
        assert_eq!(posting.balance_after, dec!(600));
    }

    #[test]
    fn test_debit_exact_balance() {
        let posting = LedgerService::debit(dec!(5000), dec!(5000)).unwrap();
        assert_eq!(posting.balance_after, Decimal::ZERO);
    }

    #[test]
    fn test_debit_insufficient_balance() {
        let result = LedgerService::debit(dec!(3000), dec!(5000));
        match result {
            Err(LedgerError::InsufficientBalance {
                available,
                required,
            }) => {
                assert_eq!(available, dec!(3000));
                assert_eq!(required, dec!(5000));
            }
            other => panic!("expected InsufficientBalance, got {other:?}"),
        }
    }

    #[test]
    fn test_debit_reports_shortage() {
        let err = LedgerService::debit(dec!(3000), dec!(5000)).unwrap_err();
        assert_eq!(err.shortage(), Some(dec!(2000)));
    }

    #[test]
    fn test_debit_zero_amount() {
        assert!(matches!(
            LedgerService::debit(dec!(1000), Decimal::ZERO),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_debit_negative_amount() {
        assert!(matches!(
            LedgerService::debit(dec!(1000), dec!(-1)),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_debit_from_zero_balance() {
        assert!(matches!(
            LedgerService::debit(Decimal::ZERO, dec!(5000)),
            Err(LedgerError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_drain_balance_with_repeated_sales() {
        // 500 sales of 5000 each against an opening balance of 2,500,000
        // must land exactly on zero, with the 501st sale rejected.
        let mut balance = dec!(2500000);
        for _ in 0..500 {
            let posting = LedgerService::debit(balance, dec!(5000)).unwrap();
            balance = posting.balance_after;
        }
        assert_eq!(balance, Decimal::ZERO);
        assert!(matches!(
            LedgerService::debit(balance, dec!(5000)),
            Err(LedgerError::InsufficientBalance { .. })
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn money() -> impl Strategy<Value = Decimal> {
            // Up to ~1 billion with two decimal places.
            (1i64..=100_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
        }

        proptest! {
            #[test]
            fn credit_never_decreases_balance(balance in money(), amount in money()) {
                let posting = LedgerService::credit(balance, amount).unwrap();
                prop_assert!(posting.balance_after > balance);
                prop_assert_eq!(posting.balance_after, balance + amount);
                prop_assert!(posting.amount > Decimal::ZERO);
            }

            #[test]
            fn debit_never_goes_negative(balance in money(), amount in money()) {
                match LedgerService::debit(balance, amount) {
                    Ok(posting) => {
                        prop_assert!(posting.balance_after >= Decimal::ZERO);
                        prop_assert_eq!(posting.balance_after, balance - amount);
                        prop_assert!(posting.amount < Decimal::ZERO);
                    }
                    Err(LedgerError::InsufficientBalance { available, required }) => {
                        prop_assert!(balance < amount);
                        prop_assert_eq!(available, balance);
                        prop_assert_eq!(required, amount);
                    }
                    Err(other) => return Err(TestCaseError::fail(format!("unexpected error: {other}"))),
                }
            }

            #[test]
            fn posting_amount_reconstructs_balance(balance in money(), amount in money()) {
                // balance + signed amount == balance_after, for both kinds.
                let credit = LedgerService::credit(balance, amount).unwrap();
                prop_assert_eq!(balance + credit.amount, credit.balance_after);

                if let Ok(debit) = LedgerService::debit(balance, amount) {
                    prop_assert_eq!(balance + debit.amount, debit.balance_after);
                }
            }
        }
    }
}
