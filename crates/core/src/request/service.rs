//! Credit-request service for lifecycle validation.
//!
//! The repository layer loads a request under a row lock, asks this service
//! whether the decision is legal, and persists the returned action's audit
//! fields atomically with the balance change (for approvals).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::RequestError;
use super::types::{RequestAction, RequestStatus};

/// Credit-request service for lifecycle validation.
///
/// This service contains pure business logic with no database dependencies.
pub struct RequestService;

impl RequestService {
    /// Validate the amount of a new credit request.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::InvalidAmount` if `amount` is zero or negative.
    pub fn validate_amount(amount: Decimal) -> Result<(), RequestError> {
        if amount <= Decimal::ZERO {
            return Err(RequestError::InvalidAmount(amount));
        }
        Ok(())
    }

    /// Approve a pending request.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::InvalidTransition` if the request is not
    /// pending. Approving an already-approved request fails here, which is
    /// what makes approval idempotent: only the first decision credits the
    /// seller.
    pub fn approve(
        current_status: RequestStatus,
        processed_by: Uuid,
        processed_at: DateTime<Utc>,
    ) -> Result<RequestAction, RequestError> {
        if current_status != RequestStatus::Pending {
            return Err(RequestError::InvalidTransition {
                from: current_status,
                to: RequestStatus::Approved,
            });
        }

        Ok(RequestAction::Approve {
            new_status: RequestStatus::Approved,
            processed_by,
            processed_at,
        })
    }

    /// Reject a pending request.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::InvalidTransition` if the request is not
    /// pending.
    pub fn reject(
        current_status: RequestStatus,
        processed_by: Uuid,
        processed_at: DateTime<Utc>,
        reason: Option<String>,
    ) -> Result<RequestAction, RequestError> {
        if current_status != RequestStatus::Pending {
            return Err(RequestError::InvalidTransition {
                from: current_status,
                to: RequestStatus::Rejected,
            });
        }

        Ok(RequestAction::Reject {
            new_status: RequestStatus::Rejected,
            processed_by,
            processed_at,
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_positive_amount() {
        assert!(RequestService::validate_amount(dec!(1000000)).is_ok());
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-1))]
    #[case(dec!(-1000000))]
    fn test_validate_non_positive_amount(#[case] amount: Decimal) {
        assert!(matches!(
            RequestService::validate_amount(amount),
            Err(RequestError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_approve_pending() {
        let reviewer = Uuid::new_v4();
        let now = Utc::now();
        let action = RequestService::approve(RequestStatus::Pending, reviewer, now).unwrap();

        assert_eq!(action.new_status(), RequestStatus::Approved);
        match action {
            RequestAction::Approve {
                processed_by,
                processed_at,
                ..
            } => {
                assert_eq!(processed_by, reviewer);
                assert_eq!(processed_at, now);
            }
            RequestAction::Reject { .. } => panic!("expected Approve action"),
        }
    }

    #[rstest]
    #[case(RequestStatus::Approved)]
    #[case(RequestStatus::Rejected)]
    fn test_approve_terminal_status(#[case] status: RequestStatus) {
        let result = RequestService::approve(status, Uuid::new_v4(), Utc::now());
        match result {
            Err(RequestError::InvalidTransition { from, to }) => {
                assert_eq!(from, status);
                assert_eq!(to, RequestStatus::Approved);
            }
            other => panic!("expected InvalidTransition, got {other:?}"),
        }
    }

    #[test]
    fn test_reject_pending() {
        let reviewer = Uuid::new_v4();
        let now = Utc::now();
        let action = RequestService::reject(
            RequestStatus::Pending,
            reviewer,
            now,
            Some("insufficient documentation".to_string()),
        )
        .unwrap();

        assert_eq!(action.new_status(), RequestStatus::Rejected);
        match action {
            RequestAction::Reject { reason, .. } => {
                assert_eq!(reason.as_deref(), Some("insufficient documentation"));
            }
            RequestAction::Approve { .. } => panic!("expected Reject action"),
        }
    }

    #[test]
    fn test_reject_without_reason() {
        let action =
            RequestService::reject(RequestStatus::Pending, Uuid::new_v4(), Utc::now(), None)
                .unwrap();
        assert_eq!(action.new_status(), RequestStatus::Rejected);
    }

    #[rstest]
    #[case(RequestStatus::Approved)]
    #[case(RequestStatus::Rejected)]
    fn test_reject_terminal_status(#[case] status: RequestStatus) {
        let result = RequestService::reject(status, Uuid::new_v4(), Utc::now(), None);
        assert!(matches!(
            result,
            Err(RequestError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_double_approve_is_rejected() {
        let first =
            RequestService::approve(RequestStatus::Pending, Uuid::new_v4(), Utc::now()).unwrap();
        let second = RequestService::approve(first.new_status(), Uuid::new_v4(), Utc::now());
        assert!(matches!(
            second,
            Err(RequestError::InvalidTransition {
                from: RequestStatus::Approved,
                ..
            })
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn any_status() -> impl Strategy<Value = RequestStatus> {
            prop_oneof![
                Just(RequestStatus::Pending),
                Just(RequestStatus::Approved),
                Just(RequestStatus::Rejected),
            ]
        }

        proptest! {
            #[test]
            fn terminal_states_never_transition(status in any_status()) {
                let approve = RequestService::approve(status, Uuid::nil(), Utc::now());
                let reject = RequestService::reject(status, Uuid::nil(), Utc::now(), None);

                if status.is_terminal() {
                    prop_assert!(approve.is_err());
                    prop_assert!(reject.is_err());
                } else {
                    prop_assert!(approve.is_ok());
                    prop_assert!(reject.is_ok());
                }
            }

            #[test]
            fn every_decision_lands_on_a_terminal_state(status in any_status()) {
                if let Ok(action) = RequestService::approve(status, Uuid::nil(), Utc::now()) {
                    prop_assert!(action.new_status().is_terminal());
                }
                if let Ok(action) = RequestService::reject(status, Uuid::nil(), Utc::now(), None) {
                    prop_assert!(action.new_status().is_terminal());
                }
            }
        }
    }
}
