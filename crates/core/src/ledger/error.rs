//! Ledger error types for amount validation and balance errors.

use rialto_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Amount must be strictly positive.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// Balance does not cover the requested debit.
    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance {
        /// The seller's current balance.
        available: Decimal,
        /// The amount the debit needs.
        required: Decimal,
    },

    // ========== Seller Errors ==========
    /// Seller not found.
    #[error("Seller not found: {0}")]
    SellerNotFound(Uuid),

    /// Seller is inactive and cannot transact.
    #[error("Seller {0} is inactive")]
    SellerInactive(Uuid),

    // ========== Immutability Errors ==========
    /// A persisted ledger entry was targeted for update or delete.
    #[error("Ledger entries are append-only and cannot be modified")]
    ImmutabilityViolation,

    // ========== Concurrency Errors ==========
    /// A concurrent operation held the rows this one needed; the atomic
    /// unit rolled back and the caller may retry.
    #[error("Operation conflict: {0}")]
    OperationConflict(String),

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::SellerNotFound(_) => "SELLER_NOT_FOUND",
            Self::SellerInactive(_) => "SELLER_INACTIVE",
            Self::ImmutabilityViolation => "IMMUTABILITY_VIOLATION",
            Self::OperationConflict(_) => "OPERATION_CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidAmount(_) => 400,

            // 404 Not Found
            Self::SellerNotFound(_) => 404,

            // 422 Unprocessable Entity - business rule violations
            Self::InsufficientBalance { .. } | Self::SellerInactive(_) => 422,

            // 409 Conflict - lost lock/serialization race, safe to retry
            Self::OperationConflict(_) => 409,

            // 500 Internal Server Error
            Self::ImmutabilityViolation | Self::Database(_) => 500,
        }
    }

    /// For an insufficient-balance error, returns how much is missing.
    #[must_use]
    pub fn shortage(&self) -> Option<Decimal> {
        match self {
            Self::InsufficientBalance {
                available,
                required,
            } => Some(required - available),
            _ => None,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::InvalidAmount(_) => Self::Validation(message),
            LedgerError::SellerNotFound(_) => Self::NotFound(message),
            LedgerError::InsufficientBalance { .. } | LedgerError::SellerInactive(_) => {
                Self::BusinessRule(message)
            }
            LedgerError::ImmutabilityViolation => Self::Internal(message),
            LedgerError::OperationConflict(_) => Self::Conflict(message),
            LedgerError::Database(_) => Self::Database(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::InvalidAmount(dec!(-5)).error_code(),
            "INVALID_AMOUNT"
        );
        assert_eq!(
            LedgerError::InsufficientBalance {
                available: dec!(100),
                required: dec!(150),
            }
            .error_code(),
            "INSUFFICIENT_BALANCE"
        );
        assert_eq!(
            LedgerError::SellerNotFound(Uuid::nil()).error_code(),
            "SELLER_NOT_FOUND"
        );
        assert_eq!(
            LedgerError::ImmutabilityViolation.error_code(),
            "IMMUTABILITY_VIOLATION"
        );
        assert_eq!(
            LedgerError::OperationConflict("deadlock detected".to_string()).error_code(),
            "OPERATION_CONFLICT"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::InvalidAmount(dec!(0)).http_status_code(), 400);
        assert_eq!(
            LedgerError::SellerNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::InsufficientBalance {
                available: dec!(0),
                required: dec!(1),
            }
            .http_status_code(),
            422
        );
        assert_eq!(
            LedgerError::SellerInactive(Uuid::nil()).http_status_code(),
            422
        );
        assert_eq!(
            LedgerError::OperationConflict("test".to_string()).http_status_code(),
            409
        );
        assert_eq!(
            LedgerError::Database("test".to_string()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_shortage() {
        let err = LedgerError::InsufficientBalance {
            available: dec!(3000),
            required: dec!(5000),
        };
        assert_eq!(err.shortage(), Some(dec!(2000)));
        assert_eq!(LedgerError::InvalidAmount(dec!(0)).shortage(), None);
    }

    #[test]
    fn test_app_error_mapping() {
        let err: AppError = LedgerError::InvalidAmount(dec!(0)).into();
        assert_eq!(err.status_code(), 400);

        let err: AppError = LedgerError::SellerNotFound(Uuid::nil()).into();
        assert_eq!(err.status_code(), 404);

        let err: AppError = LedgerError::InsufficientBalance {
            available: dec!(1),
            required: dec!(2),
        }
        .into();
        assert_eq!(err.status_code(), 422);

        let err: AppError = LedgerError::OperationConflict("deadlock detected".to_string()).into();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "CONFLICT");

        let err: AppError = LedgerError::ImmutabilityViolation.into();
        assert_eq!(err.status_code(), 500);

        let err: AppError = LedgerError::Database("down".to_string()).into();
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::InsufficientBalance {
            available: dec!(100.50),
            required: dec!(200),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: available 100.50, required 200"
        );

        let err = LedgerError::InvalidAmount(dec!(-10));
        assert_eq!(err.to_string(), "Amount must be positive, got -10");
    }
}
