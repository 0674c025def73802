//! Credit-request error types for validation and state errors.

use rialto_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::RequestStatus;

/// Errors that can occur during credit-request operations.
#[derive(Debug, Error)]
pub enum RequestError {
    // ========== Validation Errors ==========
    /// Requested amount must be strictly positive.
    #[error("Requested amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    // ========== State Errors ==========
    /// The request is already in a terminal state.
    #[error("Cannot transition request from {from} to {to}")]
    InvalidTransition {
        /// The status the request is currently in.
        from: RequestStatus,
        /// The status the caller tried to move it to.
        to: RequestStatus,
    },
}

impl RequestError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount(_) => 400,
            // 409 Conflict - the request was already decided
            Self::InvalidTransition { .. } => 409,
        }
    }
}

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        let message = err.to_string();
        match err {
            RequestError::InvalidAmount(_) => Self::Validation(message),
            RequestError::InvalidTransition { .. } => Self::Conflict(message),
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
            RequestError::InvalidAmount(dec!(0)).error_code(),
            "INVALID_AMOUNT"
        );
        assert_eq!(
            RequestError::InvalidTransition {
                from: RequestStatus::Approved,
                to: RequestStatus::Rejected,
            }
            .error_code(),
            "INVALID_TRANSITION"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(RequestError::InvalidAmount(dec!(-1)).http_status_code(), 400);
        assert_eq!(
            RequestError::InvalidTransition {
                from: RequestStatus::Rejected,
                to: RequestStatus::Approved,
            }
            .http_status_code(),
            409
        );
    }

    #[test]
    fn test_app_error_mapping() {
        let err: AppError = RequestError::InvalidAmount(dec!(-1)).into();
        assert_eq!(err.status_code(), 400);

        let err: AppError = RequestError::InvalidTransition {
            from: RequestStatus::Approved,
            to: RequestStatus::Rejected,
        }
        .into();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "CONFLICT");
    }

    #[test]
    fn test_error_display() {
        let err = RequestError::InvalidTransition {
            from: RequestStatus::Approved,
            to: RequestStatus::Approved,
        };
        assert_eq!(
            err.to_string(),
            "Cannot transition request from approved to approved"
        );
    }
}
