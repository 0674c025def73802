//! Credit-request domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Credit request status in the approval workflow.
///
/// Requests progress through these states:
/// - Pending → Approved (approve, credits the seller)
/// - Pending → Rejected (reject, balance untouched)
///
/// Approved and Rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Request is awaiting a decision.
    Pending,
    /// Request was approved and the seller was credited.
    Approved,
    /// Request was rejected without touching the balance.
    Rejected,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if no further transition is allowed from this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request action representing a state transition with audit data.
///
/// Each variant captures the resulting status and the audit trail
/// information (who decided, when, and for rejections, why).
#[derive(Debug, Clone)]
pub enum RequestAction {
    /// Approve a pending request, crediting the seller.
    Approve {
        /// The new status after approval.
        new_status: RequestStatus,
        /// The user who approved the request.
        processed_by: Uuid,
        /// When the request was approved.
        processed_at: DateTime<Utc>,
    },
    /// Reject a pending request without crediting.
    Reject {
        /// The new status after rejection.
        new_status: RequestStatus,
        /// The user who rejected the request.
        processed_by: Uuid,
        /// When the request was rejected.
        processed_at: DateTime<Utc>,
        /// Optional reason from the reviewer.
        reason: Option<String>,
    },
}

impl RequestAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> RequestStatus {
        match self {
            Self::Approve { new_status, .. } | Self::Reject { new_status, .. } => *new_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(RequestStatus::Pending.as_str(), "pending");
        assert_eq!(RequestStatus::Approved.as_str(), "approved");
        assert_eq!(RequestStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(RequestStatus::parse("pending"), Some(RequestStatus::Pending));
        assert_eq!(
            RequestStatus::parse("APPROVED"),
            Some(RequestStatus::Approved)
        );
        assert_eq!(
            RequestStatus::parse("Rejected"),
            Some(RequestStatus::Rejected)
        );
        assert_eq!(RequestStatus::parse("invalid"), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", RequestStatus::Pending), "pending");
        assert_eq!(format!("{}", RequestStatus::Approved), "approved");
    }

    #[test]
    fn test_status_terminal() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_action_new_status() {
        let action = RequestAction::Approve {
            new_status: RequestStatus::Approved,
            processed_by: Uuid::new_v4(),
            processed_at: Utc::now(),
        };
        assert_eq!(action.new_status(), RequestStatus::Approved);

        let action = RequestAction::Reject {
            new_status: RequestStatus::Rejected,
            processed_by: Uuid::new_v4(),
            processed_at: Utc::now(),
            reason: Some("duplicate request".to_string()),
        };
        assert_eq!(action.new_status(), RequestStatus::Rejected);
    }
}
