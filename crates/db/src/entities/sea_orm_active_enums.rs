//! Postgres enum mappings shared by the entities.

use rialto_core::ledger::EntryKind;
use rialto_core::request::RequestStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a credit request.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "credit_request_status"
)]
pub enum CreditRequestStatus {
    /// Awaiting a decision.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved, seller credited.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected, balance untouched.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<RequestStatus> for CreditRequestStatus {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Pending => Self::Pending,
            RequestStatus::Approved => Self::Approved,
            RequestStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<CreditRequestStatus> for RequestStatus {
    fn from(status: CreditRequestStatus) -> Self {
        match status {
            CreditRequestStatus::Pending => Self::Pending,
            CreditRequestStatus::Approved => Self::Approved,
            CreditRequestStatus::Rejected => Self::Rejected,
        }
    }
}

/// Kind of ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_type")]
pub enum EntryType {
    /// Balance increase from an approved credit request.
    #[sea_orm(string_value = "credit_increase")]
    CreditIncrease,
    /// Balance decrease from a charge sale.
    #[sea_orm(string_value = "charge_sale")]
    ChargeSale,
}

impl From<EntryKind> for EntryType {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::CreditIncrease => Self::CreditIncrease,
            EntryKind::ChargeSale => Self::ChargeSale,
        }
    }
}

impl From<EntryType> for EntryKind {
    fn from(entry_type: EntryType) -> Self {
        match entry_type {
            EntryType::CreditIncrease => Self::CreditIncrease,
            EntryType::ChargeSale => Self::ChargeSale,
        }
    }
}
