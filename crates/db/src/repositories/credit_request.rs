//! Credit request repository: creation and the approve/reject decision.
//!
//! Approval is the only path that credits a seller. The decision locks the
//! request row, re-reads its status, and runs the state machine before any
//! balance change, so concurrent decisions on one request resolve to exactly
//! one winner; the loser observes a terminal status and gets an
//! invalid-transition error.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use rialto_core::ledger::LedgerError;
use rialto_core::request::{RequestAction, RequestError, RequestService};

use crate::entities::{credit_requests, sea_orm_active_enums::CreditRequestStatus, sellers};
use crate::repositories::seller::{classify_db_err, credit_balance};

/// Error types for credit request operations.
#[derive(Debug, thiserror::Error)]
pub enum CreditRequestError {
    /// Credit request not found.
    #[error("Credit request not found: {0}")]
    NotFound(Uuid),

    /// Seller not found.
    #[error("Seller not found: {0}")]
    SellerNotFound(Uuid),

    /// State machine or amount validation failure.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Balance mutation failure during approval.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CreditRequestError> for rialto_shared::AppError {
    fn from(err: CreditRequestError) -> Self {
        match err {
            CreditRequestError::NotFound(_) | CreditRequestError::SellerNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            CreditRequestError::Request(e) => e.into(),
            CreditRequestError::Ledger(e) => e.into(),
            CreditRequestError::Database(e) => classify_db_err(&e).into(),
        }
    }
}

/// Result of a successful approval.
#[derive(Debug, Clone)]
pub struct ApprovedRequest {
    /// The request in its approved state.
    pub request: credit_requests::Model,
    /// The seller's balance after the credit.
    pub new_balance: Decimal,
}

/// Credit request repository.
#[derive(Debug, Clone)]
pub struct CreditRequestRepository {
    db: DatabaseConnection,
}

impl CreditRequestRepository {
    /// Creates a new credit request repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a pending credit request.
    ///
    /// The amount is validated before any row is written; non-positive
    /// amounts never reach the database.
    ///
    /// # Errors
    ///
    /// Returns `CreditRequestError::Request` for a non-positive amount and
    /// `CreditRequestError::SellerNotFound` for an unknown seller.
    pub async fn create(
        &self,
        seller_id: Uuid,
        amount: Decimal,
    ) -> Result<credit_requests::Model, CreditRequestError> {
        RequestService::validate_amount(amount)?;

        sellers::Entity::find_by_id(seller_id)
            .one(&self.db)
            .await?
            .ok_or(CreditRequestError::SellerNotFound(seller_id))?;

        let request = credit_requests::ActiveModel {
            id: Set(Uuid::new_v4()),
            seller_id: Set(seller_id),
            amount: Set(amount),
            status: Set(CreditRequestStatus::Pending),
            notes: Set(None),
            processed_by: Set(None),
            processed_at: Set(None),
            requested_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(request_id = %request.id, seller_id = %seller_id, amount = %amount, "credit request created");
        Ok(request)
    }

    /// Approves a pending request and credits the seller, atomically.
    ///
    /// The request row lock, status flip, balance update, and ledger entry
    /// all commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns `CreditRequestError::Request` with an invalid transition when
    /// the request was already decided; the balance is untouched in that
    /// case.
    pub async fn approve(
        &self,
        request_id: Uuid,
        processed_by: Uuid,
    ) -> Result<ApprovedRequest, CreditRequestError> {
        let txn = self.db.begin().await?;

        let request = lock_request(&txn, request_id).await?;
        let action =
            RequestService::approve(request.status.clone().into(), processed_by, Utc::now())?;

        let description = format!("Credit increase from request {}", request.id);
        let (seller, _entry) = credit_balance(
            &txn,
            request.seller_id,
            request.amount,
            Some(request.id),
            &description,
        )
        .await?;

        let request = record_decision(&txn, request, &action).await?;

        txn.commit().await?;

        tracing::info!(
            request_id = %request.id,
            seller_id = %seller.id,
            new_balance = %seller.credit_balance,
            "credit request approved"
        );

        Ok(ApprovedRequest {
            request,
            new_balance: seller.credit_balance,
        })
    }

    /// Rejects a pending request. No balance side effect.
    ///
    /// # Errors
    ///
    /// Returns `CreditRequestError::Request` with an invalid transition when
    /// the request was already decided.
    pub async fn reject(
        &self,
        request_id: Uuid,
        processed_by: Uuid,
        reason: Option<String>,
    ) -> Result<credit_requests::Model, CreditRequestError> {
        let txn = self.db.begin().await?;

        let request = lock_request(&txn, request_id).await?;
        let action = RequestService::reject(
            request.status.clone().into(),
            processed_by,
            Utc::now(),
            reason,
        )?;

        let request = record_decision(&txn, request, &action).await?;

        txn.commit().await?;

        tracing::info!(request_id = %request.id, "credit request rejected");
        Ok(request)
    }

    /// Fetches a request by id.
    ///
    /// # Errors
    ///
    /// Returns `CreditRequestError::NotFound` when no request has the
    /// given id.
    pub async fn get(&self, request_id: Uuid) -> Result<credit_requests::Model, CreditRequestError> {
        credit_requests::Entity::find_by_id(request_id)
            .one(&self.db)
            .await?
            .ok_or(CreditRequestError::NotFound(request_id))
    }

    /// Lists requests, optionally filtered by status, newest first.
    pub async fn list(
        &self,
        status: Option<CreditRequestStatus>,
    ) -> Result<Vec<credit_requests::Model>, CreditRequestError> {
        let mut query = credit_requests::Entity::find();
        if let Some(status) = status {
            query = query.filter(credit_requests::Column::Status.eq(status));
        }

        let requests = query
            .order_by_desc(credit_requests::Column::RequestedAt)
            .all(&self.db)
            .await?;
        Ok(requests)
    }

    /// Lists a seller's requests, newest first.
    pub async fn list_for_seller(
        &self,
        seller_id: Uuid,
    ) -> Result<Vec<credit_requests::Model>, CreditRequestError> {
        let requests = credit_requests::Entity::find()
            .filter(credit_requests::Column::SellerId.eq(seller_id))
            .order_by_desc(credit_requests::Column::RequestedAt)
            .all(&self.db)
            .await?;
        Ok(requests)
    }
}

/// Loads the request row under an exclusive lock.
async fn lock_request(
    txn: &DatabaseTransaction,
    request_id: Uuid,
) -> Result<credit_requests::Model, CreditRequestError> {
    credit_requests::Entity::find_by_id(request_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(CreditRequestError::NotFound(request_id))
}

/// Writes the decision's audit fields onto the locked request row.
async fn record_decision(
    txn: &DatabaseTransaction,
    request: credit_requests::Model,
    action: &RequestAction,
) -> Result<credit_requests::Model, CreditRequestError> {
    let mut active: credit_requests::ActiveModel = request.into();

    match action {
        RequestAction::Approve {
            new_status,
            processed_by,
            processed_at,
        } => {
            active.status = Set((*new_status).into());
            active.processed_by = Set(Some(*processed_by));
            active.processed_at = Set(Some((*processed_at).into()));
        }
        RequestAction::Reject {
            new_status,
            processed_by,
            processed_at,
            reason,
        } => {
            active.status = Set((*new_status).into());
            active.processed_by = Set(Some(*processed_by));
            active.processed_at = Set(Some((*processed_at).into()));
            active.notes = Set(reason.clone());
        }
    }

    Ok(active.update(txn).await?)
}
