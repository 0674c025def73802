//! Seller repository and the balance-mutation primitives.
//!
//! `credit_balance` and `debit_balance` are the only writers of
//! `sellers.credit_balance` in the whole crate. Both lock the seller row
//! (SELECT ... FOR UPDATE), re-read the balance under the lock, validate
//! through `LedgerService`, and persist the new balance together with its
//! ledger entry. They take a `&DatabaseTransaction` so callers compose them
//! with their own writes into a single commit point.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, RuntimeErr, Set,
};
use uuid::Uuid;

use rialto_core::ledger::{LedgerError, LedgerService, Posting};

use crate::entities::{ledger_entries, sellers};

/// Error types for seller operations.
#[derive(Debug, thiserror::Error)]
pub enum SellerError {
    /// Seller not found.
    #[error("Seller not found: {0}")]
    NotFound(Uuid),

    /// A seller with the same email or phone already exists.
    #[error("Seller with this email or phone already exists")]
    AlreadyExists,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SellerError> for rialto_shared::AppError {
    fn from(err: SellerError) -> Self {
        match err {
            SellerError::NotFound(_) => Self::NotFound(err.to_string()),
            SellerError::AlreadyExists => Self::Conflict(err.to_string()),
            SellerError::Database(e) => classify_db_err(&e).into(),
        }
    }
}

/// Input for creating a seller.
#[derive(Debug, Clone)]
pub struct CreateSellerInput {
    /// Display name.
    pub name: String,
    /// Contact email, unique across sellers.
    pub email: String,
    /// Contact phone, unique across sellers.
    pub phone: String,
}

/// Seller repository for account operations.
#[derive(Debug, Clone)]
pub struct SellerRepository {
    db: DatabaseConnection,
}

impl SellerRepository {
    /// Creates a new seller repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a seller with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `SellerError::AlreadyExists` when the email or phone is
    /// already taken.
    pub async fn create(&self, input: CreateSellerInput) -> Result<sellers::Model, SellerError> {
        let now = Utc::now().into();

        let result = sellers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            credit_balance: Set(Decimal::ZERO),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(seller) => {
                tracing::info!(seller_id = %seller.id, "seller created");
                Ok(seller)
            }
            Err(e) if is_unique_violation(&e) => Err(SellerError::AlreadyExists),
            Err(e) => Err(SellerError::Database(e)),
        }
    }

    /// Fetches a seller by id.
    ///
    /// # Errors
    ///
    /// Returns `SellerError::NotFound` when no seller has the given id.
    pub async fn get(&self, seller_id: Uuid) -> Result<sellers::Model, SellerError> {
        sellers::Entity::find_by_id(seller_id)
            .one(&self.db)
            .await?
            .ok_or(SellerError::NotFound(seller_id))
    }

    /// Lists all sellers ordered by name.
    pub async fn list(&self) -> Result<Vec<sellers::Model>, SellerError> {
        let sellers = sellers::Entity::find()
            .order_by_asc(sellers::Column::Name)
            .all(&self.db)
            .await?;
        Ok(sellers)
    }

    /// Returns the stored balance of a seller.
    ///
    /// # Errors
    ///
    /// Returns `SellerError::NotFound` when no seller has the given id.
    pub async fn balance(&self, seller_id: Uuid) -> Result<Decimal, SellerError> {
        Ok(self.get(seller_id).await?.credit_balance)
    }

    /// Marks a seller active or inactive. Inactive sellers cannot be
    /// charged.
    ///
    /// # Errors
    ///
    /// Returns `SellerError::NotFound` when no seller has the given id.
    pub async fn set_active(
        &self,
        seller_id: Uuid,
        is_active: bool,
    ) -> Result<sellers::Model, SellerError> {
        let seller = self.get(seller_id).await?;

        let mut active: sellers::ActiveModel = seller.into();
        active.is_active = Set(is_active);
        let seller = active.update(&self.db).await?;

        tracing::info!(seller_id = %seller.id, is_active, "seller activity changed");
        Ok(seller)
    }

    /// Lists a seller's ledger entries in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `SellerError::NotFound` when no seller has the given id.
    pub async fn ledger(&self, seller_id: Uuid) -> Result<Vec<ledger_entries::Model>, SellerError> {
        self.get(seller_id).await?;

        let entries = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::SellerId.eq(seller_id))
            .order_by_asc(ledger_entries::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(entries)
    }
}

/// Credits a seller's balance and appends the matching ledger entry.
///
/// Must run inside the caller's transaction; nothing is visible until the
/// caller commits.
pub(crate) async fn credit_balance(
    txn: &DatabaseTransaction,
    seller_id: Uuid,
    amount: Decimal,
    credit_request_id: Option<Uuid>,
    description: &str,
) -> Result<(sellers::Model, ledger_entries::Model), LedgerError> {
    let seller = lock_seller(txn, seller_id).await?;

    let posting = LedgerService::credit(seller.credit_balance, amount)?;
    apply_posting(txn, seller, posting, credit_request_id, None, description).await
}

/// Debits a seller's balance and appends the matching ledger entry.
///
/// The insufficient-balance check runs on the balance re-read under the row
/// lock, so concurrent debits can never overdraw the account.
pub(crate) async fn debit_balance(
    txn: &DatabaseTransaction,
    seller_id: Uuid,
    amount: Decimal,
    phone_number_id: Option<Uuid>,
    description: &str,
) -> Result<(sellers::Model, ledger_entries::Model), LedgerError> {
    let seller = lock_seller(txn, seller_id).await?;
    if !seller.is_active {
        return Err(LedgerError::SellerInactive(seller_id));
    }

    let posting = LedgerService::debit(seller.credit_balance, amount)?;
    apply_posting(txn, seller, posting, None, phone_number_id, description).await
}

/// Loads the seller row under an exclusive lock.
async fn lock_seller(
    txn: &DatabaseTransaction,
    seller_id: Uuid,
) -> Result<sellers::Model, LedgerError> {
    sellers::Entity::find_by_id(seller_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(|e| classify_db_err(&e))?
        .ok_or(LedgerError::SellerNotFound(seller_id))
}

/// Persists a validated posting: new balance plus its ledger entry.
async fn apply_posting(
    txn: &DatabaseTransaction,
    seller: sellers::Model,
    posting: Posting,
    credit_request_id: Option<Uuid>,
    phone_number_id: Option<Uuid>,
    description: &str,
) -> Result<(sellers::Model, ledger_entries::Model), LedgerError> {
    let seller_id = seller.id;

    let mut active: sellers::ActiveModel = seller.into();
    active.credit_balance = Set(posting.balance_after);
    let seller = active
        .update(txn)
        .await
        .map_err(|e| classify_db_err(&e))?;

    let entry = ledger_entries::ActiveModel {
        id: Set(Uuid::new_v4()),
        seller_id: Set(seller_id),
        entry_type: Set(posting.kind.into()),
        amount: Set(posting.amount),
        balance_after: Set(posting.balance_after),
        credit_request_id: Set(credit_request_id),
        phone_number_id: Set(phone_number_id),
        description: Set(description.to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await
    .map_err(|e| classify_db_err(&e))?;

    tracing::info!(
        seller_id = %seller_id,
        entry_id = %entry.id,
        amount = %entry.amount,
        balance_after = %entry.balance_after,
        "ledger entry appended"
    );

    Ok((seller, entry))
}

/// Detects Postgres unique-constraint violations (SQLSTATE 23505).
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    err.sql_err()
        .is_some_and(|e| matches!(e, sea_orm::SqlErr::UniqueConstraintViolation(_)))
}

/// SQLSTATEs for failures that roll back cleanly and are safe to retry:
/// serialization failure, deadlock, lock timeout.
const RETRYABLE_SQLSTATES: [&str; 3] = ["40001", "40P01", "55P03"];

/// Classifies a raw database error into the ledger taxonomy.
///
/// The append-only trigger and the ORM guard both report through the
/// "append-only" message; serialization/deadlock/lock-timeout failures are
/// surfaced as retryable conflicts. Anything else stays a plain database
/// error.
pub(crate) fn classify_db_err(err: &DbErr) -> LedgerError {
    if err.to_string().contains("append-only") {
        return LedgerError::ImmutabilityViolation;
    }
    if sql_state(err).is_some_and(|code| RETRYABLE_SQLSTATES.contains(&code.as_str())) {
        return LedgerError::OperationConflict(err.to_string());
    }
    LedgerError::Database(err.to_string())
}

/// Extracts the SQLSTATE code from a driver-level error, if any.
fn sql_state(err: &DbErr) -> Option<String> {
    let sqlx_err = match err {
        DbErr::Conn(RuntimeErr::SqlxError(e))
        | DbErr::Exec(RuntimeErr::SqlxError(e))
        | DbErr::Query(RuntimeErr::SqlxError(e)) => e,
        _ => return None,
    };
    sqlx_err
        .as_database_error()
        .and_then(|e| e.code())
        .map(std::borrow::Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_only_rejection_classifies_as_immutability_violation() {
        // Message produced by the ORM guard and the database trigger alike
        let err = DbErr::Custom("ledger entries are append-only and cannot be updated".to_string());
        assert!(matches!(
            classify_db_err(&err),
            LedgerError::ImmutabilityViolation
        ));
    }

    #[test]
    fn test_plain_errors_stay_database_errors() {
        let err = DbErr::Custom("connection reset".to_string());
        assert!(matches!(classify_db_err(&err), LedgerError::Database(_)));
        assert_eq!(sql_state(&err), None);
    }

    #[test]
    fn test_record_not_found_is_not_a_conflict() {
        let err = DbErr::RecordNotFound("sellers".to_string());
        assert!(matches!(classify_db_err(&err), LedgerError::Database(_)));
    }
}
