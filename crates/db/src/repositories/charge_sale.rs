//! Charge sale repository: the atomic sell-credit-to-phone operation.
//!
//! A charge sale debits the seller, appends the ledger entry, and
//! increments the phone target's running total in one transaction. Lock
//! order is fixed (phone row first, then seller row) so concurrent mixed
//! workloads cannot deadlock on reversed acquisition.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use rialto_core::ledger::LedgerError;
use rialto_shared::types::Msisdn;

use crate::entities::{ledger_entries, phone_numbers, sellers};
use crate::repositories::seller::{classify_db_err, debit_balance};

/// Error types for charge sale operations.
#[derive(Debug, thiserror::Error)]
pub enum ChargeSaleError {
    /// Balance validation failure: invalid amount, insufficient balance,
    /// unknown or inactive seller.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ChargeSaleError> for rialto_shared::AppError {
    fn from(err: ChargeSaleError) -> Self {
        match err {
            ChargeSaleError::Ledger(e) => e.into(),
            ChargeSaleError::Database(e) => classify_db_err(&e).into(),
        }
    }
}

/// Result of a committed charge sale.
#[derive(Debug, Clone)]
pub struct ChargeSaleReceipt {
    /// The seller after the debit.
    pub seller: sellers::Model,
    /// The phone target after the increment.
    pub phone_number: phone_numbers::Model,
    /// The appended ledger entry.
    pub entry: ledger_entries::Model,
}

/// Charge sale repository.
#[derive(Debug, Clone)]
pub struct ChargeSaleRepository {
    db: DatabaseConnection,
}

impl ChargeSaleRepository {
    /// Creates a new charge sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sells `amount` of credit from `seller_id` to the phone target.
    ///
    /// The phone row is created lazily on first sale. On any failure the
    /// whole transaction rolls back: no balance change, no ledger entry, no
    /// phone total change.
    ///
    /// # Errors
    ///
    /// Returns `ChargeSaleError::Ledger` for a non-positive amount, an
    /// unknown or inactive seller, or a balance that does not cover the
    /// amount (the error carries `available` and `required`).
    pub async fn charge(
        &self,
        seller_id: Uuid,
        msisdn: &Msisdn,
        amount: Decimal,
    ) -> Result<ChargeSaleReceipt, ChargeSaleError> {
        // Reject bad amounts before creating a phone row for them.
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount).into());
        }

        let txn = self.db.begin().await?;

        let phone = lock_or_create_phone(&txn, msisdn).await?;

        let description = format!("Charge sale to {msisdn}");
        let (seller, entry) =
            debit_balance(&txn, seller_id, amount, Some(phone.id), &description).await?;

        let phone_id = phone.id;
        let new_total = phone.total_charged + amount;
        let mut active: phone_numbers::ActiveModel = phone.into();
        active.total_charged = Set(new_total);
        let phone = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            seller_id = %seller_id,
            phone_number_id = %phone_id,
            amount = %amount,
            new_balance = %seller.credit_balance,
            "charge sale committed"
        );

        Ok(ChargeSaleReceipt {
            seller,
            phone_number: phone,
            entry,
        })
    }
}

/// Gets or creates the phone row and returns it locked.
///
/// Insert with `ON CONFLICT DO NOTHING` then select under lock: concurrent
/// first sales to one number race on the unique `number` column instead of
/// aborting the transaction, and all of them converge on the single row.
async fn lock_or_create_phone(
    txn: &DatabaseTransaction,
    msisdn: &Msisdn,
) -> Result<phone_numbers::Model, DbErr> {
    let now = Utc::now().into();

    phone_numbers::Entity::insert(phone_numbers::ActiveModel {
        id: Set(Uuid::new_v4()),
        number: Set(msisdn.as_str().to_string()),
        total_charged: Set(Decimal::ZERO),
        created_at: Set(now),
        updated_at: Set(now),
    })
    .on_conflict(
        OnConflict::column(phone_numbers::Column::Number)
            .do_nothing()
            .to_owned(),
    )
    .do_nothing()
    .exec(txn)
    .await?;

    phone_numbers::Entity::find()
        .filter(phone_numbers::Column::Number.eq(msisdn.as_str()))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("phone number row for {msisdn}")))
}
