//! Balance reconciliation against the ledger.
//!
//! Read-only: sums the seller's signed entry amounts in SQL and compares
//! the result with the stored balance. Takes no locks; a report produced
//! while writes are in flight reflects some committed prefix of the ledger.

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter, QuerySelect,
};
use uuid::Uuid;

use rialto_core::ledger::{reconcile, ReconciliationReport};

use crate::entities::{ledger_entries, sellers};
use crate::repositories::seller::classify_db_err;

/// Error types for reconciliation.
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    /// Seller not found.
    #[error("Seller not found: {0}")]
    SellerNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReconciliationError> for rialto_shared::AppError {
    fn from(err: ReconciliationError) -> Self {
        match err {
            ReconciliationError::SellerNotFound(_) => Self::NotFound(err.to_string()),
            ReconciliationError::Database(e) => classify_db_err(&e).into(),
        }
    }
}

/// Aggregated ledger totals for one seller.
#[derive(Debug, FromQueryResult)]
struct LedgerTotals {
    total: Option<Decimal>,
    entries: i64,
}

/// Reconciliation repository.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    db: DatabaseConnection,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Recomputes a seller's balance from the ledger and compares it with
    /// the stored balance.
    ///
    /// A seller with no entries reconciles against a computed balance of
    /// zero.
    ///
    /// # Errors
    ///
    /// Returns `ReconciliationError::SellerNotFound` for an unknown seller.
    pub async fn reconcile(
        &self,
        seller_id: Uuid,
    ) -> Result<ReconciliationReport, ReconciliationError> {
        let seller = sellers::Entity::find_by_id(seller_id)
            .one(&self.db)
            .await?
            .ok_or(ReconciliationError::SellerNotFound(seller_id))?;

        let totals = ledger_entries::Entity::find()
            .select_only()
            .column_as(ledger_entries::Column::Amount.sum(), "total")
            .column_as(ledger_entries::Column::Id.count(), "entries")
            .filter(ledger_entries::Column::SellerId.eq(seller_id))
            .into_model::<LedgerTotals>()
            .one(&self.db)
            .await?;

        let (computed_balance, entry_count) = match totals {
            Some(t) => (
                t.total.unwrap_or(Decimal::ZERO),
                u64::try_from(t.entries).unwrap_or(0),
            ),
            None => (Decimal::ZERO, 0),
        };

        let report = reconcile(seller.credit_balance, computed_balance, entry_count);

        if report.is_reconciled {
            tracing::debug!(seller_id = %seller_id, entries = entry_count, "balance reconciled");
        } else {
            tracing::warn!(
                seller_id = %seller_id,
                current = %report.current_balance,
                computed = %report.computed_balance,
                difference = %report.difference,
                "balance drift detected"
            );
        }

        Ok(report)
    }
}
