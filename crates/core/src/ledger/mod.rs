//! Balance-mutation primitives and the immutable ledger model.
//!
//! A seller's balance may only change through the two postings computed
//! here: a credit increase (positive) or a charge sale (negative). Every
//! posting carries the signed amount and the balance snapshot after it, so
//! the ledger alone is sufficient to reconstruct any balance.

pub mod error;
pub mod reconcile;
pub mod service;
pub mod types;

pub use error::LedgerError;
pub use reconcile::{reconcile, sum_entries, ReconciliationReport};
pub use service::LedgerService;
pub use types::{EntryKind, Posting};
