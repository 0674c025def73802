//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Every multi-write operation runs as one database
//! transaction; balance changes happen only through the primitives in
//! `seller`, which take the seller row lock first.

pub mod charge_sale;
pub mod credit_request;
pub mod reconciliation;
pub mod seller;

pub use charge_sale::{ChargeSaleError, ChargeSaleReceipt, ChargeSaleRepository};
pub use credit_request::{ApprovedRequest, CreditRequestError, CreditRequestRepository};
pub use reconciliation::{ReconciliationError, ReconciliationRepository};
pub use seller::{CreateSellerInput, SellerError, SellerRepository};
