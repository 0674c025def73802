//! Credit-request approval state machine.
//!
//! A credit request starts pending and is resolved exactly once, to either
//! approved or rejected. Terminal states never transition again; approval is
//! the only path that credits a seller's balance.

pub mod error;
pub mod service;
pub mod types;

pub use error::RequestError;
pub use service::RequestService;
pub use types::{RequestAction, RequestStatus};
