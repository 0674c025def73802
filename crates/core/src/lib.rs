//! Core accounting logic for Rialto.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and balance
//! calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Balance-mutation primitives and reconciliation
//! - `request` - Credit-request approval state machine

pub mod ledger;
pub mod request;
