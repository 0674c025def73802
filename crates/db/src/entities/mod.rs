//! `SeaORM` entity definitions.

pub mod credit_requests;
pub mod ledger_entries;
pub mod phone_numbers;
pub mod sea_orm_active_enums;
pub mod sellers;
