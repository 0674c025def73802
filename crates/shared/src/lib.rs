//! Shared types, errors, and configuration for Rialto.
//!
//! This crate provides common types used across all other crates:
//! - The `Msisdn` phone-target identifier
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use types::Msisdn;
