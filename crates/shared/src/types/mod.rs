//! Common types used across the application.

pub mod msisdn;

pub use msisdn::Msisdn;
