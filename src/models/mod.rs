//! Data models representing database entities and API payloads.
//!
//! Row types derive `sqlx::FromRow` and map one-to-one onto tables.
//! Request types use `Option` fields so that missing values surface as
//! `VALIDATION_ERROR` responses rather than extractor rejections.

pub mod bank_account;
pub mod beneficiary;
pub mod notification;
pub mod response;
pub mod transaction;
pub mod user;
