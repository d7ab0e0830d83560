//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database transactions, validation, and complex operations.

pub mod auth_service;
pub mod beneficiary_service;
pub mod notification_service;
pub mod settlement;
pub mod transfer_service;
pub mod wallet_service;
