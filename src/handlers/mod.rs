//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to a service
//! 3. Returns HTTP response (JSON envelope, status code)

/// Registration, login and profile
pub mod auth;
pub mod health;
/// API index and 404 fallback
pub mod index;
pub mod notifications;
/// Provider-style `/api/v1` payout endpoints
pub mod payouts;
/// Wallet, bank account and history endpoints
pub mod wallet;
