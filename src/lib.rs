//! Mock payout gateway.
//!
//! A wallet service with user accounts, saved bank accounts, beneficiaries
//! and a simulated payout engine. Payouts are acknowledged immediately and
//! settled asynchronously by a background worker that picks a random
//! outcome, refunding the wallet when a payout fails.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod money;
pub mod services;
pub mod state;
pub mod validation;
