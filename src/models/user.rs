//! User data models and auth request/response types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money;

/// Represents a user record from the database.
///
/// # Balance Storage
///
/// `wallet_balance_paise` is the wallet balance in paise. It is never
/// negative (enforced by a CHECK constraint) and only changes through
/// add-money, payout debits and payout refunds.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: String,
    /// Argon2 PHC string; never leaves the service layer.
    pub password_hash: String,
    pub wallet_balance_paise: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as returned to clients (no credential).
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub wallet_balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            wallet_balance: money::from_paise(user.wallet_balance_paise),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request body for `POST /api/auth/register`.
///
/// ```json
/// {
///   "email": "asha@example.com",
///   "password": "hunter22",
///   "name": "Asha",
///   "phone": "9876543210"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    #[serde(rename = "tokenType")]
    pub token_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
}
