//! Bank account data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::mask_account_number;

/// Represents a bank account record from the database.
///
/// Account numbers are unique per user (UNIQUE constraint on
/// `(user_id, account_number)`).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BankAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: String,
    /// `savings` or `current`
    pub account_type: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

pub const ACCOUNT_TYPES: [&str; 2] = ["savings", "current"];

/// Request body for `POST /api/wallet/bank-accounts`.
///
/// ```json
/// {
///   "account_holder_name": "Asha Rao",
///   "account_number": "123456789",
///   "ifsc_code": "HDFC0000123",
///   "bank_name": "HDFC Bank",
///   "account_type": "savings"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateBankAccountRequest {
    pub account_holder_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub bank_name: Option<String>,
    /// Defaults to `savings`
    pub account_type: Option<String>,
}

/// Bank account as returned to clients, with the account number masked.
#[derive(Debug, Serialize)]
pub struct BankAccountResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: String,
    pub account_type: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<BankAccount> for BankAccountResponse {
    fn from(account: BankAccount) -> Self {
        Self {
            id: account.id,
            user_id: account.user_id,
            account_holder_name: account.account_holder_name,
            account_number: mask_account_number(&account.account_number),
            ifsc_code: account.ifsc_code,
            bank_name: account.bank_name,
            account_type: account.account_type,
            verified: account.verified,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BankAccountListResponse {
    pub accounts: Vec<BankAccountResponse>,
}

#[derive(Debug, Serialize)]
pub struct BankAccountCreatedResponse {
    pub account: BankAccountResponse,
}
