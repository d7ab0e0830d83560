//! Beneficiary (payout destination) models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::mask_account_number;

/// Represents a beneficiary record from the database.
///
/// `bene_id` is the externally visible reference, unique per user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Beneficiary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bene_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub bank_account: String,
    pub ifsc: String,
    pub address1: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Beneficiary details as sent by clients, both to `POST /api/v1/beneficiary`
/// and embedded as `beneDetails` in a transfer request.
///
/// ```json
/// {
///   "beneId": "BENE7F3K2Q9A",
///   "name": "Asha Rao",
///   "bankAccount": "123456789",
///   "ifsc": "HDFC0000123"
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryRequest {
    pub bene_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bank_account: Option<String>,
    pub ifsc: Option<String>,
    pub address1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryResponse {
    pub bene_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub bank_account: String,
    pub ifsc: String,
    /// Account number with all but the last four digits replaced by `X`
    pub masked_card: String,
    pub status: String,
    pub address1: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl From<Beneficiary> for BeneficiaryResponse {
    fn from(bene: Beneficiary) -> Self {
        Self {
            masked_card: mask_account_number(&bene.bank_account),
            bene_id: bene.bene_id,
            name: bene.name,
            email: bene.email,
            phone: bene.phone,
            bank_account: bene.bank_account,
            ifsc: bene.ifsc,
            status: bene.status,
            address1: bene.address1,
            city: bene.city,
            state: bene.state,
            pincode: bene.pincode,
        }
    }
}
