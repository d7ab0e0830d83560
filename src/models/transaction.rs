//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: Database entity for payouts and deposits
//! - `CreateTransferRequest` / `TransferAck`: payout submission
//! - `TransferStatusResponse`: payout status lookup
//! - `TransactionHistoryItem`: wallet history rows

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::beneficiary::BeneficiaryRequest;
use super::response::Pagination;
use crate::{money, validation::mask_account_number};

/// Lifecycle of a transaction: `PENDING → SUCCESS | FAILED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Failed => "FAILED",
        }
    }
}

/// How money moves. Payouts are `IMPS` or `UPI`; add-money rows are `DEPOSIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Imps,
    Upi,
    Deposit,
}

impl TransferMode {
    /// Normalize the client's `transferMode`: `upi` selects UPI, anything
    /// else (including absence) is a bank transfer over IMPS.
    pub fn from_request(mode: Option<&str>) -> Self {
        match mode {
            Some(m) if m.eq_ignore_ascii_case("upi") => TransferMode::Upi,
            _ => TransferMode::Imps,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransferMode::Imps => "IMPS",
            TransferMode::Upi => "UPI",
            TransferMode::Deposit => "DEPOSIT",
        }
    }
}

/// Represents a transaction record from the database.
///
/// # Database Table
///
/// Maps to the `transactions` table. Each transaction:
/// - Has a globally unique `transfer_id` (the client's idempotency key)
/// - Stores amount in paise (never floats)
/// - Is created once and, for payouts, resolved exactly once
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub transfer_id: String,
    pub amount_paise: i64,

    /// `PENDING`, `SUCCESS` or `FAILED`
    pub status: String,

    /// `IMPS`, `UPI` or `DEPOSIT`
    pub transfer_mode: String,
    pub remarks: String,

    /// Payout destination; NULL for deposits
    pub beneficiary_id: Option<Uuid>,

    /// Saved bank account with the beneficiary's account number, if any
    pub bank_account_id: Option<Uuid>,

    /// Settlement reference, only on `SUCCESS`
    pub utr: Option<String>,

    /// Only on `FAILED`
    pub failure_reason: Option<String>,

    /// When the settlement worker may resolve this payout
    pub settle_after: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Request body for `POST /api/v1/transfer`.
///
/// ```json
/// {
///   "transferId": "TXN1735689600000ABC123",
///   "amount": 500,
///   "transferMode": "banktransfer",
///   "remarks": "Rent",
///   "beneDetails": {
///     "beneId": "BENE7F3K2Q9A",
///     "name": "Asha Rao",
///     "bankAccount": "123456789",
///     "ifsc": "HDFC0000123"
///   }
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferRequest {
    pub transfer_id: Option<String>,
    pub amount: Option<Decimal>,
    pub transfer_mode: Option<String>,
    pub remarks: Option<String>,
    pub bene_details: Option<BeneficiaryRequest>,
}

/// Provisional acceptance of a payout. The final outcome is only visible
/// through the status endpoint and notifications.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferAck {
    pub reference_id: String,
    pub acknowledged: u8,
}

/// Response body for `GET /api/v1/transfer/{transferId}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferStatusResponse {
    pub transfer_id: String,
    pub amount: Decimal,
    pub status: String,
    pub transfer_mode: String,
    pub remarks: String,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl From<Transaction> for TransferStatusResponse {
    fn from(t: Transaction) -> Self {
        Self {
            transfer_id: t.transfer_id,
            amount: money::from_paise(t.amount_paise),
            status: t.status,
            transfer_mode: t.transfer_mode,
            remarks: t.remarks,
            created_at: t.created_at,
            processed_at: t.processed_at,
            utr: t.utr,
            failure_reason: t.failure_reason,
        }
    }
}

/// A transaction joined with its destination details, for history listings.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransactionHistoryRow {
    pub id: Uuid,
    pub transfer_id: String,
    pub amount_paise: i64,
    pub status: String,
    pub transfer_mode: String,
    pub remarks: String,
    pub utr: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub account_holder_name: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransactionHistoryItem {
    pub id: Uuid,
    pub transfer_id: String,
    pub amount: Decimal,
    pub status: String,
    pub transfer_mode: String,
    pub remarks: String,
    pub utr: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    /// `CREDIT` for deposits, `DEBIT` for payouts
    #[serde(rename = "type")]
    pub entry_type: &'static str,
    pub description: String,
    pub account_holder_name: Option<String>,
    pub bank_name: Option<String>,
    /// Masked destination account number
    pub account_number: Option<String>,
}

impl From<TransactionHistoryRow> for TransactionHistoryItem {
    fn from(row: TransactionHistoryRow) -> Self {
        let is_deposit = row.transfer_mode == TransferMode::Deposit.as_str();
        let description = if !row.remarks.is_empty() {
            row.remarks.clone()
        } else if is_deposit {
            "Money added to wallet".to_string()
        } else {
            format!(
                "Withdrawal to {}",
                row.bank_name.as_deref().unwrap_or("Bank Account")
            )
        };

        Self {
            id: row.id,
            transfer_id: row.transfer_id,
            amount: money::from_paise(row.amount_paise),
            status: row.status,
            transfer_mode: row.transfer_mode,
            remarks: row.remarks,
            utr: row.utr,
            failure_reason: row.failure_reason,
            created_at: row.created_at,
            processed_at: row.processed_at,
            entry_type: if is_deposit { "CREDIT" } else { "DEBIT" },
            description,
            account_holder_name: row.account_holder_name,
            bank_name: row.bank_name,
            account_number: row.account_number.as_deref().map(mask_account_number),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionHistoryResponse {
    pub transactions: Vec<TransactionHistoryItem>,
    pub pagination: Pagination,
}

/// Request body for `POST /api/wallet/add-money`.
#[derive(Debug, Deserialize)]
pub struct AddMoneyRequest {
    pub amount: Option<Decimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMoneyResponse {
    pub amount_added: Decimal,
    pub new_balance: Decimal,
    pub currency: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_upi_selects_upi() {
        assert_eq!(TransferMode::from_request(Some("upi")), TransferMode::Upi);
        assert_eq!(TransferMode::from_request(Some("UPI")), TransferMode::Upi);
        assert_eq!(
            TransferMode::from_request(Some("banktransfer")),
            TransferMode::Imps
        );
        assert_eq!(TransferMode::from_request(Some("neft")), TransferMode::Imps);
        assert_eq!(TransferMode::from_request(None), TransferMode::Imps);
    }

    fn history_row(mode: &str, remarks: &str) -> TransactionHistoryRow {
        TransactionHistoryRow {
            id: Uuid::new_v4(),
            transfer_id: "T1".to_string(),
            amount_paise: 50_000,
            status: "SUCCESS".to_string(),
            transfer_mode: mode.to_string(),
            remarks: remarks.to_string(),
            utr: None,
            failure_reason: None,
            created_at: Utc::now(),
            processed_at: None,
            account_holder_name: Some("Asha Rao".to_string()),
            bank_name: Some("HDFC Bank".to_string()),
            account_number: Some("123456789".to_string()),
        }
    }

    #[test]
    fn history_item_classifies_and_masks() {
        let payout: TransactionHistoryItem = history_row("IMPS", "").into();
        assert_eq!(payout.entry_type, "DEBIT");
        assert_eq!(payout.description, "Withdrawal to HDFC Bank");
        assert_eq!(payout.account_number.as_deref(), Some("XXXXX6789"));

        let deposit: TransactionHistoryItem = history_row("DEPOSIT", "").into();
        assert_eq!(deposit.entry_type, "CREDIT");
        assert_eq!(deposit.description, "Money added to wallet");

        let with_remarks: TransactionHistoryItem = history_row("UPI", "Rent").into();
        assert_eq!(with_remarks.description, "Rent");
    }

    #[test]
    fn status_response_omits_absent_settlement_fields() {
        let pending = TransferStatusResponse {
            transfer_id: "T1".to_string(),
            amount: money::from_paise(50_000),
            status: "PENDING".to_string(),
            transfer_mode: "IMPS".to_string(),
            remarks: String::new(),
            created_at: Utc::now(),
            processed_at: None,
            utr: None,
            failure_reason: None,
        };
        let value = serde_json::to_value(pending).unwrap();
        assert!(value.get("utr").is_none());
        assert!(value.get("failureReason").is_none());
        assert_eq!(value["transferId"], "T1");
    }
}
