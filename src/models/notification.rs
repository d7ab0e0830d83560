//! Notification models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::response::Pagination;

/// Kinds of notification raised by wallet and payout activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    LowBalance,
    WithdrawalSuccess,
    WithdrawalFailed,
    DepositSuccess,
    AccountAdded,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::LowBalance => "LOW_BALANCE",
            NotificationType::WithdrawalSuccess => "WITHDRAWAL_SUCCESS",
            NotificationType::WithdrawalFailed => "WITHDRAWAL_FAILED",
            NotificationType::DepositSuccess => "DEPOSIT_SUCCESS",
            NotificationType::AccountAdded => "ACCOUNT_ADDED",
        }
    }
}

/// Represents a notification record from the database.
///
/// Immutable once written, except for `read`. Serialized with its column
/// names, like the user, bank account and history rows.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
    pub pagination: Pagination,
}
