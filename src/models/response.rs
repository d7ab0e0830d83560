//! Response envelopes and shared response DTOs.
//!
//! Two route families with two envelopes:
//! - `ApiResponse<T>`: `{success, message, data?}` for auth, wallet and notifications
//! - `PayoutResponse<T>`: `{status, subCode, message, data?}` for `/api/v1`
//!
//! Error bodies for both are produced by `crate::error`.

use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Generic envelope for successful responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
        })
    }
}

impl ApiResponse<()> {
    /// Success with no payload, e.g. after a delete.
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: None,
        })
    }
}

/// Provider-style envelope for successful payout responses.
#[derive(Debug, Serialize)]
pub struct PayoutResponse<T> {
    pub status: &'static str,
    #[serde(rename = "subCode")]
    pub sub_code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> PayoutResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            status: "SUCCESS",
            sub_code: "200",
            message: message.into(),
            data: Some(data),
        })
    }

    /// Same as `success` with `subCode` 201, for resources created by the call.
    pub fn created(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            status: "SUCCESS",
            sub_code: "201",
            message: message.into(),
            data: Some(data),
        })
    }
}

/// Wallet balance, shared by `/api/wallet/balance` and `/api/v1/balance`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub available_balance: Decimal,
    pub currency: &'static str,
    pub last_updated: DateTime<Utc>,
}

/// `page` / `limit` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

const MAX_PAGE_SIZE: i64 = 100;

impl PageQuery {
    /// Resolve to `(page, limit, offset)`. Page is at least 1 and limit is
    /// clamped to `1..=100`. The offset saturates, so an absurd page is just
    /// an empty one.
    pub fn resolve(&self, default_limit: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE);
        (page, limit, (page - 1).saturating_mul(limit))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: (total + limit - 1) / limit,
        }
    }
}
