//! API index and the JSON 404 fallback.

use axum::Json;
use serde_json::{Value, json};

use crate::error::AppError;

/// Route directory for humans poking at the server.
pub async fn api_index() -> Json<Value> {
    Json(json!({
        "name": "Mock Payout Gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "authentication": "Authorization: Bearer <token> (obtain from /api/auth/login)",
        "endpoints": {
            "public": {
                "health": "GET /health",
                "register": "POST /api/auth/register",
                "login": "POST /api/auth/login"
            },
            "auth": {
                "profile": "GET /api/auth/profile",
                "updateProfile": "PUT /api/auth/profile"
            },
            "wallet": {
                "balance": "GET /api/wallet/balance",
                "addMoney": "POST /api/wallet/add-money",
                "bankAccounts": "GET /api/wallet/bank-accounts",
                "addBankAccount": "POST /api/wallet/bank-accounts",
                "deleteBankAccount": "DELETE /api/wallet/bank-accounts/{id}",
                "transactions": "GET /api/wallet/transactions?page=1&limit=20"
            },
            "payouts": {
                "balance": "GET /api/v1/balance",
                "addBeneficiary": "POST /api/v1/beneficiary",
                "listBeneficiaries": "GET /api/v1/beneficiary",
                "transfer": "POST /api/v1/transfer",
                "transferStatus": "GET /api/v1/transfer/{transferId}"
            },
            "notifications": {
                "list": "GET /api/notifications?page=1&limit=50",
                "markRead": "PUT /api/notifications/{id}/read",
                "markAllRead": "PUT /api/notifications/read-all",
                "delete": "DELETE /api/notifications/{id}"
            }
        }
    }))
}

pub async fn not_found() -> AppError {
    AppError::RouteNotFound
}
