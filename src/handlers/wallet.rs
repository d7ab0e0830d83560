//! Wallet HTTP handlers.
//!
//! This module implements the user-facing wallet endpoints:
//! - GET /api/wallet/balance - Current balance
//! - POST /api/wallet/add-money - Top up the wallet
//! - GET /api/wallet/bank-accounts - Saved accounts (masked)
//! - POST /api/wallet/bank-accounts - Save an account
//! - DELETE /api/wallet/bank-accounts/{id} - Remove an account
//! - GET /api/wallet/transactions - Paginated history

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        bank_account::{BankAccountCreatedResponse, BankAccountListResponse, CreateBankAccountRequest},
        response::{ApiResponse, BalanceResponse, PageQuery},
        transaction::{AddMoneyRequest, AddMoneyResponse, TransactionHistoryResponse},
    },
    money,
    services::wallet_service,
    state::AppState,
};

/// Get the wallet balance.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "success": true,
///   "message": "Balance retrieved successfully",
///   "data": {
///     "availableBalance": 9500.0,
///     "currency": "INR",
///     "lastUpdated": "2025-01-01T10:00:00Z"
///   }
/// }
/// ```
pub async fn get_balance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ApiResponse<BalanceResponse>>, AppError> {
    let balance = wallet_service::get_balance(&state.pool, auth.user_id).await?;

    Ok(ApiResponse::ok(
        "Balance retrieved successfully",
        BalanceResponse {
            available_balance: money::from_paise(balance),
            currency: money::CURRENCY,
            last_updated: Utc::now(),
        },
    ))
}

/// Add money to the wallet.
///
/// # Request Body
///
/// ```json
/// { "amount": 1000 }
/// ```
///
/// # Validation
///
/// - Amount must be present and positive (400 `VALIDATION_ERROR`)
/// - Amount must not exceed ₹50,000 (400 `AMOUNT_LIMIT_EXCEEDED`)
pub async fn add_money(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<AddMoneyRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AddMoneyResponse>>, AppError> {
    let Json(request) = payload?;
    let result = wallet_service::add_money(&state.pool, auth.user_id, request).await?;

    Ok(ApiResponse::ok("Money added successfully", result))
}

pub async fn list_bank_accounts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ApiResponse<BankAccountListResponse>>, AppError> {
    let accounts = wallet_service::list_bank_accounts(&state.pool, auth.user_id).await?;

    Ok(ApiResponse::ok(
        "Bank accounts retrieved successfully",
        BankAccountListResponse {
            accounts: accounts.into_iter().map(Into::into).collect(),
        },
    ))
}

/// Save a bank account.
///
/// # Request Body
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
///
/// # Response (201)
///
/// The saved account with its number masked.
pub async fn add_bank_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CreateBankAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<BankAccountCreatedResponse>>), AppError> {
    let Json(request) = payload?;
    let account = wallet_service::add_bank_account(&state.pool, auth.user_id, request).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(
            "Bank account added successfully",
            BankAccountCreatedResponse {
                account: account.into(),
            },
        ),
    ))
}

/// Delete a saved bank account.
///
/// Returns 404 `ACCOUNT_NOT_FOUND` if the account doesn't exist or belongs
/// to another user.
pub async fn delete_bank_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let account_id = Uuid::parse_str(&id).map_err(|_| AppError::BankAccountNotFound)?;
    wallet_service::delete_bank_account(&state.pool, auth.user_id, account_id).await?;

    Ok(ApiResponse::message("Bank account deleted successfully"))
}

/// Paginated transaction history, newest first.
///
/// Query: `page` (default 1), `limit` (default 20).
pub async fn transaction_history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<TransactionHistoryResponse>>, AppError> {
    let history = wallet_service::transaction_history(&state.pool, auth.user_id, &query).await?;

    Ok(ApiResponse::ok(
        "Transaction history retrieved successfully",
        history,
    ))
}
