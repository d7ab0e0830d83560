//! Provider-style payout HTTP handlers.
//!
//! These endpoints mimic a payout provider's API and use the
//! `{status, subCode, message, data}` envelope:
//! - GET /api/v1/balance - Wallet balance
//! - POST /api/v1/beneficiary - Register a beneficiary
//! - GET /api/v1/beneficiary - List beneficiaries
//! - POST /api/v1/transfer - Submit a payout
//! - GET /api/v1/transfer/{transferId} - Payout status

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;

use crate::{
    error::PayoutError,
    middleware::auth::AuthContext,
    models::{
        beneficiary::{BeneficiaryRequest, BeneficiaryResponse},
        response::{BalanceResponse, PayoutResponse},
        transaction::{CreateTransferRequest, TransferAck, TransferStatusResponse},
    },
    money,
    services::{beneficiary_service, transfer_service, wallet_service},
    state::AppState,
};

pub async fn get_balance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<PayoutResponse<BalanceResponse>>, PayoutError> {
    let balance = wallet_service::get_balance(&state.pool, auth.user_id).await?;

    Ok(PayoutResponse::success(
        "Balance retrieved successfully",
        BalanceResponse {
            available_balance: money::from_paise(balance),
            currency: money::CURRENCY,
            last_updated: Utc::now(),
        },
    ))
}

/// Register a beneficiary.
///
/// # Request Body
///
/// ```json
/// {
///   "beneId": "BENE7F3K2Q9A",
///   "name": "Asha Rao",
///   "bankAccount": "123456789",
///   "ifsc": "HDFC0000123"
/// }
/// ```
///
/// `beneId` is generated when omitted.
///
/// # Response (201)
///
/// The beneficiary, including `maskedCard`.
pub async fn add_beneficiary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<BeneficiaryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PayoutResponse<BeneficiaryResponse>>), PayoutError> {
    let Json(request) = payload?;
    let beneficiary = beneficiary_service::add_beneficiary(&state.pool, auth.user_id, request).await?;

    Ok((
        StatusCode::CREATED,
        PayoutResponse::created(
            "Beneficiary added successfully",
            BeneficiaryResponse::from(beneficiary),
        ),
    ))
}

pub async fn list_beneficiaries(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<PayoutResponse<Vec<BeneficiaryResponse>>>, PayoutError> {
    let beneficiaries = beneficiary_service::list_beneficiaries(&state.pool, auth.user_id).await?;

    Ok(PayoutResponse::success(
        "Beneficiaries retrieved successfully",
        beneficiaries.into_iter().map(Into::into).collect(),
    ))
}

/// Submit a payout.
///
/// # Request Body
///
/// ```json
/// {
///   "transferId": "TXN1735689600000ABC123",
///   "amount": 500,
///   "transferMode": "banktransfer",
///   "remarks": "Rent",
///   "beneDetails": { "beneId": "BENE7F3K2Q9A" }
/// }
/// ```
///
/// # Response (200 OK)
///
/// The payout is only acknowledged here; poll the status endpoint for the
/// outcome.
///
/// ```json
/// {
///   "status": "SUCCESS",
///   "subCode": "200",
///   "message": "Transfer request accepted",
///   "data": { "referenceId": "TXN1735689600000ABC123", "acknowledged": 1 }
/// }
/// ```
///
/// # Errors
///
/// - 400: Missing fields, amount out of bounds, insufficient balance
/// - 409: `transferId` already used
pub async fn create_transfer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CreateTransferRequest>, JsonRejection>,
) -> Result<Json<PayoutResponse<TransferAck>>, PayoutError> {
    let Json(request) = payload?;
    let ack = transfer_service::submit_transfer(
        &state.pool,
        state.oracle.as_ref(),
        auth.user_id,
        request,
    )
    .await?;

    Ok(PayoutResponse::success("Transfer request accepted", ack))
}

/// Payout status.
///
/// `utr` is present only once the payout succeeded, `failureReason` only
/// once it failed. Returns 404 for unknown ids and for other users' payouts.
pub async fn get_transfer_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(transfer_id): Path<String>,
) -> Result<Json<PayoutResponse<TransferStatusResponse>>, PayoutError> {
    let transaction =
        transfer_service::get_transfer_status(&state.pool, auth.user_id, &transfer_id).await?;

    Ok(PayoutResponse::success(
        "Transfer status retrieved successfully",
        transaction.into(),
    ))
}
