//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses. Two envelopes coexist:
//!
//! - `AppError` renders the generic `{success, message, error}` envelope used by
//!   the auth, wallet and notification routes.
//! - `PayoutError` wraps the same error and renders the provider-style
//!   `{status, subCode, message}` envelope used by the `/api/v1` payout routes.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Validation Errors**: Missing or malformed request fields
/// - **Conflict Errors**: Duplicate transfer ids, accounts, beneficiaries or users
/// - **Authentication Errors**: Missing, invalid or expired tokens, bad credentials
/// - **Resource Errors**: Requested resources not found
/// - **Internal Errors**: Database and other unclassified failures
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unclassified server-side failure (hashing, token signing).
    #[error("Internal error: {0}")]
    Internal(String),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request. The String is shown to the client.
    #[error("{0}")]
    Validation(String),

    /// Deposit exceeds the add-money ceiling.
    #[error("{0}")]
    AmountLimitExceeded(String),

    /// Wallet balance is lower than the requested amount.
    #[error("Insufficient wallet balance")]
    InsufficientBalance,

    /// A transaction with this transfer id already exists.
    #[error("Transfer with this ID already exists")]
    DuplicateTransfer,

    #[error("User with this email already exists")]
    UserExists,

    #[error("This bank account is already added")]
    BankAccountExists,

    #[error("Beneficiary with this account number already exists")]
    BeneficiaryExists,

    /// Email/password pair did not match.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer token on a protected route. Returns 401.
    #[error("Access token is required")]
    MissingToken,

    /// Bearer token failed verification or has expired. Returns 403.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Bank account not found")]
    BankAccountNotFound,

    #[error("Notification not found")]
    NotificationNotFound,

    #[error("Transfer not found")]
    TransferNotFound,

    /// No route matched the request.
    #[error("Endpoint not found")]
    RouteNotFound,
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::AmountLimitExceeded(_)
            | AppError::InsufficientBalance => StatusCode::BAD_REQUEST,
            AppError::DuplicateTransfer
            | AppError::UserExists
            | AppError::BankAccountExists
            | AppError::BeneficiaryExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::BankAccountNotFound
            | AppError::NotificationNotFound
            | AppError::TransferNotFound
            | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code used in the generic envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::AmountLimitExceeded(_) => "AMOUNT_LIMIT_EXCEEDED",
            AppError::InsufficientBalance => "INSUFFICIENT_BALANCE",
            AppError::DuplicateTransfer => "DUPLICATE_TRANSFER",
            AppError::UserExists => "USER_EXISTS",
            AppError::BankAccountExists => "ACCOUNT_EXISTS",
            AppError::BeneficiaryExists => "BENEFICIARY_EXISTS",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::MissingToken => "UNAUTHORIZED",
            AppError::InvalidToken => "FORBIDDEN",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::BankAccountNotFound => "ACCOUNT_NOT_FOUND",
            AppError::NotificationNotFound => "NOTIFICATION_NOT_FOUND",
            AppError::TransferNotFound => "TRANSFER_NOT_FOUND",
            AppError::RouteNotFound => "NOT_FOUND",
            AppError::Database(_) | AppError::Internal(_) => "SERVER_ERROR",
        }
    }

    /// Client-facing message. Internal failures are logged and hidden.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                "Internal server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Returns true when a sqlx error is a UNIQUE constraint violation.
///
/// Used to turn races on unique keys (transfer id, email, account number)
/// into conflict responses instead of 500s.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

/// Convert AppError into a generic-envelope HTTP response.
///
/// ```json
/// {
///   "success": false,
///   "message": "Invalid email format",
///   "error": "VALIDATION_ERROR"
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "success": false,
            "message": self.client_message(),
            "error": self.code(),
        }));

        (status, body).into_response()
    }
}

/// A body that is not valid JSON for the target type is a validation error,
/// not axum's plain-text rejection.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Error returned by the provider-style payout handlers.
///
/// ```json
/// {
///   "status": "ERROR",
///   "subCode": "409",
///   "message": "Transfer with this ID already exists"
/// }
/// ```
#[derive(Debug)]
pub struct PayoutError(pub AppError);

impl From<AppError> for PayoutError {
    fn from(err: AppError) -> Self {
        PayoutError(err)
    }
}

impl From<sqlx::Error> for PayoutError {
    fn from(err: sqlx::Error) -> Self {
        PayoutError(AppError::Database(err))
    }
}

impl From<JsonRejection> for PayoutError {
    fn from(rejection: JsonRejection) -> Self {
        PayoutError(rejection.into())
    }
}

impl IntoResponse for PayoutError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let body = Json(json!({
            "status": "ERROR",
            "subCode": status.as_u16().to_string(),
            "message": self.0.client_message(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_map_to_409() {
        for err in [
            AppError::DuplicateTransfer,
            AppError::UserExists,
            AppError::BankAccountExists,
            AppError::BeneficiaryExists,
        ] {
            assert_eq!(err.status(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn missing_token_is_401_but_bad_token_is_403() {
        assert_eq!(AppError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::MissingToken.code(), "UNAUTHORIZED");
        assert_eq!(AppError::InvalidToken.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::InvalidToken.code(), "FORBIDDEN");
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = AppError::Internal("argon2 blew up".to_string());
        assert_eq!(err.client_message(), "Internal server error");
        assert_eq!(err.code(), "SERVER_ERROR");
    }

    #[test]
    fn payout_error_uses_status_as_sub_code() {
        let response = PayoutError(AppError::TransferNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
