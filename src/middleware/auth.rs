//! Bearer token authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the token from the `Authorization: Bearer <token>` header
//! 2. Verify its signature and expiry
//! 3. Inject the caller's identity into the request
//! 4. Reject missing tokens with 401 and bad tokens with 403

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

/// Authentication context attached to authenticated requests.
///
/// Handlers extract it with `Extension<AuthContext>` and scope every query
/// by `user_id`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
}

/// Token authentication middleware function.
///
/// # Flow
///
/// 1. Read the `Authorization` header; no header or no bearer token → 401
/// 2. Verify the JWT (HS256, expiry enforced); failure → 403
/// 3. Insert `AuthContext` into the request extensions and call the next handler
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingToken)?;

    let claims = state.jwt.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        AppError::InvalidToken
    })?;

    request.extensions_mut().insert(AuthContext {
        user_id: claims.user_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
