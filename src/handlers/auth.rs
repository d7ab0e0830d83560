//! Authentication HTTP handlers.
//!
//! - POST /api/auth/register - Create a user and issue a token
//! - POST /api/auth/login - Exchange credentials for a token
//! - GET /api/auth/profile - Current user
//! - PUT /api/auth/profile - Update name and phone

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        response::ApiResponse,
        user::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, UpdateProfileRequest},
    },
    services::auth_service,
    state::AppState,
};

/// Register a new user.
///
/// # Request Body
///
/// ```json
/// {
///   "email": "asha@example.com",
///   "password": "hunter22",
///   "name": "Asha",
///   "phone": "9876543210"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "success": true,
///   "message": "User registered successfully",
///   "data": { "user": { ... }, "token": "eyJ...", "tokenType": "Bearer" }
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let Json(request) = payload?;
    let auth = auth_service::register(&state.pool, &state.jwt, request).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("User registered successfully", auth),
    ))
}

/// Log in with email and password.
///
/// Returns 401 `INVALID_CREDENTIALS` for an unknown email or a wrong password.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let Json(request) = payload?;
    let auth = auth_service::login(&state.pool, &state.jwt, request).await?;

    Ok(ApiResponse::ok("Login successful", auth))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ApiResponse<ProfileResponse>>, AppError> {
    let user = auth_service::get_profile(&state.pool, auth.user_id).await?;

    Ok(ApiResponse::ok(
        "Profile retrieved successfully",
        ProfileResponse { user: user.into() },
    ))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ProfileResponse>>, AppError> {
    let Json(request) = payload?;
    let user = auth_service::update_profile(&state.pool, auth.user_id, request).await?;

    Ok(ApiResponse::ok(
        "Profile updated successfully",
        ProfileResponse { user: user.into() },
    ))
}
