//! Notification HTTP handlers.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        notification::NotificationListResponse,
        response::{ApiResponse, PageQuery},
    },
    services::notification_service,
    state::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResponse {
    pub updated_count: u64,
}

/// List notifications, newest first.
///
/// Query: `page` (default 1), `limit` (default 50). The response also
/// carries `unreadCount` across all pages.
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<NotificationListResponse>>, AppError> {
    let list = notification_service::list_notifications(&state.pool, auth.user_id, &query).await?;

    Ok(ApiResponse::ok("Notifications retrieved successfully", list))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let notification_id = Uuid::parse_str(&id).map_err(|_| AppError::NotificationNotFound)?;
    notification_service::mark_read(&state.pool, auth.user_id, notification_id).await?;

    Ok(ApiResponse::message("Notification marked as read"))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ApiResponse<MarkAllReadResponse>>, AppError> {
    let updated_count = notification_service::mark_all_read(&state.pool, auth.user_id).await?;

    Ok(ApiResponse::ok(
        "All notifications marked as read",
        MarkAllReadResponse { updated_count },
    ))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let notification_id = Uuid::parse_str(&id).map_err(|_| AppError::NotificationNotFound)?;
    notification_service::delete_notification(&state.pool, auth.user_id, notification_id).await?;

    Ok(ApiResponse::message("Notification deleted successfully"))
}
