//! Notification persistence and the read/delete operations exposed to users.

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        notification::{Notification, NotificationListResponse, NotificationType},
        response::{PageQuery, Pagination},
    },
};

pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Insert a notification.
///
/// Accepts any executor so callers can write the notification inside the
/// same database transaction as the money movement it describes.
pub async fn create_notification<'e, E>(
    executor: E,
    user_id: Uuid,
    kind: NotificationType,
    title: &str,
    message: &str,
    created_at: DateTime<Utc>,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, notification_type, title, message, read, created_at)
        VALUES (?, ?, ?, ?, ?, 0, ?)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(kind.as_str())
    .bind(title)
    .bind(message)
    .bind(created_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Newest-first page of the caller's notifications with the unread count.
pub async fn list_notifications(
    pool: &DbPool,
    user_id: Uuid,
    query: &PageQuery,
) -> Result<NotificationListResponse, AppError> {
    let (page, limit, offset) = query.resolve(DEFAULT_PAGE_SIZE);

    let notifications = sqlx::query_as::<_, Notification>(
        r#"
        SELECT * FROM notifications
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    let unread_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = ? AND read = 0")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    Ok(NotificationListResponse {
        notifications,
        unread_count,
        pagination: Pagination::new(page, limit, total),
    })
}

pub async fn mark_read(pool: &DbPool, user_id: Uuid, notification_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ? AND user_id = ?")
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotificationNotFound);
    }

    Ok(())
}

/// Returns the number of notifications that changed state.
pub async fn mark_all_read(pool: &DbPool, user_id: Uuid) -> Result<u64, AppError> {
    let result = sqlx::query("UPDATE notifications SET read = 1 WHERE user_id = ? AND read = 0")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_notification(
    pool: &DbPool,
    user_id: Uuid,
    notification_id: Uuid,
) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND user_id = ?")
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotificationNotFound);
    }

    Ok(())
}
