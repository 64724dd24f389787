//! Notification Repository
//!
//! Feeds are addressed by [`FeedScope`]: admins read the admin-audience feed,
//! employees read employee-audience rows about themselves.

use super::{RepoError, RepoResult};
use shared::models::{Notification, NotificationAudience, NotificationCreate};
use sqlx::SqlitePool;

const NOTIFICATION_SELECT: &str = "SELECT id, notification_type, audience, employee_id, employee_name, title, message, related_id, is_read, created_at, metadata FROM notification";

/// Default page size for feed queries
pub const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

/// Which feed a caller is reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedScope {
    pub audience: NotificationAudience,
    /// `None` reads the whole audience
    pub employee_id: Option<i64>,
}

impl FeedScope {
    pub fn admin() -> Self {
        Self {
            audience: NotificationAudience::Admin,
            employee_id: None,
        }
    }

    pub fn employee(employee_id: i64) -> Self {
        Self {
            audience: NotificationAudience::Employee,
            employee_id: Some(employee_id),
        }
    }
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

pub async fn insert(pool: &SqlitePool, data: NotificationCreate) -> RepoResult<Notification> {
    let metadata = if data.metadata.is_object() {
        data.metadata
    } else {
        serde_json::json!({})
    };
    let metadata = serde_json::to_string(&metadata)
        .map_err(|e| RepoError::Database(format!("Failed to encode metadata: {e}")))?;

    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO notification (id, notification_type, audience, employee_id, employee_name, title, message, related_id, is_read, created_at, metadata) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
    )
    .bind(id)
    .bind(data.notification_type)
    .bind(data.audience)
    .bind(data.employee_id)
    .bind(&data.employee_name)
    .bind(&data.title)
    .bind(&data.message)
    .bind(data.related_id)
    .bind(shared::util::now_millis())
    .bind(metadata)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create notification".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Notification>> {
    let sql = format!("{NOTIFICATION_SELECT} WHERE id = ?");
    let notification = sqlx::query_as::<_, Notification>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(notification)
}

/// Feed, newest first
pub async fn find_feed(
    pool: &SqlitePool,
    scope: FeedScope,
    unread_only: bool,
    limit: Option<i64>,
) -> RepoResult<Vec<Notification>> {
    let sql = format!(
        "{NOTIFICATION_SELECT} WHERE audience = ?1 AND (?2 IS NULL OR employee_id = ?2) AND (?3 = 0 OR is_read = 0) ORDER BY created_at DESC, id DESC LIMIT ?4"
    );
    let notifications = sqlx::query_as::<_, Notification>(&sql)
        .bind(scope.audience)
        .bind(scope.employee_id)
        .bind(unread_only)
        .bind(clamp_limit(limit))
        .fetch_all(pool)
        .await?;
    Ok(notifications)
}

pub async fn count_unread(pool: &SqlitePool, scope: FeedScope) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notification WHERE audience = ?1 AND (?2 IS NULL OR employee_id = ?2) AND is_read = 0",
    )
    .bind(scope.audience)
    .bind(scope.employee_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Mark one notification read, only when it belongs to `scope`
pub async fn mark_read(pool: &SqlitePool, id: i64, scope: FeedScope) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE notification SET is_read = 1 WHERE id = ?1 AND audience = ?2 AND (?3 IS NULL OR employee_id = ?3)",
    )
    .bind(id)
    .bind(scope.audience)
    .bind(scope.employee_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Mark the whole feed read, returns the number of rows changed
pub async fn mark_all_read(pool: &SqlitePool, scope: FeedScope) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE notification SET is_read = 1 WHERE audience = ?1 AND (?2 IS NULL OR employee_id = ?2) AND is_read = 0",
    )
    .bind(scope.audience)
    .bind(scope.employee_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM notification WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures;
    use shared::models::NotificationType;

    fn leave_applied(employee_id: i64) -> NotificationCreate {
        NotificationCreate {
            notification_type: NotificationType::LeaveApplied,
            audience: NotificationAudience::Admin,
            employee_id,
            employee_name: "Jane".into(),
            title: "New leave request".into(),
            message: "Jane applied for sick leave".into(),
            related_id: Some(11),
            metadata: serde_json::json!({"days": 6}),
        }
    }

    fn leave_updated(employee_id: i64) -> NotificationCreate {
        NotificationCreate {
            notification_type: NotificationType::LeaveUpdated,
            audience: NotificationAudience::Employee,
            employee_id,
            employee_name: "Jane".into(),
            title: "Leave approved".into(),
            message: "Your sick leave request has been approved".into(),
            related_id: Some(11),
            metadata: serde_json::Value::Null,
        }
    }

    #[tokio::test]
    async fn test_insert_roundtrips_metadata() {
        let pool = fixtures::pool().await;
        let n = insert(&pool, leave_applied(1)).await.unwrap();
        assert!(!n.is_read);
        assert_eq!(n.metadata["days"], 6);

        let n = insert(&pool, leave_updated(1)).await.unwrap();
        assert!(n.metadata.as_object().is_some_and(|m| m.is_empty()));
    }

    #[tokio::test]
    async fn test_feeds_are_separated() {
        let pool = fixtures::pool().await;
        insert(&pool, leave_applied(1)).await.unwrap();
        insert(&pool, leave_updated(1)).await.unwrap();
        insert(&pool, leave_updated(2)).await.unwrap();

        let admin = find_feed(&pool, FeedScope::admin(), false, None).await.unwrap();
        assert_eq!(admin.len(), 1);
        assert_eq!(admin[0].notification_type, NotificationType::LeaveApplied);

        let mine = find_feed(&pool, FeedScope::employee(1), false, None).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].notification_type, NotificationType::LeaveUpdated);
    }

    #[tokio::test]
    async fn test_read_state() {
        let pool = fixtures::pool().await;
        let a = insert(&pool, leave_updated(1)).await.unwrap();
        insert(&pool, leave_updated(1)).await.unwrap();
        insert(&pool, leave_updated(1)).await.unwrap();
        let scope = FeedScope::employee(1);

        assert_eq!(count_unread(&pool, scope).await.unwrap(), 3);
        assert!(mark_read(&pool, a.id, scope).await.unwrap());
        // not in employee 2's feed
        assert!(!mark_read(&pool, a.id, FeedScope::employee(2)).await.unwrap());
        assert_eq!(count_unread(&pool, scope).await.unwrap(), 2);
        assert_eq!(find_feed(&pool, scope, true, None).await.unwrap().len(), 2);

        assert_eq!(mark_all_read(&pool, scope).await.unwrap(), 2);
        assert_eq!(count_unread(&pool, scope).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_limit_and_delete() {
        let pool = fixtures::pool().await;
        let first = insert(&pool, leave_applied(1)).await.unwrap();
        insert(&pool, leave_applied(1)).await.unwrap();
        assert_eq!(find_feed(&pool, FeedScope::admin(), false, Some(1)).await.unwrap().len(), 1);

        assert!(delete(&pool, first.id).await.unwrap());
        assert!(!delete(&pool, first.id).await.unwrap());
    }
}
