//! Leave Request Repository
//!
//! Rows are validated by [`crate::leave`] before they reach this layer.

use super::{RepoError, RepoResult};
use shared::models::{LeaveCounts, LeaveQuery, LeaveRequest, LeaveStatus, LeaveType};
use sqlx::SqlitePool;

const LEAVE_SELECT: &str = "SELECT id, employee_id, employee_name, leave_type, start_date, end_date, days, reason, status, applied_date, decided_at, decided_by, created_at FROM leave_request";

/// Validated leave row ready for insert
#[derive(Debug, Clone)]
pub struct NewLeave<'a> {
    pub employee_id: i64,
    pub employee_name: &'a str,
    pub leave_type: LeaveType,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub days: i64,
    pub reason: &'a str,
    pub applied_date: &'a str,
}

pub async fn insert(pool: &SqlitePool, leave: NewLeave<'_>) -> RepoResult<LeaveRequest> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO leave_request (id, employee_id, employee_name, leave_type, start_date, end_date, days, reason, status, applied_date, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'pending', ?, ?)",
    )
    .bind(id)
    .bind(leave.employee_id)
    .bind(leave.employee_name)
    .bind(leave.leave_type)
    .bind(leave.start_date)
    .bind(leave.end_date)
    .bind(leave.days)
    .bind(leave.reason)
    .bind(leave.applied_date)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create leave request".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<LeaveRequest>> {
    let sql = format!("{LEAVE_SELECT} WHERE id = ?");
    let leave = sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(leave)
}

/// List leaves, newest first
///
/// Both filters are optional; `NULL` binds disable the condition.
pub async fn find_all(pool: &SqlitePool, query: &LeaveQuery) -> RepoResult<Vec<LeaveRequest>> {
    let sql = format!(
        "{LEAVE_SELECT} WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR employee_id = ?2) ORDER BY created_at DESC, id DESC"
    );
    let leaves = sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(query.status)
        .bind(query.employee_id)
        .fetch_all(pool)
        .await?;
    Ok(leaves)
}

/// Leaves whose `start_date` begins with `prefix` (`YYYY-` or `YYYY-MM-`)
pub async fn find_starting_with(
    pool: &SqlitePool,
    prefix: &str,
    employee_id: Option<i64>,
) -> RepoResult<Vec<LeaveRequest>> {
    let sql = format!(
        "{LEAVE_SELECT} WHERE substr(start_date, 1, length(?1)) = ?1 AND (?2 IS NULL OR employee_id = ?2) ORDER BY start_date, id"
    );
    let leaves = sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(prefix)
        .bind(employee_id)
        .fetch_all(pool)
        .await?;
    Ok(leaves)
}

/// Move a pending leave to its final status
///
/// Returns `false` when no pending row matched (unknown id or already
/// decided); the caller tells the two apart.
pub async fn decide(
    pool: &SqlitePool,
    id: i64,
    status: LeaveStatus,
    decided_by: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE leave_request SET status = ?1, decided_at = ?2, decided_by = ?3 WHERE id = ?4 AND status = 'pending'",
    )
    .bind(status)
    .bind(shared::util::now_millis())
    .bind(decided_by)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Leave counters, optionally scoped to one employee
pub async fn counts(pool: &SqlitePool, employee_id: Option<i64>) -> RepoResult<LeaveCounts> {
    let (total, approved, pending, rejected): (i64, i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(status = 'approved'), 0), COALESCE(SUM(status = 'pending'), 0), COALESCE(SUM(status = 'rejected'), 0) FROM leave_request WHERE (?1 IS NULL OR employee_id = ?1)",
    )
    .bind(employee_id)
    .fetch_one(pool)
    .await?;
    Ok(LeaveCounts {
        total,
        approved,
        pending,
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures;

    async fn sick_leave(pool: &SqlitePool, employee_id: i64, name: &str) -> LeaveRequest {
        insert(
            pool,
            NewLeave {
                employee_id,
                employee_name: name,
                leave_type: LeaveType::Sick,
                start_date: "2024-01-20",
                end_date: "2024-01-25",
                days: 6,
                reason: "flu",
                applied_date: "2024-01-18",
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_is_pending() {
        let pool = fixtures::pool().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        let leave = sick_leave(&pool, jane.id, &jane.name).await;
        assert_eq!(leave.status, LeaveStatus::Pending);
        assert_eq!(leave.days, 6);
        assert!(leave.decided_at.is_none());
    }

    #[tokio::test]
    async fn test_decide_only_once() {
        let pool = fixtures::pool().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        let leave = sick_leave(&pool, jane.id, &jane.name).await;

        assert!(decide(&pool, leave.id, LeaveStatus::Approved, 7).await.unwrap());
        assert!(!decide(&pool, leave.id, LeaveStatus::Rejected, 7).await.unwrap());

        let stored = find_by_id(&pool, leave.id).await.unwrap().unwrap();
        assert_eq!(stored.status, LeaveStatus::Approved);
        assert_eq!(stored.decided_by, Some(7));
        assert!(stored.decided_at.is_some());
    }

    #[tokio::test]
    async fn test_filters_and_counts() {
        let pool = fixtures::pool().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        let john = fixtures::employee(&pool, "John", "Sales").await;
        let first = sick_leave(&pool, jane.id, &jane.name).await;
        sick_leave(&pool, jane.id, &jane.name).await;
        sick_leave(&pool, john.id, &john.name).await;
        decide(&pool, first.id, LeaveStatus::Rejected, 1).await.unwrap();

        let janes = find_all(
            &pool,
            &LeaveQuery {
                status: None,
                employee_id: Some(jane.id),
            },
        )
        .await
        .unwrap();
        assert_eq!(janes.len(), 2);
        let pending = find_all(
            &pool,
            &LeaveQuery {
                status: Some(LeaveStatus::Pending),
                employee_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(pending.len(), 2);

        let all = counts(&pool, None).await.unwrap();
        assert_eq!(
            all,
            LeaveCounts {
                total: 3,
                approved: 0,
                pending: 2,
                rejected: 1
            }
        );
        assert_eq!(counts(&pool, Some(john.id)).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_find_starting_with_prefix() {
        let pool = fixtures::pool().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        let john = fixtures::employee(&pool, "John", "Sales").await;
        sick_leave(&pool, jane.id, &jane.name).await;
        sick_leave(&pool, john.id, &john.name).await;

        assert_eq!(find_starting_with(&pool, "2024-", None).await.unwrap().len(), 2);
        assert_eq!(find_starting_with(&pool, "2024-01-", Some(jane.id)).await.unwrap().len(), 1);
        assert!(find_starting_with(&pool, "2024-02-", None).await.unwrap().is_empty());
        assert!(find_starting_with(&pool, "2023-", None).await.unwrap().is_empty());
    }
}
