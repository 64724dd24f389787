//! Attendance Record Repository

use super::{RepoError, RepoResult};
use shared::models::{AttendanceRecord, AttendanceStatus};
use sqlx::SqlitePool;

const ATTENDANCE_SELECT: &str = "SELECT id, employee_id, employee_name, date, check_in, check_out, status, working_hours, notes, updated_at FROM attendance_record";

/// Validated daily record, `working_hours` already derived
#[derive(Debug, Clone)]
pub struct AttendanceEntry {
    pub employee_id: i64,
    pub employee_name: String,
    pub date: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub status: AttendanceStatus,
    pub working_hours: f64,
    pub notes: Option<String>,
}

/// Insert or replace the record for (employee_id, date)
pub async fn upsert(pool: &SqlitePool, entry: AttendanceEntry) -> RepoResult<AttendanceRecord> {
    sqlx::query(
        "INSERT INTO attendance_record (id, employee_id, employee_name, date, check_in, check_out, status, working_hours, notes, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) ON CONFLICT (employee_id, date) DO UPDATE SET employee_name = excluded.employee_name, check_in = excluded.check_in, check_out = excluded.check_out, status = excluded.status, working_hours = excluded.working_hours, notes = excluded.notes, updated_at = excluded.updated_at",
    )
    .bind(shared::util::snowflake_id())
    .bind(entry.employee_id)
    .bind(&entry.employee_name)
    .bind(&entry.date)
    .bind(&entry.check_in)
    .bind(&entry.check_out)
    .bind(entry.status)
    .bind(entry.working_hours)
    .bind(&entry.notes)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;

    find_one(pool, entry.employee_id, &entry.date)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to save attendance record".into()))
}

pub async fn find_one(
    pool: &SqlitePool,
    employee_id: i64,
    date: &str,
) -> RepoResult<Option<AttendanceRecord>> {
    let sql = format!("{ATTENDANCE_SELECT} WHERE employee_id = ? AND date = ?");
    let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(employee_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;
    Ok(record)
}

/// Records for one date, optionally for one employee
pub async fn find_by_date(
    pool: &SqlitePool,
    date: &str,
    employee_id: Option<i64>,
) -> RepoResult<Vec<AttendanceRecord>> {
    let sql = format!(
        "{ATTENDANCE_SELECT} WHERE date = ?1 AND (?2 IS NULL OR employee_id = ?2) ORDER BY employee_name"
    );
    let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(date)
        .bind(employee_id)
        .fetch_all(pool)
        .await?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures;

    fn entry(employee_id: i64, status: AttendanceStatus, hours: f64) -> AttendanceEntry {
        AttendanceEntry {
            employee_id,
            employee_name: "Jane".into(),
            date: "2024-01-22".into(),
            check_in: Some("09:00".into()),
            check_out: Some("17:30".into()),
            status,
            working_hours: hours,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_day() {
        let pool = fixtures::pool().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;

        let first = upsert(&pool, entry(jane.id, AttendanceStatus::Present, 8.5)).await.unwrap();
        let second = upsert(&pool, entry(jane.id, AttendanceStatus::Late, 7.0)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.status, AttendanceStatus::Late);
        assert_eq!(second.working_hours, 7.0);
        assert_eq!(find_by_date(&pool, "2024-01-22", None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_date_scopes() {
        let pool = fixtures::pool().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        let john = fixtures::employee(&pool, "John", "Sales").await;
        upsert(&pool, entry(jane.id, AttendanceStatus::Present, 8.5)).await.unwrap();
        upsert(&pool, entry(john.id, AttendanceStatus::Absent, 0.0)).await.unwrap();

        assert_eq!(find_by_date(&pool, "2024-01-22", None).await.unwrap().len(), 2);
        assert_eq!(find_by_date(&pool, "2024-01-22", Some(john.id)).await.unwrap().len(), 1);
        assert!(find_by_date(&pool, "2024-01-23", None).await.unwrap().is_empty());
    }
}
