//! Location Record Repository (定位打卡记录)

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{LocationKind, LocationRecord, LocationSummary};
use sqlx::SqlitePool;

const RECORD_SELECT: &str = "SELECT id, employee_id, employee_name, kind, latitude, longitude, accuracy, is_within_office, office_name, distance, device_info, created_at FROM location_record";

/// Geofence outcome ready for insert
#[derive(Debug, Clone)]
pub struct NewLocationRecord {
    pub employee_id: i64,
    pub employee_name: String,
    pub kind: LocationKind,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub is_within_office: bool,
    pub office_name: String,
    pub distance: f64,
    pub device_info: Option<String>,
}

pub async fn insert(pool: &SqlitePool, record: NewLocationRecord) -> RepoResult<LocationRecord> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO location_record (id, employee_id, employee_name, kind, latitude, longitude, accuracy, is_within_office, office_name, distance, device_info, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(record.employee_id)
    .bind(&record.employee_name)
    .bind(record.kind)
    .bind(record.latitude)
    .bind(record.longitude)
    .bind(record.accuracy)
    .bind(record.is_within_office)
    .bind(&record.office_name)
    .bind(record.distance)
    .bind(&record.device_info)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create location record".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<LocationRecord>> {
    let sql = format!("{RECORD_SELECT} WHERE id = ?");
    let record = sqlx::query_as::<_, LocationRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(record)
}

/// Records newest first, filtered by UTC day and employee
pub async fn find_all(
    pool: &SqlitePool,
    date: Option<NaiveDate>,
    employee_id: Option<i64>,
) -> RepoResult<Vec<LocationRecord>> {
    let (start, end) = match date.map(shared::util::day_bounds_millis) {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    };
    let sql = format!(
        "{RECORD_SELECT} WHERE (?1 IS NULL OR created_at >= ?1) AND (?2 IS NULL OR created_at < ?2) AND (?3 IS NULL OR employee_id = ?3) ORDER BY created_at DESC, id DESC"
    );
    let records = sqlx::query_as::<_, LocationRecord>(&sql)
        .bind(start)
        .bind(end)
        .bind(employee_id)
        .fetch_all(pool)
        .await?;
    Ok(records)
}

/// Per-day presence summary
///
/// An employee counts as inside when any check that day was inside a zone,
/// and as outside only when every check was outside.
pub async fn summary(pool: &SqlitePool, date: NaiveDate) -> RepoResult<LocationSummary> {
    let (start, end) = shared::util::day_bounds_millis(date);
    let (inside, outside, total_checks): (i64, i64, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(any_inside = 1), 0), COALESCE(SUM(any_inside = 0), 0), COALESCE(SUM(checks), 0) FROM (SELECT employee_id, MAX(is_within_office) AS any_inside, COUNT(*) AS checks FROM location_record WHERE created_at >= ? AND created_at < ? GROUP BY employee_id)",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    Ok(LocationSummary {
        date: date.format(shared::util::DATE_FORMAT).to_string(),
        inside,
        outside,
        total_checks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures;

    fn check(employee_id: i64, inside: bool) -> NewLocationRecord {
        NewLocationRecord {
            employee_id,
            employee_name: "Jane".into(),
            kind: LocationKind::CheckIn,
            latitude: 40.7128,
            longitude: -74.0060,
            accuracy: 10.0,
            is_within_office: inside,
            office_name: "HQ".into(),
            distance: if inside { 0.0 } else { 812.0 },
            device_info: Some("iPhone".into()),
        }
    }

    #[tokio::test]
    async fn test_insert_and_filter() {
        let pool = fixtures::pool().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        let john = fixtures::employee(&pool, "John", "Sales").await;

        let stored = insert(&pool, check(jane.id, true)).await.unwrap();
        assert!(stored.is_within_office);
        insert(&pool, check(john.id, false)).await.unwrap();

        let today = chrono::Utc::now().date_naive();
        assert_eq!(find_all(&pool, Some(today), None).await.unwrap().len(), 2);
        assert_eq!(find_all(&pool, None, Some(jane.id)).await.unwrap().len(), 1);

        let yesterday = today.pred_opt().unwrap();
        assert!(find_all(&pool, Some(yesterday), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summary_counts_distinct_employees() {
        let pool = fixtures::pool().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        let john = fixtures::employee(&pool, "John", "Sales").await;

        insert(&pool, check(jane.id, false)).await.unwrap();
        insert(&pool, check(jane.id, true)).await.unwrap();
        insert(&pool, check(john.id, false)).await.unwrap();
        insert(&pool, check(john.id, false)).await.unwrap();

        let today = chrono::Utc::now().date_naive();
        let summary = summary(&pool, today).await.unwrap();
        assert_eq!(summary.inside, 1);
        assert_eq!(summary.outside, 1);
        assert_eq!(summary.total_checks, 4);
    }
}
