//! Employee Repository

use super::{RepoError, RepoResult};
use crate::utils::validation::{
    self, MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN,
};
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate};
use sqlx::SqlitePool;

const EMPLOYEE_SELECT: &str = "SELECT id, name, email, position, department, salary, status, join_date, phone, address, date_of_birth, password_hash, created_at, updated_at FROM employee";

fn validate_optional_date(value: Option<&str>, field: &str) -> RepoResult<Option<String>> {
    match validation::optional_text(value, field, MAX_SHORT_TEXT_LEN).map_err(RepoError::Validation)? {
        Some(v) => {
            validation::date(&v, field).map_err(RepoError::Validation)?;
            Ok(Some(v))
        }
        None => Ok(None),
    }
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} ORDER BY name");
    let employees = sqlx::query_as::<_, Employee>(&sql).fetch_all(pool).await?;
    Ok(employees)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} WHERE id = ?");
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

/// Case-insensitive lookup (login)
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} WHERE email = ? COLLATE NOCASE");
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(email.trim())
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

/// Most recently created employees, newest first
pub async fn find_recent(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} ORDER BY created_at DESC, id DESC LIMIT ?");
    let employees = sqlx::query_as::<_, Employee>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(employees)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Sum of monthly salaries
pub async fn total_salary(pool: &SqlitePool) -> RepoResult<f64> {
    let total: f64 = sqlx::query_scalar("SELECT COALESCE(SUM(salary), 0.0) FROM employee")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// Headcount and monthly salary sum, optionally for one department
pub async fn salary_totals(pool: &SqlitePool, department: Option<&str>) -> RepoResult<(i64, f64)> {
    let totals: (i64, f64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(salary), 0.0) FROM employee WHERE (?1 IS NULL OR department = ?1)",
    )
    .bind(department)
    .fetch_one(pool)
    .await?;
    Ok(totals)
}

/// Insert a new employee
///
/// `password_hash` is produced by the caller; this layer never sees plain text.
pub async fn create(
    pool: &SqlitePool,
    data: EmployeeCreate,
    password_hash: &str,
) -> RepoResult<Employee> {
    let name = validation::required_text(data.name.as_deref(), "name", MAX_NAME_LEN)
        .map_err(RepoError::Validation)?;
    let email = validation::email(data.email.as_deref()).map_err(RepoError::Validation)?;
    let position = validation::required_text(data.position.as_deref(), "position", MAX_SHORT_TEXT_LEN)
        .map_err(RepoError::Validation)?;
    let department =
        validation::required_text(data.department.as_deref(), "department", MAX_NAME_LEN)
            .map_err(RepoError::Validation)?;
    let salary = data
        .salary
        .ok_or_else(|| RepoError::Validation("salary is required".into()))
        .and_then(|s| validation::non_negative(s, "salary").map_err(RepoError::Validation))?;
    let join_date = validation::required_date(data.join_date.as_deref(), "join_date")
        .map_err(RepoError::Validation)?
        .format(shared::util::DATE_FORMAT)
        .to_string();
    let phone = validation::optional_text(data.phone.as_deref(), "phone", MAX_SHORT_TEXT_LEN)
        .map_err(RepoError::Validation)?;
    let address = validation::optional_text(data.address.as_deref(), "address", MAX_ADDRESS_LEN)
        .map_err(RepoError::Validation)?;
    let date_of_birth = validate_optional_date(data.date_of_birth.as_deref(), "date_of_birth")?;

    if find_by_email(pool, &email).await?.is_some() {
        return Err(RepoError::Duplicate(format!("Employee email '{email}' already exists")));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO employee (id, name, email, position, department, salary, status, join_date, phone, address, date_of_birth, password_hash, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
    )
    .bind(id)
    .bind(&name)
    .bind(&email)
    .bind(&position)
    .bind(&department)
    .bind(salary)
    .bind(data.status.unwrap_or_default())
    .bind(&join_date)
    .bind(&phone)
    .bind(&address)
    .bind(&date_of_birth)
    .bind(password_hash)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

/// Partial update
///
/// `password_hash` replaces the stored hash when present.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: EmployeeUpdate,
    password_hash: Option<&str>,
) -> RepoResult<Employee> {
    let name = validation::optional_text(data.name.as_deref(), "name", MAX_NAME_LEN)
        .map_err(RepoError::Validation)?;
    let email = match data.email.as_deref() {
        Some(e) => Some(validation::email(Some(e)).map_err(RepoError::Validation)?),
        None => None,
    };
    let position = validation::optional_text(data.position.as_deref(), "position", MAX_SHORT_TEXT_LEN)
        .map_err(RepoError::Validation)?;
    let department = validation::optional_text(data.department.as_deref(), "department", MAX_NAME_LEN)
        .map_err(RepoError::Validation)?;
    if let Some(salary) = data.salary {
        validation::non_negative(salary, "salary").map_err(RepoError::Validation)?;
    }
    let join_date = validate_optional_date(data.join_date.as_deref(), "join_date")?;
    let phone = validation::optional_text(data.phone.as_deref(), "phone", MAX_SHORT_TEXT_LEN)
        .map_err(RepoError::Validation)?;
    let address = validation::optional_text(data.address.as_deref(), "address", MAX_ADDRESS_LEN)
        .map_err(RepoError::Validation)?;
    let date_of_birth = validate_optional_date(data.date_of_birth.as_deref(), "date_of_birth")?;

    if let Some(ref email) = email {
        let taken = find_by_email(pool, email).await?;
        if taken.is_some_and(|existing| existing.id != id) {
            return Err(RepoError::Duplicate(format!("Employee email '{email}' already exists")));
        }
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE employee SET name = COALESCE(?1, name), email = COALESCE(?2, email), position = COALESCE(?3, position), department = COALESCE(?4, department), salary = COALESCE(?5, salary), status = COALESCE(?6, status), join_date = COALESCE(?7, join_date), phone = COALESCE(?8, phone), address = COALESCE(?9, address), date_of_birth = COALESCE(?10, date_of_birth), password_hash = COALESCE(?11, password_hash), updated_at = ?12 WHERE id = ?13",
    )
    .bind(&name)
    .bind(&email)
    .bind(&position)
    .bind(&department)
    .bind(data.salary)
    .bind(data.status)
    .bind(&join_date)
    .bind(&phone)
    .bind(&address)
    .bind(&date_of_birth)
    .bind(password_hash)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

/// Delete an employee; their leaves, tasks and records cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM employee WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures;
    use shared::models::EmployeeStatus;

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = fixtures::pool().await;
        let jane = fixtures::employee(&pool, "Jane Doe", "Engineering").await;

        assert_eq!(jane.email, "jane.doe@company.com");
        assert_eq!(jane.status, EmployeeStatus::Active);
        assert_eq!(jane.join_date, "2024-01-15");

        let found = find_by_email(&pool, "JANE.DOE@company.com").await.unwrap();
        assert_eq!(found.map(|e| e.id), Some(jane.id));
        assert_eq!(count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_missing_field() {
        let pool = fixtures::pool().await;
        let err = create(
            &pool,
            EmployeeCreate {
                name: Some("Jane".into()),
                email: Some("jane@company.com".into()),
                ..Default::default()
            },
            "hash",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(msg) if msg.contains("position")));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_salary() {
        let pool = fixtures::pool().await;
        let err = create(
            &pool,
            EmployeeCreate {
                name: Some("Jane".into()),
                email: Some("jane@company.com".into()),
                position: Some("Engineer".into()),
                department: Some("Engineering".into()),
                salary: Some(-1.0),
                join_date: Some("2024-01-15".into()),
                ..Default::default()
            },
            "hash",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let pool = fixtures::pool().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        let err = create(
            &pool,
            EmployeeCreate {
                name: Some("Jane Again".into()),
                email: Some(jane.email.to_uppercase()),
                position: Some("Engineer".into()),
                department: Some("Engineering".into()),
                salary: Some(1.0),
                join_date: Some("2024-01-15".into()),
                ..Default::default()
            },
            "hash",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let pool = fixtures::pool().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;

        let updated = update(
            &pool,
            jane.id,
            EmployeeUpdate {
                salary: Some(6500.0),
                status: Some(EmployeeStatus::Inactive),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
        assert_eq!(updated.salary, 6500.0);
        assert!(!updated.is_active());
        assert_eq!(updated.name, "Jane");
        assert_eq!(updated.password_hash, jane.password_hash);

        let err = update(&pool, 42, EmployeeUpdate::default(), None).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_recent_and_totals() {
        let pool = fixtures::pool().await;
        for name in ["A", "B", "C", "D"] {
            fixtures::employee(&pool, name, "Ops").await;
        }
        let recent = find_recent(&pool, 3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(total_salary(&pool).await.unwrap(), 20000.0);
    }

    #[tokio::test]
    async fn test_salary_totals_by_department() {
        let pool = fixtures::pool().await;
        assert_eq!(salary_totals(&pool, None).await.unwrap(), (0, 0.0));

        fixtures::employee(&pool, "Jane", "Engineering").await;
        fixtures::employee(&pool, "John", "Engineering").await;
        fixtures::employee(&pool, "Ann", "Sales").await;

        assert_eq!(salary_totals(&pool, None).await.unwrap(), (3, 15000.0));
        assert_eq!(salary_totals(&pool, Some("Engineering")).await.unwrap(), (2, 10000.0));
        assert_eq!(salary_totals(&pool, Some("Legal")).await.unwrap(), (0, 0.0));
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = fixtures::pool().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        assert!(delete(&pool, jane.id).await.unwrap());
        assert!(!delete(&pool, jane.id).await.unwrap());
        assert!(find_by_id(&pool, jane.id).await.unwrap().is_none());
    }
}
