//! Department Repository
//!
//! `employee_count` is not stored; every read derives it from the employee table.

use super::{RepoError, RepoResult};
use crate::utils::validation::{self, MAX_NAME_LEN, MAX_NOTE_LEN};
use shared::models::{Department, DepartmentCreate, DepartmentSalary, DepartmentUpdate};
use sqlx::SqlitePool;

const DEPARTMENT_SELECT: &str = "SELECT d.id, d.name, d.description, d.manager, (SELECT COUNT(*) FROM employee e WHERE e.department = d.name) AS employee_count, d.created_at FROM department d";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Department>> {
    let sql = format!("{DEPARTMENT_SELECT} ORDER BY d.name");
    let departments = sqlx::query_as::<_, Department>(&sql).fetch_all(pool).await?;
    Ok(departments)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Department>> {
    let sql = format!("{DEPARTMENT_SELECT} WHERE d.id = ?");
    let department = sqlx::query_as::<_, Department>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(department)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Department>> {
    let sql = format!("{DEPARTMENT_SELECT} WHERE d.name = ?");
    let department = sqlx::query_as::<_, Department>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(department)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM department")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Headcount and monthly salary sum per department, ordered by name
///
/// Departments without employees are listed with zero totals.
pub async fn salary_breakdown(pool: &SqlitePool) -> RepoResult<Vec<DepartmentSalary>> {
    let rows: Vec<(String, i64, f64)> = sqlx::query_as(
        "SELECT d.name, COUNT(e.id), COALESCE(SUM(e.salary), 0.0) FROM department d LEFT JOIN employee e ON e.department = d.name GROUP BY d.id, d.name ORDER BY d.name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(department, employees, total)| DepartmentSalary {
            average: if employees > 0 { total / employees as f64 } else { 0.0 },
            department,
            employees,
            total,
        })
        .collect())
}

pub async fn create(pool: &SqlitePool, data: DepartmentCreate) -> RepoResult<Department> {
    let name = validation::required_text(data.name.as_deref(), "name", MAX_NAME_LEN)
        .map_err(RepoError::Validation)?;
    let description =
        validation::required_text(data.description.as_deref(), "description", MAX_NOTE_LEN)
            .map_err(RepoError::Validation)?;
    let manager = validation::required_text(data.manager.as_deref(), "manager", MAX_NAME_LEN)
        .map_err(RepoError::Validation)?;

    if find_by_name(pool, &name).await?.is_some() {
        return Err(RepoError::Duplicate(format!("Department '{name}' already exists")));
    }

    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO department (id, name, description, manager, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&name)
    .bind(&description)
    .bind(&manager)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create department".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: DepartmentUpdate) -> RepoResult<Department> {
    let name = validation::optional_text(data.name.as_deref(), "name", MAX_NAME_LEN)
        .map_err(RepoError::Validation)?;
    let description =
        validation::optional_text(data.description.as_deref(), "description", MAX_NOTE_LEN)
            .map_err(RepoError::Validation)?;
    let manager = validation::optional_text(data.manager.as_deref(), "manager", MAX_NAME_LEN)
        .map_err(RepoError::Validation)?;

    if let Some(ref name) = name {
        let taken = find_by_name(pool, name).await?;
        if taken.is_some_and(|d| d.id != id) {
            return Err(RepoError::Duplicate(format!("Department '{name}' already exists")));
        }
    }

    let rows = sqlx::query(
        "UPDATE department SET name = COALESCE(?1, name), description = COALESCE(?2, description), manager = COALESCE(?3, manager) WHERE id = ?4",
    )
    .bind(&name)
    .bind(&description)
    .bind(&manager)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Department {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Department {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM department WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{employee, fixtures};
    use shared::models::EmployeeUpdate;

    fn engineering() -> DepartmentCreate {
        DepartmentCreate {
            name: Some("Engineering".into()),
            description: Some("Builds the product".into()),
            manager: Some("Jane".into()),
        }
    }

    #[tokio::test]
    async fn test_employee_count_is_derived() {
        let pool = fixtures::pool().await;
        let dept = create(&pool, engineering()).await.unwrap();
        assert_eq!(dept.employee_count, 0);

        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        fixtures::employee(&pool, "John", "Engineering").await;
        fixtures::employee(&pool, "Ann", "Sales").await;
        assert_eq!(find_by_id(&pool, dept.id).await.unwrap().unwrap().employee_count, 2);

        employee::update(
            &pool,
            jane.id,
            EmployeeUpdate {
                department: Some("Sales".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
        assert_eq!(find_by_id(&pool, dept.id).await.unwrap().unwrap().employee_count, 1);
    }

    #[tokio::test]
    async fn test_salary_breakdown() {
        let pool = fixtures::pool().await;
        create(&pool, engineering()).await.unwrap();
        create(
            &pool,
            DepartmentCreate {
                name: Some("Ops".into()),
                description: Some("Keeps the lights on".into()),
                manager: Some("Ann".into()),
            },
        )
        .await
        .unwrap();

        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        fixtures::employee(&pool, "John", "Engineering").await;
        fixtures::employee(&pool, "Ann", "Sales").await;
        employee::update(
            &pool,
            jane.id,
            EmployeeUpdate {
                salary: Some(7000.0),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

        let breakdown = salary_breakdown(&pool).await.unwrap();
        assert_eq!(
            breakdown,
            vec![
                DepartmentSalary {
                    department: "Engineering".into(),
                    employees: 2,
                    total: 12000.0,
                    average: 6000.0,
                },
                DepartmentSalary {
                    department: "Ops".into(),
                    employees: 0,
                    total: 0.0,
                    average: 0.0,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let pool = fixtures::pool().await;
        create(&pool, engineering()).await.unwrap();
        let err = create(&pool, engineering()).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_required_fields() {
        let pool = fixtures::pool().await;
        let err = create(
            &pool,
            DepartmentCreate {
                name: Some("Ops".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(msg) if msg.contains("description")));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let pool = fixtures::pool().await;
        let dept = create(&pool, engineering()).await.unwrap();
        let updated = update(
            &pool,
            dept.id,
            DepartmentUpdate {
                manager: Some("John".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.manager, "John");
        assert_eq!(updated.name, "Engineering");

        assert!(delete(&pool, dept.id).await.unwrap());
        assert_eq!(count(&pool).await.unwrap(), 0);
    }
}
