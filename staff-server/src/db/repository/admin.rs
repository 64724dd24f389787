//! Admin Account Repository

use super::{RepoError, RepoResult};
use shared::models::AdminAccount;
use sqlx::SqlitePool;

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<AdminAccount>> {
    let admin = sqlx::query_as::<_, AdminAccount>(
        "SELECT id, name, email, password_hash, created_at FROM admin WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(admin)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<AdminAccount>> {
    let admin = sqlx::query_as::<_, AdminAccount>(
        "SELECT id, name, email, password_hash, created_at FROM admin WHERE email = ? COLLATE NOCASE",
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;
    Ok(admin)
}

pub async fn create(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> RepoResult<AdminAccount> {
    let id = shared::util::snowflake_id();
    sqlx::query("INSERT INTO admin (id, name, email, password_hash, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(id)
        .bind(name.trim())
        .bind(email.trim())
        .bind(password_hash)
        .bind(shared::util::now_millis())
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create admin".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let pool = fixtures::pool().await;
        assert_eq!(count(&pool).await.unwrap(), 0);

        let admin = create(&pool, "Root", "admin@company.com", "hash").await.unwrap();
        assert_eq!(count(&pool).await.unwrap(), 1);

        let found = find_by_email(&pool, "Admin@Company.com").await.unwrap().unwrap();
        assert_eq!(found.id, admin.id);
        assert_eq!(found.password_hash, "hash");

        let err = create(&pool, "Root 2", "admin@company.com", "hash").await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }
}
