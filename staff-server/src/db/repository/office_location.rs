//! Office Location Repository

use super::{RepoError, RepoResult};
use crate::utils::validation::{self, MAX_ADDRESS_LEN, MAX_NAME_LEN};
use shared::models::{OfficeLocation, OfficeLocationCreate, OfficeLocationUpdate};
use sqlx::SqlitePool;

const OFFICE_SELECT: &str =
    "SELECT id, name, latitude, longitude, radius, address, created_at FROM office_location";

fn validate_radius(radius: f64) -> RepoResult<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(RepoError::Validation(format!(
            "radius must be greater than 0: {radius}"
        )));
    }
    Ok(())
}

/// All zones in creation order
///
/// Order matters: the geofence check picks the first matching zone.
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<OfficeLocation>> {
    let sql = format!("{OFFICE_SELECT} ORDER BY id");
    let offices = sqlx::query_as::<_, OfficeLocation>(&sql).fetch_all(pool).await?;
    Ok(offices)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<OfficeLocation>> {
    let sql = format!("{OFFICE_SELECT} WHERE id = ?");
    let office = sqlx::query_as::<_, OfficeLocation>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(office)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<OfficeLocation>> {
    let sql = format!("{OFFICE_SELECT} WHERE name = ?");
    let office = sqlx::query_as::<_, OfficeLocation>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(office)
}

pub async fn create(pool: &SqlitePool, data: OfficeLocationCreate) -> RepoResult<OfficeLocation> {
    let name = validation::required_text(data.name.as_deref(), "name", MAX_NAME_LEN)
        .map_err(RepoError::Validation)?;
    let (latitude, longitude) = match (data.latitude, data.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        (None, _) => return Err(RepoError::Validation("latitude is required".into())),
        (_, None) => return Err(RepoError::Validation("longitude is required".into())),
    };
    validation::coordinates(latitude, longitude).map_err(RepoError::Validation)?;
    let radius = data
        .radius
        .ok_or_else(|| RepoError::Validation("radius is required".into()))?;
    validate_radius(radius)?;
    let address = validation::optional_text(data.address.as_deref(), "address", MAX_ADDRESS_LEN)
        .map_err(RepoError::Validation)?;

    if find_by_name(pool, &name).await?.is_some() {
        return Err(RepoError::Duplicate(format!("Office location '{name}' already exists")));
    }

    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO office_location (id, name, latitude, longitude, radius, address, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&name)
    .bind(latitude)
    .bind(longitude)
    .bind(radius)
    .bind(&address)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create office location".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: OfficeLocationUpdate,
) -> RepoResult<OfficeLocation> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Office location {id} not found")))?;

    let name = validation::optional_text(data.name.as_deref(), "name", MAX_NAME_LEN)
        .map_err(RepoError::Validation)?;
    let latitude = data.latitude.unwrap_or(existing.latitude);
    let longitude = data.longitude.unwrap_or(existing.longitude);
    validation::coordinates(latitude, longitude).map_err(RepoError::Validation)?;
    let radius = data.radius.unwrap_or(existing.radius);
    validate_radius(radius)?;
    let address = validation::optional_text(data.address.as_deref(), "address", MAX_ADDRESS_LEN)
        .map_err(RepoError::Validation)?;

    if let Some(ref name) = name {
        let taken = find_by_name(pool, name).await?;
        if taken.is_some_and(|o| o.id != id) {
            return Err(RepoError::Duplicate(format!("Office location '{name}' already exists")));
        }
    }

    sqlx::query(
        "UPDATE office_location SET name = COALESCE(?1, name), latitude = ?2, longitude = ?3, radius = ?4, address = COALESCE(?5, address) WHERE id = ?6",
    )
    .bind(&name)
    .bind(latitude)
    .bind(longitude)
    .bind(radius)
    .bind(&address)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Office location {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM office_location WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
