//! Office Location Model (办公地点 / 地理围栏)

use serde::{Deserialize, Serialize};

/// Named circular zone used for geofence checks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OfficeLocation {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Radius in meters
    pub radius: f64,
    pub address: Option<String>,
    pub created_at: i64,
}

/// Create office location payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfficeLocationCreate {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
    pub address: Option<String>,
}

/// Update office location payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfficeLocationUpdate {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
    pub address: Option<String>,
}
