//! Department Model

use serde::{Deserialize, Serialize};

/// Department record
///
/// `employee_count` is computed at read time from the employee table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Manager (employee name)
    pub manager: String,
    pub employee_count: i64,
    pub created_at: i64,
}

/// Create department payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentCreate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub manager: Option<String>,
}

/// Update department payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub manager: Option<String>,
}
