//! Task Model

use serde::{Deserialize, Serialize};

/// Task status (two-state lifecycle)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Task record, joined with the assignee's name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Assignee employee id
    pub assigned_to: i64,
    /// Assignee name (joined, absent if the employee was removed)
    pub employee_name: Option<String>,
    /// Admin id
    pub created_by: i64,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// `YYYY-MM-DD`
    pub due_date: Option<String>,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create task payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskCreate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<i64>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<String>,
}

/// Update task payload (admin)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<String>,
}

/// Task status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusUpdate {
    pub status: TaskStatus,
}

/// Task list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    pub assigned_to: Option<i64>,
}

/// Task statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskStats {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    /// Completion percentage, rounded
    pub completion_rate: i64,
}

impl TaskStats {
    pub fn from_counts(total: i64, completed: i64) -> Self {
        let completion_rate = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as i64
        } else {
            0
        };
        Self {
            total,
            completed,
            pending: total - completed,
            completion_rate,
        }
    }
}
