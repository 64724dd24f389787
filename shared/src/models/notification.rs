//! Notification Model (通知)
//!
//! Append-only event log. Only `is_read` changes after insert.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Notification event type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum NotificationType {
    LocationAlert,
    TaskCompleted,
    LeaveApplied,
    TaskAssigned,
    LeaveUpdated,
}

/// Who a notification is meant for
///
/// `employee_id` always names the subject employee; the audience decides
/// whether it lands in the admin feed or that employee's personal feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum NotificationAudience {
    Admin,
    Employee,
}

/// Notification record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub audience: NotificationAudience,
    pub employee_id: i64,
    pub employee_name: String,
    pub title: String,
    pub message: String,
    /// Id of the leave / task / location record that triggered it
    pub related_id: Option<i64>,
    pub is_read: bool,
    pub created_at: i64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub metadata: Value,
}

/// Create notification payload (internal, produced by fan-out)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreate {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub audience: NotificationAudience,
    pub employee_id: i64,
    pub employee_name: String,
    pub title: String,
    pub message: String,
    pub related_id: Option<i64>,
    #[serde(default)]
    pub metadata: Value,
}

/// Notification list query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationQuery {
    pub limit: Option<i64>,
}

/// Live subscription filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationSubscribe {
    pub employee_id: Option<i64>,
}

/// Unread counter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: i64,
}
