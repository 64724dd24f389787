//! Notification payloads for each domain event
//!
//! | Event | Audience | `employee_id` |
//! |-------|----------|---------------|
//! | `leave_applied` | admin | applicant |
//! | `leave_updated` | employee | applicant |
//! | `task_assigned` | employee | assignee |
//! | `task_completed` | admin | assignee |
//! | `location_alert` | admin | reporting employee |

use serde_json::json;
use shared::models::{
    LeaveRequest, LocationRecord, NotificationAudience, NotificationCreate, NotificationType,
    Task, TaskPriority,
};

fn priority_label(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "low",
        TaskPriority::Medium => "medium",
        TaskPriority::High => "high",
    }
}

pub fn leave_applied(leave: &LeaveRequest) -> NotificationCreate {
    NotificationCreate {
        notification_type: NotificationType::LeaveApplied,
        audience: NotificationAudience::Admin,
        employee_id: leave.employee_id,
        employee_name: leave.employee_name.clone(),
        title: "New Leave Application".into(),
        message: format!(
            "{} has applied for {} leave from {} to {} ({} days)",
            leave.employee_name, leave.leave_type, leave.start_date, leave.end_date, leave.days
        ),
        related_id: Some(leave.id),
        metadata: json!({
            "leave_type": leave.leave_type,
            "start_date": leave.start_date,
            "end_date": leave.end_date,
            "days": leave.days,
            "reason": leave.reason,
        }),
    }
}

/// Decision notice; the final status is part of both title and message
pub fn leave_updated(leave: &LeaveRequest) -> NotificationCreate {
    let verdict = match leave.status {
        shared::models::LeaveStatus::Approved => "Approved",
        shared::models::LeaveStatus::Rejected => "Rejected",
        shared::models::LeaveStatus::Pending => "Pending",
    };
    NotificationCreate {
        notification_type: NotificationType::LeaveUpdated,
        audience: NotificationAudience::Employee,
        employee_id: leave.employee_id,
        employee_name: leave.employee_name.clone(),
        title: format!("Leave {verdict}"),
        message: format!(
            "Your {} leave request from {} to {} has been {}.",
            leave.leave_type, leave.start_date, leave.end_date, leave.status
        ),
        related_id: Some(leave.id),
        metadata: json!({
            "leave_type": leave.leave_type,
            "start_date": leave.start_date,
            "end_date": leave.end_date,
            "days": leave.days,
            "status": leave.status,
            "reason": leave.reason,
        }),
    }
}

pub fn task_assigned(task: &Task) -> NotificationCreate {
    NotificationCreate {
        notification_type: NotificationType::TaskAssigned,
        audience: NotificationAudience::Employee,
        employee_id: task.assigned_to,
        employee_name: task.employee_name.clone().unwrap_or_default(),
        title: "New Task Assigned".into(),
        message: format!(
            "You have been assigned a new {} priority task: {}",
            priority_label(task.priority),
            task.title
        ),
        related_id: Some(task.id),
        metadata: json!({
            "task_title": task.title,
            "priority": task.priority,
            "due_date": task.due_date,
        }),
    }
}

pub fn task_completed(task: &Task) -> NotificationCreate {
    let name = task.employee_name.clone().unwrap_or_default();
    NotificationCreate {
        notification_type: NotificationType::TaskCompleted,
        audience: NotificationAudience::Admin,
        employee_id: task.assigned_to,
        message: format!("{name} has completed the task: \"{}\"", task.title),
        employee_name: name,
        title: "Task Completed".into(),
        related_id: Some(task.id),
        metadata: json!({
            "task_title": task.title,
            "task_priority": task.priority,
            "due_date": task.due_date,
        }),
    }
}

/// Outside-all-zones alert, distance in whole meters
pub fn location_alert(record: &LocationRecord) -> NotificationCreate {
    let meters = record.distance.round() as i64;
    NotificationCreate {
        notification_type: NotificationType::LocationAlert,
        audience: NotificationAudience::Admin,
        employee_id: record.employee_id,
        employee_name: record.employee_name.clone(),
        title: "Employee Outside Office".into(),
        message: format!(
            "{} is outside office premises. Distance to {}: {}m",
            record.employee_name, record.office_name, meters
        ),
        related_id: Some(record.id),
        metadata: json!({
            "latitude": record.latitude,
            "longitude": record.longitude,
            "distance": meters,
            "office": record.office_name,
            "accuracy": record.accuracy,
        }),
    }
}
