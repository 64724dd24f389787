//! 通知总线消息类型
//!
//! 这些类型在 staff-server 的广播通道和 WebSocket 订阅者之间共享。
//! 每条消息序列化为 `{"event": ..., "data": ...}`。

use serde::{Deserialize, Serialize};

use crate::models::{Notification, NotificationAudience};

/// 广播总线消息
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum BusMessage {
    /// 新通知已写入
    NotificationCreated(Notification),
    /// 单条通知已读
    NotificationRead { id: i64 },
    /// 整个频道 (或某员工的个人视图) 全部已读
    NotificationsReadAll {
        audience: NotificationAudience,
        employee_id: Option<i64>,
    },
}

impl BusMessage {
    pub fn created(notification: Notification) -> Self {
        Self::NotificationCreated(notification)
    }

    /// 订阅者过滤
    ///
    /// - `audience`: 订阅者所在的通知频道
    /// - `employee_id`: 个人视图时只保留该员工的通知
    ///
    /// 单条已读事件不含通知内容，总是放行；批量已读只发给同频道、
    /// 员工视图重叠的订阅者。
    pub fn is_visible_to(&self, audience: NotificationAudience, employee_id: Option<i64>) -> bool {
        match self {
            BusMessage::NotificationCreated(n) => {
                n.audience == audience && employee_id.is_none_or(|id| n.employee_id == id)
            }
            BusMessage::NotificationRead { .. } => true,
            BusMessage::NotificationsReadAll {
                audience: read_audience,
                employee_id: read_employee,
            } => {
                *read_audience == audience
                    && match (read_employee, employee_id) {
                        (Some(read), Some(viewer)) => *read == viewer,
                        _ => true,
                    }
            }
        }
    }
}
