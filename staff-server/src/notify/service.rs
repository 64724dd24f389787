//! 通知服务 - 写入 + 广播
//!
//! 所有写入都是 fire-and-forget：失败只记录 `warn` 日志 (target `notify`)，
//! 从不向触发它的业务操作返回错误。

use shared::message::BusMessage;
use shared::models::{Notification, NotificationCreate};
use sqlx::SqlitePool;

use super::NotificationBus;
use crate::db::repository::notification::{self, FeedScope};

#[derive(Debug, Clone)]
pub struct NotificationService {
    pool: SqlitePool,
    bus: NotificationBus,
}

impl NotificationService {
    pub fn new(pool: SqlitePool, bus: NotificationBus) -> Self {
        Self { pool, bus }
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// 写入通知并推送给在线订阅者
    ///
    /// 返回 `None` 表示写入失败 (已记录日志)。
    pub async fn emit(&self, data: NotificationCreate) -> Option<Notification> {
        let notification_type = data.notification_type;
        let employee_id = data.employee_id;
        match notification::insert(&self.pool, data).await {
            Ok(stored) => {
                let receivers = self.bus.publish(BusMessage::created(stored.clone()));
                tracing::debug!(
                    target: "notify",
                    id = stored.id,
                    kind = ?notification_type,
                    receivers,
                    "Notification delivered"
                );
                Some(stored)
            }
            Err(e) => {
                tracing::warn!(
                    target: "notify",
                    kind = ?notification_type,
                    employee_id,
                    error = %e,
                    "Failed to create notification"
                );
                None
            }
        }
    }

    /// 广播已读事件
    pub fn publish_read(&self, id: i64) {
        self.bus.publish(BusMessage::NotificationRead { id });
    }

    /// 广播批量已读事件，范围与 `mark_all_read` 的 feed 一致
    pub fn publish_read_all(&self, scope: FeedScope) {
        self.bus.publish(BusMessage::NotificationsReadAll {
            audience: scope.audience,
            employee_id: scope.employee_id,
        });
    }
}
