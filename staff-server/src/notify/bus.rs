//! 通知广播总线
//!
//! ```text
//! NotificationService ──▶ publish() ──▶ broadcast::Sender<BusMessage>
//!                                              │
//!                         ┌────────────────────┼────────────────────┐
//!                         ▼                    ▼                    ▼
//!                   WebSocket #1         WebSocket #2          (tests)
//! ```
//!
//! 发布从不等待订阅者；落后的订阅者会收到 `Lagged` 并跳过丢失的消息。

use shared::message::BusMessage;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// 默认通道容量
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct NotificationBus {
    tx: broadcast::Sender<BusMessage>,
    /// 关闭信号令牌 (WebSocket 连接监听此令牌退出)
    shutdown_token: CancellationToken,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// 发布消息，返回收到消息的订阅者数量
    ///
    /// 没有订阅者不算错误。
    pub fn publish(&self, msg: BusMessage) -> usize {
        self.tx.send(msg).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// 获取关闭令牌 (用于监控关闭信号)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 通知所有订阅者退出
    pub fn shutdown(&self) {
        self.shutdown_token.cancel();
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}
