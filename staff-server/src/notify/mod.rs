//! 通知扇出 (Notification Fan-out)
//!
//! - [`NotificationBus`] - 进程内广播通道
//! - [`NotificationService`] - 写库后广播，失败不影响业务
//! - [`events`] - 各业务事件对应的通知内容

pub mod bus;
pub mod events;
pub mod service;

pub use bus::NotificationBus;
pub use service::NotificationService;
