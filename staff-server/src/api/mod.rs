//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录和当前用户
//! - [`employees`] - 员工管理接口
//! - [`departments`] - 部门管理接口
//! - [`leaves`] - 请假接口
//! - [`dashboard`] - 统计概览
//! - [`tasks`] - 任务接口
//! - [`notifications`] - 通知查询和 WebSocket 订阅
//! - [`office_locations`] - 办公地点 (地理围栏) 管理
//! - [`attendance`] - 定位打卡和考勤记录
//! - [`export`] - CSV 导出

pub mod convert;

pub mod auth;
pub mod health;

pub mod attendance;
pub mod dashboard;
pub mod departments;
pub mod employees;
pub mod export;
pub mod leaves;
pub mod notifications;
pub mod office_locations;
pub mod tasks;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Build the API router (without the auth layer and without state)
///
/// `state` is only needed for route-level middleware that reads it
/// (login rate limiting).
pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        // Public routes
        .merge(health::router())
        .merge(auth::router(state))
        // Directory
        .merge(employees::router())
        .merge(departments::router())
        // Workflows
        .merge(leaves::router())
        .merge(tasks::router())
        .merge(notifications::router())
        // Attendance
        .merge(office_locations::router())
        .merge(attendance::router())
        // Reporting
        .merge(dashboard::router())
        .merge(export::router())
}
