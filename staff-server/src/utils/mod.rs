//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`validation`] - 输入校验
//! - [`time`] - 考勤工时计算
//! - [`Json`] / [`Query`] - 拒绝时返回统一错误体的提取器
//! - 日志初始化

pub mod extract;
pub mod logger;
pub mod time;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use extract::{Json, Query};
