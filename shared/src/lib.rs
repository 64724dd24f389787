//! Shared types for the staff service
//!
//! Data models, the unified error system, notification bus messages and
//! small utilities used by the server and its tests.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use message::BusMessage;
pub use serde::{Deserialize, Serialize};
