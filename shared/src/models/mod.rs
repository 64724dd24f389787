//! Data models
//!
//! Shared between staff-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, timestamps are Unix milliseconds.

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod department;
pub mod employee;
pub mod leave;
pub mod notification;
pub mod office_location;
pub mod task;

// Re-exports
pub use attendance::*;
pub use auth::*;
pub use dashboard::*;
pub use department::*;
pub use employee::*;
pub use leave::*;
pub use notification::*;
pub use office_location::*;
pub use task::*;
