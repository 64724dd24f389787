//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文 (也是提取器)
//! - [`require_auth`] / [`require_admin`] - 认证与角色中间件
//! - [`RateLimiter`] - 登录限流
//! - [`hash_password`] / [`verify_password`] - Argon2 密码哈希

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod rate_limit;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{ensure_can_access, ensure_employee, require_admin, require_auth};
pub use password::{hash_password, verify_password};
pub use rate_limit::{RateLimiter, login_rate_limit};
