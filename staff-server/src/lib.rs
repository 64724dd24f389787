//! Staff Server - 员工管理后端
//!
//! # 架构概述
//!
//! - **请假流程** (`leave`): pending → approved / rejected 状态机
//! - **地理围栏考勤** (`geofence`): haversine 距离 + 办公区域半径判定
//! - **通知扇出** (`notify`): 写库 + broadcast 推送，失败不影响业务
//! - **数据库** (`db`): SQLite (sqlx) 连接池和各表仓储
//! - **认证** (`auth`): JWT + Argon2，admin / employee 两种角色
//! - **HTTP API** (`api`): RESTful 接口和 WebSocket 订阅
//!
//! # 模块结构
//!
//! ```text
//! staff-server/src/
//! ├── core/          # 配置、状态、服务器、错误
//! ├── auth/          # JWT、密码、中间件、限流
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 连接池和仓储
//! ├── leave/         # 请假流程
//! ├── geofence/      # 地理围栏
//! ├── notify/        # 通知总线
//! ├── export/        # CSV 导出
//! └── utils/         # 校验、工时、日志
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod export;
pub mod geofence;
pub mod leave;
pub mod notify;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, build_app};
pub use notify::{NotificationBus, NotificationService};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 `.env` 并初始化日志
///
/// `.env` 不存在不是错误。
pub fn setup_environment() -> anyhow::Result<()> {
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        return Err(anyhow::anyhow!("Failed to load .env: {e}"));
    }

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____ __        ________   ____            __
  / ___// /_____ _/ __/ __/  / __ \___  _____/ /__
  \__ \/ __/ __ `/ /_/ /_   / / / / _ \/ ___/ //_/
 ___/ / /_/ /_/ / __/ __/  / /_/ /  __(__  ) ,<
/____/\__/\__,_/_/ /_/    /_____/\___/____/_/|_|
    "#
    );
}
