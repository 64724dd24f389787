use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (`.env` 文件由 [`crate::setup_environment`] 加载)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3001 | HTTP 服务端口 |
/// | DATABASE_URL | sqlite:staff.db | SQLite 数据库 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 日志目录，存在时按天滚动写文件 |
/// | ADMIN_EMAIL | admin@company.com | 初始管理员邮箱 |
/// | ADMIN_PASSWORD | admin123 | 初始管理员密码 |
/// | ADMIN_NAME | Administrator | 初始管理员名称 |
/// | DEFAULT_EMPLOYEE_PASSWORD | employee123 | 新员工默认密码 |
/// | NOTIFICATION_CHANNEL_CAPACITY | 1024 | 通知广播通道容量 |
/// | LOGIN_RATE_LIMIT_PER_MINUTE | 5 | 每 IP 每分钟登录次数 |
/// | TRUST_PROXY_HEADERS | false | 限流是否采用 `X-Forwarded-For` (仅在反向代理之后开启) |
///
/// JWT 相关变量见 [`JwtConfig`]。
///
/// # 示例
///
/// ```ignore
/// DATABASE_URL=sqlite:/data/staff.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 连接串 (`sqlite:<path>` 或 `sqlite::memory:`)
    pub database_url: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
    pub default_employee_password: String,
    pub notification_channel_capacity: usize,
    pub login_rate_limit_per_minute: u32,
    /// 客户端 IP 取自 `X-Forwarded-For` 而非 TCP 对端地址
    pub trust_proxy_headers: bool,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:staff.db".into()),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@company.com".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
            admin_name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".into()),
            default_employee_password: std::env::var("DEFAULT_EMPLOYEE_PASSWORD")
                .unwrap_or_else(|_| "employee123".into()),
            notification_channel_capacity: std::env::var("NOTIFICATION_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(1024),
            login_rate_limit_per_minute: std::env::var("LOGIN_RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            trust_proxy_headers: std::env::var("TRUST_PROXY_HEADERS")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(database_url: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.database_url = database_url.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否内存数据库
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let config = Config::with_overrides("sqlite::memory:", 0);
        assert!(config.is_in_memory());
        assert_eq!(config.http_port, 0);
        assert!(config.notification_channel_capacity > 0);
    }
}
