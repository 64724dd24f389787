use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::auth::{JwtService, RateLimiter, hash_password};
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::db::repository::admin;
use crate::notify::{NotificationBus, NotificationService};

/// 限流表清理周期
const LIMITER_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是浅拷贝 (连接池 / Arc / broadcast 发送端)，每个请求克隆一份。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | notifications | NotificationService | 通知写入 + 广播 |
/// | login_limiter | RateLimiter | 登录限流 (按 IP) |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub notifications: NotificationService,
    pub login_limiter: RateLimiter,
}

impl ServerState {
    /// 用已打开的连接池构造状态 (不做种子数据)
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let bus = NotificationBus::with_capacity(config.notification_channel_capacity);
        let notifications = NotificationService::new(pool.clone(), bus);
        let login_limiter = RateLimiter::per_minute(config.login_rate_limit_per_minute);

        Self {
            config,
            pool,
            jwt_service,
            notifications,
            login_limiter,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序：
    /// 1. 打开数据库并执行迁移
    /// 2. 管理员表为空时写入配置中的初始管理员
    /// 3. 构造各服务
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_url).await?;
        seed_admin(&db.pool, config).await?;
        Ok(Self::new(config.clone(), db.pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn get_jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn bus(&self) -> &NotificationBus {
        self.notifications.bus()
    }

    /// 启动后台任务
    ///
    /// 目前只有登录限流表的定期清理；收到关闭信号后退出。
    pub fn start_background_tasks(&self) {
        let limiter = self.login_limiter.clone();
        let shutdown = self.bus().shutdown_token().clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(LIMITER_CLEANUP_INTERVAL);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => limiter.cleanup(),
                    _ = shutdown.cancelled() => break,
                }
            }
            tracing::debug!("Rate limiter cleanup task stopped");
        });
    }
}

async fn seed_admin(pool: &SqlitePool, config: &Config) -> Result<()> {
    if admin::count(pool).await.map_err(crate::AppError::from)? > 0 {
        return Ok(());
    }

    let hash = hash_password(&config.admin_password)?;
    let account = admin::create(pool, &config.admin_name, &config.admin_email, &hash)
        .await
        .map_err(crate::AppError::from)?;
    tracing::info!(admin_id = account.id, email = %account.email, "Seeded initial administrator");
    if !config.is_production() && config.admin_password == "admin123" {
        tracing::warn!("Initial administrator uses the default password, set ADMIN_PASSWORD");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_seeds_admin_once() {
        let config = Config::with_overrides("sqlite::memory:", 0);
        let state = ServerState::initialize(&config).await.unwrap();
        assert_eq!(admin::count(state.pool()).await.unwrap(), 1);

        seed_admin(state.pool(), &config).await.unwrap();
        assert_eq!(admin::count(state.pool()).await.unwrap(), 1);

        let seeded = admin::find_by_email(state.pool(), &config.admin_email)
            .await
            .unwrap()
            .unwrap();
        assert!(crate::auth::verify_password(&config.admin_password, &seeded.password_hash));
    }
}
