use thiserror::Error;

/// 服务器启动/运行错误
///
/// 请求级错误使用 [`crate::AppError`]，这里只覆盖进程生命周期。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库初始化失败: {0}")]
    Database(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<crate::AppError> for ServerError {
    fn from(err: crate::AppError) -> Self {
        match err.code {
            shared::ErrorCode::DatabaseError => ServerError::Database(err.message),
            shared::ErrorCode::ConfigError => ServerError::Config(err.message),
            _ => ServerError::Internal(anyhow::anyhow!(err.message)),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
