//! 应用层错误定义
//!
//! 统一的命令错误类型，HTTP 层据此映射状态码

use thiserror::Error;

use crate::application::ports::{OutboxError, RepositoryError};
use crate::domain::messaging::MessagingError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 不支持的请求类型
    #[error("Unsupported request type: {0}")]
    UnsupportedRequestType(String),

    /// 无效的时区
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 消息队列不可用（已满或已关闭）
    #[error("Message queue unavailable: {0}")]
    QueueUnavailable(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        Self::RepositoryError(err.to_string())
    }
}

impl From<OutboxError> for ApplicationError {
    fn from(err: OutboxError) -> Self {
        Self::QueueUnavailable(err.to_string())
    }
}

impl From<MessagingError> for ApplicationError {
    fn from(err: MessagingError) -> Self {
        match err {
            MessagingError::InvalidTimezone(name) => Self::InvalidTimezone(name),
        }
    }
}
