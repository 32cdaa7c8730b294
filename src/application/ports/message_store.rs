//! Message Store Port - 出站端口
//!
//! 定义消息与用户持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite / 内存）

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::messaging::{Message, MessageId, UserId};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// 用户名已被占用。这是预期内的业务结果，而不是故障
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RepositoryError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, RepositoryError::Conflict(_))
    }
}

/// Message Store Port
#[async_trait]
pub trait MessageStorePort: Send + Sync {
    /// 根据用户名查找用户 ID
    async fn find_recipient(&self, username: &str) -> Result<UserId, RepositoryError>;

    /// 获取某个收件人的全部消息（按发送时间排序）
    async fn list_messages(&self, user_id: &str) -> Result<Vec<Message>, RepositoryError>;

    /// 根据 ID 获取消息
    async fn get_message(&self, id: MessageId) -> Result<Message, RepositoryError>;

    /// 批量保存消息
    ///
    /// 必须是原子写入：要么全部保存，要么全部不保存
    async fn save_messages(&self, messages: &[Message]) -> Result<(), RepositoryError>;

    /// 以指定用户名注册用户
    ///
    /// 用户名已被其他用户占用时返回 [`RepositoryError::Conflict`]
    async fn register_user(&self, user_id: &str, username: &str) -> Result<(), RepositoryError>;
}
