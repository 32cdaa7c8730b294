//! Messaging Context - Entities

use chrono::{DateTime, Utc};

/// 存储分配的消息 ID
pub type MessageId = i64;

/// 存储侧的用户标识（不是用户名）
pub type UserId = String;

/// 用户间消息
///
/// 不变量:
/// - sender / recipient 是存储分配的用户 ID，而不是展示用户名
/// - id 在持久化前为 None，由存储在保存时分配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Option<MessageId>,
    pub sender: UserId,
    pub recipient: UserId,
    pub created_at: DateTime<Utc>,
    pub payload: String,
}

impl Message {
    /// 创建尚未持久化的消息
    pub fn new(
        sender: impl Into<UserId>,
        recipient: impl Into<UserId>,
        created_at: DateTime<Utc>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            sender: sender.into(),
            recipient: recipient.into(),
            created_at,
            payload: payload.into(),
        }
    }

    /// 附加存储分配的 ID
    pub fn with_id(mut self, id: MessageId) -> Self {
        self.id = Some(id);
        self
    }
}
