//! Outbox Port - 待持久化消息的投递口
//!
//! Dispatcher 通过它把消息交给后台批量写入 Worker，不等待持久化完成

use thiserror::Error;

use crate::domain::messaging::Message;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutboxError {
    /// 队列已满（背压）
    #[error("Message queue is full")]
    Full,

    /// Worker 已停止，不再接收消息
    #[error("Message queue is closed")]
    Closed,
}

/// Outbox Port
///
/// 实现必须是非阻塞的：要么立即入队，要么立即返回错误
pub trait OutboxPort: Send + Sync {
    fn enqueue(&self, message: Message) -> Result<(), OutboxError>;
}
