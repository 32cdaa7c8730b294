//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（MessageStore、Outbox、Clock）
//! - commands: 语音指令命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::UtteranceHandler, Reply, UtteranceCommand, PROTOCOL_VERSION, SIMPLE_UTTERANCE,
};

pub use error::ApplicationError;

pub use ports::{
    Clock, MessageStorePort, OutboxError, OutboxPort, RepositoryError, SystemClock,
};

#[cfg(test)]
pub use ports::FixedClock;
