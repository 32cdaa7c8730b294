//! Tidings - 语音助手留言技能
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Messaging Context: 消息、意图识别、回复文本
//!
//! 应用层 (application/):
//! - Ports: 端口定义（MessageStore, Outbox, Clock）
//! - Commands: 每轮对话的命令处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: webhook 端点
//! - Memory: 内存版 MessageStore
//! - Worker: 消息队列 + 定时批量写入
//! - Persistence: SQLite 存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
