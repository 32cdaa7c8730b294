//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod http;
pub mod memory;
pub mod persistence;
pub mod worker;

pub use memory::InMemoryMessageStore;
pub use persistence::SqliteMessageStore;
pub use worker::{FlushWorker, FlushWorkerConfig, FlushWorkerHandle, MessageQueue};
