//! Worker Layer - Background Batched Persistence
//!
//! 实现消息队列与 FlushWorker，把请求路径上的消息异步批量写入存储

mod flush_worker;
mod queue;

pub use flush_worker::{FlushOutcome, FlushWorker, FlushWorkerConfig, FlushWorkerHandle};
pub use queue::{MessageQueue, MessageReceiver};
