//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod clock;
mod message_store;
mod outbox;

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::FixedClock;
pub use message_store::{MessageStorePort, RepositoryError};
pub use outbox::{OutboxError, OutboxPort};
