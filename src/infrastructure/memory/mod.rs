//! Memory Layer - In-Memory Storage
//!
//! 实现内存版 MessageStore，用于开发环境与测试

mod message_store;

pub use message_store::InMemoryMessageStore;
