//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod message_store;

pub use database::*;
pub use message_store::*;
