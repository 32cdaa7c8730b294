//! Domain Layer - 领域层
//!
//! 只有一个限界上下文:
//! - Messaging Context: 用户之间的留言

pub mod messaging;
