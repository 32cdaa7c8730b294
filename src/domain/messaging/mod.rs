//! Messaging Context - 消息限界上下文
//!
//! 职责:
//! - 用户间消息实体
//! - 语音指令分类（Intent）与解析
//! - 回复文本与问候语

mod entities;
mod errors;
mod greeting;
mod intent;
mod parser;
pub mod replies;

pub use entities::{Message, MessageId, UserId};
pub use errors::MessagingError;
pub use greeting::{greeting_prefix, resolve_timezone};
pub use intent::Intent;
pub use parser::{parse_read_command, parse_register_command, parse_send_command};
