//! 应用层 - 命令
//!
//! 每次语音输入对应一个命令，由 UtteranceHandler 同步处理

mod utterance_commands;

pub mod handlers;

pub use utterance_commands::*;
