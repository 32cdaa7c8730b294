//! 指令文本解析
//!
//! 从语音平台归一化后的指令文本中提取参数。
//! 所有函数都是纯函数：不会失败，缺失的部分返回空值或默认值。

use super::intent::{READ_KEYWORD, REGISTER_KEYWORD, SEND_KEYWORD};

/// 去掉开头的关键字（不存在时原样返回），并去除首尾空白
fn strip_keyword<'a>(command: &'a str, keyword: &str) -> &'a str {
    let trimmed = command.trim();
    trimmed.strip_prefix(keyword).unwrap_or(trimmed).trim()
}

/// 解析发送指令: `Отправь <用户名> <消息文本...>`
///
/// 返回 (收件人用户名, 消息文本)
pub fn parse_send_command(command: &str) -> (String, String) {
    let rest = strip_keyword(command, SEND_KEYWORD);
    match rest.split_once(char::is_whitespace) {
        Some((username, text)) => (username.to_string(), text.trim().to_string()),
        None => (rest.to_string(), String::new()),
    }
}

/// 解析读取指令: `Прочитай ... <序号> ...`
///
/// 返回第一个数字（从 0 开始的消息序号），没有数字时为 0
pub fn parse_read_command(command: &str) -> usize {
    strip_keyword(command, READ_KEYWORD)
        .split_whitespace()
        .find_map(|word| word.parse::<usize>().ok())
        .unwrap_or(0)
}

/// 解析注册指令: `Зарегистрируй [меня как] <用户名>`
///
/// 取最后一个词作为期望的用户名
pub fn parse_register_command(command: &str) -> String {
    strip_keyword(command, REGISTER_KEYWORD)
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .to_string()
}
