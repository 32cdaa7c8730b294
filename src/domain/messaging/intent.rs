//! Intent - 语音指令分类
//!
//! 按优先级做前缀匹配（先匹配者胜出），把指令文本映射为封闭的意图集合。
//! 分类是纯函数，与存储副作用分离。

use super::parser::{parse_read_command, parse_register_command, parse_send_command};

pub const SEND_KEYWORD: &str = "Отправь";
pub const READ_KEYWORD: &str = "Прочитай";
pub const REGISTER_KEYWORD: &str = "Зарегистрируй";

/// 已分类的用户意图
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// 给另一个用户发送消息
    Send { username: String, text: String },
    /// 读取第 index 条消息（从 0 开始）
    Read { index: usize },
    /// 以指定用户名注册
    Register { username: String },
    /// 未识别的指令：报告新消息数量
    Summary,
}

impl Intent {
    /// 对指令文本分类
    pub fn classify(command: &str) -> Self {
        let command = command.trim_start();

        if command.starts_with(SEND_KEYWORD) {
            let (username, text) = parse_send_command(command);
            Intent::Send { username, text }
        } else if command.starts_with(READ_KEYWORD) {
            Intent::Read {
                index: parse_read_command(command),
            }
        } else if command.starts_with(REGISTER_KEYWORD) {
            Intent::Register {
                username: parse_register_command(command),
            }
        } else {
            Intent::Summary
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Intent::Send { .. } => "send",
            Intent::Read { .. } => "read",
            Intent::Register { .. } => "register",
            Intent::Summary => "summary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_send() {
        assert_eq!(
            Intent::classify("Отправь petya привет"),
            Intent::Send {
                username: "petya".to_string(),
                text: "привет".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_read() {
        assert_eq!(
            Intent::classify("Прочитай сообщение 3"),
            Intent::Read { index: 3 }
        );
    }

    #[test]
    fn test_classify_register() {
        assert_eq!(
            Intent::classify("Зарегистрируй vasya"),
            Intent::Register {
                username: "vasya".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_falls_back_to_summary() {
        assert_eq!(Intent::classify("do something"), Intent::Summary);
        assert_eq!(Intent::classify(""), Intent::Summary);
        // 关键字必须出现在开头
        assert_eq!(Intent::classify("Пожалуйста, Отправь petya"), Intent::Summary);
    }

    #[test]
    fn test_classify_first_match_wins() {
        // 以 send 开头，即使文本里包含其他关键字
        let intent = Intent::classify("Отправь petya Прочитай Зарегистрируй");
        assert_eq!(intent.name(), "send");
    }

    #[test]
    fn test_classify_ignores_leading_whitespace() {
        assert_eq!(Intent::classify("  Прочитай 1"), Intent::Read { index: 1 });
    }
}
