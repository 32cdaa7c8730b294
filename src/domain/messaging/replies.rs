//! 回复文本
//!
//! 语音助手朗读给用户的固定文本与格式化函数

use chrono::{DateTime, Utc};

use super::Message;

pub const MESSAGE_SENT: &str = "Сообщение успешно отправлено";
pub const NO_SUCH_MESSAGE: &str = "Такого сообщения не существует.";
pub const NAME_TAKEN: &str = "Извините, такое имя уже занято. Попробуйте другое.";
pub const NO_NEW_MESSAGES: &str = "Для вас нет новых сообщений.";

/// 时间戳在回复中的展示格式
const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M UTC";

fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// 朗读一条消息：发送者、发送时间和正文
pub fn render_message(message: &Message) -> String {
    format!(
        "Сообщение от {}, отправлено {}: {}",
        message.sender,
        format_timestamp(&message.created_at),
        message.payload
    )
}

pub fn registered(username: &str) -> String {
    format!("Вы успешно зарегистрированы под именем {}", username)
}

/// 新消息数量
pub fn message_count(count: usize) -> String {
    if count == 0 {
        NO_NEW_MESSAGES.to_string()
    } else {
        format!("Для вас {} новых сообщений.", count)
    }
}
