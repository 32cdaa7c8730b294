//! 问候语与时区解析

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

use super::MessagingError;

/// 解析调用方时区
///
/// 空字符串视为 UTC（语音平台未提供时区时的默认值），
/// 其余按 IANA 名称解析，例如 `Europe/Moscow`
pub fn resolve_timezone(name: &str) -> Result<Tz, MessagingError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(Tz::UTC);
    }
    name.parse::<Tz>()
        .map_err(|_| MessagingError::InvalidTimezone(name.to_string()))
}

/// 会话首轮的问候前缀：调用方时区的当前小时和分钟
pub fn greeting_prefix(now: DateTime<Utc>, tz: Tz) -> String {
    let local = now.with_timezone(&tz);
    format!(
        "Точное время {} часов, {} минут. ",
        local.hour(),
        local.minute()
    )
}
