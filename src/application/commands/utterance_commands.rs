//! Utterance Commands - 语音指令命令

/// 唯一支持的请求类型
pub const SIMPLE_UTTERANCE: &str = "SimpleUtterance";

/// 回复协议版本
pub const PROTOCOL_VERSION: &str = "1.0";

/// 处理一次用户语音输入
#[derive(Debug, Clone, Default)]
pub struct UtteranceCommand {
    /// 请求类型，必须为 [`SIMPLE_UTTERANCE`]
    pub request_type: String,
    /// 归一化后的指令文本
    pub command: String,
    /// 是否为会话首轮
    pub new_session: bool,
    /// 语音平台提供的调用方用户 ID
    pub user_id: String,
    /// 调用方时区（IANA 名称，可为空）
    pub timezone: String,
}

/// 指令回复
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub version: String,
}

impl Reply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            version: PROTOCOL_VERSION.to_string(),
        }
    }
}
