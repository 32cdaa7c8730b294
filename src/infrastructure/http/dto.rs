//! Data Transfer Objects - Webhook 协议
//!
//! 语音平台的请求 / 响应 JSON 结构。缺失字段取默认值，
//! 由应用层决定请求是否可处理。

use serde::{Deserialize, Serialize};

use crate::application::{Reply, UtteranceCommand};

// ============================================================================
// 请求
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub request: Option<UtterancePayload>,
    #[serde(default)]
    pub session: Option<SessionPayload>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UtterancePayload {
    #[serde(rename = "type", default)]
    pub request_type: String,
    #[serde(default)]
    pub command: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionPayload {
    /// 是否为会话首轮
    #[serde(rename = "new", default)]
    pub is_new: bool,
    #[serde(default)]
    pub user: Option<UserPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub user_id: String,
}

impl From<WebhookRequest> for UtteranceCommand {
    fn from(req: WebhookRequest) -> Self {
        let request = req.request.unwrap_or_default();
        let session = req.session.unwrap_or_default();

        UtteranceCommand {
            request_type: request.request_type,
            command: request.command,
            new_session: session.is_new,
            user_id: session.user.unwrap_or_default().user_id,
            timezone: req.timezone.unwrap_or_default(),
        }
    }
}

// ============================================================================
// 响应
// ============================================================================

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub response: ResponsePayload,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ResponsePayload {
    /// 语音助手朗读的文本
    pub text: String,
}

impl From<Reply> for WebhookResponse {
    fn from(reply: Reply) -> Self {
        Self {
            response: ResponsePayload { text: reply.text },
            version: reply.version,
        }
    }
}
