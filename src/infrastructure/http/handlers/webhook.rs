//! Webhook Handler
//!
//! 语音平台每次用户输入调用一次

use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{WebhookRequest, WebhookResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 解码请求体后交给 UtteranceHandler
///
/// 请求体按原始字节读取并自行解码：解码失败返回 500，而不是 axum Json 提取器的 4xx
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    tracing::debug!(bytes = body.len(), "Decoding request");
    let req: WebhookRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::MalformedBody(e.to_string()))?;

    let reply = state.utterance_handler.handle(req.into()).await?;

    tracing::debug!("Sending HTTP 200 response");
    Ok(Json(WebhookResponse::from(reply)))
}
