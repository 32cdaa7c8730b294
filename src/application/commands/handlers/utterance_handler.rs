//! Utterance Handler - 指令分发
//!
//! 每次请求同步执行一次：分类指令、访问存储或投递消息、生成回复。
//! Handler 自身不持有可变共享状态，可被任意多个请求并发调用。

use std::sync::Arc;

use crate::application::commands::utterance_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{Clock, MessageStorePort, OutboxPort};
use crate::domain::messaging::{greeting_prefix, replies, resolve_timezone, Intent, Message};

/// Utterance Handler
pub struct UtteranceHandler {
    store: Arc<dyn MessageStorePort>,
    outbox: Arc<dyn OutboxPort>,
    clock: Arc<dyn Clock>,
}

impl UtteranceHandler {
    pub fn new(
        store: Arc<dyn MessageStorePort>,
        outbox: Arc<dyn OutboxPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            outbox,
            clock,
        }
    }

    pub async fn handle(&self, cmd: UtteranceCommand) -> Result<Reply, ApplicationError> {
        if cmd.request_type != SIMPLE_UTTERANCE {
            tracing::debug!(request_type = %cmd.request_type, "Unsupported request type");
            return Err(ApplicationError::UnsupportedRequestType(cmd.request_type));
        }

        let intent = Intent::classify(&cmd.command);
        tracing::debug!(
            user_id = %cmd.user_id,
            intent = intent.name(),
            "Utterance classified"
        );

        let text = match intent {
            Intent::Send { username, text } => self.send(&cmd.user_id, &username, text).await?,
            Intent::Read { index } => self.read(&cmd.user_id, index).await?,
            Intent::Register { username } => self.register(&cmd.user_id, &username).await?,
            Intent::Summary => self.summary(&cmd).await?,
        };

        Ok(Reply::new(text))
    }

    /// 解析收件人并投递消息，不等待持久化
    async fn send(
        &self,
        sender: &str,
        username: &str,
        payload: String,
    ) -> Result<String, ApplicationError> {
        let recipient = self.store.find_recipient(username).await.map_err(|e| {
            tracing::warn!(username = %username, error = %e, "Cannot find recipient by username");
            ApplicationError::from(e)
        })?;

        let message = Message::new(sender, recipient, self.clock.now(), payload);
        self.outbox.enqueue(message).map_err(|e| {
            tracing::warn!(sender = %sender, error = %e, "Cannot enqueue message");
            ApplicationError::from(e)
        })?;

        tracing::debug!(sender = %sender, username = %username, "Message enqueued");
        Ok(replies::MESSAGE_SENT.to_string())
    }

    /// 读取第 index 条消息（从 0 开始）
    async fn read(&self, user_id: &str, index: usize) -> Result<String, ApplicationError> {
        let messages = self.store.list_messages(user_id).await.map_err(|e| {
            tracing::warn!(user_id = %user_id, error = %e, "Cannot load messages for user");
            ApplicationError::from(e)
        })?;

        let Some(listed) = messages.get(index) else {
            tracing::debug!(
                user_id = %user_id,
                index = index,
                total = messages.len(),
                "Requested message does not exist"
            );
            return Ok(replies::NO_SUCH_MESSAGE.to_string());
        };

        let id = listed.id.ok_or_else(|| {
            ApplicationError::internal(format!("Listed message #{} has no id", index))
        })?;

        let message = self.store.get_message(id).await.map_err(|e| {
            tracing::warn!(message_id = id, error = %e, "Cannot load message");
            ApplicationError::from(e)
        })?;

        Ok(replies::render_message(&message))
    }

    /// 注册用户名；用户名冲突是正常回复而不是错误
    async fn register(&self, user_id: &str, username: &str) -> Result<String, ApplicationError> {
        match self.store.register_user(user_id, username).await {
            Ok(()) => {
                tracing::info!(user_id = %user_id, username = %username, "User registered");
                Ok(replies::registered(username))
            }
            Err(e) if e.is_conflict() => {
                tracing::debug!(username = %username, "Username already taken");
                Ok(replies::NAME_TAKEN.to_string())
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Cannot register user");
                Err(e.into())
            }
        }
    }

    /// 报告新消息数量；会话首轮时附加当地时间问候
    async fn summary(&self, cmd: &UtteranceCommand) -> Result<String, ApplicationError> {
        let messages = self.store.list_messages(&cmd.user_id).await.map_err(|e| {
            tracing::warn!(user_id = %cmd.user_id, error = %e, "Cannot load messages for user");
            ApplicationError::from(e)
        })?;

        let text = replies::message_count(messages.len());
        if !cmd.new_session {
            return Ok(text);
        }

        let tz = resolve_timezone(&cmd.timezone).map_err(|e| {
            tracing::debug!(timezone = %cmd.timezone, "Cannot parse timezone");
            ApplicationError::from(e)
        })?;

        Ok(format!("{}{}", greeting_prefix(self.clock.now(), tz), text))
    }
}
