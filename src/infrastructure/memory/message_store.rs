//! In-Memory Message Store Implementation
//!
//! 单进程开发环境使用的存储后端；与 SQLite 实现语义一致，重启后数据丢失

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use crate::application::ports::{MessageStorePort, RepositoryError};
use crate::domain::messaging::{Message, MessageId, UserId};

/// 内存消息存储
pub struct InMemoryMessageStore {
    /// username -> user_id
    users: DashMap<String, UserId>,
    /// user_id -> username，注册时按用户加锁
    names: DashMap<UserId, String>,
    /// message_id -> Message
    messages: DashMap<MessageId, Message>,
    next_id: AtomicI64,
    /// 模拟存储故障：为 true 时所有操作返回 DatabaseError
    unavailable: AtomicBool,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            names: DashMap::new(),
            messages: DashMap::new(),
            next_id: AtomicI64::new(1),
            unavailable: AtomicBool::new(false),
        }
    }

    /// 切换故障模拟
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::DatabaseError(
                "store is unavailable".to_string(),
            ));
        }
        Ok(())
    }

    /// 占用用户名；已被其他用户占用时返回 Conflict
    fn claim_username(&self, user_id: &str, username: &str) -> Result<(), RepositoryError> {
        match self.users.entry(username.to_string()) {
            Entry::Occupied(owner) if owner.get() != user_id => {
                Err(RepositoryError::Conflict(username.to_string()))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(entry) => {
                entry.insert(user_id.to_string());
                Ok(())
            }
        }
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStorePort for InMemoryMessageStore {
    async fn find_recipient(&self, username: &str) -> Result<UserId, RepositoryError> {
        self.check_available()?;
        self.users
            .get(username)
            .map(|id| id.clone())
            .ok_or_else(|| RepositoryError::NotFound(format!("user {}", username)))
    }

    async fn list_messages(&self, user_id: &str) -> Result<Vec<Message>, RepositoryError> {
        self.check_available()?;
        let mut messages: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| m.recipient == user_id)
            .map(|m| m.value().clone())
            .collect();
        messages.sort_by_key(|m| (m.created_at, m.id));
        Ok(messages)
    }

    async fn get_message(&self, id: MessageId) -> Result<Message, RepositoryError> {
        self.check_available()?;
        self.messages
            .get(&id)
            .map(|m| m.clone())
            .ok_or_else(|| RepositoryError::NotFound(format!("message {}", id)))
    }

    async fn save_messages(&self, messages: &[Message]) -> Result<(), RepositoryError> {
        self.check_available()?;
        for message in messages {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.messages.insert(id, message.clone().with_id(id));
        }
        tracing::debug!(count = messages.len(), "Messages saved");
        Ok(())
    }

    async fn register_user(&self, user_id: &str, username: &str) -> Result<(), RepositoryError> {
        self.check_available()?;
        // 整个注册过程持有该用户的 entry，同一用户的并发注册串行执行
        match self.names.entry(user_id.to_string()) {
            Entry::Occupied(mut current) => {
                if current.get() == username {
                    return Ok(());
                }
                self.claim_username(user_id, username)?;
                // 一个用户只保留一个用户名
                self.users.remove(current.get());
                current.insert(username.to_string());
            }
            Entry::Vacant(slot) => {
                self.claim_username(user_id, username)?;
                slot.insert(username.to_string());
            }
        }

        tracing::debug!(user_id = %user_id, username = %username, "User registered");
        Ok(())
    }
}
