//! SQLite Message Store

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{MessageStorePort, RepositoryError};
use crate::domain::messaging::{Message, MessageId, UserId};

/// SQLite Message Store
pub struct SqliteMessageStore {
    pool: DbPool,
}

impl SqliteMessageStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct MessageRow {
    id: i64,
    sender: String,
    recipient: String,
    created_at: String,
    payload: String,
}

impl TryFrom<MessageRow> for Message {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Message {
            id: Some(row.id),
            sender: row.sender,
            recipient: row.recipient,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
            payload: row.payload,
        })
    }
}

/// 固定宽度的时间戳，保证按文本排序即按时间排序
fn timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[async_trait]
impl MessageStorePort for SqliteMessageStore {
    async fn find_recipient(&self, username: &str) -> Result<UserId, RepositoryError> {
        let user_id: Option<String> =
            sqlx::query_scalar("SELECT user_id FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        user_id.ok_or_else(|| RepositoryError::NotFound(format!("user {}", username)))
    }

    async fn list_messages(&self, user_id: &str) -> Result<Vec<Message>, RepositoryError> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id, sender, recipient, created_at, payload FROM messages WHERE recipient = ? ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Message::try_from).collect()
    }

    async fn get_message(&self, id: MessageId) -> Result<Message, RepositoryError> {
        let row: Option<MessageRow> = sqlx::query_as(
            "SELECT id, sender, recipient, created_at, payload FROM messages WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(Message::try_from)
            .transpose()?
            .ok_or_else(|| RepositoryError::NotFound(format!("message {}", id)))
    }

    async fn save_messages(&self, messages: &[Message]) -> Result<(), RepositoryError> {
        // 整批在一个事务中写入
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        for message in messages {
            sqlx::query(
                "INSERT INTO messages (sender, recipient, created_at, payload) VALUES (?, ?, ?, ?)",
            )
            .bind(&message.sender)
            .bind(&message.recipient)
            .bind(timestamp(&message.created_at))
            .bind(&message.payload)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = messages.len(), "Messages saved");
        Ok(())
    }

    async fn register_user(&self, user_id: &str, username: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                username = excluded.username
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(timestamp(&Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(username.to_string())
            }
            _ => RepositoryError::DatabaseError(e.to_string()),
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use chrono::{Duration, TimeZone};

    async fn store() -> SqliteMessageStore {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteMessageStore::new(pool)
    }

    #[tokio::test]
    async fn test_register_and_find_recipient() {
        let store = store().await;
        store.register_user("u1", "vasya").await.unwrap();

        assert_eq!(store.find_recipient("vasya").await.unwrap(), "u1");
        assert!(matches!(
            store.find_recipient("petya").await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_register_conflict() {
        let store = store().await;
        store.register_user("u1", "vasya").await.unwrap();

        let err = store.register_user("u2", "vasya").await.unwrap_err();
        assert!(err.is_conflict());

        // 同一用户重复注册同名不算冲突
        store.register_user("u1", "vasya").await.unwrap();
    }

    #[tokio::test]
    async fn test_rename_releases_old_username() {
        let store = store().await;
        store.register_user("u1", "vasya").await.unwrap();
        store.register_user("u1", "vasiliy").await.unwrap();

        assert!(store.find_recipient("vasya").await.is_err());
        store.register_user("u2", "vasya").await.unwrap();
        assert_eq!(store.find_recipient("vasya").await.unwrap(), "u2");
    }

    #[tokio::test]
    async fn test_save_list_get_round_trip() {
        let store = store().await;
        let base = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 0).unwrap();

        store
            .save_messages(&[
                Message::new("a", "u1", base + Duration::milliseconds(1500), "second"),
                Message::new("a", "u2", base, "other"),
                Message::new("b", "u1", base, "first"),
            ])
            .await
            .unwrap();

        let listed = store.list_messages("u1").await.unwrap();
        let payloads: Vec<&str> = listed.iter().map(|m| m.payload.as_str()).collect();
        assert_eq!(payloads, vec!["first", "second"]);
        assert_eq!(listed[1].created_at, base + Duration::milliseconds(1500));

        let fetched = store.get_message(listed[0].id.unwrap()).await.unwrap();
        assert_eq!(fetched.sender, "b");
        assert_eq!(fetched.recipient, "u1");
    }

    #[tokio::test]
    async fn test_failed_batch_saves_nothing() {
        let store = store().await;
        sqlx::query(
            r#"
            CREATE TRIGGER reject_boom BEFORE INSERT ON messages
            WHEN NEW.payload = 'boom'
            BEGIN
                SELECT RAISE(ABORT, 'boom');
            END
            "#,
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let now = Utc::now();
        let err = store
            .save_messages(&[
                Message::new("a", "u1", now, "ok"),
                Message::new("a", "u1", now, "boom"),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DatabaseError(_)));

        // 整批回滚，第一条也不应保存
        assert!(store.list_messages("u1").await.unwrap().is_empty());

        store
            .save_messages(&[Message::new("a", "u1", now, "ok")])
            .await
            .unwrap();
        assert_eq!(store.list_messages("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_message() {
        let store = store().await;
        assert!(matches!(
            store.get_message(404).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_empty_mailbox() {
        let store = store().await;
        assert!(store.list_messages("nobody").await.unwrap().is_empty());
    }
}
