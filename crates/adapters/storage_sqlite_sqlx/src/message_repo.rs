//! `SQLite` implementation of [`MessageRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sitehub_app::ports::MessageRepository;
use sitehub_domain::error::SiteError;
use sitehub_domain::id::MessageId;
use sitehub_domain::message::{Message, Reaction, ReactionChange};
use sitehub_domain::time::from_millis;

use crate::error::StorageError;
use crate::{begin_write, decode_error};

/// Wrapper for converting database rows into domain [`Message`].
struct Wrapper(Message);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Message> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let quoted_message_id: Option<String> = row.try_get("quoted_message_id")?;
        let reactions_json: String = row.try_get("reactions")?;
        let timestamp: i64 = row.try_get("timestamp")?;

        let id = MessageId::from_str(&id).map_err(decode_error)?;
        let quoted_message_id = quoted_message_id
            .map(|s| MessageId::from_str(&s))
            .transpose()
            .map_err(decode_error)?;
        let reactions: Vec<Reaction> =
            serde_json::from_str(&reactions_json).map_err(decode_error)?;

        Ok(Self(Message {
            id,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            message: row.try_get("message")?,
            timestamp: from_millis(timestamp),
            is_anonymous: row.try_get("is_anonymous")?,
            is_verified: row.try_get("is_verified")?,
            quoted_message_id,
            quoted_name: row.try_get("quoted_name")?,
            quoted_message: row.try_get("quoted_message")?,
            channel_id: row.try_get("channel_id")?,
            reactions,
            image_url: row.try_get("image_url")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO messages (id, user_id, name, message, timestamp, is_anonymous, is_verified,
        quoted_message_id, quoted_name, quoted_message, channel_id, reactions, image_url)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM messages WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM messages ORDER BY timestamp ASC, rowid ASC";

const UPDATE_REACTIONS: &str = "UPDATE messages SET reactions = ? WHERE id = ?";

const DELETE_BY_ID: &str = "DELETE FROM messages WHERE id = ?";
const DELETE_ALL: &str = "DELETE FROM messages";

/// `SQLite`-backed message repository.
#[derive(Clone)]
pub struct SqliteMessageRepository {
    pool: SqlitePool,
}

impl SqliteMessageRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl MessageRepository for SqliteMessageRepository {
    async fn create(&self, message: Message) -> Result<Message, SiteError> {
        let reactions = serde_json::to_string(&message.reactions).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(message.id.to_string())
            .bind(&message.user_id)
            .bind(&message.name)
            .bind(&message.message)
            .bind(message.timestamp.timestamp_millis())
            .bind(message.is_anonymous)
            .bind(message.is_verified)
            .bind(message.quoted_message_id.map(|id| id.to_string()))
            .bind(&message.quoted_name)
            .bind(&message.quoted_message)
            .bind(&message.channel_id)
            .bind(&reactions)
            .bind(&message.image_url)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(message)
    }

    async fn get_by_id(&self, id: MessageId) -> Result<Option<Message>, SiteError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Message>, SiteError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn change_reaction(
        &self,
        id: MessageId,
        change: ReactionChange,
    ) -> Result<Option<(Message, bool)>, SiteError> {
        let mut tx = begin_write(&self.pool).await?;

        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        let Some(Wrapper(mut message)) = row else {
            tx.rollback().await.map_err(StorageError::from)?;
            return Ok(None);
        };

        let changed = message.apply_reaction(&change);
        if changed {
            let reactions =
                serde_json::to_string(&message.reactions).map_err(StorageError::from)?;
            sqlx::query(UPDATE_REACTIONS)
                .bind(&reactions)
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }

        tx.commit().await.map_err(StorageError::from)?;
        Ok(Some((message, changed)))
    }

    async fn delete(&self, id: MessageId) -> Result<bool, SiteError> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64, SiteError> {
        let result = sqlx::query(DELETE_ALL)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected())
    }
}
