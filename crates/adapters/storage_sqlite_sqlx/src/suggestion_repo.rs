//! `SQLite` implementation of [`SuggestionRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sitehub_app::ports::SuggestionRepository;
use sitehub_domain::error::SiteError;
use sitehub_domain::id::{CommentId, SuggestionId};
use sitehub_domain::suggestion::{Comment, Suggestion, SuggestionStatus, SuggestionSummary};
use sitehub_domain::time::from_millis;

use crate::decode_error;
use crate::error::StorageError;

fn suggestion_from_row(row: &SqliteRow) -> Result<Suggestion, sqlx::Error> {
    let id: String = row.try_get("id")?;
    let timestamp: i64 = row.try_get("timestamp")?;
    let status: String = row.try_get("status")?;

    Ok(Suggestion {
        id: SuggestionId::from_str(&id).map_err(decode_error)?,
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        suggestion: row.try_get("suggestion")?,
        timestamp: from_millis(timestamp),
        status: SuggestionStatus::parse_lenient(&status),
    })
}

struct Wrapper(Suggestion);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        suggestion_from_row(row).map(Self)
    }
}

struct SummaryWrapper(SuggestionSummary);

impl<'r> FromRow<'r, SqliteRow> for SummaryWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let count: i64 = row.try_get("comment_count")?;
        Ok(Self(SuggestionSummary {
            suggestion: suggestion_from_row(row)?,
            comment_count: u64::try_from(count).map_err(decode_error)?,
        }))
    }
}

struct CommentWrapper(Comment);

impl CommentWrapper {
    fn maybe(value: Option<Self>) -> Option<Comment> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for CommentWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let suggestion_id: String = row.try_get("suggestion_id")?;
        let quoted_comment_id: Option<String> = row.try_get("quoted_comment_id")?;
        let timestamp: i64 = row.try_get("timestamp")?;

        Ok(Self(Comment {
            id: CommentId::from_str(&id).map_err(decode_error)?,
            suggestion_id: SuggestionId::from_str(&suggestion_id).map_err(decode_error)?,
            user_id: row.try_get("user_id")?,
            username: row.try_get("username")?,
            content: row.try_get("content")?,
            timestamp: from_millis(timestamp),
            quoted_comment_id: quoted_comment_id
                .map(|s| CommentId::from_str(&s))
                .transpose()
                .map_err(decode_error)?,
            quoted_username: row.try_get("quoted_username")?,
            quoted_content: row.try_get("quoted_content")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO suggestions (id, user_id, username, suggestion, timestamp, status)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM suggestions WHERE id = ?";
const SELECT_SUMMARIES: &str = r"
    SELECT s.*,
        (SELECT COUNT(*) FROM suggestion_comments c WHERE c.suggestion_id = s.id) AS comment_count
    FROM suggestions s
    ORDER BY s.timestamp DESC, s.rowid DESC
";
const SELECT_SUMMARIES_BY_USER: &str = r"
    SELECT s.*,
        (SELECT COUNT(*) FROM suggestion_comments c WHERE c.suggestion_id = s.id) AS comment_count
    FROM suggestions s
    WHERE s.user_id = ?
    ORDER BY s.timestamp DESC, s.rowid DESC
";
const UPDATE_STATUS: &str = "UPDATE suggestions SET status = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM suggestions WHERE id = ?";

const INSERT_COMMENT: &str = r"
    INSERT INTO suggestion_comments (id, suggestion_id, user_id, username, content, timestamp,
        quoted_comment_id, quoted_username, quoted_content)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_COMMENT: &str = "SELECT * FROM suggestion_comments WHERE id = ?";
const SELECT_COMMENTS: &str = r"
    SELECT * FROM suggestion_comments
    WHERE suggestion_id = ?
    ORDER BY timestamp ASC, rowid ASC
";
const DELETE_COMMENT: &str = "DELETE FROM suggestion_comments WHERE id = ?";
const DELETE_COMMENTS_OF: &str = "DELETE FROM suggestion_comments WHERE suggestion_id = ?";

/// `SQLite`-backed suggestion and comment repository.
#[derive(Clone)]
pub struct SqliteSuggestionRepository {
    pool: SqlitePool,
}

impl SqliteSuggestionRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SuggestionRepository for SqliteSuggestionRepository {
    async fn create(&self, suggestion: Suggestion) -> Result<Suggestion, SiteError> {
        sqlx::query(INSERT)
            .bind(suggestion.id.to_string())
            .bind(&suggestion.user_id)
            .bind(&suggestion.username)
            .bind(&suggestion.suggestion)
            .bind(suggestion.timestamp.timestamp_millis())
            .bind(suggestion.status.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(suggestion)
    }

    async fn get_by_id(&self, id: SuggestionId) -> Result<Option<Suggestion>, SiteError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn get_all(&self) -> Result<Vec<SuggestionSummary>, SiteError> {
        let rows: Vec<SummaryWrapper> = sqlx::query_as(SELECT_SUMMARIES)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<SuggestionSummary>, SiteError> {
        let rows: Vec<SummaryWrapper> = sqlx::query_as(SELECT_SUMMARIES_BY_USER)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update_status(
        &self,
        id: SuggestionId,
        status: SuggestionStatus,
    ) -> Result<bool, SiteError> {
        let result = sqlx::query(UPDATE_STATUS)
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: SuggestionId) -> Result<bool, SiteError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        sqlx::query(DELETE_COMMENTS_OF)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        tx.commit().await.map_err(StorageError::from)?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_comment(&self, comment: Comment) -> Result<Comment, SiteError> {
        sqlx::query(INSERT_COMMENT)
            .bind(comment.id.to_string())
            .bind(comment.suggestion_id.to_string())
            .bind(&comment.user_id)
            .bind(&comment.username)
            .bind(&comment.content)
            .bind(comment.timestamp.timestamp_millis())
            .bind(comment.quoted_comment_id.map(|id| id.to_string()))
            .bind(&comment.quoted_username)
            .bind(&comment.quoted_content)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(comment)
    }

    async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>, SiteError> {
        let row: Option<CommentWrapper> = sqlx::query_as(SELECT_COMMENT)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(CommentWrapper::maybe(row))
    }

    async fn find_comments(&self, suggestion: SuggestionId) -> Result<Vec<Comment>, SiteError> {
        let rows: Vec<CommentWrapper> = sqlx::query_as(SELECT_COMMENTS)
            .bind(suggestion.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<bool, SiteError> {
        let result = sqlx::query(DELETE_COMMENT)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::test_pool;

    async fn setup() -> SqliteSuggestionRepository {
        SqliteSuggestionRepository::new(test_pool().await)
    }

    fn suggestion_at(user: &str, millis: i64, text: &str) -> Suggestion {
        let mut s = Suggestion::new(user, user, text).unwrap();
        s.timestamp = from_millis(millis);
        s
    }

    #[tokio::test]
    async fn should_list_newest_first_with_comment_counts() {
        let repo = setup().await;
        let old = repo.create(suggestion_at("u-1", 1_000, "old")).await.unwrap();
        repo.create(suggestion_at("u-2", 2_000, "new")).await.unwrap();
        repo.create_comment(Comment::new(old.id, "u-3", "carol", "agree").unwrap())
            .await
            .unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all[0].suggestion.suggestion, "new");
        assert_eq!(all[0].comment_count, 0);
        assert_eq!(all[1].comment_count, 1);

        let mine = repo.find_by_user("u-1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].suggestion.id, old.id);
    }

    #[tokio::test]
    async fn should_update_status_of_existing_suggestion_only() {
        let repo = setup().await;
        let s = repo.create(suggestion_at("u-1", 1_000, "idea")).await.unwrap();

        assert!(repo.update_status(s.id, SuggestionStatus::Reviewed).await.unwrap());
        assert!(!repo
            .update_status(SuggestionId::new(), SuggestionStatus::Reviewed)
            .await
            .unwrap());

        let fetched = repo.get_by_id(s.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, SuggestionStatus::Reviewed);
    }

    #[tokio::test]
    async fn should_store_quoted_comment_fields() {
        let repo = setup().await;
        let s = repo.create(suggestion_at("u-1", 1_000, "idea")).await.unwrap();
        let first = repo
            .create_comment(Comment::new(s.id, "u-2", "bob", "first").unwrap())
            .await
            .unwrap();
        let mut reply = Comment::new(s.id, "u-3", "carol", "reply").unwrap();
        reply.quote(&first);
        repo.create_comment(reply.clone()).await.unwrap();

        let fetched = repo.get_comment(reply.id).await.unwrap().unwrap();
        assert_eq!(fetched.quoted_comment_id, Some(first.id));
        assert_eq!(fetched.quoted_content.as_deref(), Some("first"));

        let thread = repo.find_comments(s.id).await.unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].id, first.id);
    }

    #[tokio::test]
    async fn should_cascade_comments_when_deleting_suggestion() {
        let repo = setup().await;
        let s = repo.create(suggestion_at("u-1", 1_000, "idea")).await.unwrap();
        let c = repo
            .create_comment(Comment::new(s.id, "u-2", "bob", "hi").unwrap())
            .await
            .unwrap();

        assert!(repo.delete(s.id).await.unwrap());
        assert!(repo.get_comment(c.id).await.unwrap().is_none());
        assert!(!repo.delete_comment(c.id).await.unwrap());
    }
}
