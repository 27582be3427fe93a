//! `SQLite` implementation of [`NoteRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sitehub_app::ports::NoteRepository;
use sitehub_domain::error::SiteError;
use sitehub_domain::id::NoteId;
use sitehub_domain::note::Note;
use sitehub_domain::time::from_millis;

use crate::decode_error;
use crate::error::StorageError;

struct Wrapper(Note);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Note> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let created_at: i64 = row.try_get("created_at")?;
        let updated_at: Option<i64> = row.try_get("updated_at")?;

        Ok(Self(Note {
            id: NoteId::from_str(&id).map_err(decode_error)?,
            user_id: row.try_get("user_id")?,
            username: row.try_get("username")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            color: row.try_get("color")?,
            created_at: from_millis(created_at),
            updated_at: updated_at.map(from_millis),
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO notes (id, user_id, username, title, content, color, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM notes WHERE id = ?";
const SELECT_BY_USER: &str =
    "SELECT * FROM notes WHERE user_id = ? ORDER BY created_at DESC, rowid DESC";
const SELECT_ALL: &str = "SELECT * FROM notes ORDER BY created_at DESC, rowid DESC";
const UPDATE: &str =
    "UPDATE notes SET title = ?, content = ?, color = ?, updated_at = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM notes WHERE id = ?";

/// `SQLite`-backed note repository.
#[derive(Clone)]
pub struct SqliteNoteRepository {
    pool: SqlitePool,
}

impl SqliteNoteRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl NoteRepository for SqliteNoteRepository {
    async fn create(&self, note: Note) -> Result<Note, SiteError> {
        sqlx::query(INSERT)
            .bind(note.id.to_string())
            .bind(&note.user_id)
            .bind(&note.username)
            .bind(&note.title)
            .bind(&note.content)
            .bind(&note.color)
            .bind(note.created_at.timestamp_millis())
            .bind(note.updated_at.map(|at| at.timestamp_millis()))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(note)
    }

    async fn get_by_id(&self, id: NoteId) -> Result<Option<Note>, SiteError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Note>, SiteError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_USER)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn get_all(&self) -> Result<Vec<Note>, SiteError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, note: Note) -> Result<Note, SiteError> {
        sqlx::query(UPDATE)
            .bind(&note.title)
            .bind(&note.content)
            .bind(&note.color)
            .bind(note.updated_at.map(|at| at.timestamp_millis()))
            .bind(note.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(note)
    }

    async fn delete(&self, id: NoteId) -> Result<bool, SiteError> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }
}
