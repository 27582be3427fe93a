//! `SQLite` implementation of [`VocabularyRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sitehub_app::ports::VocabularyRepository;
use sitehub_domain::error::SiteError;
use sitehub_domain::vocabulary::VocabularyItem;

use crate::error::StorageError;

struct Wrapper(VocabularyItem);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(VocabularyItem {
            id: row.try_get("id")?,
            expression: row.try_get("expression")?,
            meaning: row.try_get("meaning")?,
            meaning_en: row.try_get("meaning_en")?,
            meaning_zh: row.try_get("meaning_zh")?,
            example: row.try_get("example")?,
            level: row.try_get("level")?,
        }))
    }
}

const SELECT_ALL: &str = "SELECT * FROM vocabulary ORDER BY id ASC";
const UPSERT: &str = r"
    INSERT OR REPLACE INTO vocabulary
        (id, expression, meaning, meaning_en, meaning_zh, example, level)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

/// `SQLite`-backed vocabulary list.
#[derive(Clone)]
pub struct SqliteVocabularyRepository {
    pool: SqlitePool,
}

impl SqliteVocabularyRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl VocabularyRepository for SqliteVocabularyRepository {
    async fn get_all(&self) -> Result<Vec<VocabularyItem>, SiteError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn upsert_many(&self, items: Vec<VocabularyItem>) -> Result<u64, SiteError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
        let mut written = 0;
        for item in &items {
            written += sqlx::query(UPSERT)
                .bind(item.id)
                .bind(&item.expression)
                .bind(&item.meaning)
                .bind(&item.meaning_en)
                .bind(&item.meaning_zh)
                .bind(&item.example)
                .bind(&item.level)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?
                .rows_affected();
        }
        tx.commit().await.map_err(StorageError::from)?;

        tracing::debug!(count = written, "vocabulary items written");
        Ok(written)
    }
}
