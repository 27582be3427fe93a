//! `SQLite` implementation of [`ScoreRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sitehub_app::ports::ScoreRepository;
use sitehub_domain::error::SiteError;
use sitehub_domain::id::ScoreId;
use sitehub_domain::score::{Ranking, Score, Submission};
use sitehub_domain::time::from_millis;

use crate::error::StorageError;
use crate::{begin_write, decode_error};

struct Wrapper(Score);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let timestamp: i64 = row.try_get("timestamp")?;

        Ok(Self(Score {
            id: ScoreId::from_str(&id).map_err(decode_error)?,
            user_id: row.try_get("user_id")?,
            username: row.try_get("username")?,
            game_type: row.try_get("game_type")?,
            score: row.try_get("score")?,
            timestamp: from_millis(timestamp),
            attempts: row.try_get("attempts")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO scores (id, user_id, username, game_type, score, timestamp, attempts)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

// zero is "no result" for ascending games and sorts last
const SELECT_TOP_ASCENDING: &str = r"
    SELECT * FROM scores
    WHERE game_type = ?
    ORDER BY CASE WHEN score = 0 THEN 1 ELSE 0 END, score ASC, timestamp ASC
    LIMIT ?
";
const SELECT_TOP_DESCENDING: &str = r"
    SELECT * FROM scores
    WHERE game_type = ?
    ORDER BY score DESC, timestamp ASC
    LIMIT ?
";

const SELECT_BY_PLAYER: &str = "SELECT * FROM scores WHERE user_id = ? AND game_type = ?";
const SELECT_ALL: &str = "SELECT * FROM scores ORDER BY timestamp ASC";
const DELETE_BY_PLAYER: &str = "DELETE FROM scores WHERE user_id = ? AND game_type = ?";
const DELETE_BY_ID: &str = "DELETE FROM scores WHERE id = ?";
const DELETE_BY_GAME: &str = "DELETE FROM scores WHERE game_type = ?";

/// `SQLite`-backed score repository.
#[derive(Clone)]
pub struct SqliteScoreRepository {
    pool: SqlitePool,
}

impl SqliteScoreRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ScoreRepository for SqliteScoreRepository {
    async fn top_for_game(
        &self,
        game_type: &str,
        ranking: Ranking,
        limit: usize,
    ) -> Result<Vec<Score>, SiteError> {
        let sql = match ranking {
            Ranking::Ascending => SELECT_TOP_ASCENDING,
            Ranking::Descending => SELECT_TOP_DESCENDING,
        };
        let rows: Vec<Wrapper> = sqlx::query_as(sql)
            .bind(game_type)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_user_and_game(
        &self,
        user_id: &str,
        game_type: &str,
    ) -> Result<Vec<Score>, SiteError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_PLAYER)
            .bind(user_id)
            .bind(game_type)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn submit_if_better(
        &self,
        score: Score,
        ranking: Ranking,
    ) -> Result<Submission, SiteError> {
        let mut tx = begin_write(&self.pool).await?;

        let existing: Vec<Wrapper> = sqlx::query_as(SELECT_BY_PLAYER)
            .bind(&score.user_id)
            .bind(&score.game_type)
            .fetch_all(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        let existing: Vec<Score> = existing.into_iter().map(|w| w.0).collect();

        let outcome = Submission::judge(ranking, &existing, score.score);
        if !outcome.new_high_score {
            tx.rollback().await.map_err(StorageError::from)?;
            return Ok(outcome);
        }

        sqlx::query(DELETE_BY_PLAYER)
            .bind(&score.user_id)
            .bind(&score.game_type)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        sqlx::query(INSERT)
            .bind(score.id.to_string())
            .bind(&score.user_id)
            .bind(&score.username)
            .bind(&score.game_type)
            .bind(score.score)
            .bind(score.timestamp.timestamp_millis())
            .bind(score.attempts)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        tx.commit().await.map_err(StorageError::from)?;
        Ok(outcome)
    }

    async fn get_all(&self) -> Result<Vec<Score>, SiteError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn delete(&self, id: ScoreId) -> Result<bool, SiteError> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_game(&self, game_type: &str) -> Result<u64, SiteError> {
        let result = sqlx::query(DELETE_BY_GAME)
            .bind(game_type)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected())
    }

    async fn delete_many(&self, ids: Vec<ScoreId>) -> Result<u64, SiteError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
        let mut removed = 0;
        for id in ids {
            removed += sqlx::query(DELETE_BY_ID)
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?
                .rows_affected();
        }
        tx.commit().await.map_err(StorageError::from)?;
        Ok(removed)
    }
}
