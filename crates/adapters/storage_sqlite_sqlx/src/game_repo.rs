//! `SQLite` implementation of [`GameStatusRepository`].

use sqlx::SqlitePool;

use sitehub_app::ports::GameStatusRepository;
use sitehub_domain::error::SiteError;
use sitehub_domain::game::GameStatus;

use crate::error::StorageError;

const SELECT_BY_GAME: &str = "SELECT game_type, enabled FROM game_status WHERE game_type = ?";
const SELECT_ALL: &str = "SELECT game_type, enabled FROM game_status ORDER BY game_type";
const UPSERT: &str = r"
    INSERT INTO game_status (game_type, enabled) VALUES (?, ?)
    ON CONFLICT (game_type) DO UPDATE SET enabled = excluded.enabled
";

/// `SQLite`-backed game switch repository.
#[derive(Clone)]
pub struct SqliteGameStatusRepository {
    pool: SqlitePool,
}

impl SqliteGameStatusRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl GameStatusRepository for SqliteGameStatusRepository {
    async fn get(&self, game_type: &str) -> Result<Option<GameStatus>, SiteError> {
        let row: Option<(String, bool)> = sqlx::query_as(SELECT_BY_GAME)
            .bind(game_type)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|(game_type, enabled)| GameStatus { game_type, enabled }))
    }

    async fn get_all(&self) -> Result<Vec<GameStatus>, SiteError> {
        let rows: Vec<(String, bool)> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows
            .into_iter()
            .map(|(game_type, enabled)| GameStatus { game_type, enabled })
            .collect())
    }

    async fn upsert(&self, status: GameStatus) -> Result<GameStatus, SiteError> {
        sqlx::query(UPSERT)
            .bind(&status.game_type)
            .bind(status.enabled)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(status)
    }
}
