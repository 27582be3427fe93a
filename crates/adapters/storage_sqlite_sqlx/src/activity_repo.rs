//! `SQLite` implementation of [`ActivityRepository`].

use std::collections::BTreeMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sitehub_app::ports::ActivityRepository;
use sitehub_domain::activity::{ActivityEvent, ActivityStats, UnlockRecord};
use sitehub_domain::error::SiteError;
use sitehub_domain::time::{Timestamp, from_millis};

use crate::error::StorageError;
use crate::{begin_write, decode_error};

struct StatsRow(ActivityStats);

impl<'r> FromRow<'r, SqliteRow> for StatsRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let best_scores: String = row.try_get("best_scores")?;
        let best_scores: BTreeMap<String, i64> =
            serde_json::from_str(&best_scores).map_err(decode_error)?;
        let last_updated: Option<i64> = row.try_get("last_updated")?;

        Ok(Self(ActivityStats {
            user_id: row.try_get("user_id")?,
            total_messages: row.try_get("total_messages")?,
            total_games_played: row.try_get("total_games_played")?,
            best_scores,
            current_streak: row.try_get("current_streak")?,
            longest_streak: row.try_get("longest_streak")?,
            last_active_day: row.try_get("last_active_day")?,
            last_updated: last_updated.map(from_millis),
        }))
    }
}

struct UnlockRow(UnlockRecord);

impl<'r> FromRow<'r, SqliteRow> for UnlockRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let unlocked_at: i64 = row.try_get("unlocked_at")?;
        Ok(Self(UnlockRecord {
            achievement_id: row.try_get("achievement_id")?,
            unlocked_at: from_millis(unlocked_at),
        }))
    }
}

const SELECT_STATS: &str = "SELECT * FROM user_activity_stats WHERE user_id = ?";
const UPSERT_STATS: &str = r"
    INSERT INTO user_activity_stats (user_id, total_messages, total_games_played, best_scores,
        current_streak, longest_streak, last_active_day, last_updated)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT (user_id) DO UPDATE SET
        total_messages = excluded.total_messages,
        total_games_played = excluded.total_games_played,
        best_scores = excluded.best_scores,
        current_streak = excluded.current_streak,
        longest_streak = excluded.longest_streak,
        last_active_day = excluded.last_active_day,
        last_updated = excluded.last_updated
";

const SELECT_UNLOCKED: &str = r"
    SELECT achievement_id, unlocked_at FROM user_achievements
    WHERE user_id = ?
    ORDER BY unlocked_at ASC, rowid ASC
";
const INSERT_UNLOCK: &str = r"
    INSERT OR IGNORE INTO user_achievements (user_id, achievement_id, unlocked_at)
    VALUES (?, ?, ?)
";

/// `SQLite`-backed activity stats and achievement store.
#[derive(Clone)]
pub struct SqliteActivityRepository {
    pool: SqlitePool,
}

impl SqliteActivityRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ActivityRepository for SqliteActivityRepository {
    async fn get_stats(&self, user_id: &str) -> Result<Option<ActivityStats>, SiteError> {
        let row: Option<StatsRow> = sqlx::query_as(SELECT_STATS)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|r| r.0))
    }

    async fn record(
        &self,
        user_id: &str,
        event: ActivityEvent,
        at: Timestamp,
    ) -> Result<ActivityStats, SiteError> {
        let mut tx = begin_write(&self.pool).await?;

        let row: Option<StatsRow> = sqlx::query_as(SELECT_STATS)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        let mut stats = row.map_or_else(|| ActivityStats::empty(user_id), |r| r.0);
        stats.apply(&event, at);

        let best_scores = serde_json::to_string(&stats.best_scores).map_err(StorageError::from)?;
        sqlx::query(UPSERT_STATS)
            .bind(&stats.user_id)
            .bind(stats.total_messages)
            .bind(stats.total_games_played)
            .bind(&best_scores)
            .bind(stats.current_streak)
            .bind(stats.longest_streak)
            .bind(stats.last_active_day)
            .bind(stats.last_updated.map(|ts| ts.timestamp_millis()))
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        tx.commit().await.map_err(StorageError::from)?;
        Ok(stats)
    }

    async fn unlocked(&self, user_id: &str) -> Result<Vec<UnlockRecord>, SiteError> {
        let rows: Vec<UnlockRow> = sqlx::query_as(SELECT_UNLOCKED)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn unlock(
        &self,
        user_id: &str,
        achievement_ids: Vec<&'static str>,
        at: Timestamp,
    ) -> Result<u64, SiteError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let mut inserted = 0;
        for id in achievement_ids {
            let result = sqlx::query(INSERT_UNLOCK)
                .bind(user_id)
                .bind(id)
                .bind(at.timestamp_millis())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(StorageError::from)?;
        Ok(inserted)
    }
}
