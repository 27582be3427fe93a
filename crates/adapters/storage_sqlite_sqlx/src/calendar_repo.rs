//! `SQLite` implementation of [`CalendarConfigRepository`].

use sqlx::SqlitePool;

use sitehub_app::ports::CalendarConfigRepository;
use sitehub_domain::calendar::{CalendarConfig, Zone};
use sitehub_domain::error::SiteError;

use crate::error::StorageError;

const SELECT: &str = "SELECT active_zones FROM calendar_config WHERE id = 1";
const UPSERT: &str = r"
    INSERT INTO calendar_config (id, active_zones) VALUES (1, ?)
    ON CONFLICT (id) DO UPDATE SET active_zones = excluded.active_zones
";

/// `SQLite`-backed calendar configuration, stored as a single row.
#[derive(Clone)]
pub struct SqliteCalendarConfigRepository {
    pool: SqlitePool,
}

impl SqliteCalendarConfigRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl CalendarConfigRepository for SqliteCalendarConfigRepository {
    async fn get(&self) -> Result<Option<CalendarConfig>, SiteError> {
        let row: Option<(String,)> = sqlx::query_as(SELECT)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let Some((zones,)) = row else {
            return Ok(None);
        };
        let active_zones: Vec<Zone> = serde_json::from_str(&zones).map_err(StorageError::from)?;
        Ok(Some(CalendarConfig { active_zones }))
    }

    async fn save(&self, config: CalendarConfig) -> Result<CalendarConfig, SiteError> {
        let zones = serde_json::to_string(&config.active_zones).map_err(StorageError::from)?;

        sqlx::query(UPSERT)
            .bind(zones)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(config)
    }
}
