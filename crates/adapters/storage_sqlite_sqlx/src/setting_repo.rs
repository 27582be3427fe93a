//! `SQLite` implementation of [`SettingRepository`].

use sqlx::SqlitePool;

use sitehub_app::ports::SettingRepository;
use sitehub_domain::error::SiteError;
use sitehub_domain::setting::SystemSetting;

use crate::error::StorageError;

type Row = (String, String, Option<String>);

fn into_setting((key, value, description): Row) -> SystemSetting {
    SystemSetting {
        key,
        value,
        description,
    }
}

const SELECT_BY_KEY: &str = "SELECT key, value, description FROM system_settings WHERE key = ?";
const SELECT_ALL: &str = "SELECT key, value, description FROM system_settings ORDER BY key";
const UPSERT: &str = r"
    INSERT INTO system_settings (key, value, description) VALUES (?, ?, ?)
    ON CONFLICT (key) DO UPDATE SET value = excluded.value, description = excluded.description
";
const INSERT_IF_ABSENT: &str =
    "INSERT OR IGNORE INTO system_settings (key, value, description) VALUES (?, ?, ?)";

/// `SQLite`-backed key/value settings.
#[derive(Clone)]
pub struct SqliteSettingRepository {
    pool: SqlitePool,
}

impl SqliteSettingRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SettingRepository for SqliteSettingRepository {
    async fn get(&self, key: &str) -> Result<Option<SystemSetting>, SiteError> {
        let row: Option<Row> = sqlx::query_as(SELECT_BY_KEY)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(into_setting))
    }

    async fn get_all(&self) -> Result<Vec<SystemSetting>, SiteError> {
        let rows: Vec<Row> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(into_setting).collect())
    }

    async fn upsert(&self, setting: SystemSetting) -> Result<SystemSetting, SiteError> {
        sqlx::query(UPSERT)
            .bind(&setting.key)
            .bind(&setting.value)
            .bind(&setting.description)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(setting)
    }

    async fn insert_if_absent(&self, setting: SystemSetting) -> Result<bool, SiteError> {
        let result = sqlx::query(INSERT_IF_ABSENT)
            .bind(&setting.key)
            .bind(&setting.value)
            .bind(&setting.description)
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
    use sitehub_domain::setting::CHAT_MUTED;

    #[tokio::test]
    async fn should_not_overwrite_existing_value_when_seeding() {
        let repo = SqliteSettingRepository::new(test_pool().await);
        repo.upsert(SystemSetting::new(CHAT_MUTED, "true", None).unwrap())
            .await
            .unwrap();

        let inserted = repo
            .insert_if_absent(SystemSetting::new(CHAT_MUTED, "false", Some("wall")).unwrap())
            .await
            .unwrap();
        assert!(!inserted);
        assert_eq!(repo.get(CHAT_MUTED).await.unwrap().unwrap().value, "true");
    }

    #[tokio::test]
    async fn should_list_settings_by_key() {
        let repo = SqliteSettingRepository::new(test_pool().await);
        repo.upsert(SystemSetting::new("b", "2", None).unwrap())
            .await
            .unwrap();
        repo.upsert(SystemSetting::new("a", "1", Some("first")).unwrap())
            .await
            .unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all[0].key, "a");
        assert_eq!(all[0].description.as_deref(), Some("first"));
        assert_eq!(all[1].key, "b");
        assert!(repo.get("missing").await.unwrap().is_none());
    }
}
