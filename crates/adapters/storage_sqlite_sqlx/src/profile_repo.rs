//! `SQLite` implementation of [`ProfileRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sitehub_app::ports::ProfileRepository;
use sitehub_domain::error::{SiteError, ValidationError};
use sitehub_domain::profile::{PrivacySettings, UserProfile, Visibility};
use sitehub_domain::time::{Timestamp, from_millis};

use crate::decode_error;
use crate::error::StorageError;

struct Wrapper(UserProfile);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let visibility: String = row.try_get("profile_visibility")?;
        let join_date: i64 = row.try_get("join_date")?;
        let last_active: i64 = row.try_get("last_active")?;

        Ok(Self(UserProfile {
            user_id: row.try_get("user_id")?,
            display_name: row.try_get("display_name")?,
            bio: row.try_get("bio")?,
            avatar_url: row.try_get("avatar_url")?,
            gender: row.try_get("gender")?,
            join_date: from_millis(join_date),
            last_active: from_millis(last_active),
            privacy: PrivacySettings {
                profile_visibility: Visibility::from_str(&visibility).map_err(decode_error)?,
                show_bio: row.try_get("show_bio")?,
                show_stats: row.try_get("show_stats")?,
                show_achievements: row.try_get("show_achievements")?,
                show_last_active: row.try_get("show_last_active")?,
            },
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO user_profiles (user_id, display_name, bio, avatar_url, gender, join_date,
        last_active, profile_visibility, show_bio, show_stats, show_achievements,
        show_last_active)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_USER: &str = "SELECT * FROM user_profiles WHERE user_id = ?";
const SELECT_PUBLIC: &str = r"
    SELECT * FROM user_profiles
    WHERE profile_visibility = 'public'
    ORDER BY display_name ASC, rowid ASC
";
const UPDATE: &str = r"
    UPDATE user_profiles
    SET display_name = ?, bio = ?, avatar_url = ?, gender = ?, last_active = ?,
        profile_visibility = ?, show_bio = ?, show_stats = ?, show_achievements = ?,
        show_last_active = ?
    WHERE user_id = ?
";
const TOUCH: &str = "UPDATE user_profiles SET last_active = ? WHERE user_id = ?";

const DELETE_PROFILE: &str = "DELETE FROM user_profiles WHERE user_id = ?";
const DELETE_STATS: &str = "DELETE FROM user_activity_stats WHERE user_id = ?";
const DELETE_ACHIEVEMENTS: &str = "DELETE FROM user_achievements WHERE user_id = ?";

/// Delete the profile of `user_id` with its stats and achievements inside `tx`.
///
/// Returns whether a profile row existed.
pub(crate) async fn delete_profile_rows(
    tx: &mut sqlx::Transaction<'static, sqlx::Sqlite>,
    user_id: &str,
) -> Result<bool, StorageError> {
    sqlx::query(DELETE_ACHIEVEMENTS)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query(DELETE_STATS)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    let result = sqlx::query(DELETE_PROFILE)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// `SQLite`-backed profile repository.
#[derive(Clone)]
pub struct SqliteProfileRepository {
    pool: SqlitePool,
}

impl SqliteProfileRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ProfileRepository for SqliteProfileRepository {
    async fn create(&self, profile: UserProfile) -> Result<UserProfile, SiteError> {
        let privacy = &profile.privacy;
        sqlx::query(INSERT)
            .bind(&profile.user_id)
            .bind(&profile.display_name)
            .bind(&profile.bio)
            .bind(&profile.avatar_url)
            .bind(&profile.gender)
            .bind(profile.join_date.timestamp_millis())
            .bind(profile.last_active.timestamp_millis())
            .bind(privacy.profile_visibility.as_str())
            .bind(privacy.show_bio)
            .bind(privacy.show_stats)
            .bind(privacy.show_achievements)
            .bind(privacy.show_last_active)
            .execute(&self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    SiteError::from(ValidationError::AlreadyExists {
                        entity: "Profile",
                        id: profile.user_id.clone(),
                    })
                }
                other => StorageError::from(other).into(),
            })?;

        Ok(profile)
    }

    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>, SiteError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_USER)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn find_public(&self) -> Result<Vec<UserProfile>, SiteError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_PUBLIC)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, profile: UserProfile) -> Result<UserProfile, SiteError> {
        let privacy = &profile.privacy;
        sqlx::query(UPDATE)
            .bind(&profile.display_name)
            .bind(&profile.bio)
            .bind(&profile.avatar_url)
            .bind(&profile.gender)
            .bind(profile.last_active.timestamp_millis())
            .bind(privacy.profile_visibility.as_str())
            .bind(privacy.show_bio)
            .bind(privacy.show_stats)
            .bind(privacy.show_achievements)
            .bind(privacy.show_last_active)
            .bind(&profile.user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(profile)
    }

    async fn touch(&self, user_id: &str, at: Timestamp) -> Result<bool, SiteError> {
        let result = sqlx::query(TOUCH)
            .bind(at.timestamp_millis())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, user_id: &str) -> Result<bool, SiteError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
        let removed = delete_profile_rows(&mut tx, user_id).await?;
        tx.commit().await.map_err(StorageError::from)?;
        Ok(removed)
    }
}
