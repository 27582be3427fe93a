//! `SQLite` implementation of [`UserRepository`] and [`FavoriteRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sitehub_app::ports::{FavoriteRepository, UserRepository};
use sitehub_domain::error::{SiteError, ValidationError};
use sitehub_domain::id::UserId;
use sitehub_domain::time::from_millis;
use sitehub_domain::user::{Language, User};

use crate::decode_error;
use crate::error::StorageError;
use crate::profile_repo::delete_profile_rows;

struct Wrapper(User);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<User> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let language: String = row.try_get("preferred_language")?;
        let created_at: i64 = row.try_get("created_at")?;

        Ok(Self(User {
            id: UserId::from_str(&id).map_err(decode_error)?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            preferred_language: Language::from_str(&language).map_err(decode_error)?,
            created_at: from_millis(created_at),
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO users (id, username, password_hash, preferred_language, created_at)
    VALUES (?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM users WHERE id = ?";
const SELECT_BY_USERNAME: &str = "SELECT * FROM users WHERE username = ?";
const SELECT_ALL: &str = "SELECT * FROM users ORDER BY created_at ASC, rowid ASC";
const UPDATE: &str =
    "UPDATE users SET username = ?, password_hash = ?, preferred_language = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM users WHERE id = ?";

const SELECT_FAVORITES: &str =
    "SELECT item_id FROM vocabulary_favorites WHERE user_id = ? ORDER BY rowid ASC";
const INSERT_FAVORITE: &str =
    "INSERT OR IGNORE INTO vocabulary_favorites (user_id, item_id) VALUES (?, ?)";
const DELETE_FAVORITE: &str = "DELETE FROM vocabulary_favorites WHERE user_id = ? AND item_id = ?";
const DELETE_FAVORITES_OF_USER: &str = "DELETE FROM vocabulary_favorites WHERE user_id = ?";

/// `SQLite`-backed account repository. Also stores vocabulary favorites,
/// which belong to an account.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: User) -> Result<User, SiteError> {
        sqlx::query(INSERT)
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.preferred_language.as_str())
            .bind(user.created_at.timestamp_millis())
            .execute(&self.pool)
            .await
            .map_err(|err| match err {
                // two registrations raced past the username check
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    SiteError::from(ValidationError::UsernameTaken)
                }
                other => StorageError::from(other).into(),
            })?;

        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, SiteError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, SiteError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_USERNAME)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<User>, SiteError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, user: User) -> Result<User, SiteError> {
        sqlx::query(UPDATE)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.preferred_language.as_str())
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<bool, SiteError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        sqlx::query(DELETE_FAVORITES_OF_USER)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        delete_profile_rows(&mut tx, &id.to_string()).await?;
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        tx.commit().await.map_err(StorageError::from)?;
        Ok(result.rows_affected() > 0)
    }
}

impl FavoriteRepository for SqliteUserRepository {
    async fn get_favorites(&self, user: UserId) -> Result<Vec<i64>, SiteError> {
        let rows: Vec<(i64,)> = sqlx::query_as(SELECT_FAVORITES)
            .bind(user.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn add_favorite(&self, user: UserId, item: i64) -> Result<(), SiteError> {
        sqlx::query(INSERT_FAVORITE)
            .bind(user.to_string())
            .bind(item)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn remove_favorite(&self, user: UserId, item: i64) -> Result<(), SiteError> {
        sqlx::query(DELETE_FAVORITE)
            .bind(user.to_string())
            .bind(item)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
