//! # sitehub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `sitehub-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! Timestamps are stored as milliseconds since the Unix epoch so that
//! ordering happens in SQL.
//!
//! ## Dependency rule
//! Depends on `sitehub-app` (for port traits) and `sitehub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod activity_repo;
pub mod calendar_repo;
pub mod error;
pub mod game_repo;
pub mod message_repo;
pub mod note_repo;
pub mod pool;
pub mod profile_repo;
pub mod score_repo;
pub mod setting_repo;
pub mod suggestion_repo;
pub mod user_repo;
pub mod vocabulary_repo;

pub use activity_repo::SqliteActivityRepository;
pub use calendar_repo::SqliteCalendarConfigRepository;
pub use game_repo::SqliteGameStatusRepository;
pub use message_repo::SqliteMessageRepository;
pub use note_repo::SqliteNoteRepository;
pub use pool::{Config, Database};
pub use profile_repo::SqliteProfileRepository;
pub use score_repo::SqliteScoreRepository;
pub use setting_repo::SqliteSettingRepository;
pub use suggestion_repo::SqliteSuggestionRepository;
pub use user_repo::SqliteUserRepository;
pub use vocabulary_repo::SqliteVocabularyRepository;

/// Transaction holding the database write lock from its first statement.
///
/// Read-modify-write sequences run inside one so that concurrent writers
/// queue behind each other instead of overwriting each other's result.
async fn begin_write(
    pool: &sqlx::SqlitePool,
) -> Result<sqlx::Transaction<'static, sqlx::Sqlite>, error::StorageError> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

fn decode_error<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}
