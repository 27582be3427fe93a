//! Game service: mini-game switches and maze generation.

use sitehub_domain::admin::AdminLevel;
use sitehub_domain::error::{SiteError, require_text};
use sitehub_domain::game::GameStatus;
use sitehub_domain::maze::Maze;
use sitehub_domain::score::GAME_TYPE_MAX;

use crate::ports::GameStatusRepository;

pub struct GameService<R> {
    repo: R,
}

impl<R: GameStatusRepository + Send + Sync> GameService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Every stored switch, ordered by game.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_games(&self) -> Result<Vec<GameStatus>, SiteError> {
        self.repo.get_all().await
    }

    /// Switch of one game. Games never switched are enabled.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn game_status(&self, game_type: &str) -> Result<GameStatus, SiteError> {
        Ok(self
            .repo
            .get(game_type)
            .await?
            .unwrap_or_else(|| GameStatus::enabled(game_type)))
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code,
    /// [`SiteError::Validation`] for a blank game name, or a storage error.
    pub async fn toggle_game(
        &self,
        level: AdminLevel,
        game_type: &str,
    ) -> Result<GameStatus, SiteError> {
        level.require_admin()?;
        require_text("gameType", game_type, GAME_TYPE_MAX)?;
        let status = self.game_status(game_type).await?.toggled();
        self.save(status).await
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code,
    /// [`SiteError::Validation`] for a blank game name, or a storage error.
    pub async fn set_game_status(
        &self,
        level: AdminLevel,
        game_type: &str,
        enabled: bool,
    ) -> Result<GameStatus, SiteError> {
        level.require_admin()?;
        require_text("gameType", game_type, GAME_TYPE_MAX)?;
        self.save(GameStatus {
            game_type: game_type.to_string(),
            enabled,
        })
        .await
    }

    async fn save(&self, status: GameStatus) -> Result<GameStatus, SiteError> {
        let saved = self.repo.upsert(status).await?;
        tracing::info!(
            game_type = %saved.game_type,
            enabled = saved.enabled,
            "game switch changed"
        );
        Ok(saved)
    }

    /// Carve a fresh random maze.
    #[must_use]
    pub fn generate_maze(&self, width: usize, height: usize) -> Maze {
        Maze::generate(width, height, &mut rand::thread_rng())
    }
}
