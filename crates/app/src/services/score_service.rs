//! Score service: leaderboards, personal bests and score maintenance.

use sitehub_domain::admin::AdminLevel;
use sitehub_domain::error::{NotFoundError, SiteError};
use sitehub_domain::id::ScoreId;
use sitehub_domain::score::{
    DuplicateReport, LEADERBOARD_SCAN, Ranking, Score, Submission, leaderboard, redundant_scores,
};

use crate::ports::ScoreRepository;

/// Application service for leaderboard scores.
pub struct ScoreService<R> {
    repo: R,
}

impl<R: ScoreRepository + Send + Sync> ScoreService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Top entries of a game, one per player.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn top_scores(&self, game_type: &str) -> Result<Vec<Score>, SiteError> {
        let ranking = Ranking::for_game(game_type);
        let scanned = self
            .repo
            .top_for_game(game_type, ranking, LEADERBOARD_SCAN)
            .await?;
        Ok(leaderboard(scanned, ranking))
    }

    /// Personal best of a player, or a zero placeholder when they never played.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn best_score(&self, user_id: &str, game_type: &str) -> Result<Score, SiteError> {
        let scores = self.repo.find_by_user_and_game(user_id, game_type).await?;
        Ok(Ranking::for_game(game_type)
            .best(&scores)
            .cloned()
            .unwrap_or_else(|| Score::placeholder(user_id, game_type)))
    }

    /// Record a result if it beats the player's personal best.
    ///
    /// An accepted score replaces every earlier score of that player for
    /// the game. Concurrent submissions of one player are judged one after
    /// the other, so the best of them always survives.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn submit_score(&self, score: Score) -> Result<Submission, SiteError> {
        let ranking = Ranking::for_game(&score.game_type);
        let user_id = score.user_id.clone();
        let game_type = score.game_type.clone();
        let value = score.score;

        let outcome = self.repo.submit_if_better(score, ranking).await?;
        if outcome.new_high_score {
            tracing::info!(user_id, game_type, score = value, "new high score");
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code,
    /// [`SiteError::NotFound`] for an unknown score, or a storage error.
    pub async fn delete_score(&self, level: AdminLevel, id: ScoreId) -> Result<(), SiteError> {
        level.require_admin()?;
        if !self.repo.delete(id).await? {
            return Err(NotFoundError {
                entity: "Score",
                id: id.to_string(),
            }
            .into());
        }
        tracing::info!(score_id = %id, "score deleted by admin");
        Ok(())
    }

    /// Wipe a game's leaderboard and return how many scores were removed.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code, or a storage error.
    pub async fn clear_game(&self, level: AdminLevel, game_type: &str) -> Result<u64, SiteError> {
        level.require_admin()?;
        let removed = self.repo.delete_by_game(game_type).await?;
        tracing::info!(game_type, removed, "leaderboard cleared");
        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code, or a storage error.
    pub async fn duplicate_report(&self, level: AdminLevel) -> Result<DuplicateReport, SiteError> {
        level.require_admin()?;
        let scores = self.repo.get_all().await?;
        Ok(DuplicateReport::from_scores(&scores))
    }

    /// Keep only each player's best score per game. Returns how many
    /// scores were removed.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code, or a storage error.
    pub async fn cleanup_duplicates(&self, level: AdminLevel) -> Result<u64, SiteError> {
        level.require_admin()?;
        let scores = self.repo.get_all().await?;
        let redundant = redundant_scores(&scores);
        if redundant.is_empty() {
            return Ok(0);
        }
        let removed = self.repo.delete_many(redundant).await?;
        tracing::info!(removed, "duplicate scores removed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryScoreRepo;
    use sitehub_domain::score::MAZE;

    fn make_service() -> (ScoreService<InMemoryScoreRepo>, InMemoryScoreRepo) {
        let repo = InMemoryScoreRepo::default();
        (ScoreService::new(repo.clone()), repo)
    }

    fn score(user: &str, game: &str, value: i64) -> Score {
        Score::new(user, user, game, value, None).unwrap()
    }

    #[tokio::test]
    async fn should_accept_first_score_for_player() {
        let (svc, _repo) = make_service();
        let outcome = svc.submit_score(score("u-1", "snake", 10)).await.unwrap();
        assert_eq!(outcome, Submission::FIRST);
        assert_eq!(svc.best_score("u-1", "snake").await.unwrap().score, 10);
    }

    #[tokio::test]
    async fn should_reject_score_that_does_not_beat_best() {
        let (svc, _repo) = make_service();
        svc.submit_score(score("u-1", "snake", 10)).await.unwrap();

        let outcome = svc.submit_score(score("u-1", "snake", 10)).await.unwrap();
        assert_eq!(outcome, Submission::REJECTED);
        assert!(!outcome.new_high_score);
    }

    #[tokio::test]
    async fn should_replace_previous_scores_on_new_high_score() {
        let (svc, repo) = make_service();
        svc.submit_score(score("u-1", "snake", 10)).await.unwrap();
        let outcome = svc.submit_score(score("u-1", "snake", 25)).await.unwrap();
        assert_eq!(outcome, Submission::UPDATED);

        let stored = repo.find_by_user_and_game("u-1", "snake").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].score, 25);
    }

    #[tokio::test]
    async fn should_keep_highest_of_concurrent_submissions() {
        let (svc, repo) = make_service();
        repo.push(score("u-1", "snake", 10));

        let (high, low) = tokio::join!(
            svc.submit_score(score("u-1", "snake", 100)),
            svc.submit_score(score("u-1", "snake", 50)),
        );
        assert!(high.unwrap().new_high_score);
        low.unwrap();

        let stored = repo.find_by_user_and_game("u-1", "snake").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].score, 100);
    }

    #[tokio::test]
    async fn should_prefer_lower_nonzero_time_for_maze() {
        let (svc, _repo) = make_service();
        svc.submit_score(score("u-1", MAZE, 40)).await.unwrap();

        assert_eq!(
            svc.submit_score(score("u-1", MAZE, 55)).await.unwrap(),
            Submission::REJECTED
        );
        assert_eq!(
            svc.submit_score(score("u-1", MAZE, 0)).await.unwrap(),
            Submission::REJECTED
        );
        assert_eq!(
            svc.submit_score(score("u-1", MAZE, 30)).await.unwrap(),
            Submission::UPDATED
        );
    }

    #[tokio::test]
    async fn should_return_placeholder_when_player_never_played() {
        let (svc, _repo) = make_service();
        let best = svc.best_score("u-9", "snake").await.unwrap();
        assert_eq!(best.score, 0);
        assert_eq!(best.user_id, "u-9");
    }

    #[tokio::test]
    async fn should_build_top_three_with_one_entry_per_player() {
        let (svc, repo) = make_service();
        for (user, value) in [("a", 50), ("a", 40), ("b", 30), ("c", 20), ("d", 10)] {
            repo.push(score(user, "snake", value));
        }

        let top = svc.top_scores("snake").await.unwrap();
        let users: Vec<&str> = top.iter().map(|s| s.user_id.as_str()).collect();
        assert_eq!(users, vec!["a", "b", "c"]);
        assert_eq!(top[0].score, 50);
    }

    #[tokio::test]
    async fn should_skip_zero_times_on_maze_leaderboard() {
        let (svc, repo) = make_service();
        repo.push(score("a", MAZE, 0));
        repo.push(score("b", MAZE, 45));
        repo.push(score("c", MAZE, 30));

        let top = svc.top_scores(MAZE).await.unwrap();
        let values: Vec<i64> = top.iter().map(|s| s.score).collect();
        assert_eq!(values, vec![30, 45]);
    }

    #[tokio::test]
    async fn should_require_admin_for_maintenance() {
        let (svc, _repo) = make_service();
        assert!(matches!(
            svc.clear_game(AdminLevel::None, "snake").await,
            Err(SiteError::Forbidden(_))
        ));
        assert!(matches!(
            svc.cleanup_duplicates(AdminLevel::None).await,
            Err(SiteError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_missing_score() {
        let (svc, _repo) = make_service();
        let result = svc.delete_score(AdminLevel::Admin, ScoreId::new()).await;
        assert!(matches!(result, Err(SiteError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_clear_only_requested_game() {
        let (svc, repo) = make_service();
        repo.push(score("a", "snake", 1));
        repo.push(score("b", "snake", 2));
        repo.push(score("a", MAZE, 3));

        assert_eq!(svc.clear_game(AdminLevel::Admin, "snake").await.unwrap(), 2);
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_report_and_clean_duplicates_keeping_best() {
        let (svc, repo) = make_service();
        repo.push(score("a", "snake", 10));
        repo.push(score("a", "snake", 30));
        repo.push(score("a", MAZE, 50));
        repo.push(score("a", MAZE, 20));
        repo.push(score("b", "snake", 5));

        let report = svc.duplicate_report(AdminLevel::Admin).await.unwrap();
        assert_eq!(report.total_scores, 5);
        assert_eq!(report.duplicate_groups, 2);
        assert_eq!(report.total_duplicates, 2);

        assert_eq!(svc.cleanup_duplicates(AdminLevel::Admin).await.unwrap(), 2);
        assert_eq!(svc.best_score("a", "snake").await.unwrap().score, 30);
        assert_eq!(svc.best_score("a", MAZE).await.unwrap().score, 20);
        assert_eq!(svc.cleanup_duplicates(AdminLevel::Admin).await.unwrap(), 0);
    }
}
