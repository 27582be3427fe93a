//! Activity service: per-user counters and achievement unlocks.

use sitehub_domain::activity::{
    ACHIEVEMENTS, Achievement, ActivityEvent, ActivityStats, UnlockedAchievement,
};
use sitehub_domain::admin::AdminLevel;
use sitehub_domain::error::{NotFoundError, SiteError};
use sitehub_domain::time::{Timestamp, now};

use crate::ports::{ActivityRepository, UserRepository};
use crate::services::user_service::user_exists;

/// Application service for activity stats and achievements.
pub struct ActivityService<A, U> {
    activity: A,
    users: U,
}

impl<A, U> ActivityService<A, U>
where
    A: ActivityRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn new(activity: A, users: U) -> Self {
        Self { activity, users }
    }

    /// Every achievement that can be unlocked.
    #[must_use]
    pub fn catalog(&self) -> &'static [Achievement] {
        ACHIEVEMENTS
    }

    async fn unlock_reached(
        &self,
        stats: &ActivityStats,
        at: Timestamp,
    ) -> Result<Vec<&'static Achievement>, SiteError> {
        let unlocked: Vec<String> = self
            .activity
            .unlocked(&stats.user_id)
            .await?
            .into_iter()
            .map(|record| record.achievement_id)
            .collect();
        let reached = stats.newly_reached(&unlocked);
        if reached.is_empty() {
            return Ok(reached);
        }

        let ids = reached.iter().map(|a| a.id).collect();
        self.activity.unlock(&stats.user_id, ids, at).await?;
        for achievement in &reached {
            tracing::info!(
                user_id = %stats.user_id,
                achievement = achievement.id,
                "achievement unlocked"
            );
        }
        Ok(reached)
    }

    /// Count `event` for a registered user and unlock what it reaches.
    ///
    /// Visitors without an account are not tracked and get an empty list.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    pub async fn record(
        &self,
        user_id: &str,
        event: ActivityEvent,
    ) -> Result<Vec<&'static Achievement>, SiteError> {
        if !user_exists(&self.users, user_id).await? {
            return Ok(Vec::new());
        }
        let at = now();
        let stats = self.activity.record(user_id, event, at).await?;
        self.unlock_reached(&stats, at).await
    }

    /// Stats of a user, all zero when nothing was recorded yet.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn stats(&self, user_id: &str) -> Result<ActivityStats, SiteError> {
        Ok(self
            .activity
            .get_stats(user_id)
            .await?
            .unwrap_or_else(|| ActivityStats::empty(user_id)))
    }

    /// Unlocked achievements, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn achievements(&self, user_id: &str) -> Result<Vec<UnlockedAchievement>, SiteError> {
        let records = self.activity.unlocked(user_id).await?;
        Ok(UnlockedAchievement::resolve(records))
    }

    /// Re-evaluate the stored stats of a user against the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code,
    /// [`SiteError::NotFound`] when the user has no stats, or a storage error.
    pub async fn recheck(
        &self,
        level: AdminLevel,
        user_id: &str,
    ) -> Result<Vec<&'static Achievement>, SiteError> {
        level.require_admin()?;
        let stats = self
            .activity
            .get_stats(user_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Activity stats",
                id: user_id.to_string(),
            })?;
        self.unlock_reached(&stats, now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryActivityRepo, InMemoryUserRepo};
    use sitehub_domain::user::User;

    type Service = ActivityService<InMemoryActivityRepo, InMemoryUserRepo>;

    async fn make_service() -> (Service, InMemoryActivityRepo, String) {
        let users = InMemoryUserRepo::default();
        let user = User::new("alice", "hash".to_string()).unwrap();
        users.create(user.clone()).await.unwrap();
        let activity = InMemoryActivityRepo::default();
        (
            ActivityService::new(activity.clone(), users),
            activity,
            user.id.to_string(),
        )
    }

    #[tokio::test]
    async fn should_unlock_first_message_once() {
        let (svc, _activity, user_id) = make_service().await;

        let unlocked = svc.record(&user_id, ActivityEvent::Message).await.unwrap();
        let ids: Vec<&str> = unlocked.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["first-message"]);

        assert!(
            svc.record(&user_id, ActivityEvent::Message)
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(svc.stats(&user_id).await.unwrap().total_messages, 2);
        assert_eq!(svc.achievements(&user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_ignore_visitors_without_account() {
        let (svc, activity, _user_id) = make_service().await;
        let unlocked = svc.record("anon-1", ActivityEvent::Message).await.unwrap();
        assert!(unlocked.is_empty());
        assert!(activity.get_stats("anon-1").await.unwrap().is_none());
        assert_eq!(svc.stats("anon-1").await.unwrap().total_messages, 0);
    }

    #[tokio::test]
    async fn should_track_games_and_personal_bests() {
        let (svc, _activity, user_id) = make_service().await;
        for score in [5, 12, 7] {
            let event = ActivityEvent::Game {
                game_type: "snake".to_string(),
                score,
            };
            svc.record(&user_id, event).await.unwrap();
        }

        let stats = svc.stats(&user_id).await.unwrap();
        assert_eq!(stats.total_games_played, 3);
        assert_eq!(stats.best_scores["snake"], 12);
        assert_eq!(stats.current_streak, 1);
    }

    #[tokio::test]
    async fn should_count_every_concurrent_event() {
        let (svc, _activity, user_id) = make_service().await;
        let (a, b) = tokio::join!(
            svc.record(&user_id, ActivityEvent::Message),
            svc.record(&user_id, ActivityEvent::Message),
        );
        a.unwrap();
        b.unwrap();
        assert_eq!(svc.stats(&user_id).await.unwrap().total_messages, 2);
        assert_eq!(svc.achievements(&user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_require_admin_to_recheck() {
        let (svc, activity, user_id) = make_service().await;
        let result = svc.recheck(AdminLevel::None, &user_id).await;
        assert!(matches!(result, Err(SiteError::Forbidden(_))));

        let result = svc.recheck(AdminLevel::Admin, &user_id).await;
        assert!(matches!(result, Err(SiteError::NotFound(_))));

        activity
            .record(&user_id, ActivityEvent::Message, now())
            .await
            .unwrap();
        let unlocked = svc.recheck(AdminLevel::Admin, &user_id).await.unwrap();
        assert_eq!(unlocked.len(), 1);
        assert!(svc.recheck(AdminLevel::Admin, &user_id).await.unwrap().is_empty());
    }

    #[test]
    fn should_expose_catalog() {
        let svc = ActivityService::new(
            InMemoryActivityRepo::default(),
            InMemoryUserRepo::default(),
        );
        assert!(svc.catalog().iter().any(|a| a.id == "champion"));
    }
}
