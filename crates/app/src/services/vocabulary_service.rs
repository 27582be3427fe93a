//! Vocabulary service: cached flashcards and per-user favorites.
//!
//! The whole list is held in memory behind a [`RwLock`]. It is loaded on
//! first use and replaced wholesale by [`VocabularyService::reload`], so
//! readers always see a consistent snapshot.

use std::sync::Arc;

use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use sitehub_domain::admin::AdminLevel;
use sitehub_domain::error::{NotFoundError, SiteError};
use sitehub_domain::id::UserId;
use sitehub_domain::time::now;
use sitehub_domain::vocabulary::{VocabularyItem, daily_index};

use crate::ports::{FavoriteRepository, UserRepository, VocabularyRepository};

type Snapshot = Arc<Vec<VocabularyItem>>;

fn empty_list() -> SiteError {
    NotFoundError {
        entity: "Vocabulary",
        id: "any".to_string(),
    }
    .into()
}

/// Application service for vocabulary flashcards.
pub struct VocabularyService<V, F, U> {
    vocabulary: V,
    favorites: F,
    users: U,
    cache: RwLock<Option<Snapshot>>,
}

impl<V, F, U> VocabularyService<V, F, U>
where
    V: VocabularyRepository + Send + Sync,
    F: FavoriteRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn new(vocabulary: V, favorites: F, users: U) -> Self {
        Self {
            vocabulary,
            favorites,
            users,
            cache: RwLock::new(None),
        }
    }

    async fn snapshot(&self) -> Result<Snapshot, SiteError> {
        if let Some(items) = self.cache.read().await.as_ref() {
            return Ok(Arc::clone(items));
        }
        let mut cache = self.cache.write().await;
        if let Some(items) = cache.as_ref() {
            return Ok(Arc::clone(items));
        }
        let items: Snapshot = Arc::new(self.vocabulary.get_all().await?);
        tracing::info!(count = items.len(), "vocabulary loaded");
        *cache = Some(Arc::clone(&items));
        Ok(items)
    }

    /// Every item, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the list has to be loaded and loading fails.
    pub async fn all_items(&self) -> Result<Vec<VocabularyItem>, SiteError> {
        Ok(self.snapshot().await?.as_ref().clone())
    }

    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] when the list is empty, or a storage error.
    pub async fn random_item(&self) -> Result<VocabularyItem, SiteError> {
        let items = self.snapshot().await?;
        items
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(empty_list)
    }

    /// The same item for every caller during a UTC day.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] when the list is empty, or a storage error.
    pub async fn daily_item(&self) -> Result<VocabularyItem, SiteError> {
        let items = self.snapshot().await?;
        daily_index(items.len(), now())
            .and_then(|index| items.get(index).cloned())
            .ok_or_else(empty_list)
    }

    /// Drop the cached list and load it again. Returns the new item count.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code, or a storage error.
    pub async fn reload(&self, level: AdminLevel) -> Result<usize, SiteError> {
        level.require_admin()?;
        self.refresh().await
    }

    async fn refresh(&self) -> Result<usize, SiteError> {
        let items = self.vocabulary.get_all().await?;
        let count = items.len();
        *self.cache.write().await = Some(Arc::new(items));
        tracing::info!(count, "vocabulary reloaded");
        Ok(count)
    }

    /// Insert or replace items by id, then reload the cache. Returns how
    /// many items were written.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code,
    /// [`SiteError::Validation`] if any item is invalid (nothing is written),
    /// or a storage error.
    pub async fn import(
        &self,
        level: AdminLevel,
        items: Vec<VocabularyItem>,
    ) -> Result<u64, SiteError> {
        level.require_admin()?;
        for item in &items {
            item.validate()?;
        }
        let written = self.vocabulary.upsert_many(items).await?;
        self.refresh().await?;
        Ok(written)
    }

    async fn ensure_user(&self, user: UserId) -> Result<(), SiteError> {
        if self.users.get_by_id(user).await?.is_none() {
            return Err(NotFoundError {
                entity: "User",
                id: user.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Ids of a user's favorite items.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown user, or a storage error.
    pub async fn favorites(&self, user: UserId) -> Result<Vec<i64>, SiteError> {
        self.ensure_user(user).await?;
        self.favorites.get_favorites(user).await
    }

    /// Mark an item as favorite. Adding twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown user or item, or a storage error.
    pub async fn add_favorite(&self, user: UserId, item: i64) -> Result<Vec<i64>, SiteError> {
        self.ensure_user(user).await?;
        if !self.snapshot().await?.iter().any(|i| i.id == item) {
            return Err(NotFoundError {
                entity: "Vocabulary",
                id: item.to_string(),
            }
            .into());
        }
        self.favorites.add_favorite(user, item).await?;
        self.favorites.get_favorites(user).await
    }

    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown user, or a storage error.
    pub async fn remove_favorite(&self, user: UserId, item: i64) -> Result<Vec<i64>, SiteError> {
        self.ensure_user(user).await?;
        self.favorites.remove_favorite(user, item).await?;
        self.favorites.get_favorites(user).await
    }

    /// Full records of a user's favorites, in list order.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown user, or a storage error.
    pub async fn favorite_details(&self, user: UserId) -> Result<Vec<VocabularyItem>, SiteError> {
        let ids = self.favorites(user).await?;
        let items = self.snapshot().await?;
        Ok(items
            .iter()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryUserRepo, InMemoryVocabularyRepo};
    use sitehub_domain::user::User;

    type Service = VocabularyService<InMemoryVocabularyRepo, InMemoryUserRepo, InMemoryUserRepo>;

    fn item(id: i64, expression: &str) -> VocabularyItem {
        VocabularyItem {
            id,
            expression: expression.to_string(),
            meaning: format!("meaning of {expression}"),
            meaning_en: None,
            meaning_zh: None,
            example: None,
            level: None,
        }
    }

    async fn make_service(items: Vec<VocabularyItem>) -> (Service, InMemoryVocabularyRepo, UserId) {
        let vocabulary = InMemoryVocabularyRepo::default();
        vocabulary.upsert_many(items).await.unwrap();
        let users = InMemoryUserRepo::default();
        let user = users
            .create(User::new("alice", "hash".to_string()).unwrap())
            .await
            .unwrap();
        let svc = VocabularyService::new(vocabulary.clone(), users.clone(), users);
        (svc, vocabulary, user.id)
    }

    #[tokio::test]
    async fn should_return_not_found_when_list_empty() {
        let (svc, _repo, _user) = make_service(Vec::new()).await;
        assert!(matches!(svc.random_item().await, Err(SiteError::NotFound(_))));
        assert!(matches!(svc.daily_item().await, Err(SiteError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_pick_items_from_loaded_list() {
        let (svc, _repo, _user) = make_service(vec![item(1, "bonjour"), item(2, "merci")]).await;
        let random = svc.random_item().await.unwrap();
        assert!([1, 2].contains(&random.id));

        let daily = svc.daily_item().await.unwrap();
        assert_eq!(daily, svc.daily_item().await.unwrap());
    }

    #[tokio::test]
    async fn should_serve_cached_list_until_reload() {
        let (svc, repo, _user) = make_service(vec![item(1, "bonjour")]).await;
        assert_eq!(svc.all_items().await.unwrap().len(), 1);

        repo.upsert_many(vec![item(2, "merci")]).await.unwrap();
        assert_eq!(svc.all_items().await.unwrap().len(), 1);

        assert_eq!(svc.reload(AdminLevel::Admin).await.unwrap(), 2);
        assert_eq!(svc.all_items().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn should_require_admin_to_reload_or_import() {
        let (svc, _repo, _user) = make_service(Vec::new()).await;
        assert!(matches!(svc.reload(AdminLevel::None).await, Err(SiteError::Forbidden(_))));
        assert!(matches!(
            svc.import(AdminLevel::None, vec![item(1, "x")]).await,
            Err(SiteError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn should_import_and_refresh_cache() {
        let (svc, _repo, _user) = make_service(vec![item(1, "bonjour")]).await;
        svc.all_items().await.unwrap();

        let written = svc
            .import(AdminLevel::Admin, vec![item(1, "salut"), item(3, "au revoir")])
            .await
            .unwrap();
        assert_eq!(written, 2);

        let all = svc.all_items().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].expression, "salut");
    }

    #[tokio::test]
    async fn should_reject_import_with_invalid_item() {
        let (svc, _repo, _user) = make_service(Vec::new()).await;
        let result = svc.import(AdminLevel::Admin, vec![item(1, "  ")]).await;
        assert!(matches!(result, Err(SiteError::Validation(_))));
        assert!(svc.all_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_manage_favorites_idempotently() {
        let (svc, _repo, user) = make_service(vec![item(1, "bonjour"), item(2, "merci")]).await;

        svc.add_favorite(user, 2).await.unwrap();
        let ids = svc.add_favorite(user, 2).await.unwrap();
        assert_eq!(ids, vec![2]);

        let details = svc.favorite_details(user).await.unwrap();
        assert_eq!(details[0].expression, "merci");

        assert!(svc.remove_favorite(user, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_user_or_item() {
        let (svc, _repo, user) = make_service(vec![item(1, "bonjour")]).await;
        assert!(matches!(
            svc.favorites(UserId::new()).await,
            Err(SiteError::NotFound(_))
        ));
        assert!(matches!(
            svc.add_favorite(user, 42).await,
            Err(SiteError::NotFound(_))
        ));
    }
}
