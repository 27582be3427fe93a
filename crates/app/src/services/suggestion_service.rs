//! Suggestion service: feature requests and their comment threads.

use sitehub_domain::admin::AdminLevel;
use sitehub_domain::error::{ForbiddenError, NotFoundError, SiteError};
use sitehub_domain::id::{CommentId, SuggestionId};
use sitehub_domain::suggestion::{Comment, Suggestion, SuggestionStatus, SuggestionSummary};

use crate::ports::SuggestionRepository;

/// Input of a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub quoted_comment_id: Option<CommentId>,
}

fn ensure_owner_or_admin(
    owner: &str,
    user_id: Option<&str>,
    level: AdminLevel,
) -> Result<(), SiteError> {
    if level.is_admin() || user_id == Some(owner) {
        Ok(())
    } else {
        Err(ForbiddenError::NotOwner.into())
    }
}

pub struct SuggestionService<R> {
    repo: R,
}

impl<R: SuggestionRepository + Send + Sync> SuggestionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    async fn get_suggestion(&self, id: SuggestionId) -> Result<Suggestion, SiteError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Suggestion",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn get_comment(&self, id: CommentId) -> Result<Comment, SiteError> {
        self.repo.get_comment(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Comment",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Every suggestion with its comment count, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_suggestions(&self) -> Result<Vec<SuggestionSummary>, SiteError> {
        self.repo.get_all().await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_user_suggestions(
        &self,
        user_id: &str,
    ) -> Result<Vec<SuggestionSummary>, SiteError> {
        self.repo.find_by_user(user_id).await
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for blank or oversized text, or a storage error.
    pub async fn create_suggestion(
        &self,
        user_id: &str,
        username: &str,
        text: &str,
    ) -> Result<Suggestion, SiteError> {
        let suggestion = Suggestion::new(user_id, username, text)?;
        let created = self.repo.create(suggestion).await?;
        tracing::info!(
            suggestion_id = %created.id,
            user_id = %created.user_id,
            "suggestion created"
        );
        Ok(created)
    }

    /// Move a suggestion through its review workflow.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code,
    /// [`SiteError::NotFound`] for an unknown suggestion, or a storage error.
    pub async fn update_status(
        &self,
        level: AdminLevel,
        id: SuggestionId,
        status: SuggestionStatus,
    ) -> Result<Suggestion, SiteError> {
        level.require_admin()?;
        let mut suggestion = self.get_suggestion(id).await?;
        self.repo.update_status(id, status).await?;
        suggestion.status = status;
        tracing::info!(suggestion_id = %id, status = %status, "suggestion status changed");
        Ok(suggestion)
    }

    /// Delete a suggestion and its thread.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown suggestion,
    /// [`SiteError::Forbidden`] when the caller is neither author nor admin,
    /// or a storage error.
    pub async fn delete_suggestion(
        &self,
        id: SuggestionId,
        user_id: Option<&str>,
        level: AdminLevel,
    ) -> Result<(), SiteError> {
        let suggestion = self.get_suggestion(id).await?;
        ensure_owner_or_admin(&suggestion.user_id, user_id, level)?;
        self.repo.delete(id).await?;
        tracing::info!(suggestion_id = %id, "suggestion deleted");
        Ok(())
    }

    /// Comments of a suggestion, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown suggestion, or a storage error.
    pub async fn list_comments(&self, id: SuggestionId) -> Result<Vec<Comment>, SiteError> {
        self.get_suggestion(id).await?;
        self.repo.find_comments(id).await
    }

    /// Add a comment. A quote pointing outside the thread is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown suggestion,
    /// [`SiteError::Validation`] for blank or oversized content, or a storage error.
    pub async fn add_comment(
        &self,
        suggestion_id: SuggestionId,
        input: NewComment,
    ) -> Result<Comment, SiteError> {
        self.get_suggestion(suggestion_id).await?;
        let mut comment = Comment::new(
            suggestion_id,
            &input.user_id,
            &input.username,
            &input.content,
        )?;

        if let Some(quoted_id) = input.quoted_comment_id {
            let quoted = self
                .repo
                .get_comment(quoted_id)
                .await?
                .filter(|quoted| quoted.suggestion_id == suggestion_id);
            if let Some(quoted) = quoted {
                comment.quote(&quoted);
            }
        }

        self.repo.create_comment(comment).await
    }

    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown comment,
    /// [`SiteError::Forbidden`] when the caller is neither author nor admin,
    /// or a storage error.
    pub async fn delete_comment(
        &self,
        id: CommentId,
        user_id: Option<&str>,
        level: AdminLevel,
    ) -> Result<(), SiteError> {
        let comment = self.get_comment(id).await?;
        ensure_owner_or_admin(&comment.user_id, user_id, level)?;
        self.repo.delete_comment(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemorySuggestionRepo;

    fn make_service() -> SuggestionService<InMemorySuggestionRepo> {
        SuggestionService::new(InMemorySuggestionRepo::default())
    }

    fn comment(user_id: &str, content: &str) -> NewComment {
        NewComment {
            user_id: user_id.to_string(),
            username: user_id.to_string(),
            content: content.to_string(),
            quoted_comment_id: None,
        }
    }

    #[tokio::test]
    async fn should_create_pending_suggestion_with_trimmed_text() {
        let svc = make_service();
        let created = svc
            .create_suggestion("u-1", "alice", "  dark mode please ")
            .await
            .unwrap();
        assert_eq!(created.suggestion, "dark mode please");
        assert_eq!(created.status, SuggestionStatus::Pending);
        assert_eq!(svc.list_user_suggestions("u-1").await.unwrap().len(), 1);
        assert!(svc.list_user_suggestions("u-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_count_comments_in_listing() {
        let svc = make_service();
        let s = svc.create_suggestion("u-1", "alice", "idea").await.unwrap();
        svc.add_comment(s.id, comment("u-2", "+1")).await.unwrap();
        svc.add_comment(s.id, comment("u-3", "+1 too")).await.unwrap();

        let all = svc.list_suggestions().await.unwrap();
        assert_eq!(all[0].comment_count, 2);
    }

    #[tokio::test]
    async fn should_require_admin_to_change_status() {
        let svc = make_service();
        let s = svc.create_suggestion("u-1", "alice", "idea").await.unwrap();

        let result = svc
            .update_status(AdminLevel::None, s.id, SuggestionStatus::Reviewed)
            .await;
        assert!(matches!(result, Err(SiteError::Forbidden(_))));

        let updated = svc
            .update_status(AdminLevel::Admin, s.id, SuggestionStatus::Implemented)
            .await
            .unwrap();
        assert_eq!(updated.status, SuggestionStatus::Implemented);
    }

    #[tokio::test]
    async fn should_let_author_or_admin_delete_suggestion() {
        let svc = make_service();
        let s = svc.create_suggestion("u-1", "alice", "idea").await.unwrap();

        let result = svc
            .delete_suggestion(s.id, Some("u-2"), AdminLevel::None)
            .await;
        assert!(matches!(
            result,
            Err(SiteError::Forbidden(ForbiddenError::NotOwner))
        ));

        svc.delete_suggestion(s.id, Some("u-1"), AdminLevel::None)
            .await
            .unwrap();
        assert!(svc.list_suggestions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_delete_thread_with_suggestion() {
        let svc = make_service();
        let s = svc.create_suggestion("u-1", "alice", "idea").await.unwrap();
        let c = svc.add_comment(s.id, comment("u-2", "nice")).await.unwrap();

        svc.delete_suggestion(s.id, None, AdminLevel::Admin)
            .await
            .unwrap();
        let result = svc.delete_comment(c.id, Some("u-2"), AdminLevel::None).await;
        assert!(matches!(result, Err(SiteError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_return_not_found_when_commenting_missing_suggestion() {
        let svc = make_service();
        let result = svc.add_comment(SuggestionId::new(), comment("u-2", "hi")).await;
        assert!(matches!(result, Err(SiteError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_resolve_quote_within_thread_only() {
        let svc = make_service();
        let s = svc.create_suggestion("u-1", "alice", "idea").await.unwrap();
        let other = svc.create_suggestion("u-1", "alice", "other").await.unwrap();
        let first = svc.add_comment(s.id, comment("u-2", "first")).await.unwrap();
        let elsewhere = svc.add_comment(other.id, comment("u-3", "elsewhere")).await.unwrap();

        let mut reply = comment("u-3", "reply");
        reply.quoted_comment_id = Some(first.id);
        let quoted = svc.add_comment(s.id, reply).await.unwrap();
        assert_eq!(quoted.quoted_content.as_deref(), Some("first"));
        assert_eq!(quoted.quoted_username.as_deref(), Some("u-2"));

        let mut stray = comment("u-3", "stray");
        stray.quoted_comment_id = Some(elsewhere.id);
        let unquoted = svc.add_comment(s.id, stray).await.unwrap();
        assert!(unquoted.quoted_comment_id.is_none());

        let thread = svc.list_comments(s.id).await.unwrap();
        assert_eq!(thread.len(), 3);
        assert_eq!(thread[0].content, "first");
    }

    #[tokio::test]
    async fn should_let_only_author_or_admin_delete_comment() {
        let svc = make_service();
        let s = svc.create_suggestion("u-1", "alice", "idea").await.unwrap();
        let c = svc.add_comment(s.id, comment("u-2", "mine")).await.unwrap();

        assert!(matches!(
            svc.delete_comment(c.id, Some("u-1"), AdminLevel::None).await,
            Err(SiteError::Forbidden(_))
        ));
        svc.delete_comment(c.id, None, AdminLevel::Admin).await.unwrap();
        assert!(svc.list_comments(s.id).await.unwrap().is_empty());
    }
}
