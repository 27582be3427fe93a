//! Message service: the wall, its mute switch and emoji reactions.

use sitehub_domain::admin::AdminLevel;
use sitehub_domain::error::{ForbiddenError, NotFoundError, SiteError, require_text};
use sitehub_domain::event::{LiveEvent, ReactionUpdate};
use sitehub_domain::id::MessageId;
use sitehub_domain::message::{Message, ReactionChange};
use sitehub_domain::setting::{CHAT_MUTED, SystemSetting};

use crate::ports::{EventPublisher, MessageRepository, SettingRepository, UserRepository};
use crate::services::user_service::user_exists;

const EMOJI_MAX: usize = 16;

/// A reaction toggle request.
#[derive(Debug, Clone)]
pub struct ReactionRequest {
    pub message_id: MessageId,
    pub user_id: String,
    pub username: String,
    pub emoji: String,
}

/// Application service for the message wall.
pub struct MessageService<M, U, S, P> {
    messages: M,
    users: U,
    settings: S,
    publisher: P,
}

impl<M, U, S, P> MessageService<M, U, S, P>
where
    M: MessageRepository + Send + Sync,
    U: UserRepository + Send + Sync,
    S: SettingRepository + Send + Sync,
    P: EventPublisher + Send + Sync,
{
    /// Create a new service backed by the given repositories and publisher.
    pub fn new(messages: M, users: U, settings: S, publisher: P) -> Self {
        Self {
            messages,
            users,
            settings,
            publisher,
        }
    }

    /// List every message, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_messages(&self) -> Result<Vec<Message>, SiteError> {
        self.messages.get_all().await
    }

    /// Whether posting is currently restricted to admins.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn is_muted(&self) -> Result<bool, SiteError> {
        Ok(self
            .settings
            .get(CHAT_MUTED)
            .await?
            .is_some_and(|s| s.as_bool()))
    }

    /// Post a message on the wall.
    ///
    /// The message is marked verified when its author is a registered user
    /// or the caller holds an admin code. A quote that no longer resolves
    /// is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] while the wall is muted and the
    /// caller is not an admin, [`SiteError::Validation`] if invariants fail,
    /// or a storage error.
    pub async fn post_message(
        &self,
        mut message: Message,
        level: AdminLevel,
    ) -> Result<Message, SiteError> {
        message.validate()?;
        if !level.is_admin() && self.is_muted().await? {
            tracing::warn!(user_id = %message.user_id, "rejected message while muted");
            return Err(ForbiddenError::ChatMuted.into());
        }

        message.is_verified = level.is_admin() || user_exists(&self.users, &message.user_id).await?;

        match message.quoted_message_id {
            Some(quoted_id) => match self.messages.get_by_id(quoted_id).await? {
                Some(quoted) => message.quote(&quoted),
                None => message.clear_quote(),
            },
            None => message.clear_quote(),
        }

        let created = self.messages.create(message).await?;
        self.publisher
            .publish(LiveEvent::NewMessage(created.clone()))
            .await?;
        Ok(created)
    }

    /// Delete a message. Admins may delete any message, other callers only
    /// their own.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] when the message does not exist or is
    /// not owned by `user_id`, or a storage error.
    pub async fn delete_message(
        &self,
        id: MessageId,
        user_id: Option<&str>,
        level: AdminLevel,
    ) -> Result<(), SiteError> {
        let not_found = || -> SiteError {
            NotFoundError {
                entity: "Message",
                id: id.to_string(),
            }
            .into()
        };

        let message = self.messages.get_by_id(id).await?.ok_or_else(not_found)?;
        if !level.is_admin() && user_id != Some(message.user_id.as_str()) {
            return Err(not_found());
        }
        if !self.messages.delete(id).await? {
            return Err(not_found());
        }
        if level.is_admin() {
            tracing::info!(message_id = %id, "message deleted by admin");
        }
        self.publisher.publish(LiveEvent::DeleteMessage(id)).await
    }

    /// Flip the mute switch and return the new state.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code, or a storage error.
    pub async fn toggle_mute(&self, level: AdminLevel) -> Result<bool, SiteError> {
        level.require_admin()?;
        let muted = !self.is_muted().await?;
        let setting = SystemSetting::new(CHAT_MUTED, &muted.to_string(), Some("Wall mute"))?;
        self.settings.upsert(setting).await?;
        tracing::info!(muted, "wall mute toggled");
        self.publisher.publish(LiveEvent::MuteStatus(muted)).await?;
        Ok(muted)
    }

    /// Delete every message and return how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code, or a storage error.
    pub async fn clear_messages(&self, level: AdminLevel) -> Result<u64, SiteError> {
        level.require_admin()?;
        let removed = self.messages.delete_all().await?;
        tracing::info!(removed, "wall cleared");
        self.publisher.publish(LiveEvent::ClearAll).await?;
        Ok(removed)
    }

    async fn change_reaction(
        &self,
        message_id: MessageId,
        change: ReactionChange,
    ) -> Result<Message, SiteError> {
        require_text("emoji", change.emoji(), EMOJI_MAX)?;
        require_text("userId", change.user_id(), sitehub_domain::score::USER_ID_MAX)?;

        let (message, changed) = self
            .messages
            .change_reaction(message_id, change)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Message",
                id: message_id.to_string(),
            })?;
        if changed {
            self.publisher
                .publish(LiveEvent::ReactionUpdated(ReactionUpdate {
                    message_id: message.id,
                    reactions: message.reactions.clone(),
                }))
                .await?;
        }
        Ok(message)
    }

    /// Add the caller's reaction and return the updated message.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown message,
    /// [`SiteError::Validation`] for a blank emoji, or a storage error.
    pub async fn add_reaction(&self, request: &ReactionRequest) -> Result<Message, SiteError> {
        let change = ReactionChange::Add {
            emoji: request.emoji.clone(),
            user_id: request.user_id.clone(),
            username: request.username.clone(),
        };
        self.change_reaction(request.message_id, change).await
    }

    /// Withdraw the caller's reaction and return the updated message.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown message,
    /// [`SiteError::Validation`] for a blank emoji, or a storage error.
    pub async fn remove_reaction(&self, request: &ReactionRequest) -> Result<Message, SiteError> {
        let change = ReactionChange::Remove {
            emoji: request.emoji.clone(),
            user_id: request.user_id.clone(),
        };
        self.change_reaction(request.message_id, change).await
    }
}
