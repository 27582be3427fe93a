//! Message wall: posts, quotes, and emoji reactions.

use serde::{Deserialize, Serialize};

use crate::error::{SiteError, require_text};
use crate::id::MessageId;
use crate::time::{Timestamp, now};

pub const MESSAGE_MAX: usize = 500;
pub const NAME_MAX: usize = 50;

/// A single post on the wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    /// Client-side identity of the author. Anonymous visitors carry a
    /// browser-generated id, registered users their account id.
    pub user_id: String,
    pub name: String,
    pub message: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Timestamp,
    pub is_anonymous: bool,
    pub is_verified: bool,
    pub quoted_message_id: Option<MessageId>,
    pub quoted_name: Option<String>,
    pub quoted_message: Option<String>,
    pub channel_id: Option<String>,
    pub reactions: Vec<Reaction>,
    pub image_url: Option<String>,
}

impl Message {
    /// Create a builder for constructing a [`Message`].
    #[must_use]
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when the author name or the text is
    /// blank or too long.
    pub fn validate(&self) -> Result<(), SiteError> {
        require_text("name", &self.name, NAME_MAX)?;
        require_text("message", &self.message, MESSAGE_MAX)?;
        Ok(())
    }

    /// Copy the author and text of `quoted` into this message.
    pub fn quote(&mut self, quoted: &Message) {
        self.quoted_message_id = Some(quoted.id);
        self.quoted_name = Some(quoted.name.clone());
        self.quoted_message = Some(quoted.message.clone());
    }

    /// Forget any quote reference.
    pub fn clear_quote(&mut self) {
        self.quoted_message_id = None;
        self.quoted_name = None;
        self.quoted_message = None;
    }

    /// Register `user_id` under `emoji`. Returns `false` when the user had
    /// already reacted with that emoji.
    pub fn add_reaction(&mut self, emoji: &str, user_id: &str, username: &str) -> bool {
        let reactor = ReactionUser {
            user_id: user_id.to_string(),
            username: username.to_string(),
            reacted_at: now(),
        };
        if let Some(reaction) = self.reactions.iter_mut().find(|r| r.emoji == emoji) {
            if reaction.users.iter().any(|u| u.user_id == user_id) {
                return false;
            }
            reaction.users.push(reactor);
            reaction.count = reaction.users.len();
        } else {
            self.reactions.push(Reaction {
                emoji: emoji.to_string(),
                count: 1,
                users: vec![reactor],
            });
        }
        true
    }

    /// Withdraw `user_id` from `emoji`. A reaction left without users is
    /// dropped. Returns `false` when nothing changed.
    pub fn remove_reaction(&mut self, emoji: &str, user_id: &str) -> bool {
        let Some(index) = self.reactions.iter().position(|r| r.emoji == emoji) else {
            return false;
        };
        let reaction = &mut self.reactions[index];
        let before = reaction.users.len();
        reaction.users.retain(|u| u.user_id != user_id);
        reaction.count = reaction.users.len();
        let changed = reaction.count != before;
        if reaction.count == 0 {
            self.reactions.remove(index);
        }
        changed
    }

    /// Apply `change` and report whether the reactions were modified.
    pub fn apply_reaction(&mut self, change: &ReactionChange) -> bool {
        match change {
            ReactionChange::Add {
                emoji,
                user_id,
                username,
            } => self.add_reaction(emoji, user_id, username),
            ReactionChange::Remove { emoji, user_id } => self.remove_reaction(emoji, user_id),
        }
    }
}

/// A single reaction toggle applied to a stored message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionChange {
    Add {
        emoji: String,
        user_id: String,
        username: String,
    },
    Remove {
        emoji: String,
        user_id: String,
    },
}

impl ReactionChange {
    #[must_use]
    pub fn emoji(&self) -> &str {
        match self {
            Self::Add { emoji, .. } | Self::Remove { emoji, .. } => emoji,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        match self {
            Self::Add { user_id, .. } | Self::Remove { user_id, .. } => user_id,
        }
    }
}

/// All users who reacted to a message with the same emoji.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub emoji: String,
    pub count: usize,
    pub users: Vec<ReactionUser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionUser {
    pub user_id: String,
    pub username: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub reacted_at: Timestamp,
}

/// Step-by-step builder for [`Message`].
#[derive(Debug, Default)]
pub struct MessageBuilder {
    id: Option<MessageId>,
    user_id: Option<String>,
    name: Option<String>,
    message: Option<String>,
    timestamp: Option<Timestamp>,
    is_anonymous: bool,
    quoted_message_id: Option<MessageId>,
    channel_id: Option<String>,
    image_url: Option<String>,
}

impl MessageBuilder {
    #[must_use]
    pub fn id(mut self, id: MessageId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn anonymous(mut self, is_anonymous: bool) -> Self {
        self.is_anonymous = is_anonymous;
        self
    }

    #[must_use]
    pub fn quoted_message_id(mut self, id: MessageId) -> Self {
        self.quoted_message_id = Some(id);
        self
    }

    #[must_use]
    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    #[must_use]
    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Consume the builder, validate, and return a [`Message`].
    ///
    /// The verified flag always starts cleared; only the wall service sets it.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] if invariants fail.
    pub fn build(self) -> Result<Message, SiteError> {
        let message = Message {
            id: self.id.unwrap_or_default(),
            user_id: self.user_id.unwrap_or_default(),
            name: self.name.map(|n| n.trim().to_string()).unwrap_or_default(),
            message: self.message.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or_else(now),
            is_anonymous: self.is_anonymous,
            is_verified: false,
            quoted_message_id: self.quoted_message_id,
            quoted_name: None,
            quoted_message: None,
            channel_id: self.channel_id,
            reactions: Vec::new(),
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
        };
        message.validate()?;
        Ok(message)
    }
}
