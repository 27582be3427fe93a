//! Personal notes.

use serde::{Deserialize, Serialize};

use crate::error::{ForbiddenError, SiteError, require_text};
use crate::id::NoteId;
use crate::time::{Timestamp, now};

pub const TITLE_MAX: usize = 200;
pub const CONTENT_MAX: usize = 20_000;
pub const COLOR_MAX: usize = 64;

/// A sticky note owned by one visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub user_id: String,
    pub username: String,
    pub title: String,
    pub content: String,
    pub color: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: Timestamp,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub updated_at: Option<Timestamp>,
}

/// Editable part of a note.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub color: String,
}

impl NoteDraft {
    fn validate(&self) -> Result<(), SiteError> {
        require_text("title", &self.title, TITLE_MAX)?;
        require_text("color", &self.color, COLOR_MAX)?;
        if self.content.chars().count() > CONTENT_MAX {
            return Err(crate::error::ValidationError::TooLong {
                field: "content",
                max: CONTENT_MAX,
            }
            .into());
        }
        Ok(())
    }
}

impl Note {
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when the owner, title or color is blank.
    pub fn new(user_id: &str, username: &str, draft: NoteDraft) -> Result<Self, SiteError> {
        require_text("userId", user_id, crate::score::USER_ID_MAX)?;
        require_text("username", username, crate::user::USERNAME_MAX)?;
        draft.validate()?;
        Ok(Self {
            id: NoteId::new(),
            user_id: user_id.to_string(),
            username: username.trim().to_string(),
            title: draft.title.trim().to_string(),
            content: draft.content,
            color: draft.color.trim().to_string(),
            created_at: now(),
            updated_at: None,
        })
    }

    /// Replace the editable fields and stamp the edit time.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when the draft is invalid.
    pub fn apply(&mut self, draft: NoteDraft) -> Result<(), SiteError> {
        draft.validate()?;
        self.title = draft.title.trim().to_string();
        self.content = draft.content;
        self.color = draft.color.trim().to_string();
        self.updated_at = Some(now());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ForbiddenError::NotOwner`] unless `user_id` owns the note.
    pub fn ensure_owner(&self, user_id: &str) -> Result<(), ForbiddenError> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(ForbiddenError::NotOwner)
        }
    }
}
