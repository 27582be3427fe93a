//! Suggestions and their comment threads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SiteError, require_text};
use crate::id::{CommentId, SuggestionId};
use crate::time::{Timestamp, now};

pub const SUGGESTION_MAX: usize = 1000;
pub const COMMENT_MAX: usize = 1000;

/// Review state of a suggestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Reviewed,
    Implemented,
}

impl SuggestionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Implemented => "implemented",
        }
    }

    /// Lenient parse: anything unrecognised falls back to [`SuggestionStatus::Pending`].
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuggestionStatus {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "reviewed" => Ok(Self::Reviewed),
            "implemented" => Ok(Self::Implemented),
            other => Err(crate::error::ValidationError::invalid("status", other)),
        }
    }
}

/// A feature request or remark left by a visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: SuggestionId,
    pub user_id: String,
    pub username: String,
    pub suggestion: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Timestamp,
    pub status: SuggestionStatus,
}

impl Suggestion {
    /// Create a pending suggestion with trimmed text.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when the text or username is blank,
    /// or the text exceeds [`SUGGESTION_MAX`].
    pub fn new(user_id: &str, username: &str, text: &str) -> Result<Self, SiteError> {
        let suggestion = Self {
            id: SuggestionId::new(),
            user_id: user_id.to_string(),
            username: username.trim().to_string(),
            suggestion: text.trim().to_string(),
            timestamp: now(),
            status: SuggestionStatus::Pending,
        };
        suggestion.validate()?;
        Ok(suggestion)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when a field is blank or too long.
    pub fn validate(&self) -> Result<(), SiteError> {
        require_text("username", &self.username, crate::user::USERNAME_MAX)?;
        require_text("suggestion", &self.suggestion, SUGGESTION_MAX)?;
        Ok(())
    }
}

/// A suggestion together with the size of its thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionSummary {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    pub comment_count: u64,
}

/// A reply in a suggestion thread, optionally quoting an earlier reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub suggestion_id: SuggestionId,
    pub user_id: String,
    pub username: String,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Timestamp,
    pub quoted_comment_id: Option<CommentId>,
    pub quoted_username: Option<String>,
    pub quoted_content: Option<String>,
}

impl Comment {
    /// Create a comment with trimmed content and no quote.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when the content or username is
    /// blank, or the content exceeds [`COMMENT_MAX`].
    pub fn new(
        suggestion_id: SuggestionId,
        user_id: &str,
        username: &str,
        content: &str,
    ) -> Result<Self, SiteError> {
        let comment = Self {
            id: CommentId::new(),
            suggestion_id,
            user_id: user_id.to_string(),
            username: username.trim().to_string(),
            content: content.trim().to_string(),
            timestamp: now(),
            quoted_comment_id: None,
            quoted_username: None,
            quoted_content: None,
        };
        require_text("username", &comment.username, crate::user::USERNAME_MAX)?;
        require_text("content", &comment.content, COMMENT_MAX)?;
        Ok(comment)
    }

    /// Copy the author and text of `quoted` into this comment.
    pub fn quote(&mut self, quoted: &Comment) {
        self.quoted_comment_id = Some(quoted.id);
        self.quoted_username = Some(quoted.username.clone());
        self.quoted_content = Some(quoted.content.clone());
    }
}
