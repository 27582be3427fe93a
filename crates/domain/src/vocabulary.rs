//! Vocabulary flashcards.

use serde::{Deserialize, Serialize};

use crate::error::{SiteError, require_text};
use crate::time::{Timestamp, days_since_epoch};

pub const EXPRESSION_MAX: usize = 255;
pub const MEANING_MAX: usize = 2000;

/// A single expression with its translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub id: i64,
    pub expression: String,
    pub meaning: String,
    #[serde(default)]
    pub meaning_en: Option<String>,
    #[serde(default)]
    pub meaning_zh: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

impl VocabularyItem {
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when the expression or meaning is
    /// blank or too long.
    pub fn validate(&self) -> Result<(), SiteError> {
        require_text("expression", &self.expression, EXPRESSION_MAX)?;
        require_text("meaning", &self.meaning, MEANING_MAX)?;
        Ok(())
    }
}

/// Index of the item of the day among `len` items. `None` when empty.
///
/// Every caller sees the same item for the whole UTC day.
#[must_use]
pub fn daily_index(len: usize, at: Timestamp) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let days = u64::try_from(days_since_epoch(at)).unwrap_or_default();
    let len = len as u64;
    usize::try_from(days % len).ok()
}
