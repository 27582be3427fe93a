//! System settings: site-wide switches editable by admins.

use serde::{Deserialize, Serialize};

use crate::error::{SiteError, require_text};

pub const KEY_MAX: usize = 100;
pub const VALUE_MAX: usize = 2000;

/// Key of the wall mute flag.
pub const CHAT_MUTED: &str = "CHAT_MUTED";

/// Settings created at startup when missing, as `(key, value, description)`.
pub const DEFAULTS: &[(&str, &str, &str)] = &[
    ("SITE_MAINTENANCE_MODE", "false", "System Toggle"),
    ("PAGE_CV_ENABLED", "true", "System Toggle"),
    ("PAGE_GAME_ENABLED", "true", "System Toggle"),
    ("PAGE_MESSAGES_ENABLED", "true", "System Toggle"),
    ("PAGE_SUGGESTIONS_ENABLED", "true", "System Toggle"),
    ("PAGE_CALENDAR_ENABLED", "true", "System Toggle"),
    ("PAGE_LEARNING_ENABLED", "true", "System Toggle"),
    ("PAGE_NOTES_ENABLED", "true", "System Toggle"),
    (
        "SITE_MAINTENANCE_MESSAGE",
        "The site is currently under maintenance. We will be back shortly.",
        "System Toggle",
    ),
    ("SITE_MAINTENANCE_BY", "", "System Toggle"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

impl SystemSetting {
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for a blank or oversized key, or an
    /// oversized value.
    pub fn new(key: &str, value: &str, description: Option<&str>) -> Result<Self, SiteError> {
        require_text("key", key, KEY_MAX)?;
        if value.chars().count() > VALUE_MAX {
            return Err(crate::error::ValidationError::TooLong {
                field: "value",
                max: VALUE_MAX,
            }
            .into());
        }
        Ok(Self {
            key: key.trim().to_string(),
            value: value.to_string(),
            description: description.map(str::to_string),
        })
    }

    /// Interpret the value as a boolean flag.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        self.value.trim().eq_ignore_ascii_case("true")
    }

    /// Records for [`DEFAULTS`].
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        DEFAULTS
            .iter()
            .map(|(key, value, description)| Self {
                key: (*key).to_string(),
                value: (*value).to_string(),
                description: Some((*description).to_string()),
            })
            .collect()
    }
}
