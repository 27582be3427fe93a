//! Registered user accounts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SiteError, ValidationError};
use crate::id::UserId;
use crate::time::{Timestamp, now};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 4;

/// Interface language a user prefers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
    Zh,
}

impl Language {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::En => "en",
            Self::Zh => "zh",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Self::Fr),
            "en" => Ok(Self::En),
            "zh" => Ok(Self::Zh),
            other => Err(ValidationError::invalid("language", other)),
        }
    }
}

/// A registered account. The password is only ever held as a PHC hash string.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub preferred_language: Language,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: Timestamp,
}

impl User {
    /// Create a new account from an already hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] if the username is out of bounds.
    pub fn new(username: &str, password_hash: String) -> Result<Self, SiteError> {
        let username = normalize_username(username)?;
        Ok(Self {
            id: UserId::new(),
            username,
            password_hash,
            preferred_language: Language::default(),
            created_at: now(),
        })
    }
}

/// Trim a username and check its length.
///
/// # Errors
///
/// Returns [`ValidationError::TooShort`] or [`ValidationError::TooLong`].
pub fn normalize_username(username: &str) -> Result<String, ValidationError> {
    let username = username.trim();
    let len = username.chars().count();
    if len < USERNAME_MIN {
        return Err(ValidationError::TooShort {
            field: "username",
            min: USERNAME_MIN,
        });
    }
    if len > USERNAME_MAX {
        return Err(ValidationError::TooLong {
            field: "username",
            max: USERNAME_MAX,
        });
    }
    Ok(username.to_string())
}

/// # Errors
///
/// Returns [`ValidationError::TooShort`] when `password` is under the minimum.
pub fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(ValidationError::TooShort {
            field: "password",
            min: PASSWORD_MIN,
        });
    }
    Ok(())
}
