//! Public profiles of registered users.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::activity::{ActivityStats, UnlockedAchievement};
use crate::error::{SiteError, ValidationError, require_text};
use crate::time::{Timestamp, now};

/// Display names default to the username, so they share its bound.
pub const DISPLAY_NAME_MAX: usize = crate::user::USERNAME_MAX;
pub const BIO_MAX: usize = 500;
pub const AVATAR_URL_MAX: usize = 500;
pub const GENDER_MAX: usize = 10;

const AVATAR_BOY: &str = "/avatars/default-B.jpeg";
const AVATAR_GIRL: &str = "/avatars/default-G.jpeg";
const AVATAR_DEFAULT: &str = "/avatars/default-avatar.png";

/// Who may open a profile page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            other => Err(ValidationError::invalid("profileVisibility", other)),
        }
    }
}

/// What other visitors see of a public profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub profile_visibility: Visibility,
    pub show_bio: bool,
    pub show_stats: bool,
    pub show_achievements: bool,
    pub show_last_active: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            profile_visibility: Visibility::Public,
            show_bio: true,
            show_stats: true,
            show_achievements: true,
            show_last_active: true,
        }
    }
}

/// Partial change of [`PrivacySettings`]. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyUpdate {
    pub profile_visibility: Option<Visibility>,
    pub show_bio: Option<bool>,
    pub show_stats: Option<bool>,
    pub show_achievements: Option<bool>,
    pub show_last_active: Option<bool>,
}

impl PrivacySettings {
    pub fn apply(&mut self, update: &PrivacyUpdate) {
        if let Some(visibility) = update.profile_visibility {
            self.profile_visibility = visibility;
        }
        if let Some(show) = update.show_bio {
            self.show_bio = show;
        }
        if let Some(show) = update.show_stats {
            self.show_stats = show;
        }
        if let Some(show) = update.show_achievements {
            self.show_achievements = show;
        }
        if let Some(show) = update.show_last_active {
            self.show_last_active = show;
        }
    }
}

/// Profile of one registered account, keyed by its user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub gender: Option<String>,
    pub join_date: Timestamp,
    pub last_active: Timestamp,
    pub privacy: PrivacySettings,
}

/// Body of an explicit profile creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    pub user_id: String,
    pub display_name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

/// Partial change of a profile. Absent fields are left alone and blank
/// optional fields are cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub gender: Option<String>,
}

fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        Some(text) => Ok(Some(text.to_string())),
    }
}

fn normalize_gender(value: Option<&str>) -> Result<Option<String>, ValidationError> {
    Ok(optional_text("gender", value, GENDER_MAX)?.map(|g| g.to_uppercase()))
}

impl UserProfile {
    /// Fresh public profile for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] on a blank or oversized display name.
    pub fn new(user_id: &str, display_name: &str) -> Result<Self, SiteError> {
        require_text("userId", user_id, crate::score::USER_ID_MAX)?;
        require_text("displayName", display_name, DISPLAY_NAME_MAX)?;
        let at = now();
        Ok(Self {
            user_id: user_id.to_string(),
            display_name: display_name.trim().to_string(),
            bio: None,
            avatar_url: None,
            gender: None,
            join_date: at,
            last_active: at,
            privacy: PrivacySettings::default(),
        })
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when a field is out of bounds.
    pub fn from_draft(draft: &ProfileDraft) -> Result<Self, SiteError> {
        let mut profile = Self::new(&draft.user_id, &draft.display_name)?;
        profile.bio = optional_text("bio", draft.bio.as_deref(), BIO_MAX)?;
        profile.gender = normalize_gender(draft.gender.as_deref())?;
        if draft.is_public == Some(false) {
            profile.privacy.profile_visibility = Visibility::Private;
        }
        Ok(profile)
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when a field is out of bounds. The
    /// profile is left untouched in that case.
    pub fn apply(&mut self, update: &ProfileUpdate) -> Result<(), SiteError> {
        let display_name = match update.display_name.as_deref() {
            Some(name) => {
                require_text("displayName", name, DISPLAY_NAME_MAX)?;
                name.trim().to_string()
            }
            None => self.display_name.clone(),
        };
        let bio = match update.bio.as_deref() {
            Some(bio) => optional_text("bio", Some(bio), BIO_MAX)?,
            None => self.bio.clone(),
        };
        let avatar_url = match update.avatar_url.as_deref() {
            Some(url) => optional_text("avatarUrl", Some(url), AVATAR_URL_MAX)?,
            None => self.avatar_url.clone(),
        };
        let gender = match update.gender.as_deref() {
            Some(gender) => normalize_gender(Some(gender))?,
            None => self.gender.clone(),
        };

        self.display_name = display_name;
        self.bio = bio;
        self.avatar_url = avatar_url;
        self.gender = gender;
        self.last_active = now();
        Ok(())
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.privacy.profile_visibility == Visibility::Public
    }

    /// Uploaded avatar, or a default picked from the gender.
    #[must_use]
    pub fn resolved_avatar_url(&self) -> &str {
        if let Some(url) = &self.avatar_url {
            return url;
        }
        match self.gender.as_deref() {
            Some("H" | "M" | "B") => AVATAR_BOY,
            Some("F" | "G") => AVATAR_GIRL,
            _ => AVATAR_DEFAULT,
        }
    }

    /// Case-insensitive match on the display name, or on the bio when it is shown.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return false;
        }
        self.display_name.to_lowercase().contains(&query)
            || (self.privacy.show_bio
                && self
                    .bio
                    .as_deref()
                    .is_some_and(|bio| bio.to_lowercase().contains(&query)))
    }
}

/// Who is looking at a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// The owner or an admin: everything is shown.
    Owner,
    Visitor,
}

/// Profile as rendered to a given [`Audience`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub avatar_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub join_date: Timestamp,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub last_active: Option<Timestamp>,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_settings: Option<PrivacySettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_stats: Option<ActivityStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<UnlockedAchievement>>,
}

impl ProfileView {
    #[must_use]
    pub fn render(
        profile: &UserProfile,
        audience: Audience,
        stats: ActivityStats,
        achievements: Vec<UnlockedAchievement>,
    ) -> Self {
        let privacy = profile.privacy;
        let owner = audience == Audience::Owner;
        Self {
            user_id: profile.user_id.clone(),
            display_name: profile.display_name.clone(),
            bio: profile.bio.clone().filter(|_| owner || privacy.show_bio),
            avatar_url: profile.resolved_avatar_url().to_string(),
            gender: profile.gender.clone(),
            join_date: profile.join_date,
            last_active: Some(profile.last_active).filter(|_| owner || privacy.show_last_active),
            is_public: profile.is_public(),
            privacy_settings: Some(privacy).filter(|_| owner),
            activity_stats: Some(stats).filter(|_| owner || privacy.show_stats),
            achievements: Some(achievements).filter(|_| owner || privacy.show_achievements),
        }
    }
}

/// Name and picture, used next to messages and scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicProfile {
    pub user_id: String,
    pub display_name: String,
    pub avatar_url: String,
}

impl From<&UserProfile> for BasicProfile {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            display_name: profile.display_name.clone(),
            avatar_url: profile.resolved_avatar_url().to_string(),
        }
    }
}
