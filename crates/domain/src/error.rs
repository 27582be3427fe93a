//! Error conventions shared by every layer.
//!
//! Each layer converts its own failures into [`SiteError`] so the HTTP
//! adapter can map them to status codes in a single place.

/// Top-level error for all sitehub operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Input failed a domain invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The caller is not allowed to perform the operation.
    #[error(transparent)]
    Forbidden(#[from] ForbiddenError),

    /// The persistence layer failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A remote service answered with an error or could not be reached.
    #[error("upstream service error")]
    Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Any other unexpected failure.
    #[error("internal error")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("invalid {kind}: {value}")]
    Invalid { kind: &'static str, value: String },

    /// The request could not be decoded at all.
    #[error("{0}")]
    Malformed(String),

    #[error("{entity} already exists for user: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid admin code")]
    InvalidAdminCode,
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Invalid`].
    #[must_use]
    pub fn invalid(kind: &'static str, value: impl Into<String>) -> Self {
        Self::Invalid {
            kind,
            value: value.into(),
        }
    }
}

/// Lookup of a record that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Authorization failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ForbiddenError {
    #[error("Admin code required")]
    AdminRequired,

    #[error("Super admin code required")]
    SuperAdminRequired,

    #[error("Chat is muted by admin")]
    ChatMuted,

    #[error("Only the owner can modify this record")]
    NotOwner,
}

/// Check that a trimmed text field is present and not longer than `max` characters.
///
/// # Errors
///
/// Returns [`ValidationError::Empty`] or [`ValidationError::TooLong`].
pub fn require_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}
