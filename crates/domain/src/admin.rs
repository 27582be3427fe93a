//! Admin codes: shared secrets that unlock privileged operations.

use serde::Serialize;

use crate::error::ForbiddenError;

/// Privilege level granted by a presented code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminLevel {
    None,
    Admin,
    SuperAdmin,
}

impl AdminLevel {
    /// `true` for both admin and super admin.
    #[must_use]
    pub fn is_admin(self) -> bool {
        self >= Self::Admin
    }

    /// # Errors
    ///
    /// Returns [`ForbiddenError::AdminRequired`] below [`AdminLevel::Admin`].
    pub fn require_admin(self) -> Result<(), ForbiddenError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ForbiddenError::AdminRequired)
        }
    }

    /// # Errors
    ///
    /// Returns [`ForbiddenError::SuperAdminRequired`] unless this is [`AdminLevel::SuperAdmin`].
    pub fn require_super_admin(self) -> Result<(), ForbiddenError> {
        if self == Self::SuperAdmin {
            Ok(())
        } else {
            Err(ForbiddenError::SuperAdminRequired)
        }
    }

    /// Role name exposed to clients, `None` when no privilege is granted.
    #[must_use]
    pub fn role(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Admin => Some("admin"),
            Self::SuperAdmin => Some("super_admin"),
        }
    }
}

/// The pair of configured secrets.
#[derive(Debug, Clone)]
pub struct AdminCodes {
    admin: String,
    super_admin: String,
}

impl AdminCodes {
    #[must_use]
    pub fn new(admin: impl Into<String>, super_admin: impl Into<String>) -> Self {
        Self {
            admin: admin.into(),
            super_admin: super_admin.into(),
        }
    }

    /// Resolve the level granted by `code`. Comparison is exact; blank
    /// codes never match.
    #[must_use]
    pub fn level(&self, code: Option<&str>) -> AdminLevel {
        match code {
            Some(code) if !code.is_empty() && code == self.super_admin => AdminLevel::SuperAdmin,
            Some(code) if !code.is_empty() && code == self.admin => AdminLevel::Admin,
            _ => AdminLevel::None,
        }
    }
}
