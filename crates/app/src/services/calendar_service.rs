//! Calendar service: highlighted school zones and the holiday proxy.

use sitehub_domain::admin::AdminLevel;
use sitehub_domain::calendar::{CalendarConfig, check_school_year, check_year};
use sitehub_domain::error::SiteError;

use crate::ports::{CalendarConfigRepository, HolidayProvider};

pub struct CalendarService<R, H> {
    repo: R,
    holidays: H,
}

impl<R, H> CalendarService<R, H>
where
    R: CalendarConfigRepository + Send + Sync,
    H: HolidayProvider + Send + Sync,
{
    pub fn new(repo: R, holidays: H) -> Self {
        Self { repo, holidays }
    }

    /// Stored configuration, or every zone when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn config(&self) -> Result<CalendarConfig, SiteError> {
        Ok(self.repo.get().await?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code,
    /// [`SiteError::Validation`] for an unknown zone name, or a storage error.
    pub async fn set_zones<S: AsRef<str> + Sync>(
        &self,
        level: AdminLevel,
        zones: &[S],
    ) -> Result<CalendarConfig, SiteError> {
        level.require_admin()?;
        let config = CalendarConfig::from_names(zones)?;
        let saved = self.repo.save(config).await?;
        tracing::info!(zones = ?saved.active_zones, "calendar zones changed");
        Ok(saved)
    }

    /// Public holidays of `year`, passed through from the upstream source.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for a year out of range, or
    /// [`SiteError::Upstream`] when the source fails.
    pub async fn public_holidays(&self, year: i32) -> Result<serde_json::Value, SiteError> {
        let year = check_year(year)?;
        self.holidays.public_holidays(year).await
    }

    /// School holidays of a `YYYY-YYYY` school year.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for a malformed school year, or
    /// [`SiteError::Upstream`] when the source fails.
    pub async fn school_holidays(&self, school_year: &str) -> Result<serde_json::Value, SiteError> {
        let school_year = check_school_year(school_year)?;
        self.holidays.school_holidays(school_year).await
    }
}
