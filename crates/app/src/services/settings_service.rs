//! Settings service: site-wide switches.

use std::collections::BTreeMap;

use sitehub_domain::admin::AdminLevel;
use sitehub_domain::error::SiteError;
use sitehub_domain::setting::SystemSetting;

use crate::ports::SettingRepository;

pub struct SettingsService<R> {
    repo: R,
}

impl<R: SettingRepository + Send + Sync> SettingsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create the default switches that are missing. Existing values are
    /// left untouched. Returns how many were created.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn seed_defaults(&self) -> Result<usize, SiteError> {
        let mut created = 0;
        for setting in SystemSetting::defaults() {
            let key = setting.key.clone();
            if self.repo.insert_if_absent(setting).await? {
                tracing::debug!(%key, "seeded default setting");
                created += 1;
            }
        }
        Ok(created)
    }

    /// Key/value map readable by anyone.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn public_settings(&self) -> Result<BTreeMap<String, String>, SiteError> {
        Ok(self
            .repo
            .get_all()
            .await?
            .into_iter()
            .map(|s| (s.key, s.value))
            .collect())
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code, or a storage error.
    pub async fn list_settings(&self, level: AdminLevel) -> Result<Vec<SystemSetting>, SiteError> {
        level.require_admin()?;
        self.repo.get_all().await
    }

    /// Insert or overwrite a switch. An existing description is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code,
    /// [`SiteError::Validation`] for a blank key or oversized value, or a storage error.
    pub async fn set_setting(
        &self,
        level: AdminLevel,
        key: &str,
        value: &str,
    ) -> Result<SystemSetting, SiteError> {
        level.require_admin()?;
        let mut setting = SystemSetting::new(key, value, None)?;
        if let Some(existing) = self.repo.get(&setting.key).await? {
            setting.description = existing.description;
        }
        let saved = self.repo.upsert(setting).await?;
        tracing::info!(key = %saved.key, value = %saved.value, "setting changed");
        Ok(saved)
    }
}
