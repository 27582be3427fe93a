//! Profile service: public profiles, their privacy, and the directory.

use sitehub_domain::activity::{ActivityStats, UnlockedAchievement};
use sitehub_domain::admin::AdminLevel;
use sitehub_domain::error::{ForbiddenError, NotFoundError, SiteError};
use sitehub_domain::profile::{
    Audience, BasicProfile, PrivacySettings, PrivacyUpdate, ProfileDraft, ProfileUpdate,
    ProfileView, UserProfile,
};
use sitehub_domain::time::now;
use sitehub_domain::user::User;

use crate::ports::{ActivityRepository, ProfileRepository, UserRepository};
use crate::services::user_service::user_exists;

fn not_found(user_id: &str) -> SiteError {
    NotFoundError {
        entity: "Profile",
        id: user_id.to_string(),
    }
    .into()
}

fn audience(owner: &str, requester: Option<&str>, level: AdminLevel) -> Audience {
    if level.is_admin() || requester == Some(owner) {
        Audience::Owner
    } else {
        Audience::Visitor
    }
}

fn ensure_owner(owner: &str, requester: Option<&str>) -> Result<(), SiteError> {
    if requester == Some(owner) {
        Ok(())
    } else {
        Err(ForbiddenError::NotOwner.into())
    }
}

/// Application service for user profiles.
///
/// A private profile is only visible to its owner and to admins. Everyone
/// else gets a not-found answer, as if it did not exist.
pub struct ProfileService<P, A, U> {
    profiles: P,
    activity: A,
    users: U,
}

impl<P, A, U> ProfileService<P, A, U>
where
    P: ProfileRepository + Send + Sync,
    A: ActivityRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn new(profiles: P, activity: A, users: U) -> Self {
        Self {
            profiles,
            activity,
            users,
        }
    }

    async fn get(&self, user_id: &str) -> Result<UserProfile, SiteError> {
        self.profiles
            .get(user_id)
            .await?
            .ok_or_else(|| not_found(user_id))
    }

    async fn render(
        &self,
        profile: &UserProfile,
        audience: Audience,
    ) -> Result<ProfileView, SiteError> {
        let stats = self
            .activity
            .get_stats(&profile.user_id)
            .await?
            .unwrap_or_else(|| ActivityStats::empty(&profile.user_id));
        let records = self.activity.unlocked(&profile.user_id).await?;
        Ok(ProfileView::render(
            profile,
            audience,
            stats,
            UnlockedAchievement::resolve(records),
        ))
    }

    async fn render_all(
        &self,
        profiles: Vec<UserProfile>,
        requester: Option<&str>,
        level: AdminLevel,
    ) -> Result<Vec<ProfileView>, SiteError> {
        let mut views = Vec::with_capacity(profiles.len());
        for profile in &profiles {
            let audience = audience(&profile.user_id, requester, level);
            views.push(self.render(profile, audience).await?);
        }
        Ok(views)
    }

    /// Create the default profile of a freshly registered account.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when a profile already exists, or a
    /// storage error.
    pub async fn create_for_user(&self, user: &User) -> Result<UserProfile, SiteError> {
        let profile = UserProfile::new(&user.id.to_string(), &user.username)?;
        let created = self.profiles.create(profile).await?;
        tracing::info!(user_id = %created.user_id, "profile created");
        Ok(created)
    }

    /// Create a profile from an explicit request.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] when the user id is not a registered
    /// account, [`SiteError::Validation`] on invalid fields or when a profile
    /// already exists, or a storage error.
    pub async fn create_profile(&self, draft: &ProfileDraft) -> Result<ProfileView, SiteError> {
        if !user_exists(&self.users, &draft.user_id).await? {
            return Err(NotFoundError {
                entity: "User",
                id: draft.user_id.clone(),
            }
            .into());
        }
        let profile = UserProfile::from_draft(draft)?;
        let created = self.profiles.create(profile).await?;
        tracing::info!(user_id = %created.user_id, "profile created");
        self.render(&created, Audience::Owner).await
    }

    /// Profile as seen by `requester`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown profile or a private
    /// one the caller may not see, or a storage error.
    pub async fn get_profile(
        &self,
        user_id: &str,
        requester: Option<&str>,
        level: AdminLevel,
    ) -> Result<ProfileView, SiteError> {
        let profile = self.get(user_id).await?;
        let audience = audience(user_id, requester, level);
        if audience == Audience::Visitor && !profile.is_public() {
            return Err(not_found(user_id));
        }
        self.render(&profile, audience).await
    }

    /// Name and avatar of any profile, private ones included.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown profile, or a storage error.
    pub async fn basic_profile(&self, user_id: &str) -> Result<BasicProfile, SiteError> {
        Ok(BasicProfile::from(&self.get(user_id).await?))
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] unless the caller owns the profile
    /// or is an admin, [`SiteError::NotFound`], [`SiteError::Validation`]
    /// on invalid fields, or a storage error.
    pub async fn update_profile(
        &self,
        user_id: &str,
        requester: Option<&str>,
        level: AdminLevel,
        update: &ProfileUpdate,
    ) -> Result<ProfileView, SiteError> {
        if !level.is_admin() {
            ensure_owner(user_id, requester)?;
        }
        let mut profile = self.get(user_id).await?;
        profile.apply(update)?;
        let updated = self.profiles.update(profile).await?;
        self.render(&updated, Audience::Owner).await
    }

    /// Change what visitors may see. Only the owner may do this.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] for anyone but the owner,
    /// [`SiteError::NotFound`], or a storage error.
    pub async fn update_privacy(
        &self,
        user_id: &str,
        requester: Option<&str>,
        update: &PrivacyUpdate,
    ) -> Result<PrivacySettings, SiteError> {
        ensure_owner(user_id, requester)?;
        let mut profile = self.get(user_id).await?;
        profile.privacy.apply(update);
        let updated = self.profiles.update(profile).await?;
        tracing::info!(
            user_id,
            visibility = %updated.privacy.profile_visibility,
            "privacy updated"
        );
        Ok(updated.privacy)
    }

    /// Stamp the owner's last activity time. Unknown profiles are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] for anyone but the owner, or a storage error.
    pub async fn touch(&self, user_id: &str, requester: Option<&str>) -> Result<(), SiteError> {
        ensure_owner(user_id, requester)?;
        self.profiles.touch(user_id, now()).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] unless the caller owns the profile
    /// or is an admin, [`SiteError::NotFound`], or a storage error.
    pub async fn delete_profile(
        &self,
        user_id: &str,
        requester: Option<&str>,
        level: AdminLevel,
    ) -> Result<(), SiteError> {
        if !level.is_admin() {
            ensure_owner(user_id, requester)?;
        }
        if !self.profiles.delete(user_id).await? {
            return Err(not_found(user_id));
        }
        tracing::info!(user_id, "profile deleted");
        Ok(())
    }

    /// Public profiles, plus the caller's own, matching `query`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn search(
        &self,
        query: &str,
        requester: Option<&str>,
        level: AdminLevel,
    ) -> Result<Vec<ProfileView>, SiteError> {
        let mut candidates = self.profiles.find_public().await?;
        if let Some(own) = self.own_private(requester).await? {
            candidates.push(own);
        }
        candidates.retain(|p| p.matches(query));
        self.render_all(candidates, requester, level).await
    }

    /// Every public profile, ordered by display name.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn directory(
        &self,
        requester: Option<&str>,
        level: AdminLevel,
    ) -> Result<Vec<ProfileView>, SiteError> {
        let public = self.profiles.find_public().await?;
        self.render_all(public, requester, level).await
    }

    async fn own_private(&self, requester: Option<&str>) -> Result<Option<UserProfile>, SiteError> {
        let Some(requester) = requester else {
            return Ok(None);
        };
        Ok(self
            .profiles
            .get(requester)
            .await?
            .filter(|p| !p.is_public()))
    }
}
