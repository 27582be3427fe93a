//! Note service: personal notes with owner-only editing.

use sitehub_domain::admin::AdminLevel;
use sitehub_domain::error::{NotFoundError, SiteError};
use sitehub_domain::id::NoteId;
use sitehub_domain::note::{Note, NoteDraft};

use crate::ports::NoteRepository;

/// Application service for notes.
///
/// Owners manage their own notes; the super admin can read and manage all
/// of them.
pub struct NoteService<R> {
    repo: R,
}

impl<R: NoteRepository + Send + Sync> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    async fn get_note(&self, id: NoteId) -> Result<Note, SiteError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Note",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn get_editable(
        &self,
        id: NoteId,
        user_id: &str,
        level: AdminLevel,
    ) -> Result<Note, SiteError> {
        let note = self.get_note(id).await?;
        if level != AdminLevel::SuperAdmin {
            note.ensure_owner(user_id)?;
        }
        Ok(note)
    }

    /// Notes visible to the caller, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_notes(
        &self,
        user_id: &str,
        level: AdminLevel,
    ) -> Result<Vec<Note>, SiteError> {
        if level == AdminLevel::SuperAdmin {
            self.repo.get_all().await
        } else {
            self.repo.find_by_user(user_id).await
        }
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without the super admin code, or a storage error.
    pub async fn list_all_notes(&self, level: AdminLevel) -> Result<Vec<Note>, SiteError> {
        level.require_super_admin()?;
        self.repo.get_all().await
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for a blank owner, title or color,
    /// or a storage error.
    pub async fn create_note(
        &self,
        user_id: &str,
        username: &str,
        draft: NoteDraft,
    ) -> Result<Note, SiteError> {
        let note = Note::new(user_id, username, draft)?;
        self.repo.create(note).await
    }

    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown note,
    /// [`SiteError::Forbidden`] when the caller does not own it,
    /// [`SiteError::Validation`] for an invalid draft, or a storage error.
    pub async fn update_note(
        &self,
        id: NoteId,
        user_id: &str,
        level: AdminLevel,
        draft: NoteDraft,
    ) -> Result<Note, SiteError> {
        let mut note = self.get_editable(id, user_id, level).await?;
        note.apply(draft)?;
        self.repo.update(note).await
    }

    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown note,
    /// [`SiteError::Forbidden`] when the caller does not own it, or a storage error.
    pub async fn delete_note(
        &self,
        id: NoteId,
        user_id: &str,
        level: AdminLevel,
    ) -> Result<(), SiteError> {
        self.get_editable(id, user_id, level).await?;
        self.repo.delete(id).await?;
        if level == AdminLevel::SuperAdmin {
            tracing::info!(note_id = %id, "note deleted by super admin");
        }
        Ok(())
    }
}
