//! JSON REST handlers for personal notes.

use axum::extract::State;
use serde::Deserialize;

use sitehub_domain::id::NoteId;
use sitehub_domain::note::{Note, NoteDraft};

use crate::api::{AdminQuery, OwnerQuery};
use crate::error::{ApiError, parse_id};
use crate::extract::{Json, Path, Query};
use crate::response::ApiResponse;
use crate::state::{AppState, Backend};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub user_id: String,
    pub username: String,
    #[serde(flatten)]
    pub draft: NoteDraft,
}

fn owner(query: &OwnerQuery) -> &str {
    query.user_id.as_deref().unwrap_or_default()
}

/// `GET /api/notes?userId=&adminCode=`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<OwnerQuery>,
) -> Result<ApiResponse<Vec<Note>>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    Ok(ApiResponse::ok(
        state.notes.list_notes(owner(&query), level).await?,
    ))
}

/// `GET /api/notes/all?adminCode=`
pub async fn list_all<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<AdminQuery>,
) -> Result<ApiResponse<Vec<Note>>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    Ok(ApiResponse::ok(state.notes.list_all_notes(level).await?))
}

/// `POST /api/notes`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<ApiResponse<Note>, ApiError> {
    let note = state
        .notes
        .create_note(&req.user_id, &req.username, req.draft)
        .await?;
    Ok(ApiResponse::created("Note created", note))
}

/// `PUT /api/notes/:id?userId=&adminCode=`
pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
    Json(draft): Json<NoteDraft>,
) -> Result<ApiResponse<Note>, ApiError> {
    let id: NoteId = parse_id("note id", &id)?;
    let level = state.level(query.admin_code.as_deref());
    let note = state
        .notes
        .update_note(id, owner(&query), level, draft)
        .await?;
    Ok(ApiResponse::with_message("Note updated", note))
}

/// `DELETE /api/notes/:id?userId=&adminCode=`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Result<ApiResponse<()>, ApiError> {
    let id: NoteId = parse_id("note id", &id)?;
    let level = state.level(query.admin_code.as_deref());
    state.notes.delete_note(id, owner(&query), level).await?;
    Ok(ApiResponse::message("Note deleted"))
}
