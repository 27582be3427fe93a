//! JSON REST handlers for suggestions and their comment threads.

use axum::extract::State;
use serde::Deserialize;

use sitehub_app::services::suggestion_service::NewComment;
use sitehub_domain::id::{CommentId, SuggestionId};
use sitehub_domain::suggestion::{Comment, Suggestion, SuggestionStatus, SuggestionSummary};

use crate::api::{AdminQuery, OwnerQuery};
use crate::error::{ApiError, parse_id};
use crate::extract::{Json, Path, Query};
use crate::response::ApiResponse;
use crate::state::{AppState, Backend};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSuggestionRequest {
    pub user_id: String,
    pub username: String,
    pub suggestion: String,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub quoted_comment_id: Option<CommentId>,
}

/// `GET /api/suggestions`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<ApiResponse<Vec<SuggestionSummary>>, ApiError> {
    Ok(ApiResponse::ok(state.suggestions.list_suggestions().await?))
}

/// `GET /api/suggestions/user/:user_id`
pub async fn list_for_user<B: Backend>(
    State(state): State<AppState<B>>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<SuggestionSummary>>, ApiError> {
    let suggestions = state.suggestions.list_user_suggestions(&user_id).await?;
    Ok(ApiResponse::ok(suggestions))
}

/// `POST /api/suggestions`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<CreateSuggestionRequest>,
) -> Result<ApiResponse<Suggestion>, ApiError> {
    let created = state
        .suggestions
        .create_suggestion(&req.user_id, &req.username, &req.suggestion)
        .await?;
    Ok(ApiResponse::created("Suggestion submitted successfully", created))
}

/// `PUT /api/suggestions/:id/status?adminCode=`
pub async fn update_status<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Query(query): Query<AdminQuery>,
    Json(req): Json<StatusRequest>,
) -> Result<ApiResponse<Suggestion>, ApiError> {
    let id: SuggestionId = parse_id("suggestion id", &id)?;
    let status: SuggestionStatus = req.status.parse()?;
    let level = state.level(query.admin_code.as_deref());
    let updated = state.suggestions.update_status(level, id, status).await?;
    Ok(ApiResponse::with_message("Status updated", updated))
}

/// `DELETE /api/suggestions/:id?userId=&adminCode=`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Result<ApiResponse<()>, ApiError> {
    let id: SuggestionId = parse_id("suggestion id", &id)?;
    let level = state.level(query.admin_code.as_deref());
    state
        .suggestions
        .delete_suggestion(id, query.user_id.as_deref(), level)
        .await?;
    Ok(ApiResponse::message("Suggestion deleted successfully"))
}

/// `GET /api/suggestions/:id/comments`
pub async fn list_comments<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Vec<Comment>>, ApiError> {
    let id: SuggestionId = parse_id("suggestion id", &id)?;
    Ok(ApiResponse::ok(state.suggestions.list_comments(id).await?))
}

/// `POST /api/suggestions/:id/comments`
pub async fn add_comment<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> Result<ApiResponse<Comment>, ApiError> {
    let id: SuggestionId = parse_id("suggestion id", &id)?;
    let comment = state
        .suggestions
        .add_comment(
            id,
            NewComment {
                user_id: req.user_id,
                username: req.username,
                content: req.content,
                quoted_comment_id: req.quoted_comment_id,
            },
        )
        .await?;
    Ok(ApiResponse::created("Comment added successfully", comment))
}

/// `DELETE /api/suggestions/comments/:comment_id?userId=&adminCode=`
pub async fn delete_comment<B: Backend>(
    State(state): State<AppState<B>>,
    Path(comment_id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Result<ApiResponse<()>, ApiError> {
    let id: CommentId = parse_id("comment id", &comment_id)?;
    let level = state.level(query.admin_code.as_deref());
    state
        .suggestions
        .delete_comment(id, query.user_id.as_deref(), level)
        .await?;
    Ok(ApiResponse::message("Comment deleted successfully"))
}
