//! JSON REST handlers for vocabulary flashcards and favorites.

use axum::extract::State;
use serde::Serialize;

use sitehub_domain::id::UserId;
use sitehub_domain::vocabulary::VocabularyItem;

use crate::api::AdminQuery;
use crate::error::{ApiError, parse_id};
use crate::extract::{Json, Path, Query};
use crate::response::ApiResponse;
use crate::state::{AppState, Backend};

#[derive(Serialize)]
pub struct ReloadPayload {
    pub count: usize,
}

#[derive(Serialize)]
pub struct ImportPayload {
    pub imported: u64,
}

/// `GET /api/vocabulary/random`
pub async fn random<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<ApiResponse<VocabularyItem>, ApiError> {
    Ok(ApiResponse::ok(state.vocabulary.random_item().await?))
}

/// `GET /api/vocabulary/daily`
pub async fn daily<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<ApiResponse<VocabularyItem>, ApiError> {
    Ok(ApiResponse::ok(state.vocabulary.daily_item().await?))
}

/// `GET /api/vocabulary/all`
pub async fn all<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<ApiResponse<Vec<VocabularyItem>>, ApiError> {
    Ok(ApiResponse::ok(state.vocabulary.all_items().await?))
}

/// `POST /api/vocabulary/reload?adminCode=`
pub async fn reload<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<AdminQuery>,
) -> Result<ApiResponse<ReloadPayload>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    let count = state.vocabulary.reload(level).await?;
    Ok(ApiResponse::with_message(
        "Data reloaded successfully",
        ReloadPayload { count },
    ))
}

/// `POST /api/vocabulary/import?adminCode=` with a JSON array of items.
pub async fn import<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<AdminQuery>,
    Json(items): Json<Vec<VocabularyItem>>,
) -> Result<ApiResponse<ImportPayload>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    let imported = state.vocabulary.import(level, items).await?;
    Ok(ApiResponse::with_message(
        format!("Imported {imported} items"),
        ImportPayload { imported },
    ))
}

/// `GET /api/vocabulary/favorites/:user_id`
pub async fn favorites<B: Backend>(
    State(state): State<AppState<B>>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<i64>>, ApiError> {
    let user: UserId = parse_id("user id", &user_id)?;
    Ok(ApiResponse::ok(state.vocabulary.favorites(user).await?))
}

/// `GET /api/vocabulary/favorites/:user_id/details`
pub async fn favorite_details<B: Backend>(
    State(state): State<AppState<B>>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<VocabularyItem>>, ApiError> {
    let user: UserId = parse_id("user id", &user_id)?;
    Ok(ApiResponse::ok(state.vocabulary.favorite_details(user).await?))
}

/// `POST /api/vocabulary/favorites/:user_id/:item_id`
pub async fn add_favorite<B: Backend>(
    State(state): State<AppState<B>>,
    Path((user_id, item_id)): Path<(String, i64)>,
) -> Result<ApiResponse<Vec<i64>>, ApiError> {
    let user: UserId = parse_id("user id", &user_id)?;
    Ok(ApiResponse::ok(
        state.vocabulary.add_favorite(user, item_id).await?,
    ))
}

/// `DELETE /api/vocabulary/favorites/:user_id/:item_id`
pub async fn remove_favorite<B: Backend>(
    State(state): State<AppState<B>>,
    Path((user_id, item_id)): Path<(String, i64)>,
) -> Result<ApiResponse<Vec<i64>>, ApiError> {
    let user: UserId = parse_id("user id", &user_id)?;
    Ok(ApiResponse::ok(
        state.vocabulary.remove_favorite(user, item_id).await?,
    ))
}
