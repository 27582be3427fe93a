//! JSON REST handlers for the leaderboard.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use sitehub_domain::activity::ActivityEvent;
use sitehub_domain::id::ScoreId;
use sitehub_domain::score::{DuplicateReport, Score, Submission};

use crate::api::AdminQuery;
use crate::api::activity::track;
use crate::error::{ApiError, parse_id};
use crate::extract::{Json, Path, Query};
use crate::response::ApiResponse;
use crate::state::{AppState, Backend};

/// Request body for submitting a result.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    pub user_id: String,
    pub username: String,
    pub game_type: String,
    pub score: i64,
    pub attempts: Option<i32>,
}

#[derive(Serialize)]
pub struct RemovedPayload {
    pub removed: u64,
}

/// `POST /api/scores`
pub async fn submit<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<SubmitScoreRequest>,
) -> Result<ApiResponse<Submission>, ApiError> {
    let score = Score::new(
        &req.user_id,
        &req.username,
        &req.game_type,
        req.score,
        req.attempts,
    )?;
    let event = ActivityEvent::Game {
        game_type: req.game_type,
        score: req.score,
    };
    let outcome = state.scores.submit_score(score).await?;
    track(&state, &req.user_id, event).await;
    Ok(ApiResponse::with_message(outcome.message, outcome))
}

/// `GET /api/scores/top/:game_type`
pub async fn top<B: Backend>(
    State(state): State<AppState<B>>,
    Path(game_type): Path<String>,
) -> Result<ApiResponse<Vec<Score>>, ApiError> {
    Ok(ApiResponse::ok(state.scores.top_scores(&game_type).await?))
}

/// `GET /api/scores/user/:user_id/:game_type`
pub async fn best<B: Backend>(
    State(state): State<AppState<B>>,
    Path((user_id, game_type)): Path<(String, String)>,
) -> Result<ApiResponse<Score>, ApiError> {
    Ok(ApiResponse::ok(
        state.scores.best_score(&user_id, &game_type).await?,
    ))
}

/// `DELETE /api/scores/:id?adminCode=`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Query(query): Query<AdminQuery>,
) -> Result<ApiResponse<()>, ApiError> {
    let id: ScoreId = parse_id("score id", &id)?;
    let level = state.level(query.admin_code.as_deref());
    state.scores.delete_score(level, id).await?;
    Ok(ApiResponse::message("Score deleted"))
}

/// `DELETE /api/scores/game/:game_type?adminCode=`
pub async fn clear_game<B: Backend>(
    State(state): State<AppState<B>>,
    Path(game_type): Path<String>,
    Query(query): Query<AdminQuery>,
) -> Result<ApiResponse<RemovedPayload>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    let removed = state.scores.clear_game(level, &game_type).await?;
    Ok(ApiResponse::with_message(
        format!("Cleared {removed} scores for {game_type}"),
        RemovedPayload { removed },
    ))
}

/// `GET /api/scores/duplicates?adminCode=`
pub async fn duplicates<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<AdminQuery>,
) -> Result<ApiResponse<DuplicateReport>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    Ok(ApiResponse::ok(state.scores.duplicate_report(level).await?))
}

/// `POST /api/scores/cleanup-duplicates?adminCode=`, also mounted at
/// `/api/scores/force-cleanup`.
pub async fn cleanup_duplicates<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<AdminQuery>,
) -> Result<ApiResponse<RemovedPayload>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    let removed = state.scores.cleanup_duplicates(level).await?;
    Ok(ApiResponse::with_message(
        format!("Removed {removed} duplicate scores"),
        RemovedPayload { removed },
    ))
}
