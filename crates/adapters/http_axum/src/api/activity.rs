//! Activity stats and achievements.

use axum::extract::State;
use serde::Deserialize;

use sitehub_domain::activity::{Achievement, ActivityEvent, ActivityStats, UnlockedAchievement};

use crate::api::AdminQuery;
use crate::error::ApiError;
use crate::extract::{Path, Query};
use crate::response::ApiResponse;
use crate::state::{AppState, Backend};

/// Count `event` for `user_id` after the action itself succeeded.
///
/// Failures are logged and swallowed so they never undo the action.
pub(crate) async fn track<B: Backend>(state: &AppState<B>, user_id: &str, event: ActivityEvent) {
    if let Err(err) = state.activity.record(user_id, event).await {
        tracing::warn!(user_id, error = %err, "could not record activity");
    }
}

/// `?userId=` of an explicit message record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageActivityQuery {
    pub user_id: String,
}

/// `?userId=&gameType=&score=` of an explicit game record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameActivityQuery {
    pub user_id: String,
    pub game_type: String,
    pub score: i64,
}

/// `POST /api/activity/message?userId=`
pub async fn record_message<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<MessageActivityQuery>,
) -> Result<ApiResponse<Vec<&'static Achievement>>, ApiError> {
    let unlocked = state
        .activity
        .record(&query.user_id, ActivityEvent::Message)
        .await?;
    Ok(ApiResponse::with_message("Message activity recorded", unlocked))
}

/// `POST /api/activity/game?userId=&gameType=&score=`
pub async fn record_game<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<GameActivityQuery>,
) -> Result<ApiResponse<Vec<&'static Achievement>>, ApiError> {
    let event = ActivityEvent::Game {
        game_type: query.game_type,
        score: query.score,
    };
    let unlocked = state.activity.record(&query.user_id, event).await?;
    Ok(ApiResponse::with_message("Game activity recorded", unlocked))
}

/// `GET /api/activity/achievements`
pub async fn catalog<B: Backend>(
    State(state): State<AppState<B>>,
) -> ApiResponse<&'static [Achievement]> {
    ApiResponse::ok(state.activity.catalog())
}

/// `GET /api/activity/:user_id/stats`
pub async fn stats<B: Backend>(
    State(state): State<AppState<B>>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<ActivityStats>, ApiError> {
    Ok(ApiResponse::ok(state.activity.stats(&user_id).await?))
}

/// `GET /api/activity/:user_id/achievements`
pub async fn achievements<B: Backend>(
    State(state): State<AppState<B>>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<UnlockedAchievement>>, ApiError> {
    Ok(ApiResponse::ok(state.activity.achievements(&user_id).await?))
}

/// `POST /api/admin/profiles/:user_id/achievements/check?adminCode=`
pub async fn recheck<B: Backend>(
    State(state): State<AppState<B>>,
    Path(user_id): Path<String>,
    Query(query): Query<AdminQuery>,
) -> Result<ApiResponse<Vec<&'static Achievement>>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    let unlocked = state.activity.recheck(level, &user_id).await?;
    Ok(ApiResponse::with_message(
        format!("{} achievements unlocked", unlocked.len()),
        unlocked,
    ))
}
