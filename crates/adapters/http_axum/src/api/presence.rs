//! JSON REST handlers for the online counter.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use sitehub_domain::presence::PresenceUpdate;

use crate::api::AdminQuery;
use crate::error::ApiError;
use crate::extract::{Json, Query};
use crate::response::ApiResponse;
use crate::state::{AppState, Backend};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatRequest {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Serialize)]
pub struct CountPayload {
    pub count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityPayload {
    pub show_to_all: bool,
}

/// `POST /api/presence/heartbeat`
pub async fn heartbeat<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<HeartbeatRequest>,
) -> Result<ApiResponse<CountPayload>, ApiError> {
    let count = state.presence.heartbeat(&req.user_id).await?;
    Ok(ApiResponse::with_message(
        "Heartbeat updated",
        CountPayload { count },
    ))
}

/// `GET /api/presence/count`
pub async fn count<B: Backend>(State(state): State<AppState<B>>) -> ApiResponse<PresenceUpdate> {
    ApiResponse::ok(state.presence.snapshot())
}

/// `POST /api/presence/toggle-visibility?adminCode=`
pub async fn toggle_visibility<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<AdminQuery>,
) -> Result<ApiResponse<VisibilityPayload>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    let show_to_all = state.presence.toggle_visibility(level).await?;
    Ok(ApiResponse::ok(VisibilityPayload { show_to_all }))
}
