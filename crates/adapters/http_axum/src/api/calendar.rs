//! Calendar zone configuration and the holiday proxy.
//!
//! Proxy endpoints return the upstream JSON as-is, without the envelope.

use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;

use sitehub_domain::calendar::CalendarConfig;

use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::response::ApiResponse;
use crate::state::{AppState, Backend};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonesRequest {
    pub zones: Vec<String>,
    pub admin_code: Option<String>,
}

/// `GET /api/calendar-config`
pub async fn config<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<ApiResponse<CalendarConfig>, ApiError> {
    Ok(ApiResponse::ok(state.calendar.config().await?))
}

/// `POST /api/calendar-config`
pub async fn set_zones<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<ZonesRequest>,
) -> Result<ApiResponse<CalendarConfig>, ApiError> {
    let level = state.level(req.admin_code.as_deref());
    let saved = state.calendar.set_zones(level, req.zones.as_slice()).await?;
    Ok(ApiResponse::with_message("Calendar configuration updated", saved))
}

/// `GET /api/calendar/proxy/holidays/:year`
pub async fn public_holidays<B: Backend>(
    State(state): State<AppState<B>>,
    Path(year): Path<i32>,
) -> Result<axum::Json<Value>, ApiError> {
    Ok(axum::Json(state.calendar.public_holidays(year).await?))
}

/// `GET /api/calendar/proxy/school-holidays/:school_year`
pub async fn school_holidays<B: Backend>(
    State(state): State<AppState<B>>,
    Path(school_year): Path<String>,
) -> Result<axum::Json<Value>, ApiError> {
    Ok(axum::Json(state.calendar.school_holidays(&school_year).await?))
}
