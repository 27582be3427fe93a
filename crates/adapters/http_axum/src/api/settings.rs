//! JSON REST handlers for site-wide switches.

use std::collections::BTreeMap;

use axum::extract::State;
use serde::Deserialize;

use sitehub_domain::setting::SystemSetting;

use crate::api::AdminQuery;
use crate::error::ApiError;
use crate::extract::{Path, Query};
use crate::response::ApiResponse;
use crate::state::{AppState, Backend};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetQuery {
    pub value: String,
    pub admin_code: Option<String>,
}

/// `GET /api/settings/public`
pub async fn public<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<ApiResponse<BTreeMap<String, String>>, ApiError> {
    Ok(ApiResponse::ok(state.settings.public_settings().await?))
}

/// `GET /api/settings?adminCode=`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<AdminQuery>,
) -> Result<ApiResponse<Vec<SystemSetting>>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    Ok(ApiResponse::ok(state.settings.list_settings(level).await?))
}

/// `POST /api/settings/:key?value=&adminCode=`
pub async fn set<B: Backend>(
    State(state): State<AppState<B>>,
    Path(key): Path<String>,
    Query(query): Query<SetQuery>,
) -> Result<ApiResponse<SystemSetting>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    let saved = state.settings.set_setting(level, &key, &query.value).await?;
    Ok(ApiResponse::with_message("Setting updated", saved))
}
