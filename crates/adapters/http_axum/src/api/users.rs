//! Language preferences and super-admin account management.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use sitehub_app::services::user_service::UserUpdate;
use sitehub_domain::id::UserId;
use sitehub_domain::user::{Language, User};

use crate::api::auth::CredentialsRequest;
use crate::error::{ApiError, parse_id};
use crate::extract::{Json, Path, Query};
use crate::response::ApiResponse;
use crate::state::{AppState, Backend};

/// `?superAdminCode=` carried by account management requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperAdminQuery {
    pub super_admin_code: Option<String>,
}

#[derive(Deserialize, Serialize)]
pub struct LanguagePayload<L> {
    pub language: L,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            username: req.username.filter(|u| !u.trim().is_empty()),
            password: req.password.filter(|p| !p.is_empty()),
        }
    }
}

/// `GET /api/users/:user_id/language`
pub async fn get_language<B: Backend>(
    State(state): State<AppState<B>>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<LanguagePayload<Language>>, ApiError> {
    let id: UserId = parse_id("user id", &user_id)?;
    let language = state.users.get_language(id).await?;
    Ok(ApiResponse::ok(LanguagePayload { language }))
}

/// `PUT /api/users/:user_id/language`
pub async fn set_language<B: Backend>(
    State(state): State<AppState<B>>,
    Path(user_id): Path<String>,
    Json(req): Json<LanguagePayload<String>>,
) -> Result<ApiResponse<LanguagePayload<Language>>, ApiError> {
    let id: UserId = parse_id("user id", &user_id)?;
    let language = state.users.set_language(id, &req.language).await?;
    Ok(ApiResponse::with_message(
        "Language updated",
        LanguagePayload { language },
    ))
}

/// `GET /api/superadmin/users?superAdminCode=`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<SuperAdminQuery>,
) -> Result<ApiResponse<Vec<User>>, ApiError> {
    let level = state.level(query.super_admin_code.as_deref());
    Ok(ApiResponse::ok(state.users.list_users(level).await?))
}

/// `POST /api/superadmin/users?superAdminCode=`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<SuperAdminQuery>,
    Json(req): Json<CredentialsRequest>,
) -> Result<ApiResponse<User>, ApiError> {
    let level = state.level(query.super_admin_code.as_deref());
    let user = state
        .users
        .create_user(level, &req.username, &req.password)
        .await?;
    Ok(ApiResponse::created("User created", user))
}

/// `PUT /api/superadmin/users/:id?superAdminCode=`
pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Query(query): Query<SuperAdminQuery>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<ApiResponse<User>, ApiError> {
    let id: UserId = parse_id("user id", &id)?;
    let level = state.level(query.super_admin_code.as_deref());
    let user = state.users.update_user(level, id, req.into()).await?;
    Ok(ApiResponse::with_message("User updated", user))
}

/// `DELETE /api/superadmin/users/:id?superAdminCode=`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Query(query): Query<SuperAdminQuery>,
) -> Result<ApiResponse<()>, ApiError> {
    let id: UserId = parse_id("user id", &id)?;
    let level = state.level(query.super_admin_code.as_deref());
    state.users.delete_user(level, id).await?;
    Ok(ApiResponse::message("User deleted"))
}
