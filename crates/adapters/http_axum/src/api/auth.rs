//! Registration, login and admin code checks.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use sitehub_domain::error::ValidationError;
use sitehub_domain::id::UserId;
use sitehub_domain::user::User;

use crate::error::ApiError;
use crate::extract::Json;
use crate::response::ApiResponse;
use crate::state::{AppState, Backend};

/// Request body for register and login.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Request body for the admin code check.
#[derive(Deserialize)]
pub struct VerifyAdminRequest {
    pub code: String,
}

/// Public part of an account returned after authentication.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPayload {
    pub user_id: UserId,
    pub username: String,
}

impl From<User> for AccountPayload {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
        }
    }
}

#[derive(Serialize)]
pub struct RolePayload {
    pub role: &'static str,
}

/// `POST /api/auth/register`
pub async fn register<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<ApiResponse<AccountPayload>, ApiError> {
    let user = state.users.register(&req.username, &req.password).await?;
    if let Err(err) = state.profiles.create_for_user(&user).await {
        tracing::warn!(user_id = %user.id, error = %err, "could not create profile");
    }
    Ok(ApiResponse::created(
        "User registered successfully",
        user.into(),
    ))
}

/// `POST /api/auth/login`
pub async fn login<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<ApiResponse<AccountPayload>, ApiError> {
    let user = state.users.login(&req.username, &req.password).await?;
    Ok(ApiResponse::with_message("Login successful", user.into()))
}

/// `POST /api/auth/verify-admin`
pub async fn verify_admin<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<VerifyAdminRequest>,
) -> Result<ApiResponse<RolePayload>, ApiError> {
    let role = state
        .level(Some(&req.code))
        .role()
        .ok_or(ValidationError::InvalidAdminCode)?;
    Ok(ApiResponse::ok(RolePayload { role }))
}
