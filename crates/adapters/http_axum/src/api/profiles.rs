//! Public profiles, their privacy, and the member directory.

use axum::extract::State;
use serde::Deserialize;

use sitehub_domain::profile::{
    BasicProfile, PrivacySettings, PrivacyUpdate, ProfileDraft, ProfileUpdate, ProfileView,
};

use crate::error::ApiError;
use crate::extract::{Json, Path, Query};
use crate::response::ApiResponse;
use crate::state::{AppState, Backend};

/// `?requesterId=&adminCode=` identifying who looks at a profile.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequesterQuery {
    pub requester_id: Option<String>,
    pub admin_code: Option<String>,
}

/// `?q=&requesterId=&adminCode=`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub q: String,
    pub requester_id: Option<String>,
    pub admin_code: Option<String>,
}

/// `POST /api/profiles`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    Json(draft): Json<ProfileDraft>,
) -> Result<ApiResponse<ProfileView>, ApiError> {
    let view = state.profiles.create_profile(&draft).await?;
    Ok(ApiResponse::created("Profile created successfully", view))
}

/// `GET /api/profiles/:user_id?requesterId=&adminCode=`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    Path(user_id): Path<String>,
    Query(query): Query<RequesterQuery>,
) -> Result<ApiResponse<ProfileView>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    let view = state
        .profiles
        .get_profile(&user_id, query.requester_id.as_deref(), level)
        .await?;
    Ok(ApiResponse::ok(view))
}

/// `PUT /api/profiles/:user_id?requesterId=&adminCode=`
pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    Path(user_id): Path<String>,
    Query(query): Query<RequesterQuery>,
    Json(update): Json<ProfileUpdate>,
) -> Result<ApiResponse<ProfileView>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    let view = state
        .profiles
        .update_profile(&user_id, query.requester_id.as_deref(), level, &update)
        .await?;
    Ok(ApiResponse::with_message("Profile updated successfully", view))
}

/// `DELETE /api/profiles/:user_id?requesterId=&adminCode=`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(user_id): Path<String>,
    Query(query): Query<RequesterQuery>,
) -> Result<ApiResponse<()>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    state
        .profiles
        .delete_profile(&user_id, query.requester_id.as_deref(), level)
        .await?;
    Ok(ApiResponse::message("Profile deleted successfully"))
}

/// `GET /api/profiles/search?q=&requesterId=`
pub async fn search<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<SearchQuery>,
) -> Result<ApiResponse<Vec<ProfileView>>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    let found = state
        .profiles
        .search(&query.q, query.requester_id.as_deref(), level)
        .await?;
    Ok(ApiResponse::ok(found))
}

/// `GET /api/profiles/directory?requesterId=`
pub async fn directory<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<RequesterQuery>,
) -> Result<ApiResponse<Vec<ProfileView>>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    let public = state
        .profiles
        .directory(query.requester_id.as_deref(), level)
        .await?;
    Ok(ApiResponse::ok(public))
}

/// `PUT /api/profiles/:user_id/privacy?requesterId=`
pub async fn update_privacy<B: Backend>(
    State(state): State<AppState<B>>,
    Path(user_id): Path<String>,
    Query(query): Query<RequesterQuery>,
    Json(update): Json<PrivacyUpdate>,
) -> Result<ApiResponse<PrivacySettings>, ApiError> {
    let privacy = state
        .profiles
        .update_privacy(&user_id, query.requester_id.as_deref(), &update)
        .await?;
    Ok(ApiResponse::with_message(
        "Privacy settings updated successfully",
        privacy,
    ))
}

/// `POST /api/profiles/:user_id/activity?requesterId=`
pub async fn touch<B: Backend>(
    State(state): State<AppState<B>>,
    Path(user_id): Path<String>,
    Query(query): Query<RequesterQuery>,
) -> Result<ApiResponse<()>, ApiError> {
    state
        .profiles
        .touch(&user_id, query.requester_id.as_deref())
        .await?;
    Ok(ApiResponse::message("Last active updated"))
}

/// `GET /api/profiles/:user_id/basic`
pub async fn basic<B: Backend>(
    State(state): State<AppState<B>>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<BasicProfile>, ApiError> {
    Ok(ApiResponse::ok(state.profiles.basic_profile(&user_id).await?))
}
