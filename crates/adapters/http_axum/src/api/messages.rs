//! JSON REST handlers for the message wall.

use axum::extract::State;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use sitehub_app::services::message_service::ReactionRequest;
use sitehub_domain::activity::ActivityEvent;
use sitehub_domain::id::MessageId;
use sitehub_domain::message::Message;

use crate::api::activity::track;
use crate::api::{AdminQuery, OwnerQuery};
use crate::error::{ApiError, parse_id};
use crate::extract::{Json, Path, Query};
use crate::response::ApiResponse;
use crate::state::{AppState, Backend};

/// Response header telling clients whether posting is restricted.
pub const MUTED_HEADER: &str = "x-system-muted";

/// Request body for posting a message.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub user_id: String,
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub is_anonymous: bool,
    /// Kept as raw text: an id that does not parse is treated like one
    /// that no longer resolves.
    pub quoted_message_id: Option<String>,
    pub channel_id: Option<String>,
    pub image_url: Option<String>,
}

/// Request body for adding or removing a reaction.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionBody {
    pub message_id: MessageId,
    pub user_id: String,
    pub username: String,
    pub emoji: String,
}

impl From<ReactionBody> for ReactionRequest {
    fn from(body: ReactionBody) -> Self {
        Self {
            message_id: body.message_id,
            user_id: body.user_id,
            username: body.username,
            emoji: body.emoji,
        }
    }
}

#[derive(Serialize)]
pub struct ClearedPayload {
    pub deleted: u64,
}

/// `GET /api/messages`: every message, oldest first, with the mute state
/// in the `X-System-Muted` header.
pub async fn list<B: Backend>(State(state): State<AppState<B>>) -> Result<Response, ApiError> {
    let messages = state.messages.list_messages().await?;
    let muted = state.messages.is_muted().await?;

    let mut response = ApiResponse::ok(messages).into_response();
    response.headers_mut().insert(
        MUTED_HEADER,
        HeaderValue::from_static(if muted { "true" } else { "false" }),
    );
    Ok(response)
}

/// `GET /api/messages/is-muted`
pub async fn is_muted<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<ApiResponse<bool>, ApiError> {
    Ok(ApiResponse::ok(state.messages.is_muted().await?))
}

/// `POST /api/messages`
pub async fn post<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<AdminQuery>,
    Json(req): Json<PostMessageRequest>,
) -> Result<ApiResponse<Message>, ApiError> {
    let mut builder = Message::builder()
        .user_id(req.user_id)
        .name(req.name)
        .message(req.message)
        .anonymous(req.is_anonymous);
    if let Some(id) = req.quoted_message_id.and_then(|raw| raw.parse::<MessageId>().ok()) {
        builder = builder.quoted_message_id(id);
    }
    if let Some(channel_id) = req.channel_id {
        builder = builder.channel_id(channel_id);
    }
    if let Some(image_url) = req.image_url {
        builder = builder.image_url(image_url);
    }

    let level = state.level(query.admin_code.as_deref());
    let created = state.messages.post_message(builder.build()?, level).await?;
    track(&state, &created.user_id, ActivityEvent::Message).await;
    Ok(ApiResponse::created("Message posted", created))
}

/// `DELETE /api/messages/:id?userId=&adminCode=`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Result<ApiResponse<()>, ApiError> {
    let id: MessageId = parse_id("message id", &id)?;
    let level = state.level(query.admin_code.as_deref());
    state
        .messages
        .delete_message(id, query.user_id.as_deref(), level)
        .await?;
    Ok(ApiResponse::message("Message deleted"))
}

/// `POST /api/messages/toggle-mute?adminCode=`
pub async fn toggle_mute<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<AdminQuery>,
) -> Result<ApiResponse<bool>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    let muted = state.messages.toggle_mute(level).await?;
    let message = if muted { "Chat muted" } else { "Chat unmuted" };
    Ok(ApiResponse::with_message(message, muted))
}

/// `POST /api/messages/clear?adminCode=`
pub async fn clear<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<AdminQuery>,
) -> Result<ApiResponse<ClearedPayload>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    let deleted = state.messages.clear_messages(level).await?;
    Ok(ApiResponse::with_message(
        "All messages cleared",
        ClearedPayload { deleted },
    ))
}

/// `POST /api/messages/reactions/add`
pub async fn add_reaction<B: Backend>(
    State(state): State<AppState<B>>,
    Json(body): Json<ReactionBody>,
) -> Result<ApiResponse<Message>, ApiError> {
    let message = state.messages.add_reaction(&body.into()).await?;
    Ok(ApiResponse::ok(message))
}

/// `POST /api/messages/reactions/remove`
pub async fn remove_reaction<B: Backend>(
    State(state): State<AppState<B>>,
    Json(body): Json<ReactionBody>,
) -> Result<ApiResponse<Message>, ApiError> {
    let message = state.messages.remove_reaction(&body.into()).await?;
    Ok(ApiResponse::ok(message))
}
