//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod activity;
#[allow(clippy::missing_errors_doc)]
pub mod auth;
#[allow(clippy::missing_errors_doc)]
pub mod calendar;
#[allow(clippy::missing_errors_doc)]
pub mod games;
#[allow(clippy::missing_errors_doc)]
pub mod messages;
#[allow(clippy::missing_errors_doc)]
pub mod notes;
#[allow(clippy::missing_errors_doc)]
pub mod presence;
#[allow(clippy::missing_errors_doc)]
pub mod profiles;
#[allow(clippy::missing_errors_doc)]
pub mod scores;
#[allow(clippy::missing_errors_doc)]
pub mod settings;
pub mod sse;
#[allow(clippy::missing_errors_doc)]
pub mod suggestions;
#[allow(clippy::missing_errors_doc)]
pub mod users;
#[allow(clippy::missing_errors_doc)]
pub mod vocabulary;

use axum::Router;
use axum::routing::{delete, get, post, put};
use serde::Deserialize;

use crate::state::{AppState, Backend};

/// `?adminCode=` carried by privileged requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminQuery {
    pub admin_code: Option<String>,
}

/// `?userId=&adminCode=` carried by owner-or-admin requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    pub user_id: Option<String>,
    pub admin_code: Option<String>,
}

/// Build the `/api` sub-router.
#[allow(clippy::too_many_lines)]
pub fn routes<B: Backend>() -> Router<AppState<B>> {
    Router::new()
        // Accounts
        .route("/auth/register", post(auth::register::<B>))
        .route("/auth/login", post(auth::login::<B>))
        .route("/auth/verify-admin", post(auth::verify_admin::<B>))
        .route(
            "/users/{user_id}/language",
            get(users::get_language::<B>).put(users::set_language::<B>),
        )
        .route(
            "/superadmin/users",
            get(users::list::<B>).post(users::create::<B>),
        )
        .route(
            "/superadmin/users/{id}",
            put(users::update::<B>).delete(users::delete::<B>),
        )
        // Profiles
        .route("/profiles", post(profiles::create::<B>))
        .route("/profiles/search", get(profiles::search::<B>))
        .route("/profiles/directory", get(profiles::directory::<B>))
        .route(
            "/profiles/{user_id}",
            get(profiles::get::<B>)
                .put(profiles::update::<B>)
                .delete(profiles::delete::<B>),
        )
        .route(
            "/profiles/{user_id}/privacy",
            put(profiles::update_privacy::<B>),
        )
        .route("/profiles/{user_id}/activity", post(profiles::touch::<B>))
        .route("/profiles/{user_id}/basic", get(profiles::basic::<B>))
        // Activity
        .route("/activity/message", post(activity::record_message::<B>))
        .route("/activity/game", post(activity::record_game::<B>))
        .route("/activity/achievements", get(activity::catalog::<B>))
        .route("/activity/{user_id}/stats", get(activity::stats::<B>))
        .route(
            "/activity/{user_id}/achievements",
            get(activity::achievements::<B>),
        )
        .route(
            "/admin/profiles/{user_id}/achievements/check",
            post(activity::recheck::<B>),
        )
        // Wall
        .route(
            "/messages",
            get(messages::list::<B>).post(messages::post::<B>),
        )
        .route("/messages/is-muted", get(messages::is_muted::<B>))
        .route("/messages/toggle-mute", post(messages::toggle_mute::<B>))
        .route("/messages/clear", post(messages::clear::<B>))
        .route("/messages/reactions/add", post(messages::add_reaction::<B>))
        .route(
            "/messages/reactions/remove",
            post(messages::remove_reaction::<B>),
        )
        .route("/messages/{id}", delete(messages::delete::<B>))
        // Suggestions
        .route(
            "/suggestions",
            get(suggestions::list::<B>).post(suggestions::create::<B>),
        )
        .route(
            "/suggestions/user/{user_id}",
            get(suggestions::list_for_user::<B>),
        )
        .route("/suggestions/{id}", delete(suggestions::delete::<B>))
        .route(
            "/suggestions/{id}/status",
            put(suggestions::update_status::<B>),
        )
        .route(
            "/suggestions/{id}/comments",
            get(suggestions::list_comments::<B>).post(suggestions::add_comment::<B>),
        )
        .route(
            "/suggestions/comments/{comment_id}",
            delete(suggestions::delete_comment::<B>),
        )
        // Leaderboard
        .route("/scores", post(scores::submit::<B>))
        .route("/scores/top/{game_type}", get(scores::top::<B>))
        .route("/scores/user/{user_id}/{game_type}", get(scores::best::<B>))
        .route("/scores/game/{game_type}", delete(scores::clear_game::<B>))
        .route("/scores/duplicates", get(scores::duplicates::<B>))
        .route(
            "/scores/cleanup-duplicates",
            post(scores::cleanup_duplicates::<B>),
        )
        .route("/scores/force-cleanup", post(scores::cleanup_duplicates::<B>))
        .route("/scores/{id}", delete(scores::delete::<B>))
        // Games
        .route("/games", get(games::list::<B>))
        .route(
            "/games/{game_type}/status",
            get(games::status::<B>).post(games::set_status::<B>),
        )
        .route("/games/{game_type}/toggle", post(games::toggle::<B>))
        .route("/maze/generate", get(games::generate_maze::<B>))
        // Vocabulary
        .route("/vocabulary/random", get(vocabulary::random::<B>))
        .route("/vocabulary/daily", get(vocabulary::daily::<B>))
        .route("/vocabulary/all", get(vocabulary::all::<B>))
        .route("/vocabulary/reload", post(vocabulary::reload::<B>))
        .route("/vocabulary/import", post(vocabulary::import::<B>))
        .route(
            "/vocabulary/favorites/{user_id}",
            get(vocabulary::favorites::<B>),
        )
        .route(
            "/vocabulary/favorites/{user_id}/details",
            get(vocabulary::favorite_details::<B>),
        )
        .route(
            "/vocabulary/favorites/{user_id}/{item_id}",
            post(vocabulary::add_favorite::<B>).delete(vocabulary::remove_favorite::<B>),
        )
        // Notes
        .route("/notes", get(notes::list::<B>).post(notes::create::<B>))
        .route("/notes/all", get(notes::list_all::<B>))
        .route(
            "/notes/{id}",
            put(notes::update::<B>).delete(notes::delete::<B>),
        )
        // Settings
        .route("/settings", get(settings::list::<B>))
        .route("/settings/public", get(settings::public::<B>))
        .route("/settings/{key}", post(settings::set::<B>))
        // Calendar
        .route(
            "/calendar-config",
            get(calendar::config::<B>).post(calendar::set_zones::<B>),
        )
        .route(
            "/calendar/proxy/holidays/{year}",
            get(calendar::public_holidays::<B>),
        )
        .route(
            "/calendar/proxy/school-holidays/{school_year}",
            get(calendar::school_holidays::<B>),
        )
        // Presence
        .route("/presence/heartbeat", post(presence::heartbeat::<B>))
        .route("/presence/count", get(presence::count::<B>))
        .route(
            "/presence/toggle-visibility",
            post(presence::toggle_visibility::<B>),
        )
        // Live events
        .route("/events/stream", get(sse::stream::<B>))
}
