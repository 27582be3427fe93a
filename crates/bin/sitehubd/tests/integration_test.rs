//! End-to-end smoke tests for the full sitehubd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real repos,
//! real services, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot`, so no TCP port is bound.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use sitehub_adapter_holidays_reqwest::ReqwestHolidayProvider;
use sitehub_adapter_http_axum::router;
use sitehub_adapter_http_axum::state::{Adapters, AppState, Backend};
use sitehub_adapter_storage_sqlite_sqlx::{
    Config, SqliteActivityRepository, SqliteCalendarConfigRepository, SqliteGameStatusRepository,
    SqliteMessageRepository, SqliteNoteRepository, SqliteProfileRepository, SqliteScoreRepository,
    SqliteSettingRepository, SqliteSuggestionRepository, SqliteUserRepository,
    SqliteVocabularyRepository,
};
use sitehub_app::event_bus::InProcessEventBus;
use sitehub_domain::admin::AdminCodes;

const ADMIN: &str = "e2e-admin";
const SUPER_ADMIN: &str = "e2e-super";

struct E2eBackend;

impl Backend for E2eBackend {
    type Messages = SqliteMessageRepository;
    type Users = SqliteUserRepository;
    type Suggestions = SqliteSuggestionRepository;
    type Scores = SqliteScoreRepository;
    type Games = SqliteGameStatusRepository;
    type Vocabulary = SqliteVocabularyRepository;
    type Notes = SqliteNoteRepository;
    type Settings = SqliteSettingRepository;
    type Calendar = SqliteCalendarConfigRepository;
    type Holidays = ReqwestHolidayProvider;
    type Profiles = SqliteProfileRepository;
    type Activity = SqliteActivityRepository;
}

/// Build a fully-wired router backed by an in-memory `SQLite` database.
///
/// Holiday lookups target a closed local port so upstream failures are
/// deterministic.
async fn app() -> axum::Router {
    let db = Config::in_memory()
        .build()
        .await
        .expect("in-memory database should initialise");
    let pool = db.pool().clone();

    let holidays = sitehub_adapter_holidays_reqwest::Config {
        public_holidays_url: "http://127.0.0.1:9/{year}.json".to_string(),
        school_holidays_url: "http://127.0.0.1:9/{school_year}.json".to_string(),
        timeout: Duration::from_secs(2),
    }
    .build()
    .expect("holiday client should build");

    let adapters = Adapters::<E2eBackend> {
        messages: SqliteMessageRepository::new(pool.clone()),
        users: SqliteUserRepository::new(pool.clone()),
        suggestions: SqliteSuggestionRepository::new(pool.clone()),
        scores: SqliteScoreRepository::new(pool.clone()),
        games: SqliteGameStatusRepository::new(pool.clone()),
        vocabulary: SqliteVocabularyRepository::new(pool.clone()),
        notes: SqliteNoteRepository::new(pool.clone()),
        settings: SqliteSettingRepository::new(pool.clone()),
        calendar: SqliteCalendarConfigRepository::new(pool.clone()),
        holidays,
        profiles: SqliteProfileRepository::new(pool.clone()),
        activity: SqliteActivityRepository::new(pool),
    };
    let state = AppState::new(
        adapters,
        AdminCodes::new(ADMIN, SUPER_ADMIN),
        Arc::new(InProcessEventBus::new(256)),
        Duration::from_secs(30),
    );
    state.settings.seed_defaults().await.unwrap();

    router::build(state, router::cors_layer(&[]))
}

async fn call(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = app()
        .await
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_register_then_login() {
    let app = app().await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/register",
        Some(json!({"username": "  alice ", "password": "hunter2"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["username"], "alice");

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/register",
        Some(json!({"username": "alice", "password": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username already taken");

    let (status, _) = call(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({"username": "alice", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({"username": "alice", "password": "hunter2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["userId"].is_string());
}

#[tokio::test]
async fn should_resolve_admin_roles() {
    let app = app().await;
    for (code, role) in [(ADMIN, "admin"), (SUPER_ADMIN, "super_admin")] {
        let (_, body) = call(
            &app,
            "POST",
            "/api/auth/verify-admin",
            Some(json!({"code": code})),
        )
        .await;
        assert_eq!(body["data"]["role"], role);
    }

    let (status, _) = call(
        &app,
        "POST",
        "/api/auth/verify-admin",
        Some(json!({"code": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Profiles and achievements
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_build_profile_and_achievements_from_activity() {
    let app = app().await;
    let (_, body) = call(
        &app,
        "POST",
        "/api/auth/register",
        Some(json!({"username": "carol", "password": "secret"})),
    )
    .await;
    let user_id = body["data"]["userId"].as_str().unwrap().to_string();

    call(
        &app,
        "POST",
        "/api/messages",
        Some(json!({"userId": user_id, "name": "carol", "message": "hi"})),
    )
    .await;
    call(
        &app,
        "POST",
        "/api/scores",
        Some(json!({"userId": user_id, "username": "carol", "gameType": "snake", "score": 7})),
    )
    .await;

    let (status, body) = call(
        &app,
        "GET",
        &format!("/api/profiles/{user_id}?requesterId={user_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["displayName"], "carol");
    assert_eq!(body["data"]["activityStats"]["totalMessages"], 1);
    assert_eq!(body["data"]["activityStats"]["totalGamesPlayed"], 1);
    let unlocked: Vec<&str> = body["data"]["achievements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(unlocked, vec!["first-message", "first-game"]);

    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/api/superadmin/users/{user_id}?superAdminCode={SUPER_ADMIN}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "GET", &format!("/api/profiles/{user_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Message wall
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_mark_registered_authors_as_verified() {
    let app = app().await;
    let (_, body) = call(
        &app,
        "POST",
        "/api/auth/register",
        Some(json!({"username": "bob", "password": "secret"})),
    )
    .await;
    let user_id = body["data"]["userId"].as_str().unwrap().to_string();

    call(
        &app,
        "POST",
        "/api/messages",
        Some(json!({"userId": user_id, "name": "bob", "message": "hello"})),
    )
    .await;
    call(
        &app,
        "POST",
        "/api/messages",
        Some(json!({"userId": "guest-1", "name": "guest", "message": "hi"})),
    )
    .await;

    let (_, body) = call(&app, "GET", "/api/messages", None).await;
    let messages = body["data"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    let verified: Vec<bool> = messages
        .iter()
        .map(|m| m["isVerified"].as_bool().unwrap())
        .collect();
    assert!(verified.contains(&true));
    assert!(verified.contains(&false));
}

#[tokio::test]
async fn should_block_posts_while_muted() {
    let app = app().await;

    let (_, body) = call(
        &app,
        "POST",
        &format!("/api/messages/toggle-mute?adminCode={ADMIN}"),
        None,
    )
    .await;
    assert_eq!(body["message"], "Chat muted");

    let (status, _) = call(
        &app,
        "POST",
        "/api/messages",
        Some(json!({"userId": "u", "name": "n", "message": "hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = call(&app, "GET", "/api/messages/is-muted", None).await;
    assert_eq!(body["data"], true);
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_keep_one_best_score_per_player() {
    let app = app().await;
    for (user, score) in [("a", 10), ("a", 30), ("a", 20), ("b", 25)] {
        call(
            &app,
            "POST",
            "/api/scores",
            Some(json!({"userId": user, "username": user, "gameType": "snake", "score": score})),
        )
        .await;
    }

    let (_, body) = call(&app, "GET", "/api/scores/top/snake", None).await;
    let scores: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["score"].as_i64().unwrap())
        .collect();
    assert_eq!(scores, vec![30, 25]);

    let (_, body) = call(
        &app,
        "GET",
        &format!("/api/scores/duplicates?adminCode={ADMIN}"),
        None,
    )
    .await;
    assert_eq!(body["data"]["duplicateGroups"], 0);
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_thread_comments_under_suggestion() {
    let app = app().await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/suggestions",
        Some(json!({"userId": "u1", "username": "ann", "suggestion": "dark mode"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/suggestions/{id}/comments"),
        Some(json!({"userId": "u2", "username": "ben", "content": "+1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = call(&app, "GET", "/api/suggestions", None).await;
    assert_eq!(body["data"][0]["commentCount"], 1);
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_bad_gateway_when_holiday_api_is_unreachable() {
    let app = app().await;
    let (status, body) = call(&app, "GET", "/api/calendar/proxy/holidays/2025", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
}

// ---------------------------------------------------------------------------
// Settings and presence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_seed_public_settings() {
    let app = app().await;
    let (_, body) = call(&app, "GET", "/api/settings/public", None).await;
    assert_eq!(body["data"]["PAGE_GAME_ENABLED"], "true");
}

#[tokio::test]
async fn should_count_heartbeats() {
    let app = app().await;
    call(
        &app,
        "POST",
        "/api/presence/heartbeat",
        Some(json!({"userId": "visitor"})),
    )
    .await;
    let (_, body) = call(&app, "GET", "/api/presence/count", None).await;
    assert_eq!(body["data"]["count"], 1);
}
