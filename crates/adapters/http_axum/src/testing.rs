//! Router harness shared by handler tests: in-memory `SQLite` behind the
//! real services, a canned holiday provider, no TCP port.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use sitehub_adapter_storage_sqlite_sqlx::{
    Config, SqliteActivityRepository, SqliteCalendarConfigRepository, SqliteGameStatusRepository,
    SqliteMessageRepository, SqliteNoteRepository, SqliteProfileRepository, SqliteScoreRepository,
    SqliteSettingRepository, SqliteSuggestionRepository, SqliteUserRepository,
    SqliteVocabularyRepository,
};
use sitehub_app::event_bus::InProcessEventBus;
use sitehub_app::ports::HolidayProvider;
use sitehub_domain::admin::AdminCodes;
use sitehub_domain::error::SiteError;

use crate::router;
use crate::state::{Adapters, AppState, Backend};

pub const ADMIN_CODE: &str = "admin-code";
pub const SUPER_ADMIN_CODE: &str = "super-code";

/// Answers every lookup with the requested key, or fails when `down`.
pub struct CannedHolidays {
    pub down: bool,
}

impl HolidayProvider for CannedHolidays {
    async fn public_holidays(&self, year: i32) -> Result<Value, SiteError> {
        if self.down {
            return Err(SiteError::Upstream("holiday api down".into()));
        }
        Ok(serde_json::json!({ format!("{year}-01-01"): "1er janvier" }))
    }

    async fn school_holidays(&self, school_year: &str) -> Result<Value, SiteError> {
        if self.down {
            return Err(SiteError::Upstream("holiday api down".into()));
        }
        Ok(serde_json::json!({ "annee_scolaire": school_year }))
    }
}

pub struct TestBackend;

impl Backend for TestBackend {
    type Messages = SqliteMessageRepository;
    type Users = SqliteUserRepository;
    type Suggestions = SqliteSuggestionRepository;
    type Scores = SqliteScoreRepository;
    type Games = SqliteGameStatusRepository;
    type Vocabulary = SqliteVocabularyRepository;
    type Notes = SqliteNoteRepository;
    type Settings = SqliteSettingRepository;
    type Calendar = SqliteCalendarConfigRepository;
    type Holidays = CannedHolidays;
    type Profiles = SqliteProfileRepository;
    type Activity = SqliteActivityRepository;
}

pub struct TestApp {
    pub state: AppState<TestBackend>,
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_holidays(CannedHolidays { down: false }).await
    }

    pub async fn with_holidays(holidays: CannedHolidays) -> Self {
        let db = Config::in_memory().build().await.unwrap();
        let pool = db.pool().clone();

        let adapters = Adapters::<TestBackend> {
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
            AdminCodes::new(ADMIN_CODE, SUPER_ADMIN_CODE),
            std::sync::Arc::new(InProcessEventBus::new(64)),
            Duration::from_secs(30),
        );
        state.settings.seed_defaults().await.unwrap();

        let router = router::build(state.clone(), router::cors_layer(&[]));
        Self { state, router }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, headers, body)
    }

    async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let (status, _, body) = self.send(request).await;
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call("POST", uri, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        self.call("POST", uri, None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.call("DELETE", uri, None).await
    }
}
