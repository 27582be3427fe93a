//! # sitehubd
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`sitehub.toml` plus environment overrides)
//! - Initialise structured logging
//! - Open the `SQLite` pool, run migrations and seed default settings
//! - Build the holiday client and every application service
//! - Spawn the presence sweeper
//! - Bind to a TCP port and serve until SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer. No domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use sitehub_adapter_holidays_reqwest::ReqwestHolidayProvider;
use sitehub_adapter_http_axum::router;
use sitehub_adapter_http_axum::state::{Adapters, AppState, Backend};
use sitehub_adapter_storage_sqlite_sqlx::{
    SqliteActivityRepository, SqliteCalendarConfigRepository, SqliteGameStatusRepository,
    SqliteMessageRepository, SqliteNoteRepository, SqliteProfileRepository, SqliteScoreRepository,
    SqliteSettingRepository, SqliteSuggestionRepository, SqliteUserRepository,
    SqliteVocabularyRepository,
};
use sitehub_app::event_bus::InProcessEventBus;
use sitehub_app::presence::spawn_sweeper;
use sitehub_domain::admin::AdminCodes;

use crate::config::Config;

/// Production adapters: `SQLite` storage and the government holiday APIs.
struct SqliteBackend;

impl Backend for SqliteBackend {
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

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("unable to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = sitehub_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database.url.clone(),
        max_connections: config.database.max_connections,
    }
    .build()
    .await
    .context("unable to open database")?;
    let pool = db.pool().clone();

    let holidays = config
        .calendar
        .adapter_config()
        .build()
        .context("unable to build holiday client")?;

    let adapters = Adapters::<SqliteBackend> {
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
        AdminCodes::new(&config.admin.code, &config.admin.super_admin_code),
        Arc::new(InProcessEventBus::new(config.server.event_capacity)),
        config.presence.ttl(),
    );

    let seeded = state
        .settings
        .seed_defaults()
        .await
        .context("unable to seed default settings")?;
    tracing::info!(seeded, "default settings checked");

    let sweeper = spawn_sweeper(
        Arc::clone(&state.presence),
        config.presence.sweep_interval(),
    );

    let app = router::build(state, router::cors_layer(&config.server.cors_origins));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("unable to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "sitehubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    sweeper.abort();
    tracing::info!("sitehubd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(%err, "unable to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        tracing::info!("received ctrl-c, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::warn!(%err, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
