//! JSON REST handlers for game switches and the maze generator.

use axum::extract::State;
use serde::Deserialize;

use sitehub_domain::game::GameStatus;
use sitehub_domain::maze::{DEFAULT_SIZE, Maze};

use crate::api::AdminQuery;
use crate::error::ApiError;
use crate::extract::{Path, Query};
use crate::response::ApiResponse;
use crate::state::{AppState, Backend};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub enabled: bool,
    pub admin_code: Option<String>,
}

#[derive(Deserialize)]
pub struct MazeQuery {
    #[serde(default = "default_size")]
    pub width: usize,
    #[serde(default = "default_size")]
    pub height: usize,
}

fn default_size() -> usize {
    DEFAULT_SIZE
}

/// `GET /api/games`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<ApiResponse<Vec<GameStatus>>, ApiError> {
    Ok(ApiResponse::ok(state.games.list_games().await?))
}

/// `GET /api/games/:game_type/status`
pub async fn status<B: Backend>(
    State(state): State<AppState<B>>,
    Path(game_type): Path<String>,
) -> Result<ApiResponse<GameStatus>, ApiError> {
    Ok(ApiResponse::ok(state.games.game_status(&game_type).await?))
}

/// `POST /api/games/:game_type/status?enabled=&adminCode=`
pub async fn set_status<B: Backend>(
    State(state): State<AppState<B>>,
    Path(game_type): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<ApiResponse<GameStatus>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    let status = state
        .games
        .set_game_status(level, &game_type, query.enabled)
        .await?;
    Ok(ApiResponse::with_message("Game status updated", status))
}

/// `POST /api/games/:game_type/toggle?adminCode=`
pub async fn toggle<B: Backend>(
    State(state): State<AppState<B>>,
    Path(game_type): Path<String>,
    Query(query): Query<AdminQuery>,
) -> Result<ApiResponse<GameStatus>, ApiError> {
    let level = state.level(query.admin_code.as_deref());
    Ok(ApiResponse::ok(
        state.games.toggle_game(level, &game_type).await?,
    ))
}

/// `GET /api/maze/generate?width=&height=`
pub async fn generate_maze<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<MazeQuery>,
) -> ApiResponse<Maze> {
    ApiResponse::ok(state.games.generate_maze(query.width, query.height))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::testing::{ADMIN_CODE, TestApp};

    #[tokio::test]
    async fn should_report_unknown_game_as_enabled() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/api/games/tetris/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["gameType"], "tetris");
        assert_eq!(body["data"]["enabled"], true);
    }

    #[tokio::test]
    async fn should_toggle_game_with_admin_code() {
        let app = TestApp::new().await;

        let (status, _) = app.post_empty("/api/games/snake/toggle").await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (_, body) = app
            .post_empty(&format!("/api/games/snake/toggle?adminCode={ADMIN_CODE}"))
            .await;
        assert_eq!(body["data"]["enabled"], false);

        let (_, body) = app.get("/api/games").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_set_explicit_status() {
        let app = TestApp::new().await;
        let (status, body) = app
            .post_empty(&format!(
                "/api/games/maze/status?enabled=false&adminCode={ADMIN_CODE}"
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Game status updated");

        let (_, body) = app.get("/api/games/maze/status").await;
        assert_eq!(body["data"]["enabled"], false);
    }

    #[tokio::test]
    async fn should_answer_malformed_flag_with_json_envelope() {
        let app = TestApp::new().await;
        let (status, body) = app
            .post_empty(&format!(
                "/api/games/maze/status?enabled=maybe&adminCode={ADMIN_CODE}"
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn should_generate_default_maze() {
        let app = TestApp::new().await;
        let (_, body) = app.get("/api/maze/generate").await;
        assert_eq!(body["data"]["width"], 21);
        assert_eq!(body["data"]["height"], 21);
        assert_eq!(body["data"]["grid"].as_array().unwrap().len(), 21);
        assert_eq!(body["data"]["start"], serde_json::json!([1, 1]));
    }

    #[tokio::test]
    async fn should_bump_even_maze_size_to_odd() {
        let app = TestApp::new().await;
        let (_, body) = app.get("/api/maze/generate?width=10&height=12").await;
        assert_eq!(body["data"]["width"], 11);
        assert_eq!(body["data"]["height"], 13);
        assert_eq!(body["data"]["end"], serde_json::json!([9, 11]));
    }
}
