//! `/ws` live channel.
//!
//! Each socket counts as one online session for as long as it stays open
//! and receives every live event as a JSON text frame. Incoming frames are
//! ignored apart from close.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::broadcast::error::RecvError;

use crate::state::{AppState, Backend};

/// `GET /ws`
pub async fn upgrade<B: Backend>(
    ws: WebSocketUpgrade,
    State(state): State<AppState<B>>,
) -> Response {
    ws.on_upgrade(move |socket| session(socket, state))
}

async fn session<B: Backend>(mut socket: WebSocket, state: AppState<B>) {
    // subscribe first so the client sees the presence update of its own connect
    let mut events = state.event_bus.subscribe();
    let id = match state.presence.connect().await {
        Ok(id) => id,
        Err(err) => {
            tracing::warn!(%err, "failed to register websocket session");
            return;
        }
    };
    tracing::debug!(session = ?id, "websocket connected");

    loop {
        tokio::select! {
            received = events.recv() => match received {
                Ok(event) => {
                    let json = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(err) => {
                            tracing::warn!(%err, "failed to serialize live event for websocket");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "websocket subscriber lagged, events dropped");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    if let Err(err) = state.presence.disconnect(id).await {
        tracing::warn!(%err, "failed to unregister websocket session");
    }
    tracing::debug!(session = ?id, "websocket disconnected");
}
