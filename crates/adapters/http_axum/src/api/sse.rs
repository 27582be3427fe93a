//! Server-Sent Events (SSE) stream of live events.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use crate::state::{AppState, Backend};

/// `GET /api/events/stream`
///
/// Sends every [`LiveEvent`](sitehub_domain::event::LiveEvent) as a JSON
/// `data:` frame until the client disconnects. Frames are the same
/// `{"type", "payload"}` objects pushed over `/ws`.
pub async fn stream<B: Backend>(
    State(state): State<AppState<B>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let subscription = BroadcastStream::new(state.event_bus.subscribe());
    let events = subscription.filter_map(|result| match result {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default().data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize live event for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "SSE subscriber lagged, some events were dropped");
            None
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
