//! # sitehub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** under `/api` (wall, suggestions, scores,
//!   vocabulary, notes, settings, calendar, presence, accounts)
//! - Push live events over a **WebSocket** (`/ws`) and an **SSE** fallback
//!   (`/api/events/stream`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Wrap results in the `{success, message, data}` envelope and map
//!   [`SiteError`](sitehub_domain::error::SiteError) to status codes
//!
//! ## Dependency rule
//! Depends on `sitehub-app` (for port traits and services) and `sitehub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod extract;
pub mod response;
pub mod router;
pub mod state;
pub mod ws;

#[cfg(test)]
mod testing;
