//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.
//! Privileged operations take the caller's [`AdminLevel`](sitehub_domain::admin::AdminLevel),
//! resolved from the presented admin code by the driving adapter.

pub mod activity_service;
pub mod calendar_service;
pub mod game_service;
pub mod message_service;
pub mod note_service;
pub mod profile_service;
pub mod score_service;
pub mod settings_service;
pub mod suggestion_service;
pub mod user_service;
pub mod vocabulary_service;
