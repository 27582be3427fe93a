//! # sitehub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `MessageRepository`, `SuggestionRepository`, `ScoreRepository`, …: persistence
//!   - `EventPublisher`: fan-out of live events
//!   - `HolidayProvider`: public and school holiday lookups
//! - Define **driving/inbound ports** as use-case structs:
//!   - `MessageService`: the wall, its mute switch and reactions
//!   - `ScoreService` / `GameService`: leaderboard, game switches, mazes
//!   - `VocabularyService`: cached flashcards and favorites
//!   - `UserService`, `NoteService`, `SuggestionService`, `SettingsService`, `CalendarService`
//!   - `ProfileService` / `ActivityService`: profiles, privacy, stats and achievements
//! - Provide **in-process infrastructure** that doesn't need IO
//!   (event bus, presence tracker)
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `sitehub-domain` only (plus `tokio` for channels, locks and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod presence;
pub mod services;

#[cfg(test)]
mod testing;
