//! # sitehub-domain
//!
//! Pure domain model for the sitehub personal website backend.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **wall** (messages, reactions, quotes) and its live events
//! - Define **suggestions** and their comment threads
//! - Define **scores** and the leaderboard ranking rules, plus the maze generator
//! - Define **vocabulary** items, **notes**, **users** and **system settings**
//! - Define user **profiles**, their privacy flags, and **activity** stats with achievements
//! - Define the **admin code** authorization levels
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod activity;
pub mod admin;
pub mod calendar;
pub mod event;
pub mod game;
pub mod maze;
pub mod message;
pub mod note;
pub mod presence;
pub mod profile;
pub mod score;
pub mod setting;
pub mod suggestion;
pub mod user;
pub mod vocabulary;
