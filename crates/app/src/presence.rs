//! Presence tracker: counts visitors connected over a live socket or
//! recently seen through a REST heartbeat.
//!
//! State is in memory only. Every change of the count or of its
//! visibility is broadcast as [`LiveEvent::Presence`].

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

use sitehub_domain::admin::AdminLevel;
use sitehub_domain::error::{SiteError, ValidationError};
use sitehub_domain::event::LiveEvent;
use sitehub_domain::presence::PresenceUpdate;

use crate::ports::EventPublisher;

/// Handle of one live socket session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

#[derive(Default)]
struct PresenceState {
    sessions: HashSet<SessionId>,
    heartbeats: HashMap<String, Instant>,
}

impl PresenceState {
    fn count(&self, now: Instant, ttl: Duration) -> usize {
        let live = self
            .heartbeats
            .values()
            .filter(|seen| now.saturating_duration_since(**seen) < ttl)
            .count();
        self.sessions.len() + live
    }
}

/// Tracks who is online.
pub struct PresenceTracker<P> {
    publisher: P,
    ttl: Duration,
    state: Mutex<PresenceState>,
    show_to_all: AtomicBool,
    next_session: AtomicU64,
}

impl<P: EventPublisher + Send + Sync> PresenceTracker<P> {
    /// Create a tracker whose heartbeats expire after `ttl`.
    pub fn new(publisher: P, ttl: Duration) -> Self {
        Self {
            publisher,
            ttl,
            state: Mutex::new(PresenceState::default()),
            show_to_all: AtomicBool::new(false),
            next_session: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PresenceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of visitors online right now.
    pub fn count(&self) -> usize {
        self.lock().count(Instant::now(), self.ttl)
    }

    /// Whether visitors without an admin code may see the count.
    pub fn show_to_all(&self) -> bool {
        self.show_to_all.load(Ordering::Relaxed)
    }

    /// Current count and visibility.
    pub fn snapshot(&self) -> PresenceUpdate {
        PresenceUpdate {
            count: self.count(),
            show_to_all: self.show_to_all(),
        }
    }

    async fn broadcast(&self) -> Result<(), SiteError> {
        self.publisher
            .publish(LiveEvent::Presence(self.snapshot()))
            .await
    }

    /// Register a new live socket session.
    ///
    /// # Errors
    ///
    /// Returns an error if the presence update cannot be published.
    pub async fn connect(&self) -> Result<SessionId, SiteError> {
        let id = SessionId(self.next_session.fetch_add(1, Ordering::Relaxed));
        self.lock().sessions.insert(id);
        tracing::debug!(session = id.0, "presence session opened");
        self.broadcast().await?;
        Ok(id)
    }

    /// Forget a live socket session. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the presence update cannot be published.
    pub async fn disconnect(&self, id: SessionId) -> Result<(), SiteError> {
        let removed = self.lock().sessions.remove(&id);
        if removed {
            tracing::debug!(session = id.0, "presence session closed");
            self.broadcast().await?;
        }
        Ok(())
    }

    /// Record that `user_id` is still around and return the new count.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when `user_id` is blank.
    pub async fn heartbeat(&self, user_id: &str) -> Result<usize, SiteError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(ValidationError::Empty("userId").into());
        }
        let now = Instant::now();
        let (is_new, count) = {
            let mut state = self.lock();
            let previous = state.heartbeats.insert(user_id.to_string(), now);
            let is_new =
                previous.is_none_or(|seen| now.saturating_duration_since(seen) >= self.ttl);
            (is_new, state.count(now, self.ttl))
        };
        if is_new {
            self.broadcast().await?;
        }
        Ok(count)
    }

    /// Flip count visibility for non-admins.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without an admin code.
    pub async fn toggle_visibility(&self, level: AdminLevel) -> Result<bool, SiteError> {
        level.require_admin()?;
        let visible = !self.show_to_all.fetch_xor(true, Ordering::Relaxed);
        tracing::info!(visible, "presence visibility toggled");
        self.broadcast().await?;
        Ok(visible)
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let mut state = self.lock();
        let before = state.heartbeats.len();
        state
            .heartbeats
            .retain(|_, seen| now.saturating_duration_since(*seen) < self.ttl);
        before - state.heartbeats.len()
    }

    /// Drop expired heartbeats and return how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the presence update cannot be published.
    pub async fn sweep(&self) -> Result<usize, SiteError> {
        let removed = self.sweep_at(Instant::now());
        if removed > 0 {
            tracing::debug!(removed, "expired presence heartbeats");
            self.broadcast().await?;
        }
        Ok(removed)
    }
}

/// Run [`PresenceTracker::sweep`] every `every` until the runtime shuts down.
pub fn spawn_sweeper<P>(tracker: Arc<PresenceTracker<P>>, every: Duration) -> JoinHandle<()>
where
    P: EventPublisher + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(err) = tracker.sweep().await {
                tracing::warn!(error = %err, "presence sweep failed");
            }
        }
    })
}
