//! Per-user activity counters and the achievements they unlock.
//!
//! Only registered accounts are tracked. Counters move forward on two
//! events: posting on the wall and submitting a game result. Every event
//! also advances the daily streak, which counts consecutive UTC days with
//! at least one event.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::score::Ranking;
use crate::time::{Timestamp, days_since_epoch};

/// Something a registered user did that counts towards their stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    Message,
    Game { game_type: String, score: i64 },
}

/// Running totals for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub user_id: String,
    pub total_messages: u32,
    pub total_games_played: u32,
    /// Personal best per game, ranked like the leaderboards.
    pub best_scores: BTreeMap<String, i64>,
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(skip)]
    pub last_active_day: Option<i64>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_updated: Option<Timestamp>,
}

impl ActivityStats {
    /// Stats of a user with no recorded activity.
    #[must_use]
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            total_messages: 0,
            total_games_played: 0,
            best_scores: BTreeMap::new(),
            current_streak: 0,
            longest_streak: 0,
            last_active_day: None,
            last_updated: None,
        }
    }

    /// Fold one event into the counters.
    pub fn apply(&mut self, event: &ActivityEvent, at: Timestamp) {
        match event {
            ActivityEvent::Message => {
                self.total_messages = self.total_messages.saturating_add(1);
            }
            ActivityEvent::Game { game_type, score } => {
                self.total_games_played = self.total_games_played.saturating_add(1);
                let ranking = Ranking::for_game(game_type);
                self.best_scores
                    .entry(game_type.clone())
                    .and_modify(|best| {
                        if ranking.is_better(*score, *best) {
                            *best = *score;
                        }
                    })
                    .or_insert(*score);
            }
        }
        self.advance_streak(days_since_epoch(at));
        self.last_updated = Some(at);
    }

    fn advance_streak(&mut self, today: i64) {
        self.current_streak = match self.last_active_day {
            Some(day) if day == today => self.current_streak.max(1),
            Some(day) if day + 1 == today => self.current_streak.saturating_add(1),
            // clock went backwards: keep the streak as is
            Some(day) if day > today => return,
            _ => 1,
        };
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_active_day = Some(today);
    }

    /// Catalog entries these stats reach that are not in `unlocked` yet.
    #[must_use]
    pub fn newly_reached(&self, unlocked: &[String]) -> Vec<&'static Achievement> {
        ACHIEVEMENTS
            .iter()
            .filter(|a| a.is_reached_by(self))
            .filter(|a| !unlocked.iter().any(|id| id == a.id))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Messaging,
    Gaming,
    Social,
}

/// A badge unlocked once a counter reaches `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub threshold: u32,
}

impl Achievement {
    const fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        category: AchievementCategory,
        threshold: u32,
    ) -> Self {
        Self {
            id,
            name,
            description,
            category,
            threshold,
        }
    }

    #[must_use]
    pub fn find(id: &str) -> Option<&'static Self> {
        ACHIEVEMENTS.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn is_reached_by(&self, stats: &ActivityStats) -> bool {
        let counter = match self.category {
            AchievementCategory::Messaging => stats.total_messages,
            AchievementCategory::Gaming => stats.total_games_played,
            AchievementCategory::Social => stats.longest_streak,
        };
        counter >= self.threshold
    }
}

/// Every achievement a user can unlock.
pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement::new(
        "first-message",
        "First Words",
        "Post your first message",
        AchievementCategory::Messaging,
        1,
    ),
    Achievement::new(
        "chatty",
        "Chatty",
        "Post 10 messages",
        AchievementCategory::Messaging,
        10,
    ),
    Achievement::new(
        "talkative",
        "Talkative",
        "Post 50 messages",
        AchievementCategory::Messaging,
        50,
    ),
    Achievement::new(
        "conversationalist",
        "Conversationalist",
        "Post 100 messages",
        AchievementCategory::Messaging,
        100,
    ),
    Achievement::new(
        "first-game",
        "Player One",
        "Finish your first game",
        AchievementCategory::Gaming,
        1,
    ),
    Achievement::new("gamer", "Gamer", "Play 10 games", AchievementCategory::Gaming, 10),
    Achievement::new(
        "dedicated",
        "Dedicated",
        "Play 50 games",
        AchievementCategory::Gaming,
        50,
    ),
    Achievement::new(
        "champion",
        "Champion",
        "Play 100 games",
        AchievementCategory::Gaming,
        100,
    ),
    Achievement::new(
        "socialite",
        "Socialite",
        "Be active 7 days in a row",
        AchievementCategory::Social,
        7,
    ),
    Achievement::new(
        "regular",
        "Regular",
        "Be active 30 days in a row",
        AchievementCategory::Social,
        30,
    ),
];

/// Stored unlock of one achievement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockRecord {
    pub achievement_id: String,
    pub unlocked_at: Timestamp,
}

/// Achievement as shown on a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockedAchievement {
    #[serde(flatten)]
    pub achievement: Achievement,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub unlocked_at: Timestamp,
}

impl UnlockedAchievement {
    /// Resolve stored unlocks against the catalog, dropping retired ids.
    #[must_use]
    pub fn resolve(records: Vec<UnlockRecord>) -> Vec<Self> {
        records
            .into_iter()
            .filter_map(|record| {
                Achievement::find(&record.achievement_id).map(|achievement| Self {
                    achievement: *achievement,
                    unlocked_at: record.unlocked_at,
                })
            })
            .collect()
    }
}
