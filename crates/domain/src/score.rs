//! Leaderboard scores and the per-game ranking rules.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{SiteError, ValidationError, require_text};
use crate::id::ScoreId;
use crate::time::{Timestamp, now};

/// Game whose scores are times: lower wins, zero means "no result".
pub const MAZE: &str = "maze";

/// Number of rows scanned when building a leaderboard.
pub const LEADERBOARD_SCAN: usize = 50;

/// Number of entries on a leaderboard.
pub const LEADERBOARD_SIZE: usize = 3;

pub const GAME_TYPE_MAX: usize = 50;
pub const USER_ID_MAX: usize = 100;

/// A single result submitted by a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub id: ScoreId,
    pub user_id: String,
    pub username: String,
    pub game_type: String,
    pub score: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Timestamp,
    pub attempts: Option<i32>,
}

impl Score {
    /// Create a score stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] on a blank user, username or game,
    /// or a negative score.
    pub fn new(
        user_id: &str,
        username: &str,
        game_type: &str,
        score: i64,
        attempts: Option<i32>,
    ) -> Result<Self, SiteError> {
        require_text("userId", user_id, USER_ID_MAX)?;
        require_text("username", username, crate::user::USERNAME_MAX)?;
        require_text("gameType", game_type, GAME_TYPE_MAX)?;
        if score < 0 {
            return Err(ValidationError::Negative { field: "score" }.into());
        }
        Ok(Self {
            id: ScoreId::new(),
            user_id: user_id.to_string(),
            username: username.trim().to_string(),
            game_type: game_type.trim().to_string(),
            score,
            timestamp: now(),
            attempts,
        })
    }

    /// Zero-valued score returned when a user has not played a game yet.
    #[must_use]
    pub fn placeholder(user_id: &str, game_type: &str) -> Self {
        Self {
            id: ScoreId::new(),
            user_id: user_id.to_string(),
            username: String::new(),
            game_type: game_type.to_string(),
            score: 0,
            timestamp: now(),
            attempts: None,
        }
    }
}

/// Direction in which scores of a game are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
    /// Lower is better. Zero is an absent result.
    Ascending,
    /// Higher is better.
    Descending,
}

impl Ranking {
    #[must_use]
    pub fn for_game(game_type: &str) -> Self {
        if game_type == MAZE {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    /// Order two raw values so that the better one comes first.
    #[must_use]
    pub fn compare(self, a: i64, b: i64) -> Ordering {
        match self {
            Self::Ascending => match (a == 0, b == 0) {
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ => a.cmp(&b),
            },
            Self::Descending => b.cmp(&a),
        }
    }

    /// Whether `candidate` beats the `existing` personal best.
    #[must_use]
    pub fn is_better(self, candidate: i64, existing: i64) -> bool {
        match self {
            Self::Ascending => existing == 0 || (candidate != 0 && candidate < existing),
            Self::Descending => candidate > existing,
        }
    }

    /// Sort best first. Ties keep the earliest submission first.
    pub fn sort(self, scores: &mut [Score]) {
        scores.sort_by(|a, b| {
            self.compare(a.score, b.score)
                .then_with(|| a.timestamp.cmp(&b.timestamp))
        });
    }

    /// Best entry of `scores` according to [`Ranking::sort`].
    #[must_use]
    pub fn best(self, scores: &[Score]) -> Option<&Score> {
        scores.iter().min_by(|a, b| {
            self.compare(a.score, b.score)
                .then_with(|| a.timestamp.cmp(&b.timestamp))
        })
    }
}

/// Keep the best entry of each player, at most [`LEADERBOARD_SIZE`] of them.
///
/// Zero results are skipped for ascending games.
#[must_use]
pub fn leaderboard(mut scores: Vec<Score>, ranking: Ranking) -> Vec<Score> {
    ranking.sort(&mut scores);
    let mut seen = HashSet::new();
    let mut top = Vec::with_capacity(LEADERBOARD_SIZE);
    for score in scores {
        if ranking == Ranking::Ascending && score.score == 0 {
            continue;
        }
        if score.user_id.is_empty() || !seen.insert(score.user_id.clone()) {
            continue;
        }
        top.push(score);
        if top.len() >= LEADERBOARD_SIZE {
            break;
        }
    }
    top
}

/// Outcome of a score submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub new_high_score: bool,
    pub message: &'static str,
}

impl Submission {
    pub const REJECTED: Self = Self {
        new_high_score: false,
        message: "Score not high enough",
    };
    pub const UPDATED: Self = Self {
        new_high_score: true,
        message: "Score updated successfully",
    };
    pub const FIRST: Self = Self {
        new_high_score: true,
        message: "Score submitted successfully",
    };

    /// Outcome of submitting `candidate` against a player's stored scores
    /// for the same game.
    #[must_use]
    pub fn judge(ranking: Ranking, existing: &[Score], candidate: i64) -> Self {
        match ranking.best(existing) {
            Some(best) if !ranking.is_better(candidate, best.score) => Self::REJECTED,
            Some(_) => Self::UPDATED,
            None => Self::FIRST,
        }
    }
}

fn group_by_player(scores: &[Score]) -> BTreeMap<(&str, &str), Vec<&Score>> {
    let mut groups: BTreeMap<(&str, &str), Vec<&Score>> = BTreeMap::new();
    for score in scores {
        groups
            .entry((score.user_id.as_str(), score.game_type.as_str()))
            .or_default()
            .push(score);
    }
    groups
}

/// Diagnostic summary of players holding more than one score for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateReport {
    pub total_scores: usize,
    pub duplicate_groups: usize,
    pub total_duplicates: usize,
    pub duplicate_details: Vec<String>,
}

impl DuplicateReport {
    #[must_use]
    pub fn from_scores(scores: &[Score]) -> Self {
        let mut report = Self {
            total_scores: scores.len(),
            duplicate_groups: 0,
            total_duplicates: 0,
            duplicate_details: Vec::new(),
        };
        for ((user_id, game_type), group) in group_by_player(scores) {
            if group.len() > 1 {
                report.duplicate_groups += 1;
                report.total_duplicates += group.len() - 1;
                report.duplicate_details.push(format!(
                    "User {user_id} in game {game_type}: {} scores",
                    group.len()
                ));
            }
        }
        report
    }
}

/// Ids to delete so each player keeps only their best score per game.
#[must_use]
pub fn redundant_scores(scores: &[Score]) -> Vec<ScoreId> {
    let mut redundant = Vec::new();
    for ((_, game_type), group) in group_by_player(scores) {
        if group.len() < 2 {
            continue;
        }
        let ranking = Ranking::for_game(game_type);
        let owned: Vec<Score> = group.iter().map(|s| (*s).clone()).collect();
        if let Some(best) = ranking.best(&owned) {
            redundant.extend(owned.iter().filter(|s| s.id != best.id).map(|s| s.id));
        }
    }
    redundant
}
