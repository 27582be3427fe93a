//! Mini-game on/off switches.

use serde::{Deserialize, Serialize};

/// Whether a mini-game can currently be played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    pub game_type: String,
    pub enabled: bool,
}

impl GameStatus {
    /// Games without a stored switch are playable.
    #[must_use]
    pub fn enabled(game_type: impl Into<String>) -> Self {
        Self {
            game_type: game_type.into(),
            enabled: true,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        Self {
            enabled: !self.enabled,
            ..self
        }
    }
}
