//! Live events pushed to connected clients.

use serde::{Deserialize, Serialize};

use crate::id::MessageId;
use crate::message::{Message, Reaction};
use crate::presence::PresenceUpdate;

/// A change clients should apply without refetching.
///
/// Serialized as `{"type": "NEW_MESSAGE", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiveEvent {
    NewMessage(Message),
    DeleteMessage(MessageId),
    MuteStatus(bool),
    ClearAll,
    ReactionUpdated(ReactionUpdate),
    Presence(PresenceUpdate),
}

/// The full reaction list of a message after a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionUpdate {
    pub message_id: MessageId,
    pub reactions: Vec<Reaction>,
}

impl LiveEvent {
    /// Wire name of the event type.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NewMessage(_) => "NEW_MESSAGE",
            Self::DeleteMessage(_) => "DELETE_MESSAGE",
            Self::MuteStatus(_) => "MUTE_STATUS",
            Self::ClearAll => "CLEAR_ALL",
            Self::ReactionUpdated(_) => "REACTION_UPDATED",
            Self::Presence(_) => "PRESENCE",
        }
    }
}
