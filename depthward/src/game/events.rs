//! Game Events
//!
//! Events generated during a frame, in the order they happened. The loop
//! returns them in `TickResult` and maps a subset onto audio cues.

use glam::Vec3;
use serde::{Serialize, Deserialize};

use crate::game::dialogue::NpcId;
use crate::game::session::{GameOverReason, TerminalReason};
use crate::game::state::Ability;
use crate::game::world::{CollectibleId, CollectibleKind};

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEventData {
    /// Game started; actor placed at the spawn point
    Started {
        /// Recorded spawn point
        spawn: Vec3,
    },

    /// Jump started
    Jumped,

    /// Touched down after a fall
    Landed {
        /// Distance fallen
        fall_distance: f32,
    },

    /// Collectible picked up
    Collected {
        /// Collectible id
        id: CollectibleId,
        /// Category
        kind: CollectibleKind,
    },

    /// Ability unlocked by an artifact
    AbilityUnlocked {
        /// The ability
        ability: Ability,
    },

    /// Health changed outside a pickup
    Damaged {
        /// Change actually applied (negative)
        amount: f32,
    },

    /// Conversation opened
    DialogueStarted {
        /// NPC spoken to
        npc: NpcId,
    },

    /// Conversation moved to another line
    DialogueAdvanced {
        /// NPC spoken to
        npc: NpcId,
        /// Line now shown
        line: usize,
    },

    /// Conversation closed
    DialogueEnded {
        /// NPC spoken to
        npc: NpcId,
    },

    /// Player paused
    Paused,

    /// Player resumed
    Resumed,

    /// Life ended and a new one started at the spawn point
    Respawned {
        /// Why the previous life ended
        reason: TerminalReason,
        /// Score of the previous life
        score: u64,
    },

    /// Game stopped for good
    GameOver {
        /// Why
        reason: GameOverReason,
        /// Score of the final life
        score: u64,
    },

    /// A new level replaced the world
    LevelLoaded {
        /// Level index
        index: usize,
        /// Biome name
        name: String,
    },
}

/// A game event stamped with the frame it happened in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Frame counter when the event occurred
    pub frame: u64,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(frame: u64, data: GameEventData) -> Self {
        Self { frame, data }
    }

    /// True for events that end a life or the game.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.data,
            GameEventData::Respawned { .. } | GameEventData::GameOver { .. }
        )
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_events() {
        let respawn = GameEvent::new(3, GameEventData::Respawned { reason: TerminalReason::Fall, score: 10 });
        let jump = GameEvent::new(3, GameEventData::Jumped);

        assert!(respawn.is_terminal());
        assert!(!jump.is_terminal());
    }

    #[test]
    fn test_event_json() {
        let event = GameEvent::new(
            12,
            GameEventData::Collected {
                id: 4,
                kind: CollectibleKind::Memory,
            },
        );
        let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();

        assert_eq!(value["frame"], 12);
        assert_eq!(value["data"]["type"], "collected");
        assert_eq!(value["data"]["kind"], "memory");
    }
}
