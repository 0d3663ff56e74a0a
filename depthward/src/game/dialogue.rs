//! NPC Dialogue
//!
//! NPCs carry a list of lines and an explicit role. The role, not the
//! display name, decides whether finishing a conversation runs the win check.

use glam::Vec3;
use serde::{Serialize, Deserialize};

/// NPC identifier, unique within a level.
pub type NpcId = u32;

/// What finishing a conversation with an NPC does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NpcRole {
    /// Talks, nothing else
    #[default]
    Guide,
    /// Ends the run with a win once enough artifacts were collected
    Guardian {
        /// Artifacts needed before the guardian lets the player through
        required_artifacts: u32,
    },
}

/// A non-player character the actor can talk to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    /// Identifier
    pub id: NpcId,
    /// Display name shown as the speaker
    pub name: String,
    /// World position
    pub position: Vec3,
    /// Dialogue lines, shown in order
    pub lines: Vec<String>,
    /// Interaction role
    #[serde(default)]
    pub role: NpcRole,
}

/// Result of advancing a conversation by one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogueStep {
    /// Show the line at this index
    Line(usize),
    /// Conversation is over
    Finished,
}

impl Npc {
    /// Line at `index`, if any.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// True if this is the last line of the conversation.
    pub fn is_last_line(&self, index: usize) -> bool {
        index + 1 >= self.lines.len()
    }

    /// Step from the line currently shown to the next one.
    pub fn advance(&self, current: usize) -> DialogueStep {
        let next = current + 1;
        if next < self.lines.len() {
            DialogueStep::Line(next)
        } else {
            DialogueStep::Finished
        }
    }

    /// Button labels for the line at `index`.
    pub fn options(&self, index: usize) -> Vec<String> {
        if self.is_last_line(index) {
            vec!["Close".to_string()]
        } else {
            vec!["Continue".to_string()]
        }
    }

    /// Artifacts required to win via this NPC, if it is a guardian.
    pub fn win_requirement(&self) -> Option<u32> {
        match self.role {
            NpcRole::Guide => None,
            NpcRole::Guardian { required_artifacts } => Some(required_artifacts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npc(lines: &[&str], role: NpcRole) -> Npc {
        Npc {
            id: 1,
            name: "Keeper".to_string(),
            position: Vec3::ZERO,
            lines: lines.iter().map(|l| l.to_string()).collect(),
            role,
        }
    }

    #[test]
    fn test_advance_through_lines() {
        let keeper = npc(&["one", "two"], NpcRole::Guide);
        assert_eq!(keeper.line(0), Some("one"));
        assert_eq!(keeper.advance(0), DialogueStep::Line(1));
        assert_eq!(keeper.advance(1), DialogueStep::Finished);
        assert_eq!(keeper.options(0), vec!["Continue".to_string()]);
        assert_eq!(keeper.options(1), vec!["Close".to_string()]);
    }

    #[test]
    fn test_empty_dialogue_finishes_immediately() {
        let silent = npc(&[], NpcRole::Guide);
        assert_eq!(silent.line(0), None);
        assert_eq!(silent.advance(0), DialogueStep::Finished);
    }

    #[test]
    fn test_win_requirement_comes_from_role() {
        let guide = npc(&["hello"], NpcRole::Guide);
        let guardian = npc(&["halt"], NpcRole::Guardian { required_artifacts: 3 });

        assert_eq!(guide.win_requirement(), None);
        assert_eq!(guardian.win_requirement(), Some(3));
    }

    #[test]
    fn test_role_json() {
        let role: NpcRole =
            serde_json::from_str(r#"{ "kind": "guardian", "required_artifacts": 2 }"#).unwrap();
        assert_eq!(role, NpcRole::Guardian { required_artifacts: 2 });
    }
}
