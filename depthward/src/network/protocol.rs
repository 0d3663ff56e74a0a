//! Protocol Messages
//!
//! Wire format for the presence channel. Messages are JSON objects tagged
//! by a camelCase `type` field.

use glam::{Quat, Vec3};
use serde::{Serialize, Deserialize};

use crate::game::state::Actor;

// =============================================================================
// SHARED PAYLOADS
// =============================================================================

/// Actor state as broadcast to other clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatePayload {
    /// Position `[x, y, z]`
    pub position: [f32; 3],
    /// Orientation quaternion `[x, y, z, w]`
    pub rotation: [f32; 4],
    /// Current health
    pub health: f32,
    /// Display name
    #[serde(default)]
    pub name: String,
}

impl PlayerStatePayload {
    /// Snapshot the local actor.
    pub fn from_actor(actor: &Actor, name: &str) -> Self {
        Self {
            position: actor.position.to_array(),
            rotation: actor.rotation().to_array(),
            health: actor.health.current(),
            name: name.to_string(),
        }
    }

    /// Position as a vector.
    pub fn position_vec(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Rotation as a quaternion, normalized. Degenerate input maps to identity.
    pub fn rotation_quat(&self) -> Quat {
        let q = Quat::from_array(self.rotation);
        if q.length_squared() > f32::EPSILON && q.is_finite() {
            q.normalize()
        } else {
            Quat::IDENTITY
        }
    }
}

/// A connected player as listed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePlayerInfo {
    /// Connection id
    pub id: String,
    /// Last known state
    #[serde(flatten)]
    pub state: PlayerStatePayload,
}

// =============================================================================
// CLIENT -> SERVER MESSAGES
// =============================================================================

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Periodic state broadcast.
    PlayerStateUpdate(PlayerStatePayload),

    /// Chat line, already validated and escaped.
    ChatMessage {
        /// Escaped text
        text: String,
    },
}

impl ClientMessage {
    /// Build a validated chat message.
    pub fn chat(text: &str, max_len: usize) -> Result<Self, ChatError> {
        Ok(ClientMessage::ChatMessage {
            text: validate_chat(text, max_len)?,
        })
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// =============================================================================
// SERVER -> CLIENT MESSAGES
// =============================================================================

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Full roster, sent on connect.
    WorldState {
        /// Everyone currently connected
        players: Vec<RemotePlayerInfo>,
    },

    /// A player connected.
    PlayerJoined {
        /// The new player
        player: RemotePlayerInfo,
    },

    /// A player disconnected.
    PlayerLeft {
        /// Connection id
        id: String,
    },

    /// State broadcast from another player.
    PlayerUpdate {
        /// Connection id
        id: String,
        /// New state
        state: PlayerStatePayload,
    },

    /// Chat line from another player.
    ChatMessage {
        /// Sender connection id
        #[serde(rename = "senderId")]
        sender_id: String,
        /// Escaped text
        text: String,
    },

    /// The connection is gone.
    Disconnect,
}

impl ServerMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// =============================================================================
// CHAT
// =============================================================================

/// Chat rejected before sending.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// Nothing but whitespace.
    #[error("Chat message is empty")]
    Empty,

    /// Over the length limit.
    #[error("Chat message too long ({len} > {max})")]
    TooLong {
        /// Characters in the message
        len: usize,
        /// Limit
        max: usize,
    },
}

/// Trim, length-check and HTML-escape a chat line.
///
/// The limit counts characters of the trimmed text before escaping.
pub fn validate_chat(text: &str, max_len: usize) -> Result<String, ChatError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ChatError::Empty);
    }

    let len = trimmed.chars().count();
    if len > max_len {
        return Err(ChatError::TooLong { len, max: max_len });
    }

    Ok(escape_html(trimmed))
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
