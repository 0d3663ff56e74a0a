//! Presence Sync
//!
//! Reconciles the local actor with the roster of remote actors. Inbound
//! messages are applied in arrival order at the tick boundary; outbound
//! state is throttled to one update per sync interval of wall-clock time.
//!
//! The roster is owned here. Renderers only see it through `roster()`.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use glam::{Quat, Vec3};
use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::game::config::NetworkConfig;
use crate::game::state::Actor;
use crate::network::protocol::{
    ChatError, ClientMessage, PlayerStatePayload, RemotePlayerInfo, ServerMessage,
};

/// Opaque handle a renderer uses to find a remote actor's visual.
pub type VisualHandle = u64;

/// Another connected player.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteActor {
    /// Connection id
    pub id: String,
    /// Display name
    pub name: String,
    /// Last known position
    pub position: Vec3,
    /// Last known orientation
    pub rotation: Quat,
    /// Last known health
    pub health: f32,
    /// Renderer handle, stable for the actor's lifetime
    pub visual: VisualHandle,
}

impl RemoteActor {
    fn apply_state(&mut self, state: &PlayerStatePayload) {
        let position = state.position_vec();
        if position.is_finite() {
            self.position = position;
        }
        self.rotation = state.rotation_quat();
        if state.health.is_finite() {
            self.health = state.health;
        }
        if !state.name.trim().is_empty() {
            self.name = state.name.clone();
        }
    }
}

/// A received chat line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatLine {
    /// Sender connection id
    pub sender_id: String,
    /// Sender display name at receipt time
    pub sender_name: String,
    /// Escaped text
    pub text: String,
}

/// Roster changes worth surfacing to the player.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenceEvent {
    /// Roster replaced by a world state snapshot
    RosterReplaced {
        /// Remote actors now tracked
        count: usize,
    },
    /// A remote actor appeared
    Joined {
        /// Connection id
        id: String,
        /// Display name
        name: String,
    },
    /// A remote actor went away
    Left {
        /// Connection id
        id: String,
        /// Display name
        name: String,
    },
    /// Chat received
    Chat(ChatLine),
    /// Connection lost; roster cleared
    Disconnected,
}

/// Remote roster, chat log and outbound throttle.
#[derive(Debug)]
pub struct PresenceSync {
    roster: BTreeMap<String, RemoteActor>,
    chat_log: VecDeque<ChatLine>,
    chat_capacity: usize,
    max_chat_length: usize,
    sync_interval: Duration,
    last_sync: Option<Duration>,
    next_visual: VisualHandle,
}

impl PresenceSync {
    /// Create an empty roster.
    pub fn new(config: &NetworkConfig) -> Self {
        let interval = if config.sync_interval_secs.is_finite() {
            f64::from(config.sync_interval_secs.max(0.0))
        } else {
            0.0
        };

        Self {
            roster: BTreeMap::new(),
            chat_log: VecDeque::new(),
            chat_capacity: config.chat_log_capacity,
            max_chat_length: config.max_chat_length,
            sync_interval: Duration::from_micros((interval * 1e6).round() as u64),
            last_sync: None,
            next_visual: 1,
        }
    }

    // =========================================================================
    // INBOUND
    // =========================================================================

    /// Apply one inbound message.
    pub fn apply(&mut self, message: ServerMessage) -> Vec<PresenceEvent> {
        let mut events = Vec::new();

        match message {
            ServerMessage::WorldState { players } => {
                self.roster.clear();
                for info in players {
                    self.insert(info);
                }
                debug!("World state: {} remote players", self.roster.len());
                events.push(PresenceEvent::RosterReplaced {
                    count: self.roster.len(),
                });
            }

            ServerMessage::PlayerJoined { player } => {
                let id = player.id.clone();
                if let Some(existing) = self.roster.get_mut(&id) {
                    existing.apply_state(&player.state);
                } else {
                    self.insert(player);
                    if let Some(actor) = self.roster.get(&id) {
                        info!("Player joined: {} ({})", actor.name, id);
                        events.push(PresenceEvent::Joined {
                            id,
                            name: actor.name.clone(),
                        });
                    }
                }
            }

            ServerMessage::PlayerLeft { id } => match self.roster.remove(&id) {
                Some(actor) => {
                    info!("Player left: {} ({})", actor.name, id);
                    events.push(PresenceEvent::Left { id, name: actor.name });
                }
                None => warn!("Leave for untracked player {}", id),
            },

            ServerMessage::PlayerUpdate { id, state } => match self.roster.get_mut(&id) {
                Some(actor) => actor.apply_state(&state),
                None => warn!("Update for untracked player {}, ignoring", id),
            },

            ServerMessage::ChatMessage { sender_id, text } => {
                let sender_name = self
                    .roster
                    .get(&sender_id)
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                let line = ChatLine {
                    sender_id,
                    sender_name,
                    text,
                };
                self.push_chat(line.clone());
                events.push(PresenceEvent::Chat(line));
            }

            ServerMessage::Disconnect => {
                info!("Presence disconnected, clearing {} remote players", self.roster.len());
                self.roster.clear();
                self.last_sync = None;
                events.push(PresenceEvent::Disconnected);
            }
        }

        events
    }

    fn insert(&mut self, info: RemotePlayerInfo) {
        let visual = self.next_visual;
        self.next_visual += 1;

        let mut actor = RemoteActor {
            id: info.id.clone(),
            name: "Explorer".to_string(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            health: 0.0,
            visual,
        };
        actor.apply_state(&info.state);
        self.roster.insert(info.id, actor);
    }

    fn push_chat(&mut self, line: ChatLine) {
        if self.chat_capacity == 0 {
            return;
        }
        while self.chat_log.len() >= self.chat_capacity {
            self.chat_log.pop_front();
        }
        self.chat_log.push_back(line);
    }

    // =========================================================================
    // OUTBOUND
    // =========================================================================

    /// State update for the local actor, if the sync interval has elapsed.
    ///
    /// `now` is the host's wall-clock timestamp.
    pub fn outbound_state(&mut self, now: Duration, actor: &Actor, name: &str) -> Option<ClientMessage> {
        if let Some(last) = self.last_sync {
            if now.saturating_sub(last) < self.sync_interval {
                return None;
            }
        }
        self.last_sync = Some(now);
        Some(ClientMessage::PlayerStateUpdate(PlayerStatePayload::from_actor(actor, name)))
    }

    /// Validate a chat line for sending.
    pub fn prepare_chat(&self, text: &str) -> Result<ClientMessage, ChatError> {
        ClientMessage::chat(text, self.max_chat_length)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Remote actors by connection id.
    pub fn roster(&self) -> &BTreeMap<String, RemoteActor> {
        &self.roster
    }

    /// Look up one remote actor.
    pub fn remote(&self, id: &str) -> Option<&RemoteActor> {
        self.roster.get(id)
    }

    /// Recent chat, oldest first.
    pub fn chat_log(&self) -> impl Iterator<Item = &ChatLine> {
        self.chat_log.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, name: &str, x: f32) -> RemotePlayerInfo {
        RemotePlayerInfo {
            id: id.to_string(),
            state: PlayerStatePayload {
                position: [x, 0.0, 0.0],
                rotation: [0.0, 0.0, 0.0, 1.0],
                health: 100.0,
                name: name.to_string(),
            },
        }
    }

    fn sync() -> PresenceSync {
        PresenceSync::new(&NetworkConfig::default())
    }

    #[test]
    fn test_join_update_leave() {
        let mut presence = sync();

        let events = presence.apply(ServerMessage::PlayerJoined { player: info("c1", "Ash", 1.0) });
        assert_eq!(events, vec![PresenceEvent::Joined { id: "c1".to_string(), name: "Ash".to_string() }]);

        let mut moved = info("c1", "Ash", 5.0).state;
        moved.health = 40.0;
        presence.apply(ServerMessage::PlayerUpdate { id: "c1".to_string(), state: moved });
        let ash = presence.remote("c1").unwrap();
        assert_eq!(ash.position, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(ash.health, 40.0);

        let events = presence.apply(ServerMessage::PlayerLeft { id: "c1".to_string() });
        assert_eq!(events, vec![PresenceEvent::Left { id: "c1".to_string(), name: "Ash".to_string() }]);
        assert!(presence.roster().is_empty());
    }

    #[test]
    fn test_unknown_update_is_ignored() {
        let mut presence = sync();
        presence.apply(ServerMessage::PlayerJoined { player: info("c1", "Ash", 1.0) });

        let events = presence.apply(ServerMessage::PlayerUpdate {
            id: "ghost".to_string(),
            state: info("ghost", "Ghost", 9.0).state,
        });

        assert!(events.is_empty());
        assert_eq!(presence.roster().len(), 1);
        assert!(presence.remote("ghost").is_none());
    }

    #[test]
    fn test_world_state_replaces_roster() {
        let mut presence = sync();
        presence.apply(ServerMessage::PlayerJoined { player: info("old", "Old", 0.0) });

        let events = presence.apply(ServerMessage::WorldState {
            players: vec![info("a", "A", 1.0), info("b", "B", 2.0)],
        });

        assert_eq!(events, vec![PresenceEvent::RosterReplaced { count: 2 }]);
        let ids: Vec<_> = presence.roster().keys().cloned().collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);

        // Visual handles are unique
        assert_ne!(presence.remote("a").unwrap().visual, presence.remote("b").unwrap().visual);
    }

    #[test]
    fn test_disconnect_clears_roster() {
        let mut presence = sync();
        presence.apply(ServerMessage::PlayerJoined { player: info("c1", "Ash", 1.0) });

        assert_eq!(presence.apply(ServerMessage::Disconnect), vec![PresenceEvent::Disconnected]);
        assert!(presence.roster().is_empty());
    }

    #[test]
    fn test_chat_log_is_capped() {
        let config = NetworkConfig {
            chat_log_capacity: 2,
            ..NetworkConfig::default()
        };
        let mut presence = PresenceSync::new(&config);
        presence.apply(ServerMessage::PlayerJoined { player: info("c1", "Ash", 1.0) });

        for text in ["one", "two", "three"] {
            presence.apply(ServerMessage::ChatMessage {
                sender_id: "c1".to_string(),
                text: text.to_string(),
            });
        }

        let log: Vec<_> = presence.chat_log().map(|l| l.text.as_str()).collect();
        assert_eq!(log, vec!["two", "three"]);
        assert_eq!(presence.chat_log().next().unwrap().sender_name, "Ash");
    }

    #[test]
    fn test_outbound_is_throttled() {
        let mut presence = sync();
        let actor = Actor::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ONE, 100.0);

        assert!(presence.outbound_state(Duration::from_millis(0), &actor, "Mira").is_some());
        assert!(presence.outbound_state(Duration::from_millis(50), &actor, "Mira").is_none());
        assert!(presence.outbound_state(Duration::from_millis(99), &actor, "Mira").is_none());

        match presence.outbound_state(Duration::from_millis(100), &actor, "Mira") {
            Some(ClientMessage::PlayerStateUpdate(state)) => {
                assert_eq!(state.position, [1.0, 2.0, 3.0]);
                assert_eq!(state.name, "Mira");
            }
            other => panic!("Expected state update, got {:?}", other),
        }
    }

    #[test]
    fn test_sends_at_most_once_per_interval() {
        let mut presence = sync();
        let actor = Actor::new(Vec3::ZERO, Vec3::ONE, 100.0);

        // One second of frames at 60 Hz
        let sent = (0..60u64)
            .filter(|frame| {
                let now = Duration::from_micros(frame * 16_667);
                presence.outbound_state(now, &actor, "Mira").is_some()
            })
            .count();
        assert!(sent <= 10, "sent {}", sent);
        assert!(sent >= 9, "sent {}", sent);
    }

    #[test]
    fn test_prepare_chat_validates() {
        let presence = sync();
        assert_eq!(presence.prepare_chat(""), Err(ChatError::Empty));
        assert_eq!(
            presence.prepare_chat("<hi>"),
            Ok(ClientMessage::ChatMessage { text: "&lt;hi&gt;".to_string() })
        );
    }
}
