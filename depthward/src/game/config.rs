//! Game Configuration
//!
//! Tunables for movement, rules and networking. Every section has a
//! `Default` and deserializes with missing fields filled from it, so a host
//! can ship a partial JSON file.

use glam::Vec3;
use serde::{Serialize, Deserialize};

use crate::game::score::ScoreConfig;

/// Movement and collision tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Forward speed (units/second)
    pub move_speed: f32,
    /// Fraction of `move_speed` used when moving backward
    pub backward_factor: f32,
    /// Yaw rate when turning (radians/second)
    pub turn_speed: f32,
    /// Vertical velocity applied on jump
    pub jump_force: f32,
    /// Jump multiplier once the high-jump ability is unlocked
    pub high_jump_multiplier: f32,
    /// Downward acceleration (units/second^2)
    pub gravity: f32,
    /// Maximum distance of the downward ground probe (inclusive)
    pub ground_probe_distance: f32,
    /// Half extents of the actor hitbox, centred on the actor position
    pub hitbox_half_extents: Vec3,
    /// Push-out scale applied to the penetration depth
    pub push_out_factor: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 8.0,
            backward_factor: 0.7,
            turn_speed: 2.5,
            jump_force: 10.0,
            high_jump_multiplier: 1.5,
            gravity: 25.0,
            ground_probe_distance: 1.0,
            hitbox_half_extents: Vec3::new(0.4, 0.9, 0.4),
            push_out_factor: 1.01,
        }
    }
}

/// Session rules: thresholds, radii and timers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Falling below this height ends the life
    pub world_floor_y: f32,
    /// Standing on ground below this height wins
    pub win_depth_y: f32,
    /// Depth is measured down from this height
    pub reference_height: f32,
    /// Maximum actor health
    pub max_health: f32,
    /// Collectibles within this distance are picked up
    pub pickup_radius: f32,
    /// NPCs within this distance can be talked to
    pub interact_radius: f32,
    /// Upper bound on a single frame's delta time (seconds)
    pub max_frame_delta: f32,
    /// Wall-clock seconds between level regenerations (None disables)
    pub level_regen_interval_secs: Option<f32>,
    /// How long the last score stays on screen after a respawn
    pub score_notice_secs: f32,
    /// Default duration for transient HUD messages
    pub message_secs: f32,
    /// Spawn marker the session records at start
    pub spawn_name: String,
    /// Music track started with the session
    pub music_track: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            world_floor_y: -550.0,
            win_depth_y: -500.0,
            reference_height: 0.0,
            max_health: 100.0,
            pickup_radius: 1.5,
            interact_radius: 3.0,
            max_frame_delta: 0.1,
            level_regen_interval_secs: Some(300.0),
            score_notice_secs: 5.0,
            message_secs: 3.0,
            spawn_name: "player".to_string(),
            music_track: "descent".to_string(),
        }
    }
}

/// Presence sync tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Wall-clock seconds between outbound state updates
    pub sync_interval_secs: f32,
    /// Maximum chat message length (characters, before escaping)
    pub max_chat_length: usize,
    /// Number of chat lines retained locally
    pub chat_log_capacity: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            sync_interval_secs: 0.1,
            max_chat_length: 100,
            chat_log_capacity: 50,
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Display name used for scores and presence
    pub player_name: String,
    /// Movement tunables
    pub movement: MovementConfig,
    /// Session rules
    pub rules: RulesConfig,
    /// Scoring constants
    pub score: ScoreConfig,
    /// Presence sync tunables
    pub network: NetworkConfig,
}

impl GameConfig {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Display name, falling back to a placeholder when unset.
    pub fn display_name(&self) -> &str {
        let trimmed = self.player_name.trim();
        if trimmed.is_empty() {
            "Explorer"
        } else {
            trimmed
        }
    }
}
