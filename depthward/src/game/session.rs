//! Game Session
//!
//! Per-life counters and the respawn bookkeeping around them. The session
//! timer only advances while the loop is running; the loop decides when.

use glam::Vec3;
use serde::{Serialize, Deserialize};

use crate::game::score::ScoreConfig;
use crate::game::state::Actor;

/// Why a life ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalReason {
    /// Fell below the world floor
    Fall,
    /// Health reached zero
    Health,
    /// Reached the depth goal or satisfied a guardian
    Win,
}

impl TerminalReason {
    /// Stable reason code.
    pub fn as_str(self) -> &'static str {
        match self {
            TerminalReason::Fall => "fall",
            TerminalReason::Health => "health",
            TerminalReason::Win => "win",
        }
    }
}

/// Why the whole game stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    /// No spawn point was recorded when a respawn was needed
    RespawnError,
}

impl GameOverReason {
    /// Stable reason code.
    pub fn as_str(self) -> &'static str {
        match self {
            GameOverReason::RespawnError => "respawn_error",
        }
    }
}

/// Game loop errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Respawn needed a spawn point that was never recorded.
    #[error("No spawn point recorded")]
    MissingSpawn,

    /// Operation needs a started game.
    #[error("Game not started")]
    NotStarted,

    /// `start` called twice.
    #[error("Game already started")]
    AlreadyStarted,
}

/// Snapshot handed to the HUD on game over / game won screens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Display name
    pub player_name: String,
    /// Reason code (`fall`, `health`, `win`, `respawn_error`)
    pub reason: String,
    /// Score for the life
    pub score: u64,
    /// Seconds survived
    pub elapsed_secs: f64,
    /// Artifacts collected
    pub artifacts: u32,
    /// Memories collected
    pub memories: u32,
    /// Memory journal
    pub collected_memories: Vec<String>,
    /// Deepest point reached
    pub max_depth: f32,
    /// Longest fall this game
    pub max_fall_distance: f32,
}

/// Counters for the current life.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameSession {
    /// Seconds of running time this life
    pub elapsed_secs: f64,
    /// Artifacts collected this life
    pub artifacts: u32,
    /// Memories collected this life
    pub memories: u32,
    /// Journal text of collected memories, in pickup order
    pub collected_memories: Vec<String>,
    /// Health at the end of the last tick
    pub health: f32,
    /// Current depth below the reference height
    pub depth: f32,
    /// Deepest point this life
    pub max_depth: f32,
    /// How the previous life ended
    pub terminal: Option<TerminalReason>,
    /// Score of the previous life
    pub last_score: Option<u64>,
    /// Respawns so far this game
    pub respawns: u32,
    /// Where new lives start
    spawn_point: Option<Vec3>,
    /// Seconds the last score stays announced
    score_notice_secs: f32,
}

impl GameSession {
    /// Fresh session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the spawn point new lives start from.
    pub fn record_spawn(&mut self, spawn: Vec3) {
        self.spawn_point = Some(spawn);
    }

    /// Recorded spawn point.
    pub fn spawn_point(&self) -> Option<Vec3> {
        self.spawn_point
    }

    /// Advance timers by a running tick.
    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.elapsed_secs += f64::from(dt);
        }
    }

    /// Count down the score notice. Runs on wall-clock time.
    pub fn tick_notice(&mut self, wall_dt: f32) {
        self.score_notice_secs = (self.score_notice_secs - wall_dt).max(0.0);
    }

    /// Count an artifact.
    pub fn record_artifact(&mut self) {
        self.artifacts += 1;
    }

    /// Count a memory and keep its text.
    pub fn record_memory(&mut self, text: &str) {
        self.memories += 1;
        self.collected_memories.push(text.to_string());
    }

    /// Refresh derived values from the actor.
    pub fn observe(&mut self, actor: &Actor, reference_height: f32) {
        self.health = actor.health.current();
        self.depth = (reference_height - actor.position.y).max(0.0);
        self.max_depth = self.max_depth.max(self.depth);
    }

    /// Score the current life.
    pub fn score(&self, config: &ScoreConfig, is_win: bool) -> u64 {
        config.compute(self.elapsed_secs, self.artifacts, self.memories, is_win)
    }

    /// Build the end-of-life summary from the current counters.
    pub fn summary(&self, player_name: &str, reason: &str, score: u64, max_fall_distance: f32) -> SessionSummary {
        SessionSummary {
            player_name: player_name.to_string(),
            reason: reason.to_string(),
            score,
            elapsed_secs: self.elapsed_secs,
            artifacts: self.artifacts,
            memories: self.memories,
            collected_memories: self.collected_memories.clone(),
            max_depth: self.max_depth,
            max_fall_distance,
        }
    }

    /// Close the current life and start counting a new one.
    ///
    /// The spawn point, respawn count and last score survive.
    pub fn begin_new_life(&mut self, reason: TerminalReason, score: u64, notice_secs: f32) {
        self.elapsed_secs = 0.0;
        self.artifacts = 0;
        self.memories = 0;
        self.collected_memories.clear();
        self.depth = 0.0;
        self.max_depth = 0.0;
        self.terminal = Some(reason);
        self.last_score = Some(score);
        self.respawns += 1;
        self.score_notice_secs = notice_secs.max(0.0);
    }

    /// Last score while its notice window is open.
    pub fn score_notice(&self) -> Option<u64> {
        if self.score_notice_secs > 0.0 {
            self.last_score
        } else {
            None
        }
    }
}
