//! External Collaborators
//!
//! Narrow traits for everything the simulation drives but does not own:
//! drawing, sound, on-screen UI, score persistence. The game loop holds one
//! of each and only ever calls outward.

pub mod logging;
pub mod scores;
pub mod tasks;

#[cfg(test)]
pub mod testing;

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::game::session::{GameSession, SessionSummary};
use crate::game::state::Actor;
use crate::game::tick::LoopState;
use crate::game::world::World;
use crate::network::presence::RemoteActor;

pub use scores::{HighScoreEntry, MemoryScoreStore, ScoreStore, ScoreStoreError};
pub use tasks::PendingTasks;

// =============================================================================
// RENDERING
// =============================================================================

/// Everything a renderer may read for one frame.
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    /// Local actor
    pub actor: &'a Actor,
    /// Loaded level and collectible state
    pub world: &'a World,
    /// Remote actors by connection id
    pub remotes: &'a BTreeMap<String, RemoteActor>,
    /// Current life's counters
    pub session: &'a GameSession,
    /// Loop state
    pub state: &'a LoopState,
}

/// Draws a frame.
pub trait Renderer {
    /// Draw the scene. `dt` is zero while paused.
    fn render(&mut self, view: &SceneView<'_>, dt: f32);
}

// =============================================================================
// AUDIO
// =============================================================================

/// Sound cues the loop triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sound {
    /// Jump started
    Jump,
    /// Touched down after a fall
    Land,
    /// Artifact picked up
    Artifact,
    /// Memory picked up
    Memory,
    /// Health restored
    Heal,
    /// Health lost
    Hurt,
    /// Dialogue opened or advanced
    Dialogue,
    /// New life started
    Respawn,
    /// Depth goal reached
    Win,
    /// Game over
    GameOver,
}

impl Sound {
    /// Asset key.
    pub fn as_str(self) -> &'static str {
        match self {
            Sound::Jump => "jump",
            Sound::Land => "land",
            Sound::Artifact => "artifact",
            Sound::Memory => "memory",
            Sound::Heal => "heal",
            Sound::Hurt => "hurt",
            Sound::Dialogue => "dialogue",
            Sound::Respawn => "respawn",
            Sound::Win => "win",
            Sound::GameOver => "game_over",
        }
    }
}

/// Playback options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayOptions {
    /// Volume in `[0, 1]`
    pub volume: f32,
    /// Loop until stopped
    pub looped: bool,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            volume: 1.0,
            looped: false,
        }
    }
}

/// Sound output.
pub trait Audio {
    /// Play a one-shot or looping cue.
    fn play(&mut self, sound: Sound, options: PlayOptions);
    /// Start a music track, replacing the current one.
    fn play_music(&mut self, track: &str, options: PlayOptions);
    /// Stop music.
    fn stop_music(&mut self);
    /// Stop every looping cue.
    fn stop_all_loops(&mut self);
    /// Suspend all output.
    fn pause_audio(&mut self);
    /// Resume after `pause_audio`.
    fn resume_audio(&mut self);
}

// =============================================================================
// HUD
// =============================================================================

/// On-screen UI.
pub trait Hud {
    /// Transient toast.
    fn show_temporary_message(&mut self, text: &str, duration: Duration);
    /// Dialogue box with a speaker, one line and button labels.
    fn show_dialogue(&mut self, speaker: &str, text: &str, options: &[String]);
    /// Close the dialogue box.
    fn hide_dialogue(&mut self);
    /// Game over screen.
    fn show_game_over(&mut self, summary: &SessionSummary, scores: &[HighScoreEntry]);
    /// Win screen.
    fn show_game_won(&mut self, summary: &SessionSummary, scores: &[HighScoreEntry]);
    /// Pause overlay.
    fn show_pause_screen(&mut self);
    /// Remove the pause overlay.
    fn hide_pause_screen(&mut self);
}
