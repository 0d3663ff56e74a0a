//! Headless Collaborators
//!
//! Renderer, audio and HUD that write to the tracing log instead of a
//! screen or speaker. Used by the simulation binary.

use std::time::Duration;

use tracing::{debug, info, trace};

use crate::game::session::SessionSummary;
use crate::services::{Audio, HighScoreEntry, Hud, PlayOptions, Renderer, SceneView, Sound};

/// Renderer that logs a frame summary every `every` frames.
#[derive(Debug)]
pub struct LogRenderer {
    every: u64,
    frames: u64,
}

impl LogRenderer {
    /// Log every `every`th frame (0 logs none).
    pub fn new(every: u64) -> Self {
        Self { every, frames: 0 }
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, view: &SceneView<'_>, dt: f32) {
        self.frames += 1;
        if self.every == 0 || self.frames % self.every != 0 {
            return;
        }

        let p = view.actor.position;
        debug!(
            frame = self.frames,
            dt,
            state = ?view.state,
            x = p.x,
            y = p.y,
            z = p.z,
            grounded = view.actor.grounded,
            depth = view.session.depth,
            remotes = view.remotes.len(),
            "render"
        );
    }
}

/// Audio that logs cues.
#[derive(Debug, Default)]
pub struct LogAudio {
    paused: bool,
}

impl Audio for LogAudio {
    fn play(&mut self, sound: Sound, options: PlayOptions) {
        if !self.paused {
            trace!(sound = sound.as_str(), volume = options.volume, "play");
        }
    }

    fn play_music(&mut self, track: &str, _options: PlayOptions) {
        debug!(track, "music");
    }

    fn stop_music(&mut self) {
        debug!("music stopped");
    }

    fn stop_all_loops(&mut self) {
        trace!("loops stopped");
    }

    fn pause_audio(&mut self) {
        self.paused = true;
    }

    fn resume_audio(&mut self) {
        self.paused = false;
    }
}

/// HUD that logs what it would show.
#[derive(Debug, Default)]
pub struct LogHud;

impl Hud for LogHud {
    fn show_temporary_message(&mut self, text: &str, duration: Duration) {
        info!("[hud {:.1}s] {}", duration.as_secs_f32(), text);
    }

    fn show_dialogue(&mut self, speaker: &str, text: &str, options: &[String]) {
        info!("[dialogue] {}: {} {:?}", speaker, text, options);
    }

    fn hide_dialogue(&mut self) {
        debug!("[dialogue] closed");
    }

    fn show_game_over(&mut self, summary: &SessionSummary, scores: &[HighScoreEntry]) {
        info!(
            "[game over] {} ({}) score {} | {} scores on record",
            summary.player_name,
            summary.reason,
            summary.score,
            scores.len()
        );
    }

    fn show_game_won(&mut self, summary: &SessionSummary, scores: &[HighScoreEntry]) {
        info!("[win] {} score {} after {:.1}s", summary.player_name, summary.score, summary.elapsed_secs);
        for (rank, entry) in scores.iter().enumerate() {
            info!("  {:>2}. {:<16} {}", rank + 1, entry.name, entry.score);
        }
    }

    fn show_pause_screen(&mut self) {
        info!("[paused]");
    }

    fn hide_pause_screen(&mut self) {
        info!("[resumed]");
    }
}
