//! Recording doubles for loop tests. Each clones into a handle that shares
//! the same log, so a test can keep one copy after handing the other to the
//! loop.

#![allow(missing_docs)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use glam::Vec3;

use crate::game::session::SessionSummary;
use crate::game::tick::LoopState;
use crate::network::protocol::{ClientMessage, ServerMessage};
use crate::network::transport::{Transport, TransportError};
use crate::services::{Audio, HighScoreEntry, Hud, PlayOptions, Renderer, SceneView, Sound};

#[derive(Debug, Clone, PartialEq)]
pub enum HudCall {
    Message(String),
    Dialogue { speaker: String, text: String, options: Vec<String> },
    HideDialogue,
    GameOver { reason: String, score: u64, scores: usize },
    GameWon { score: u64, scores: usize },
    PauseShown,
    PauseHidden,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingHud {
    calls: Arc<Mutex<Vec<HudCall>>>,
}

impl RecordingHud {
    pub fn calls(&self) -> Vec<HudCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HudCall::Message(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: HudCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Hud for RecordingHud {
    fn show_temporary_message(&mut self, text: &str, _duration: Duration) {
        self.record(HudCall::Message(text.to_string()));
    }

    fn show_dialogue(&mut self, speaker: &str, text: &str, options: &[String]) {
        self.record(HudCall::Dialogue {
            speaker: speaker.to_string(),
            text: text.to_string(),
            options: options.to_vec(),
        });
    }

    fn hide_dialogue(&mut self) {
        self.record(HudCall::HideDialogue);
    }

    fn show_game_over(&mut self, summary: &SessionSummary, scores: &[HighScoreEntry]) {
        self.record(HudCall::GameOver {
            reason: summary.reason.clone(),
            score: summary.score,
            scores: scores.len(),
        });
    }

    fn show_game_won(&mut self, summary: &SessionSummary, scores: &[HighScoreEntry]) {
        self.record(HudCall::GameWon {
            score: summary.score,
            scores: scores.len(),
        });
    }

    fn show_pause_screen(&mut self) {
        self.record(HudCall::PauseShown);
    }

    fn hide_pause_screen(&mut self) {
        self.record(HudCall::PauseHidden);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Play(Sound),
    Music(String),
    StopMusic,
    StopLoops,
    Pause,
    Resume,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    calls: Arc<Mutex<Vec<AudioCall>>>,
}

impl RecordingAudio {
    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: AudioCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Audio for RecordingAudio {
    fn play(&mut self, sound: Sound, _options: PlayOptions) {
        self.record(AudioCall::Play(sound));
    }

    fn play_music(&mut self, track: &str, _options: PlayOptions) {
        self.record(AudioCall::Music(track.to_string()));
    }

    fn stop_music(&mut self) {
        self.record(AudioCall::StopMusic);
    }

    fn stop_all_loops(&mut self) {
        self.record(AudioCall::StopLoops);
    }

    fn pause_audio(&mut self) {
        self.record(AudioCall::Pause);
    }

    fn resume_audio(&mut self) {
        self.record(AudioCall::Resume);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub dt: f32,
    pub state: LoopState,
    pub position: Vec3,
    pub remotes: usize,
    pub health: f32,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    frames: Arc<Mutex<Vec<RenderedFrame>>>,
}

impl RecordingRenderer {
    pub fn frames(&self) -> Vec<RenderedFrame> {
        self.frames.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: &SceneView<'_>, dt: f32) {
        self.frames.lock().unwrap().push(RenderedFrame {
            dt,
            state: view.state.clone(),
            position: view.actor.position,
            remotes: view.remotes.len(),
            health: view.session.health,
        });
    }
}

/// In-process transport: tests push inbound messages and read what was sent.
#[derive(Debug, Clone, Default)]
pub struct LoopbackTransport {
    sent: Arc<Mutex<Vec<ClientMessage>>>,
    inbox: Arc<Mutex<VecDeque<ServerMessage>>>,
    connected: Arc<Mutex<bool>>,
}

impl LoopbackTransport {
    pub fn sent(&self) -> Vec<ClientMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn deliver(&self, message: ServerMessage) {
        self.inbox.lock().unwrap().push_back(message);
    }
}

impl Transport for LoopbackTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        *self.connected.lock().unwrap() = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        *self.connected.lock().unwrap()
    }

    fn send(&mut self, message: &ClientMessage) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn poll(&mut self) -> Vec<ServerMessage> {
        self.inbox.lock().unwrap().drain(..).collect()
    }
}
