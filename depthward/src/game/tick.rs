//! Game Loop
//!
//! The single authority over whether simulation time advances. The host
//! calls `GameLoop::frame` once per display frame with its timestamp and the
//! current input; everything that mutates the simulation happens inside that
//! call, in a fixed order:
//!
//! 1. Apply async completions (score saves and fetches; level loads only
//!    while running, otherwise held for the next running tick)
//! 2. Apply inbound presence messages
//! 3. Handle pause / dialogue edges
//! 4. While running: movement, pickups, derived state, terminal checks,
//!    NPC interaction
//! 5. Render (always, with dt 0 when paused)
//! 6. Throttled outbound state sync (running only)

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use tracing::{debug, info, warn};

use crate::game::config::GameConfig;
use crate::game::dialogue::{DialogueStep, NpcId};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::{InputState, Intent};
use crate::game::movement;
use crate::game::session::{GameError, GameOverReason, GameSession, SessionSummary, TerminalReason};
use crate::game::state::Actor;
use crate::game::world::{CollectibleEffect, Level, LevelError, LevelSource, World};
use crate::network::presence::{PresenceEvent, PresenceSync};
use crate::network::protocol::ChatError;
use crate::network::transport::Transport;
use crate::services::{
    Audio, HighScoreEntry, Hud, PendingTasks, PlayOptions, Renderer, SceneView, ScoreStore,
    ScoreStoreError, Sound,
};

// =============================================================================
// STATE
// =============================================================================

/// Loop state.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoopState {
    /// Waiting for `start`
    #[default]
    NotStarted,
    /// Simulation advancing
    Running,
    /// Frozen while a dialogue line is shown
    DialoguePaused {
        /// NPC being spoken to
        npc: NpcId,
        /// Line on screen
        line: usize,
    },
    /// Frozen by the player
    UserPaused,
    /// Stopped until `restart`
    GameOver {
        /// Why
        reason: GameOverReason,
    },
}

impl LoopState {
    /// Check if simulation time advances in this state.
    pub fn is_running(&self) -> bool {
        matches!(self, LoopState::Running)
    }

    /// Check if the loop is frozen by a pause gate.
    pub fn is_paused(&self) -> bool {
        matches!(self, LoopState::UserPaused | LoopState::DialoguePaused { .. })
    }
}

/// The collaborators the loop drives.
pub struct Collaborators {
    /// Draws frames
    pub renderer: Box<dyn Renderer>,
    /// Plays sound
    pub audio: Box<dyn Audio>,
    /// On-screen UI
    pub hud: Box<dyn Hud>,
    /// Score persistence
    pub scores: Arc<dyn ScoreStore>,
    /// Presence connection
    pub transport: Box<dyn Transport>,
    /// Level provider for regeneration
    pub levels: Arc<dyn LevelSource>,
}

/// Result of a frame.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this frame, in order
    pub events: Vec<GameEvent>,
    /// Presence changes applied this frame
    pub presence: Vec<PresenceEvent>,
    /// Simulation time advanced (0 unless running)
    pub dt: f32,
    /// State after the frame
    pub state: LoopState,
}

/// Which end-of-run screen a score fetch is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EndScreen {
    Won,
    GameOver,
}

/// Output of a parked future, applied at the next tick boundary.
enum Completion {
    ScoreSaved(Result<HighScoreEntry, ScoreStoreError>),
    EndScreen {
        screen: EndScreen,
        summary: SessionSummary,
        saved: Result<HighScoreEntry, ScoreStoreError>,
        scores: Result<Vec<HighScoreEntry>, ScoreStoreError>,
    },
    LevelLoaded {
        index: usize,
        result: Result<Level, LevelError>,
    },
}

/// Seconds to a duration, treating garbage as zero.
fn secs(value: f32) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f32(value.min(86_400.0))
    } else {
        Duration::ZERO
    }
}

const MUSIC: PlayOptions = PlayOptions {
    volume: 0.6,
    looped: true,
};

// =============================================================================
// GAME LOOP
// =============================================================================

/// Owns the simulation and drives its collaborators.
pub struct GameLoop {
    config: GameConfig,
    state: LoopState,
    actor: Actor,
    world: World,
    session: GameSession,
    presence: PresenceSync,
    collaborators: Collaborators,
    pending: PendingTasks<Completion>,
    /// Events produced outside `frame`, reported with the next frame
    outbox: Vec<GameEvent>,
    previous_input: InputState,
    last_timestamp: Option<Duration>,
    frame: u64,
    pending_damage: f32,
    regen_elapsed: f32,
    level_loading: bool,
    /// Level load that finished outside a running tick
    deferred_level: Option<(usize, Result<Level, LevelError>)>,
}

impl GameLoop {
    /// Create a loop over a loaded world. Nothing runs until `start`.
    pub fn new(config: GameConfig, world: World, collaborators: Collaborators) -> Self {
        let spawn = world
            .spawn_position(&config.rules.spawn_name)
            .unwrap_or(glam::Vec3::ZERO);
        let actor = Actor::new(spawn, config.movement.hitbox_half_extents, config.rules.max_health);
        let presence = PresenceSync::new(&config.network);

        Self {
            config,
            state: LoopState::NotStarted,
            actor,
            world,
            session: GameSession::new(),
            presence,
            collaborators,
            pending: PendingTasks::new(),
            outbox: Vec::new(),
            previous_input: InputState::IDLE,
            last_timestamp: None,
            frame: 0,
            pending_damage: 0.0,
            regen_elapsed: 0.0,
            level_loading: false,
            deferred_level: None,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Current loop state.
    pub fn state(&self) -> &LoopState {
        &self.state
    }

    /// The local actor.
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// The loaded world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Counters for the current life.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Remote roster and chat.
    pub fn presence(&self) -> &PresenceSync {
        &self.presence
    }

    /// Configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Async operations still in flight.
    pub fn pending_tasks(&self) -> usize {
        self.pending.len()
    }

    // =========================================================================
    // HOST API
    // =========================================================================

    /// Start the game: record the spawn point, place the actor, start music
    /// and connect presence.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.state != LoopState::NotStarted {
            return Err(GameError::AlreadyStarted);
        }

        if let Err(e) = self.collaborators.transport.connect() {
            warn!("Presence unavailable: {}", e);
        }

        self.begin_game();
        Ok(())
    }

    /// Start over with a fresh session. Valid from any started state.
    pub fn restart(&mut self) -> Result<(), GameError> {
        match self.state {
            LoopState::NotStarted => return Err(GameError::NotStarted),
            LoopState::DialoguePaused { .. } => self.collaborators.hud.hide_dialogue(),
            LoopState::UserPaused => {
                self.collaborators.hud.hide_pause_screen();
                self.collaborators.audio.resume_audio();
            }
            LoopState::Running | LoopState::GameOver { .. } => {}
        }

        self.collaborators.audio.stop_all_loops();
        self.begin_game();
        Ok(())
    }

    fn begin_game(&mut self) {
        self.session = GameSession::new();
        self.world.reset_collectibles();
        self.pending_damage = 0.0;
        self.regen_elapsed = 0.0;
        self.actor.max_fall_distance = 0.0;

        let spawn = self.world.spawn_position(&self.config.rules.spawn_name);
        match spawn {
            Some(spawn) => {
                self.session.record_spawn(spawn);
                self.actor.reset_at(spawn);
            }
            None => warn!(
                "Level '{}' has no '{}' spawn marker; respawning will end the game",
                self.world.level_name(),
                self.config.rules.spawn_name
            ),
        }

        self.state = LoopState::Running;
        self.collaborators.audio.play_music(&self.config.rules.music_track, MUSIC);

        info!("Game started in '{}' as {}", self.world.level_name(), self.config.display_name());
        self.outbox.push(GameEvent::new(
            self.frame,
            GameEventData::Started {
                spawn: self.actor.position,
            },
        ));
    }

    /// Queue damage from a host-side hazard. Applied on the next running tick.
    pub fn queue_damage(&mut self, amount: f32) {
        if amount.is_finite() && amount > 0.0 {
            self.pending_damage += amount;
        }
    }

    /// Validate and send a chat line.
    ///
    /// Transport failures are logged; only invalid text is an error.
    pub fn send_chat(&mut self, text: &str) -> Result<(), ChatError> {
        let message = self.presence.prepare_chat(text)?;
        if let Err(e) = self.collaborators.transport.send(&message) {
            warn!("Chat not sent: {}", e);
        }
        Ok(())
    }

    /// Process one display frame.
    ///
    /// `now` is the host's monotonic timestamp; `input` the intents held this
    /// frame.
    pub fn frame(&mut self, now: Duration, input: InputState) -> TickResult {
        self.frame += 1;
        let mut result = TickResult::default();
        result.events.append(&mut self.outbox);

        let wall_dt = match self.last_timestamp {
            Some(previous) => now.saturating_sub(previous).as_secs_f32(),
            None => 0.0,
        };
        self.last_timestamp = Some(now);

        // 1. Async completions
        for completion in self.pending.drain_ready() {
            self.apply_completion(completion, &mut result);
        }

        // 2. Inbound presence
        for message in self.collaborators.transport.poll() {
            for event in self.presence.apply(message) {
                self.announce_presence(&event);
                result.presence.push(event);
            }
        }

        // 3. State machine
        let pause_edge = input.pressed_since(&self.previous_input, Intent::Pause);
        let interact_edge = input.pressed_since(&self.previous_input, Intent::Interact);
        self.previous_input = input;

        let dt = match self.state.clone() {
            LoopState::NotStarted | LoopState::GameOver { .. } => 0.0,
            LoopState::UserPaused => {
                if pause_edge {
                    self.resume(&mut result);
                }
                0.0
            }
            LoopState::DialoguePaused { npc, line } => {
                if interact_edge {
                    self.advance_dialogue(npc, line, &mut result);
                }
                0.0
            }
            LoopState::Running => {
                if pause_edge {
                    self.pause(&mut result);
                    0.0
                } else {
                    if let Some((index, loaded)) = self.deferred_level.take() {
                        self.apply_level(index, loaded, &mut result);
                    }
                    let dt = wall_dt.clamp(0.0, self.config.rules.max_frame_delta.max(0.0));
                    self.run_tick(dt, wall_dt, &input, interact_edge, &mut result);
                    dt
                }
            }
        };

        self.session.tick_notice(wall_dt);

        // 5. Render
        let view = SceneView {
            actor: &self.actor,
            world: &self.world,
            remotes: self.presence.roster(),
            session: &self.session,
            state: &self.state,
        };
        self.collaborators.renderer.render(&view, dt);

        // 6. Outbound sync
        if self.state.is_running() && self.collaborators.transport.is_connected() {
            let name = self.config.display_name();
            if let Some(update) = self.presence.outbound_state(now, &self.actor, name) {
                if let Err(e) = self.collaborators.transport.send(&update) {
                    debug!("State sync skipped: {}", e);
                }
            }
        }

        result.dt = dt;
        result.state = self.state.clone();
        result
    }

    // =========================================================================
    // RUNNING TICK
    // =========================================================================

    fn run_tick(
        &mut self,
        dt: f32,
        wall_dt: f32,
        input: &InputState,
        interact_edge: bool,
        result: &mut TickResult,
    ) {
        // Hazard damage
        if self.pending_damage > 0.0 {
            let applied = self.actor.health.apply(-self.pending_damage);
            self.pending_damage = 0.0;
            if applied < 0.0 {
                self.emit(result, GameEventData::Damaged { amount: applied });
                self.collaborators.audio.play(Sound::Hurt, PlayOptions::default());
            }
        }

        // Movement and collision
        let outcome = movement::step(
            &mut self.actor,
            input,
            dt,
            self.world.ground_bodies(),
            self.world.collision_bodies(),
            &self.config.movement,
        );

        #[cfg(feature = "debug-tracing")]
        tracing::trace!(
            frame = self.frame,
            dt,
            x = self.actor.position.x,
            y = self.actor.position.y,
            z = self.actor.position.z,
            vy = self.actor.velocity.y,
            grounded = self.actor.grounded,
            pushes = outcome.pushes.len(),
            "step"
        );

        if outcome.jumped {
            self.emit(result, GameEventData::Jumped);
            self.collaborators.audio.play(Sound::Jump, PlayOptions::default());
        }
        if let Some(fall_distance) = outcome.landed {
            self.emit(result, GameEventData::Landed { fall_distance });
            self.collaborators.audio.play(Sound::Land, PlayOptions::default());
        }

        // Pickups
        self.collect_nearby(result);

        // Derived state
        self.session.advance(dt);
        self.session.observe(&self.actor, self.config.rules.reference_height);
        self.tick_level_regen(wall_dt);

        // Terminal conditions, at most one per tick
        if let Some(reason) = self.terminal_condition() {
            self.end_life(reason, result);
            return;
        }

        if interact_edge {
            self.start_dialogue(result);
        }
    }

    fn terminal_condition(&self) -> Option<TerminalReason> {
        let rules = &self.config.rules;
        let y = self.actor.position.y;

        if y < rules.world_floor_y {
            Some(TerminalReason::Fall)
        } else if self.actor.health.is_depleted() {
            Some(TerminalReason::Health)
        } else if self.actor.grounded && y < rules.win_depth_y {
            Some(TerminalReason::Win)
        } else {
            None
        }
    }

    fn collect_nearby(&mut self, result: &mut TickResult) {
        let ids: Vec<_> = self
            .world
            .collectibles_near(self.actor.position, self.config.rules.pickup_radius)
            .iter()
            .map(|c| c.id)
            .collect();

        for id in ids {
            let Some(effect) = self.world.collect_item(id) else {
                continue;
            };
            self.emit(result, GameEventData::Collected { id, kind: effect.kind() });

            let message_time = secs(self.config.rules.message_secs);
            match effect {
                CollectibleEffect::Artifact { name, unlocks } => {
                    self.session.record_artifact();
                    self.collaborators.audio.play(Sound::Artifact, PlayOptions::default());
                    self.collaborators
                        .hud
                        .show_temporary_message(&format!("Found artifact: {}", name), message_time);

                    if let Some(ability) = unlocks {
                        if self.actor.unlock(ability) {
                            info!("Unlocked {:?}", ability);
                            self.emit(result, GameEventData::AbilityUnlocked { ability });
                        }
                    }
                }
                CollectibleEffect::Memory { text } => {
                    self.session.record_memory(&text);
                    self.collaborators.audio.play(Sound::Memory, PlayOptions::default());
                    self.collaborators.hud.show_temporary_message(&text, message_time);
                }
                CollectibleEffect::Health { amount } => {
                    let applied = self.actor.health.apply(amount);
                    let sound = if applied < 0.0 { Sound::Hurt } else { Sound::Heal };
                    self.collaborators.audio.play(sound, PlayOptions::default());
                }
            }
        }
    }

    // =========================================================================
    // RESPAWN / GAME OVER
    // =========================================================================

    /// End the current life: persist its score, then start a new one at the
    /// recorded spawn point. A win also fetches the table for the win screen.
    fn end_life(&mut self, reason: TerminalReason, result: &mut TickResult) {
        let is_win = reason == TerminalReason::Win;
        let score = self.session.score(&self.config.score, is_win);
        let name = self.config.display_name().to_string();
        let summary = self
            .session
            .summary(&name, reason.as_str(), score, self.actor.max_fall_distance);

        info!(
            "Life ended ({}) after {:.1}s: score {}, {} artifacts, {} memories",
            reason.as_str(),
            self.session.elapsed_secs,
            score,
            self.session.artifacts,
            self.session.memories
        );

        let spawn = match self.session.spawn_point().ok_or(GameError::MissingSpawn) {
            Ok(spawn) => spawn,
            Err(e) => {
                warn!("Cannot respawn: {}", e);
                let summary = SessionSummary {
                    reason: GameOverReason::RespawnError.as_str().to_string(),
                    ..summary
                };
                self.persist_and_show(EndScreen::GameOver, summary);
                self.game_over(GameOverReason::RespawnError, score, result);
                return;
            }
        };

        if is_win {
            self.collaborators.audio.play(Sound::Win, PlayOptions::default());
            self.persist_and_show(EndScreen::Won, summary);
        } else {
            self.persist(&summary);
        }

        let notice = self.config.rules.score_notice_secs;
        self.session.begin_new_life(reason, score, notice);
        self.world.reset_collectibles();
        self.actor.reset_at(spawn);
        self.session.observe(&self.actor, self.config.rules.reference_height);
        self.pending_damage = 0.0;

        let headline = match reason {
            TerminalReason::Fall => "You fell into the abyss",
            TerminalReason::Health => "You ran out of health",
            TerminalReason::Win => "You reached the depths",
        };
        self.collaborators
            .hud
            .show_temporary_message(&format!("{}! Score: {}", headline, score), secs(notice));
        self.collaborators.audio.play(Sound::Respawn, PlayOptions::default());

        self.emit(result, GameEventData::Respawned { reason, score });
    }

    fn game_over(&mut self, reason: GameOverReason, score: u64, result: &mut TickResult) {
        self.state = LoopState::GameOver { reason };
        self.collaborators.audio.stop_all_loops();
        self.collaborators.audio.stop_music();
        self.collaborators.audio.play(Sound::GameOver, PlayOptions::default());

        self.emit(result, GameEventData::GameOver { reason, score });
    }

    /// Fire-and-forget score save.
    fn persist(&mut self, summary: &SessionSummary) {
        let save = self.collaborators.scores.save_high_score(
            summary.player_name.clone(),
            summary.score,
            summary.elapsed_secs,
            summary.artifacts,
        );
        self.pending.push(save.map(Completion::ScoreSaved).boxed());
    }

    /// Save the score, then fetch the table for an end screen.
    fn persist_and_show(&mut self, screen: EndScreen, summary: SessionSummary) {
        let save = self.collaborators.scores.save_high_score(
            summary.player_name.clone(),
            summary.score,
            summary.elapsed_secs,
            summary.artifacts,
        );
        let store = self.collaborators.scores.clone();

        let task: BoxFuture<'static, Completion> = Box::pin(async move {
            let saved = save.await;
            let scores = store.high_scores().await;
            Completion::EndScreen {
                screen,
                summary,
                saved,
                scores,
            }
        });
        self.pending.push(task);
    }

    // =========================================================================
    // PAUSE / DIALOGUE
    // =========================================================================

    fn pause(&mut self, result: &mut TickResult) {
        self.state = LoopState::UserPaused;
        self.collaborators.audio.pause_audio();
        self.collaborators.hud.show_pause_screen();
        debug!("Paused at {:.2}s", self.session.elapsed_secs);
        self.emit(result, GameEventData::Paused);
    }

    fn resume(&mut self, result: &mut TickResult) {
        self.state = LoopState::Running;
        self.collaborators.audio.resume_audio();
        self.collaborators.hud.hide_pause_screen();
        debug!("Resumed");
        self.emit(result, GameEventData::Resumed);
    }

    fn start_dialogue(&mut self, result: &mut TickResult) {
        let Some(npc) = self
            .world
            .npc_near(self.actor.position, self.config.rules.interact_radius)
        else {
            return;
        };

        let id = npc.id;
        match npc.line(0) {
            Some(text) => {
                let (speaker, text, options) = (npc.name.clone(), text.to_string(), npc.options(0));
                self.state = LoopState::DialoguePaused { npc: id, line: 0 };
                self.collaborators.hud.show_dialogue(&speaker, &text, &options);
                self.collaborators.audio.play(Sound::Dialogue, PlayOptions::default());
                debug!("Dialogue with {} started", speaker);
                self.emit(result, GameEventData::DialogueStarted { npc: id });
            }
            None => {
                // Nothing to say: the conversation is over as soon as it starts
                self.emit(result, GameEventData::DialogueStarted { npc: id });
                self.finish_dialogue(id, result);
            }
        }
    }

    fn advance_dialogue(&mut self, id: NpcId, line: usize, result: &mut TickResult) {
        let Some(npc) = self.world.npc(id) else {
            // NPC missing from the level
            warn!("NPC {} vanished mid-dialogue", id);
            self.collaborators.hud.hide_dialogue();
            self.state = LoopState::Running;
            self.emit(result, GameEventData::DialogueEnded { npc: id });
            return;
        };

        match npc.advance(line) {
            DialogueStep::Line(next) => {
                let speaker = npc.name.clone();
                let text = npc.line(next).unwrap_or_default().to_string();
                let options = npc.options(next);

                self.state = LoopState::DialoguePaused { npc: id, line: next };
                self.collaborators.hud.show_dialogue(&speaker, &text, &options);
                self.collaborators.audio.play(Sound::Dialogue, PlayOptions::default());
                self.emit(result, GameEventData::DialogueAdvanced { npc: id, line: next });
            }
            DialogueStep::Finished => {
                self.collaborators.hud.hide_dialogue();
                self.finish_dialogue(id, result);
            }
        }
    }

    /// Back to running; guardians run the win check.
    fn finish_dialogue(&mut self, id: NpcId, result: &mut TickResult) {
        self.state = LoopState::Running;
        self.emit(result, GameEventData::DialogueEnded { npc: id });

        let Some(required) = self.world.npc(id).and_then(|npc| npc.win_requirement()) else {
            return;
        };

        if self.session.artifacts >= required {
            info!("Guardian {} satisfied with {} artifacts", id, self.session.artifacts);
            self.end_life(TerminalReason::Win, result);
        } else {
            let missing = required - self.session.artifacts;
            let plural = if missing == 1 { "" } else { "s" };
            self.collaborators.hud.show_temporary_message(
                &format!("Bring {} more artifact{} to pass.", missing, plural),
                secs(self.config.rules.message_secs),
            );
        }
    }

    // =========================================================================
    // LEVELS AND COMPLETIONS
    // =========================================================================

    /// Count wall-clock time towards the next level swap and start the load
    /// when it is due.
    fn tick_level_regen(&mut self, wall_dt: f32) {
        let Some(interval) = self.config.rules.level_regen_interval_secs else {
            return;
        };
        if !(interval > 0.0) || self.level_loading {
            return;
        }

        self.regen_elapsed += wall_dt;
        if self.regen_elapsed < interval {
            return;
        }
        self.regen_elapsed = 0.0;

        let count = self.collaborators.levels.level_count();
        if count == 0 {
            return;
        }
        let index = (self.world.level_index() + 1) % count;

        info!("Regenerating world: loading level {}", index);
        self.level_loading = true;
        let load = self.collaborators.levels.load_level(index);
        self.pending
            .push(load.map(move |result| Completion::LevelLoaded { index, result }).boxed());
    }

    fn apply_completion(&mut self, completion: Completion, result: &mut TickResult) {
        match completion {
            Completion::ScoreSaved(saved) => self.log_saved(saved),

            Completion::EndScreen {
                screen,
                summary,
                saved,
                scores,
            } => {
                self.log_saved(saved);
                let scores = scores.unwrap_or_else(|e| {
                    warn!("Failed to fetch high scores: {}", e);
                    Vec::new()
                });
                match screen {
                    EndScreen::Won => self.collaborators.hud.show_game_won(&summary, &scores),
                    EndScreen::GameOver => self.collaborators.hud.show_game_over(&summary, &scores),
                }
            }

            // The world only changes between running ticks
            Completion::LevelLoaded { index, result: loaded } => {
                if self.state.is_running() {
                    self.apply_level(index, loaded, result);
                } else {
                    debug!("Level {} ready; holding until the game runs", index);
                    self.deferred_level = Some((index, loaded));
                }
            }
        }
    }

    fn apply_level(&mut self, index: usize, loaded: Result<Level, LevelError>, result: &mut TickResult) {
        self.level_loading = false;
        match loaded {
            Ok(level) => {
                let name = level.name.clone();
                self.world.replace_level(index, level);
                match self.world.spawn_position(&self.config.rules.spawn_name) {
                    Some(spawn) => self.session.record_spawn(spawn),
                    None => warn!("Level {} has no spawn marker; keeping the old one", index),
                }

                info!("Level {} '{}' loaded", index, name);
                self.collaborators.hud.show_temporary_message(
                    &format!("Entering {}", name),
                    secs(self.config.rules.message_secs),
                );
                self.emit(result, GameEventData::LevelLoaded { index, name });
            }
            Err(e) => warn!("Level {} failed to load, keeping current level: {}", index, e),
        }
    }

    fn log_saved(&self, saved: Result<HighScoreEntry, ScoreStoreError>) {
        match saved {
            Ok(entry) => debug!("Score {} saved for {}", entry.score, entry.name),
            Err(e) => warn!("Failed to save score: {}", e),
        }
    }

    fn announce_presence(&mut self, event: &PresenceEvent) {
        let text = match event {
            PresenceEvent::Joined { name, .. } => format!("{} joined", name),
            PresenceEvent::Left { name, .. } => format!("{} left", name),
            PresenceEvent::Chat(line) => format!("{}: {}", line.sender_name, line.text),
            PresenceEvent::Disconnected => "Disconnected from server".to_string(),
            PresenceEvent::RosterReplaced { .. } => return,
        };
        self.collaborators
            .hud
            .show_temporary_message(&text, secs(self.config.rules.message_secs));
    }

    fn emit(&self, result: &mut TickResult, data: GameEventData) {
        result.events.push(GameEvent::new(self.frame, data));
    }
}
