//! Game Logic Module
//!
//! The local simulation: one actor moving through a static level.
//!
//! ## Module Structure
//!
//! - `input`: Intent flags, key and touch bindings
//! - `config`: Tunables for movement, rules, scoring and sync
//! - `state`: Actor, health, abilities
//! - `world`: Level data, collectibles, spawn markers
//! - `dialogue`: NPC lines and roles
//! - `collision`: Ground probe and overlap push-out
//! - `movement`: Per-tick movement resolution
//! - `score`: Score formula
//! - `session`: Counters for the current life
//! - `events`: Events reported per frame
//! - `tick`: The game loop

pub mod input;
pub mod config;
pub mod state;
pub mod world;
pub mod dialogue;
pub mod collision;
pub mod movement;
pub mod score;
pub mod session;
pub mod events;
pub mod tick;

// Re-export key types
pub use input::{InputState, Intent, InputSource, KeyBindings};
pub use config::GameConfig;
pub use state::{Actor, Ability, Health};
pub use world::{Level, LevelSource, StaticLevelSource, World};
pub use session::{GameError, GameSession, TerminalReason, GameOverReason};
pub use events::{GameEvent, GameEventData};
pub use tick::{GameLoop, LoopState, Collaborators, TickResult};
