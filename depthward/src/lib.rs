//! # Depthward
//!
//! Simulation core for Depthward, a third-person descent through cavern
//! levels: find artifacts and memories, talk to the locals, and reach the
//! bottom without falling off the world.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         DEPTHWARD                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Geometric primitives                      │
//! │  └── aabb.rs     - Axis-aligned boxes, ray casts             │
//! │                                                              │
//! │  game/           - Local simulation                          │
//! │  ├── input.rs    - Intent flags and bindings                 │
//! │  ├── movement.rs - Turn, walk, jump, gravity                 │
//! │  ├── collision.rs- Ground probe and push-out                 │
//! │  ├── world.rs    - Levels, collectibles, NPCs                │
//! │  ├── session.rs  - Per-life counters and scoring             │
//! │  └── tick.rs     - Game loop and state machine               │
//! │                                                              │
//! │  network/        - Presence (never authoritative)            │
//! │  ├── protocol.rs - JSON message types                        │
//! │  ├── presence.rs - Remote roster and chat                    │
//! │  └── transport.rs- Channel-backed transport                  │
//! │                                                              │
//! │  services/       - Renderer, audio, HUD and score store      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frame Contract
//!
//! The host owns the clock and calls `GameLoop::frame` once per display
//! frame. Simulation time only advances in the `Running` state; async work
//! (score persistence, level loads) completes at the next frame boundary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod network;
pub mod services;

// Re-export commonly used types
pub use core::aabb::Aabb;
pub use game::config::GameConfig;
pub use game::input::{InputState, Intent};
pub use game::tick::{Collaborators, GameLoop, LoopState, TickResult};
pub use game::world::{Level, World};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Frame rate the bundled simulator drives the loop at (Hz)
pub const SIM_FRAME_RATE: u32 = 60;
