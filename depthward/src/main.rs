//! Depthward Simulator
//!
//! Headless driver for the game loop. Builds a small two-level world, wires
//! logging collaborators and an in-process presence peer, then plays a
//! scripted descent at a fixed frame rate.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use glam::Vec3;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use depthward::{
    SIM_FRAME_RATE, VERSION,
    core::aabb::Aabb,
    game::{
        config::GameConfig,
        dialogue::{Npc, NpcRole},
        events::GameEventData,
        input::{InputState, Intent},
        state::Ability,
        tick::{Collaborators, GameLoop, LoopState},
        world::{Body, Collectible, CollectibleEffect, Level, StaticLevelSource, World},
    },
    network::{
        protocol::{ClientMessage, PlayerStatePayload, RemotePlayerInfo, ServerMessage},
        transport::{ChannelTransport, OfflineTransport, Transport, TransportPeer},
    },
    services::{
        logging::{LogAudio, LogHud, LogRenderer},
        MemoryScoreStore, ScoreStore,
    },
};

/// Hard stop for the scripted run.
const MAX_FRAMES: u64 = 60 * 40;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Depthward simulator v{}", VERSION);

    let config = load_config()?;
    let levels = vec![starting_cavern(), crystal_depths()];
    let world = World::new(0, levels[0].clone());
    let store = MemoryScoreStore::default();

    let transport: Box<dyn Transport> = if std::env::var_os("DEPTHWARD_OFFLINE").is_some() {
        info!("Running offline");
        Box::new(OfflineTransport)
    } else {
        let (transport, peer) = ChannelTransport::pair();
        tokio::spawn(echo_peer(peer));
        Box::new(transport)
    };

    let collaborators = Collaborators {
        renderer: Box::new(LogRenderer::new(u64::from(SIM_FRAME_RATE))),
        audio: Box::new(LogAudio::default()),
        hud: Box::new(LogHud),
        scores: Arc::new(store.clone()),
        transport,
        levels: Arc::new(StaticLevelSource::new(levels)),
    };

    let mut game = GameLoop::new(config, world, collaborators);
    game.start().context("failed to start game")?;

    run_script(&mut game).await;

    info!("=== High Scores ===");
    match store.high_scores().await {
        Ok(scores) => {
            for (rank, entry) in scores.iter().enumerate() {
                info!(
                    "#{}: {} - {} ({:.1}s, {} artifacts)",
                    rank + 1,
                    entry.name,
                    entry.score,
                    entry.elapsed_secs,
                    entry.artifacts
                );
            }
        }
        Err(e) => warn!("Could not read high scores: {}", e),
    }

    Ok(())
}

/// Config from the file named by `DEPTHWARD_CONFIG`, or defaults.
fn load_config() -> anyhow::Result<GameConfig> {
    let Some(path) = std::env::var_os("DEPTHWARD_CONFIG") else {
        return Ok(demo_config());
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.to_string_lossy()))?;
    let config = GameConfig::from_json(&text)
        .with_context(|| format!("parsing config {}", path.to_string_lossy()))?;
    info!("Loaded config from {}", path.to_string_lossy());
    Ok(config)
}

/// Defaults with a shallow win depth to suit the bundled cavern.
fn demo_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.player_name = "Simulator".to_string();
    config.rules.win_depth_y = -20.0;
    config.rules.world_floor_y = -60.0;
    config
}

// =============================================================================
// SCRIPT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Explore,
    Talk,
    Descend,
    Wander,
}

/// Walk to the guide, talk, step off the ledge and fall to the bottom.
async fn run_script(game: &mut GameLoop) {
    let frame_time = Duration::from_secs(1) / SIM_FRAME_RATE;
    let mut now = Duration::ZERO;
    let mut phase = Phase::Explore;
    let mut talk_taps = 0;
    let mut chatted = false;

    for frame in 0..MAX_FRAMES {
        now += frame_time;

        let input = match phase {
            Phase::Explore => {
                if game.actor().position.z <= -16.0 {
                    phase = Phase::Talk;
                }
                InputState::with(&[Intent::Forward])
            }
            // Tap interact every half second until the conversation is over
            Phase::Talk => {
                if frame % 30 == 0 {
                    talk_taps += 1;
                    InputState::with(&[Intent::Interact])
                } else {
                    if talk_taps > 0 && *game.state() == LoopState::Running {
                        phase = Phase::Descend;
                    }
                    InputState::IDLE
                }
            }
            Phase::Descend => {
                if game.actor().position.y < -2.0 {
                    InputState::IDLE
                } else {
                    InputState::with(&[Intent::Forward])
                }
            }
            // Turn on the spot, hopping once a second
            Phase::Wander => {
                if !chatted {
                    chatted = true;
                    if let Err(e) = game.send_chat("made it to the bottom") {
                        warn!("Chat rejected: {}", e);
                    }
                }
                if frame % 60 == 0 {
                    InputState::with(&[Intent::Left, Intent::Jump])
                } else {
                    InputState::with(&[Intent::Left])
                }
            }
        };

        let result = game.frame(now, input);

        for event in &result.events {
            match &event.data {
                GameEventData::Landed { fall_distance } if *fall_distance > 1.0 => {
                    info!("Landed after falling {:.1}", fall_distance);
                }
                GameEventData::Respawned { reason, score } => {
                    info!("Respawned ({}) with score {}", reason.as_str(), score);
                    phase = Phase::Wander;
                }
                GameEventData::GameOver { reason, score } => {
                    info!("Game over ({}) with score {}", reason.as_str(), score);
                }
                _ => {}
            }
        }

        if matches!(result.state, LoopState::GameOver { .. }) {
            break;
        }
        if phase == Phase::Wander && game.session().elapsed_secs > 5.0 {
            break;
        }

        // Let the presence peer run
        tokio::task::yield_now().await;
    }

    // Drain outstanding saves
    for _ in 0..10 {
        if game.pending_tasks() == 0 {
            break;
        }
        now += frame_time;
        game.frame(now, InputState::IDLE);
        tokio::task::yield_now().await;
    }

    info!(
        "Finished after {} frames; {} remote players seen",
        game.frame_count(),
        game.presence().roster().len()
    );
}

/// Presence peer that announces one remote player and echoes chat back.
async fn echo_peer(peer: TransportPeer) {
    let TransportPeer { mut outbound, inbound } = peer;

    let hello = ServerMessage::PlayerJoined {
        player: RemotePlayerInfo {
            id: "echo".to_string(),
            state: PlayerStatePayload {
                position: [2.0, 0.9, 2.0],
                rotation: [0.0, 0.0, 0.0, 1.0],
                health: 100.0,
                name: "Echo".to_string(),
            },
        },
    };
    let frame = match hello.to_json() {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Echo peer could not encode greeting: {}", e);
            return;
        }
    };
    if inbound.send(frame).await.is_err() {
        return;
    }

    while let Some(frame) = outbound.recv().await {
        let Ok(ClientMessage::ChatMessage { text }) = ClientMessage::from_json(&frame) else {
            continue;
        };
        let reply = ServerMessage::ChatMessage {
            sender_id: "echo".to_string(),
            text,
        };
        match reply.to_json() {
            Ok(frame) => {
                if inbound.send(frame).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!("Echo peer could not encode reply: {}", e),
        }
    }
}

// =============================================================================
// LEVELS
// =============================================================================

fn slab(id: u32, min: Vec3, max: Vec3) -> Body {
    Body::new(id, Aabb::new(min, max))
}

fn starting_cavern() -> Level {
    let ledge = slab(1, Vec3::new(-6.0, -1.0, -25.0), Vec3::new(6.0, 0.0, 6.0));
    let pillar = slab(2, Vec3::new(3.0, 0.0, -8.0), Vec3::new(5.0, 4.0, -6.0));
    let bottom = slab(3, Vec3::new(-30.0, -26.0, -120.0), Vec3::new(30.0, -25.0, -20.0));

    let mut spawns = BTreeMap::new();
    spawns.insert("player".to_string(), Vec3::new(0.0, 0.9, 0.0));

    Level {
        name: "Fungal Caverns".to_string(),
        ground: vec![ledge.clone(), bottom.clone()],
        collision: vec![ledge, pillar, bottom],
        collectibles: vec![
            Collectible::new(
                1,
                Vec3::new(0.0, 1.0, -5.0),
                CollectibleEffect::Artifact {
                    name: "Glowcap Lantern".to_string(),
                    unlocks: Some(Ability::HighJump),
                },
            ),
            Collectible::new(
                2,
                Vec3::new(0.0, 1.0, -10.0),
                CollectibleEffect::Memory {
                    text: "You remember the surface, faintly.".to_string(),
                },
            ),
            Collectible::new(3, Vec3::new(0.5, 1.0, -14.0), CollectibleEffect::Health { amount: 25.0 }),
        ],
        spawns,
        npcs: vec![Npc {
            id: 1,
            name: "Old Miner".to_string(),
            position: Vec3::new(0.0, 0.9, -19.0),
            lines: vec![
                "Nobody comes down here on purpose.".to_string(),
                "The bottom is further than it looks.".to_string(),
            ],
            role: NpcRole::Guide,
        }],
    }
}

fn crystal_depths() -> Level {
    let floor = slab(1, Vec3::new(-40.0, -1.0, -40.0), Vec3::new(40.0, 0.0, 40.0));

    let mut spawns = BTreeMap::new();
    spawns.insert("player".to_string(), Vec3::new(0.0, 0.9, 0.0));

    Level {
        name: "Crystal Depths".to_string(),
        ground: vec![floor.clone()],
        collision: vec![floor],
        collectibles: Vec::new(),
        spawns,
        npcs: vec![Npc {
            id: 1,
            name: "Warden".to_string(),
            position: Vec3::new(0.0, 0.9, -10.0),
            lines: vec!["Show me what you found.".to_string()],
            role: NpcRole::Guardian { required_artifacts: 1 },
        }],
    }
}
