//! World and Level Data
//!
//! A `Level` is the static description of one biome: ground and collision
//! bodies, collectibles, spawn markers and NPCs. The `World` wraps the
//! currently loaded level and tracks which collectibles are still active.
//! Level loads are asynchronous and replace the world wholesale between
//! ticks.

use std::collections::BTreeMap;
use std::sync::Arc;
use futures_util::future::BoxFuture;
use glam::Vec3;
use serde::{Serialize, Deserialize};

use crate::core::aabb::Aabb;
use crate::game::dialogue::Npc;
use crate::game::state::Ability;

// =============================================================================
// BODIES
// =============================================================================

/// A static collidable volume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Identifier, unique within its set
    pub id: u32,
    /// World-space bounds
    pub bounds: Aabb,
}

impl Body {
    /// Create a body from its bounds.
    pub fn new(id: u32, bounds: Aabb) -> Self {
        Self { id, bounds }
    }
}

// =============================================================================
// COLLECTIBLES
// =============================================================================

/// Collectible identifier, unique within a level.
pub type CollectibleId = u32;

/// Broad category of a collectible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectibleKind {
    /// Counts toward the score and may unlock an ability
    Artifact,
    /// Counts toward the score and is added to the memory journal
    Memory,
    /// Restores (or drains) health
    Health,
}

/// What picking up a collectible does.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectibleEffect {
    /// An artifact, optionally unlocking an ability
    Artifact {
        /// Display name
        name: String,
        /// Ability unlocked on pickup
        #[serde(default)]
        unlocks: Option<Ability>,
    },
    /// A memory fragment
    Memory {
        /// Journal text
        text: String,
    },
    /// A health change; negative amounts damage
    Health {
        /// Signed health change
        amount: f32,
    },
}

impl CollectibleEffect {
    /// Category of this effect.
    pub fn kind(&self) -> CollectibleKind {
        match self {
            CollectibleEffect::Artifact { .. } => CollectibleKind::Artifact,
            CollectibleEffect::Memory { .. } => CollectibleKind::Memory,
            CollectibleEffect::Health { .. } => CollectibleKind::Health,
        }
    }
}

/// A collectible placed in a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    /// Identifier
    pub id: CollectibleId,
    /// World position
    pub position: Vec3,
    /// Pickup effect
    pub effect: CollectibleEffect,
    /// Already picked up this life
    #[serde(default)]
    pub collected: bool,
}

impl Collectible {
    /// Create an active collectible.
    pub fn new(id: CollectibleId, position: Vec3, effect: CollectibleEffect) -> Self {
        Self {
            id,
            position,
            effect,
            collected: false,
        }
    }
}

// =============================================================================
// LEVEL
// =============================================================================

/// Level loading errors.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// No level with this index.
    #[error("Unknown level index {0}")]
    UnknownLevel(usize),

    /// Level file could not be parsed.
    #[error("Malformed level: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Geometry contains non-finite coordinates.
    #[error("Body {0} has non-finite bounds")]
    InvalidGeometry(u32),

    /// Two collectibles share an id.
    #[error("Duplicate collectible id {0}")]
    DuplicateCollectible(CollectibleId),
}

/// Static description of one level.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Level {
    /// Biome name
    pub name: String,
    /// Bodies the downward probe can stand on
    pub ground: Vec<Body>,
    /// Bodies resolved by overlap push-out
    pub collision: Vec<Body>,
    /// Collectibles
    pub collectibles: Vec<Collectible>,
    /// Named spawn markers
    pub spawns: BTreeMap<String, Vec3>,
    /// NPCs
    pub npcs: Vec<Npc>,
}

impl Level {
    /// Parse and validate a level from JSON.
    pub fn from_json(s: &str) -> Result<Self, LevelError> {
        let level: Level = serde_json::from_str(s)?;
        level.validate()?;
        Ok(level)
    }

    /// Check geometry and ids.
    pub fn validate(&self) -> Result<(), LevelError> {
        for body in self.ground.iter().chain(self.collision.iter()) {
            if !body.bounds.is_finite() {
                return Err(LevelError::InvalidGeometry(body.id));
            }
        }

        let mut seen = std::collections::BTreeSet::new();
        for collectible in &self.collectibles {
            if !seen.insert(collectible.id) {
                return Err(LevelError::DuplicateCollectible(collectible.id));
            }
        }

        Ok(())
    }
}

/// Asynchronous level provider.
pub trait LevelSource: Send + Sync {
    /// Number of levels available.
    fn level_count(&self) -> usize;

    /// Load a level by index.
    fn load_level(&self, index: usize) -> BoxFuture<'static, Result<Level, LevelError>>;
}

/// Levels held in memory.
#[derive(Clone, Debug, Default)]
pub struct StaticLevelSource {
    levels: Arc<Vec<Level>>,
}

impl StaticLevelSource {
    /// Create from a list of levels.
    pub fn new(levels: Vec<Level>) -> Self {
        Self {
            levels: Arc::new(levels),
        }
    }
}

impl LevelSource for StaticLevelSource {
    fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn load_level(&self, index: usize) -> BoxFuture<'static, Result<Level, LevelError>> {
        let levels = self.levels.clone();
        Box::pin(async move {
            let level = levels.get(index).cloned().ok_or(LevelError::UnknownLevel(index))?;
            level.validate()?;
            Ok(level)
        })
    }
}

// =============================================================================
// WORLD
// =============================================================================

/// The currently loaded level plus collectible availability.
#[derive(Clone, Debug)]
pub struct World {
    level_index: usize,
    level: Level,
    collectibles: BTreeMap<CollectibleId, Collectible>,
}

impl World {
    /// Wrap a loaded level.
    pub fn new(level_index: usize, level: Level) -> Self {
        let collectibles = Self::index_collectibles(&level);
        Self {
            level_index,
            level,
            collectibles,
        }
    }

    fn index_collectibles(level: &Level) -> BTreeMap<CollectibleId, Collectible> {
        level
            .collectibles
            .iter()
            .map(|c| {
                let mut fresh = c.clone();
                fresh.collected = false;
                (c.id, fresh)
            })
            .collect()
    }

    /// Replace the level wholesale. Collectibles become active again.
    pub fn replace_level(&mut self, level_index: usize, level: Level) {
        self.collectibles = Self::index_collectibles(&level);
        self.level_index = level_index;
        self.level = level;
    }

    /// Index of the loaded level.
    pub fn level_index(&self) -> usize {
        self.level_index
    }

    /// Biome name of the loaded level.
    pub fn level_name(&self) -> &str {
        &self.level.name
    }

    /// Bodies the ground probe tests.
    pub fn ground_bodies(&self) -> &[Body] {
        &self.level.ground
    }

    /// Bodies resolved by push-out.
    pub fn collision_bodies(&self) -> &[Body] {
        &self.level.collision
    }

    /// Active collectibles within `radius` of `position`, ordered by id.
    pub fn collectibles_near(&self, position: Vec3, radius: f32) -> Vec<&Collectible> {
        let radius_sq = radius * radius;
        self.collectibles
            .values()
            .filter(|c| !c.collected && c.position.distance_squared(position) <= radius_sq)
            .collect()
    }

    /// Mark a collectible as collected and return its effect.
    ///
    /// Returns `None` if the id is unknown or it was already collected.
    pub fn collect_item(&mut self, id: CollectibleId) -> Option<CollectibleEffect> {
        let collectible = self.collectibles.get_mut(&id)?;
        if collectible.collected {
            return None;
        }
        collectible.collected = true;
        Some(collectible.effect.clone())
    }

    /// Make every collectible active again.
    pub fn reset_collectibles(&mut self) {
        for collectible in self.collectibles.values_mut() {
            collectible.collected = false;
        }
    }

    /// Number of collectibles still active.
    pub fn active_collectible_count(&self) -> usize {
        self.collectibles.values().filter(|c| !c.collected).count()
    }

    /// All collectibles with their state, ordered by id.
    pub fn collectibles(&self) -> impl Iterator<Item = &Collectible> {
        self.collectibles.values()
    }

    /// Position of a named spawn marker.
    pub fn spawn_position(&self, name: &str) -> Option<Vec3> {
        self.level.spawns.get(name).copied()
    }

    /// NPCs in the level.
    pub fn npcs(&self) -> &[Npc] {
        &self.level.npcs
    }

    /// Look up an NPC by id.
    pub fn npc(&self, id: u32) -> Option<&Npc> {
        self.level.npcs.iter().find(|n| n.id == id)
    }

    /// Nearest NPC within `radius` of `position`.
    pub fn npc_near(&self, position: Vec3, radius: f32) -> Option<&Npc> {
        let radius_sq = radius * radius;
        self.level
            .npcs
            .iter()
            .map(|n| (n, n.position.distance_squared(position)))
            .filter(|(_, d)| *d <= radius_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(n, _)| n)
    }
}
