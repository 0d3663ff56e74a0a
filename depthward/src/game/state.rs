//! Actor State
//!
//! The locally controlled actor and its bounded stats. The actor is one owned
//! value: the movement resolver mutates it during a step, the session manager
//! resets it on respawn, everything else reads snapshots.

use std::collections::BTreeSet;
use glam::{Quat, Vec3};
use serde::{Serialize, Deserialize};

use crate::core::aabb::Aabb;

// =============================================================================
// HEALTH
// =============================================================================

/// Health clamped to `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    /// Full health with the given maximum. Non-positive or non-finite maxima
    /// collapse to zero.
    pub fn new(max: f32) -> Self {
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        Self { current: max, max }
    }

    /// Current health.
    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Maximum health.
    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Current health as a fraction of max.
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    /// True once health reached zero.
    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Apply a signed change (positive heals, negative damages).
    ///
    /// Returns the change actually applied after clamping.
    pub fn apply(&mut self, delta: f32) -> f32 {
        if !delta.is_finite() {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current + delta).clamp(0.0, self.max);
        self.current - before
    }

    /// Restore to max.
    pub fn refill(&mut self) {
        self.current = self.max;
    }
}

// =============================================================================
// ABILITIES
// =============================================================================

/// Abilities unlocked by artifacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    /// Jump force is multiplied
    HighJump,
}

// =============================================================================
// ACTOR
// =============================================================================

/// The locally controlled actor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Centre of the hitbox
    pub position: Vec3,

    /// Heading around +Y, radians (0 faces -Z)
    pub yaw: f32,

    /// Current velocity
    pub velocity: Vec3,

    /// Supported by ground this tick
    pub grounded: bool,

    /// Airborne and moving downward
    pub falling: bool,

    /// Health
    pub health: Health,

    /// Unlocked abilities
    pub abilities: BTreeSet<Ability>,

    /// Distance fallen since the fall started
    pub fall_distance: f32,

    /// Longest completed fall this session
    pub max_fall_distance: f32,

    /// Half extents of the hitbox
    pub half_extents: Vec3,

    /// Hitbox at `position`; refreshed after every position change
    hitbox: Aabb,
}

impl Actor {
    /// Create an actor at a position.
    pub fn new(position: Vec3, half_extents: Vec3, max_health: f32) -> Self {
        Self {
            position,
            yaw: 0.0,
            velocity: Vec3::ZERO,
            grounded: false,
            falling: false,
            health: Health::new(max_health),
            abilities: BTreeSet::new(),
            fall_distance: 0.0,
            max_fall_distance: 0.0,
            half_extents,
            hitbox: Aabb::from_center_half_extents(position, half_extents),
        }
    }

    /// Current hitbox.
    #[inline]
    pub fn hitbox(&self) -> &Aabb {
        &self.hitbox
    }

    /// Recompute the hitbox from the position.
    #[inline]
    pub fn refresh_hitbox(&mut self) {
        self.hitbox = Aabb::from_center_half_extents(self.position, self.half_extents);
    }

    /// Move to a position and refresh the hitbox.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.refresh_hitbox();
    }

    /// Offset the position and refresh the hitbox.
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.refresh_hitbox();
    }

    /// Orientation as a quaternion.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Unit vector the actor faces, in the horizontal plane.
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Check if an ability is unlocked.
    #[inline]
    pub fn has_ability(&self, ability: Ability) -> bool {
        self.abilities.contains(&ability)
    }

    /// Unlock an ability. Returns false if it was already unlocked.
    pub fn unlock(&mut self, ability: Ability) -> bool {
        self.abilities.insert(ability)
    }

    /// Mark the actor as standing on something.
    ///
    /// Ends a fall in progress: the session-max fall distance is updated and
    /// the completed distance returned.
    pub fn land(&mut self) -> Option<f32> {
        self.grounded = true;
        if !self.falling {
            return None;
        }

        let distance = self.fall_distance;
        self.max_fall_distance = self.max_fall_distance.max(distance);
        self.falling = false;
        self.fall_distance = 0.0;
        Some(distance)
    }

    /// Reset for a new life at `spawn`: full health, at rest, no abilities.
    ///
    /// The session-max fall distance is kept.
    pub fn reset_at(&mut self, spawn: Vec3) {
        self.velocity = Vec3::ZERO;
        self.yaw = 0.0;
        self.grounded = false;
        self.falling = false;
        self.fall_distance = 0.0;
        self.abilities.clear();
        self.health.refill();
        self.set_position(spawn);
    }
}
