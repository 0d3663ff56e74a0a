//! Collision Detection
//!
//! Ground probing and box push-out for the local actor.
//!
//! Ground support is found with a downward ray against the ground set.
//! Solid geometry is resolved one body at a time: the axis of least
//! penetration is the push axis, and the actor is moved out along it, away
//! from the body's centre.

use glam::Vec3;

use crate::core::aabb::Aabb;
use crate::game::state::Actor;
use crate::game::world::Body;

/// Nearest ground hit below a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundHit {
    /// Body that was hit
    pub body_id: u32,
    /// Distance from the probe origin
    pub distance: f32,
}

/// Cast straight down from `origin` and return the nearest ground hit within
/// `max_distance` (inclusive).
pub fn probe_ground(origin: Vec3, bodies: &[Body], max_distance: f32) -> Option<GroundHit> {
    if !origin.is_finite() || !(max_distance >= 0.0) {
        return None;
    }

    bodies
        .iter()
        .filter_map(|body| {
            body.bounds
                .ray_cast(origin, Vec3::NEG_Y, max_distance)
                .map(|distance| GroundHit { body_id: body.id, distance })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Minimum translation for one overlapping body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Penetration {
    /// Push axis (0 = x, 1 = y, 2 = z)
    pub axis: usize,
    /// Overlap of the two boxes along the push axis
    pub overlap: f32,
    /// Distance to clear the obstacle's face along `normal`
    pub depth: f32,
    /// Unit push direction, away from the obstacle
    pub normal: Vec3,
}

/// Compute the push-out axis between the actor box and an obstacle.
///
/// Returns `None` unless the boxes overlap with positive depth on every
/// axis. Ties between axes go to the first in x, y, z order. `depth` equals
/// `overlap` unless the actor sits wholly inside the obstacle on that axis,
/// where it is the distance to the face the actor is pushed through.
pub fn penetration(actor: &Aabb, obstacle: &Aabb) -> Option<Penetration> {
    let overlap = actor.overlap(obstacle);
    if !(overlap.x > 0.0 && overlap.y > 0.0 && overlap.z > 0.0) {
        return None;
    }

    let mut axis = 0;
    for candidate in 1..3 {
        if overlap[candidate] < overlap[axis] {
            axis = candidate;
        }
    }

    let sign = if actor.center()[axis] >= obstacle.center()[axis] { 1.0 } else { -1.0 };
    let mut normal = Vec3::ZERO;
    normal[axis] = sign;

    let depth = if sign > 0.0 {
        obstacle.max[axis] - actor.min[axis]
    } else {
        actor.max[axis] - obstacle.min[axis]
    };

    Some(Penetration {
        axis,
        overlap: overlap[axis],
        depth,
        normal,
    })
}

/// A push applied during resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PushOut {
    /// Body that was pushed against
    pub body_id: u32,
    /// Penetration that was resolved
    pub penetration: Penetration,
}

/// Result of resolving the actor against the collision set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Pushes applied, in body order
    pub pushes: Vec<PushOut>,
    /// Actor came to rest on top of a body this resolution
    pub landed_on_top: bool,
    /// Completed fall distance, if a fall ended here
    pub fall_ended: Option<f32>,
}

/// Resolve the actor against every collision body, in order.
///
/// Each push moves the actor by `depth * push_out_factor` along the push
/// normal and refreshes the hitbox before the next body is tested. Velocity
/// pointing into the body is cancelled. An upward push while not ascending
/// counts as landing on top.
pub fn resolve_collisions(actor: &mut Actor, bodies: &[Body], push_out_factor: f32) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();

    for body in bodies {
        let Some(pen) = penetration(actor.hitbox(), &body.bounds) else {
            continue;
        };

        let axis = pen.axis;
        let ascending = actor.velocity.y > 0.0;

        actor.translate(pen.normal * (pen.depth * push_out_factor));

        if actor.velocity[axis] * pen.normal[axis] < 0.0 {
            actor.velocity[axis] = 0.0;
        }

        if axis == 1 && pen.normal.y > 0.0 && !ascending {
            outcome.landed_on_top = true;
            if let Some(distance) = actor.land() {
                outcome.fall_ended = Some(distance);
            }
        }

        outcome.pushes.push(PushOut {
            body_id: body.id,
            penetration: pen,
        });
    }

    outcome
}
