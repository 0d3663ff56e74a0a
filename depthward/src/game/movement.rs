//! Movement Resolver
//!
//! One step of actor movement: turning, horizontal velocity, ground
//! detection, jumping, gravity, integration and collision push-out.
//!
//! # Order
//!
//! 1. Turn (left / right rotate yaw, they never translate)
//! 2. Horizontal velocity from forward / backward
//! 3. Ground probe (only while not ascending)
//! 4. Jump, gravity and fall tracking
//! 5. Integrate position
//! 6. Resolve against collision bodies
//!
//! Non-finite results are rolled back to the last finite position and zero
//! velocity, so a bad frame can never poison the actor.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::game::collision::{probe_ground, resolve_collisions, PushOut};
use crate::game::config::MovementConfig;
use crate::game::input::InputState;
use crate::game::state::{Ability, Actor};
use crate::game::world::Body;

/// What happened during one movement step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepOutcome {
    /// A jump started this step
    pub jumped: bool,
    /// The actor touched down this step, with the completed fall distance
    pub landed: Option<f32>,
    /// Pushes applied by collision resolution
    pub pushes: Vec<PushOut>,
}

/// Advance the actor by `dt` seconds.
///
/// Empty body sets are valid: with no ground the actor free-falls, with no
/// collision bodies nothing pushes back.
pub fn step(
    actor: &mut Actor,
    intents: &InputState,
    dt: f32,
    ground: &[Body],
    collision: &[Body],
    config: &MovementConfig,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

    let previous_position = actor.position;
    let was_grounded = actor.grounded;

    // 1. Turn
    let mut turn = 0.0;
    if intents.left() {
        turn += config.turn_speed;
    }
    if intents.right() {
        turn -= config.turn_speed;
    }
    actor.yaw = wrap_angle(actor.yaw + turn * dt);

    // 2. Horizontal velocity is recomputed, never accumulated
    let forward = actor.forward();
    let mut horizontal = Vec3::ZERO;
    if intents.forward() {
        horizontal += forward * config.move_speed;
    }
    if intents.backward() {
        horizontal -= forward * (config.move_speed * config.backward_factor);
    }
    actor.velocity.x = horizontal.x;
    actor.velocity.z = horizontal.z;

    // 3. Ground probe
    let ground_hit = if actor.velocity.y <= 0.0 {
        probe_ground(actor.position, ground, config.ground_probe_distance)
    } else {
        None
    };
    actor.grounded = ground_hit.is_some();

    // 4. Jump, gravity, fall tracking
    if intents.jump() && actor.grounded {
        let multiplier = if actor.has_ability(Ability::HighJump) {
            config.high_jump_multiplier
        } else {
            1.0
        };
        actor.velocity.y = config.jump_force * multiplier;
        actor.grounded = false;
        outcome.jumped = true;
    }

    if actor.grounded {
        if actor.velocity.y < 0.0 {
            actor.velocity.y = 0.0;
        }
        let fall = actor.land();
        if !was_grounded {
            outcome.landed = fall;
        }
    } else {
        actor.velocity.y -= config.gravity * dt;
        if actor.velocity.y < 0.0 {
            actor.falling = true;
            actor.fall_distance += -actor.velocity.y * dt;
        }
    }

    // 5. Integrate
    actor.translate(actor.velocity * dt);

    // 6. Collision push-out
    let resolved = resolve_collisions(actor, collision, config.push_out_factor);
    if resolved.fall_ended.is_some() && !was_grounded {
        outcome.landed = resolved.fall_ended;
    }
    outcome.pushes = resolved.pushes;

    // Roll back anything non-finite
    if !actor.position.is_finite() {
        let fallback = if previous_position.is_finite() {
            previous_position
        } else {
            Vec3::ZERO
        };
        actor.set_position(fallback);
    }
    if !actor.velocity.is_finite() {
        actor.velocity = Vec3::ZERO;
    }
    if !actor.fall_distance.is_finite() {
        actor.fall_distance = 0.0;
    }

    outcome
}

/// Wrap an angle into `[-PI, PI)`.
fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    (angle + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aabb::Aabb;
    use crate::game::input::Intent;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};

    const DT: f32 = 0.1;

    fn config() -> MovementConfig {
        MovementConfig::default()
    }

    fn actor_at(position: Vec3) -> Actor {
        Actor::new(position, config().hitbox_half_extents, 100.0)
    }

    fn floor() -> Body {
        Body::new(0, Aabb::new(Vec3::new(-50.0, -1.0, -50.0), Vec3::new(50.0, 0.0, 50.0)))
    }

    /// Actor standing on the floor (feet at y = 0).
    fn standing() -> Actor {
        actor_at(Vec3::new(0.0, 0.9, 0.0))
    }

    #[test]
    fn test_forward_speed() {
        let mut actor = standing();
        step(&mut actor, &InputState::with(&[Intent::Forward]), DT, &[floor()], &[], &config());

        assert!((actor.velocity.z + 8.0).abs() < 1e-5);
        assert!(actor.velocity.x.abs() < 1e-5);
        assert!((actor.position.z + 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_backward_is_slower() {
        let mut actor = standing();
        step(&mut actor, &InputState::with(&[Intent::Backward]), DT, &[floor()], &[], &config());

        assert!((actor.velocity.z - 5.6).abs() < 1e-5);
    }

    #[test]
    fn test_horizontal_velocity_does_not_accumulate() {
        let mut actor = standing();
        let forward = InputState::with(&[Intent::Forward]);
        for _ in 0..5 {
            step(&mut actor, &forward, DT, &[floor()], &[], &config());
        }
        assert!((actor.velocity.z + 8.0).abs() < 1e-4);

        step(&mut actor, &InputState::IDLE, DT, &[floor()], &[], &config());
        assert_eq!(actor.velocity.x, 0.0);
        assert_eq!(actor.velocity.z, 0.0);
    }

    #[test]
    fn test_turning_rotates_without_moving() {
        let mut actor = standing();
        step(&mut actor, &InputState::with(&[Intent::Left]), DT, &[floor()], &[], &config());
        assert!((actor.yaw - 0.25).abs() < 1e-6);
        assert_eq!(actor.position, Vec3::new(0.0, 0.9, 0.0));

        step(&mut actor, &InputState::with(&[Intent::Right]), DT, &[floor()], &[], &config());
        step(&mut actor, &InputState::with(&[Intent::Right]), DT, &[floor()], &[], &config());
        assert!((actor.yaw + 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_yaw_wraps() {
        assert!((wrap_angle(PI + 0.5) - (-PI + 0.5)).abs() < 1e-5);
        assert!((wrap_angle(-PI - 0.5) - (PI - 0.5)).abs() < 1e-5);
        assert_eq!(wrap_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_idle_on_ground_stays_put() {
        let mut actor = standing();
        for _ in 0..30 {
            let outcome = step(&mut actor, &InputState::IDLE, 1.0 / 60.0, &[floor()], &[floor()], &config());
            assert!(outcome.pushes.is_empty());
        }
        assert!(actor.grounded);
        assert!(!actor.falling);
        assert!((actor.position.y - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_jump_when_grounded() {
        let mut actor = standing();
        let outcome = step(&mut actor, &InputState::with(&[Intent::Jump]), DT, &[floor()], &[], &config());

        assert!(outcome.jumped);
        assert!(!actor.grounded);
        // Jump force minus one step of gravity
        assert!((actor.velocity.y - 7.5).abs() < 1e-5);
        assert!(actor.position.y > 0.9);
    }

    #[test]
    fn test_high_jump_multiplier() {
        let mut actor = standing();
        actor.unlock(Ability::HighJump);
        step(&mut actor, &InputState::with(&[Intent::Jump]), DT, &[floor()], &[], &config());

        assert!((actor.velocity.y - 12.5).abs() < 1e-5);
    }

    #[test]
    fn test_jump_while_airborne_is_ignored() {
        let mut jumping = actor_at(Vec3::new(0.0, 10.0, 0.0));
        jumping.velocity.y = -3.0;
        let mut idle = jumping.clone();

        let outcome = step(&mut jumping, &InputState::with(&[Intent::Jump]), DT, &[floor()], &[], &config());
        step(&mut idle, &InputState::IDLE, DT, &[floor()], &[], &config());

        assert!(!outcome.jumped);
        assert_eq!(jumping.velocity.y, idle.velocity.y);
        assert_eq!(jumping.position, idle.position);
    }

    #[test]
    fn test_no_ground_probe_while_ascending() {
        // Rising through the probe range must not snap to the ground
        let mut actor = actor_at(Vec3::new(0.0, 0.95, 0.0));
        actor.velocity.y = 5.0;

        step(&mut actor, &InputState::IDLE, DT, &[floor()], &[], &config());
        assert!(!actor.grounded);
        assert!((actor.velocity.y - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_gravity_and_fall_tracking() {
        let mut actor = actor_at(Vec3::new(0.0, 10.0, 0.0));

        step(&mut actor, &InputState::IDLE, DT, &[], &[], &config());
        assert!(actor.falling);
        assert!((actor.velocity.y + 2.5).abs() < 1e-5);
        assert!((actor.fall_distance - 0.25).abs() < 1e-5);
        assert!((actor.position.y - 9.75).abs() < 1e-5);

        step(&mut actor, &InputState::IDLE, DT, &[], &[], &config());
        assert!((actor.fall_distance - 0.75).abs() < 1e-5);
        assert!(!actor.grounded);
    }

    #[test]
    fn test_landing_reports_fall() {
        let mut actor = actor_at(Vec3::new(0.0, 0.95, 0.0));
        actor.velocity.y = -5.0;
        actor.falling = true;
        actor.fall_distance = 4.0;

        let outcome = step(&mut actor, &InputState::IDLE, DT, &[floor()], &[], &config());

        assert_eq!(outcome.landed, Some(4.0));
        assert!(actor.grounded);
        assert!(!actor.falling);
        assert_eq!(actor.velocity.y, 0.0);
        assert_eq!(actor.max_fall_distance, 4.0);
        assert_eq!(actor.fall_distance, 0.0);
    }

    #[test]
    fn test_wall_blocks_forward_motion() {
        let wall = Body::new(5, Aabb::new(Vec3::new(-5.0, 0.0, -3.0), Vec3::new(5.0, 3.0, -2.0)));
        let mut actor = standing();
        let forward = InputState::with(&[Intent::Forward]);

        let mut pushed = false;
        for _ in 0..60 {
            let outcome = step(&mut actor, &forward, 1.0 / 60.0, &[floor()], &[wall.clone()], &config());
            pushed |= !outcome.pushes.is_empty();
        }

        assert!(pushed);
        assert!(!actor.hitbox().intersects(&wall.bounds));
        assert!(actor.position.z > -1.61);
    }

    #[test]
    fn test_free_fall_without_bodies() {
        let mut actor = actor_at(Vec3::ZERO);
        for _ in 0..100 {
            let outcome = step(&mut actor, &InputState::IDLE, 1.0 / 60.0, &[], &[], &config());
            assert!(outcome.pushes.is_empty());
        }
        assert!(!actor.grounded);
        assert!(actor.falling);
        assert!(actor.position.y < -10.0);
    }

    #[test]
    fn test_invalid_dt_is_zero() {
        let mut actor = actor_at(Vec3::new(0.0, 10.0, 0.0));
        let forward = InputState::with(&[Intent::Forward, Intent::Left]);

        for dt in [f32::NAN, f32::INFINITY, -1.0, 0.0] {
            step(&mut actor, &forward, dt, &[], &[], &config());
        }
        assert_eq!(actor.position, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(actor.yaw, 0.0);
    }

    #[test]
    fn test_seeded_random_walk_stays_on_floor() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0xdeb7);
        let mut actor = standing();
        let bodies = [floor()];

        for _ in 0..300 {
            let input = InputState { flags: rng.gen::<u8>() };
            step(&mut actor, &input, 1.0 / 60.0, &bodies, &bodies, &config());

            let feet = actor.position.y - actor.half_extents.y;
            assert!(feet > -1e-3, "sank into floor: {}", feet);
            assert!(!(actor.grounded && actor.falling));
        }
    }

    proptest! {
        #[test]
        fn prop_step_stays_finite(
            flags in any::<u8>(),
            dt in 0.0f32..0.2,
            x in -20.0f32..20.0,
            y in -5.0f32..20.0,
            z in -20.0f32..20.0,
            vy in -50.0f32..50.0,
        ) {
            let bodies = [
                floor(),
                Body::new(1, Aabb::new(Vec3::new(-2.0, 0.0, -2.0), Vec3::new(2.0, 2.0, 2.0))),
            ];
            let mut actor = actor_at(Vec3::new(x, y, z));
            actor.velocity.y = vy;

            for _ in 0..10 {
                step(&mut actor, &InputState { flags }, dt, &bodies, &bodies, &config());
                prop_assert!(actor.position.is_finite());
                prop_assert!(actor.velocity.is_finite());
                prop_assert!(!(actor.grounded && actor.falling));
                prop_assert!(actor.hitbox().center().abs_diff_eq(actor.position, 1e-3));
            }
        }
    }
}
