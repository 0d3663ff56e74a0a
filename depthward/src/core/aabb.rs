//! Axis-Aligned Bounding Boxes
//!
//! Box primitives shared by the movement resolver, collectible pickup and
//! level data. Rays are cast with the slab method.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create from explicit corners. Corners are reordered so `min <= max`.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create from a centre point and full size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Create from a centre point and half extents.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Centre of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half extents of the box.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full size of the box.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Per-axis penetration depth between two boxes.
    ///
    /// Components are positive only on axes where the boxes overlap;
    /// touching faces give zero.
    #[inline]
    pub fn overlap(&self, other: &Aabb) -> Vec3 {
        self.max.min(other.max) - self.min.max(other.min)
    }

    /// True if the boxes overlap with positive depth on every axis.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        let overlap = self.overlap(other);
        overlap.x > 0.0 && overlap.y > 0.0 && overlap.z > 0.0
    }

    /// True if the point lies inside or on the boundary.
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Squared distance from a point to the closest point of the box.
    pub fn distance_squared_to(&self, point: Vec3) -> f32 {
        let closest = point.clamp(self.min, self.max);
        closest.distance_squared(point)
    }

    /// Cast a ray against the box.
    ///
    /// Returns the distance along `direction` (which must be normalized) to
    /// the first hit, or `None` if the ray misses or the hit is beyond
    /// `max_distance`. A ray starting inside the box hits at distance 0.
    pub fn ray_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let lo = self.min[axis];
            let hi = self.max[axis];

            if d == 0.0 {
                // Parallel to this slab: origin must already be between the planes
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }

    /// Move the box by an offset.
    #[inline]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// True if every corner component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center_size() {
        let b = Aabb::from_center_size(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(b.max, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.half_extents(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_new_reorders_corners() {
        let b = Aabb::new(Vec3::new(1.0, -1.0, 5.0), Vec3::new(-1.0, 1.0, 0.0));
        assert_eq!(b.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 1.0, 5.0));
    }

    #[test]
    fn test_intersects_requires_positive_depth() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let touching = Aabb::from_center_size(Vec3::new(1.0, 0.0, 0.0), Vec3::ONE);
        let overlapping = Aabb::from_center_size(Vec3::new(0.5, 0.0, 0.0), Vec3::ONE);

        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));

        let overlap = a.overlap(&overlapping);
        assert!((overlap.x - 0.5).abs() < 1e-6);
        assert!((overlap.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ray_cast_down_hits_top_face() {
        let ground = Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0));
        let hit = ground.ray_cast(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 10.0);
        assert_eq!(hit, Some(2.0));
    }

    #[test]
    fn test_ray_cast_respects_max_distance() {
        let ground = Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(ground.ray_cast(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 2.0), Some(2.0));
        assert_eq!(ground.ray_cast(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 1.5), None);
    }

    #[test]
    fn test_ray_cast_misses_outside_footprint() {
        let ground = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(ground.ray_cast(Vec3::new(3.0, 2.0, 0.0), Vec3::NEG_Y, 10.0), None);
    }

    #[test]
    fn test_ray_cast_from_inside_is_zero() {
        let b = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        assert_eq!(b.ray_cast(Vec3::ZERO, Vec3::NEG_Y, 5.0), Some(0.0));
    }

    #[test]
    fn test_ray_cast_pointing_away() {
        let ground = Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(ground.ray_cast(Vec3::new(0.0, 2.0, 0.0), Vec3::Y, 10.0), None);
    }

    #[test]
    fn test_distance_squared_to() {
        let b = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        assert_eq!(b.distance_squared_to(Vec3::new(0.5, 0.0, 0.0)), 0.0);
        assert!((b.distance_squared_to(Vec3::new(3.0, 0.0, 0.0)) - 4.0).abs() < 1e-6);
    }
}
