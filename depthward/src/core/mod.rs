//! Core geometric primitives.
//!
//! Shared by the movement resolver, collectible pickup and level data.

pub mod aabb;

// Re-export core types
pub use aabb::Aabb;
