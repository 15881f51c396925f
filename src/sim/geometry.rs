//! Vector and box helpers shared by both engines
//!
//! Brick Breaker works in field space: origin top-left, +y pointing down,
//! units are CSS pixels of the reference field.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Build from top-left corner and size
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Closest point inside the box to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Box-vs-box overlap (touching edges do not count)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Circle-vs-box overlap test
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = self.closest_point(center);
        (center - closest).length_squared() < radius * radius
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Unit vector for an angle in degrees, measured from +x toward +y
#[inline]
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Angle of a vector in degrees, in (-180, 180]
#[inline]
pub fn angle_degrees(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees()
}

/// Clamp `x` so that a span of `half_width` around it stays in `[min, max]`
#[inline]
pub fn clamp_span(x: f32, half_width: f32, min: f32, max: f32) -> f32 {
    let lo = min + half_width;
    let hi = max - half_width;
    if lo > hi {
        (min + max) * 0.5
    } else {
        x.clamp(lo, hi)
    }
}
