//! World-space geometry queries for collider shapes.

use glam::Vec2;

use crate::ecs::components::physics::Shape;

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Build a box from two arbitrary corners.
    #[inline]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Test whether two boxes overlap with non-zero area. Touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Inclusive point containment.
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Closest point inside the box to `point`.
    #[inline]
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

impl Shape {
    /// Centre of the shape for an entity at `position`.
    #[inline]
    pub fn world_center(&self, position: Vec2) -> Vec2 {
        match self {
            Shape::Circle { center, .. } => position + *center,
            Shape::Rectangle {
                origin,
                width,
                height,
            } => position + *origin + Vec2::new(*width, *height) * 0.5,
        }
    }

    /// World-space bounds for an entity at `position`.
    ///
    /// Negative rectangle extents are normalized rather than rejected.
    #[inline]
    pub fn aabb(&self, position: Vec2) -> Aabb {
        match self {
            Shape::Circle { center, radius } => {
                let c = position + *center;
                let r = Vec2::splat(radius.abs());
                Aabb {
                    min: c - r,
                    max: c + r,
                }
            }
            Shape::Rectangle {
                origin,
                width,
                height,
            } => {
                let corner = position + *origin;
                Aabb::from_corners(corner, corner + Vec2::new(*width, *height))
            }
        }
    }
}
