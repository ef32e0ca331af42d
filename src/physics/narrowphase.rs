//! Narrowphase collision detection: exhaustive pairwise shape tests.

use glam::Vec2;

use crate::ecs::components::physics::{Collider, Shape};
use crate::ecs::components::transform::Transform;

use super::collider::Aabb;
use super::contact::{Collision, Contact};
use super::layers::CollisionLayers;
use super::CollisionConfig;

/// Centre distance below which two circles count as coincident.
const COINCIDENT_EPSILON: f32 = 1e-6;

/// Specialized circle-circle intersection test.
pub fn circle_circle(
    center_a: Vec2,
    radius_a: f32,
    center_b: Vec2,
    radius_b: f32,
) -> Option<Contact> {
    let diff = center_b - center_a;
    let dist_sq = diff.length_squared();
    let min_dist = radius_a + radius_b;

    if min_dist <= 0.0 || dist_sq >= min_dist * min_dist {
        return None;
    }

    let dist = dist_sq.sqrt();
    // Coincident centres have no direction; any fixed unit normal will do.
    let normal = if dist > COINCIDENT_EPSILON {
        diff / dist
    } else {
        Vec2::Y
    };

    let penetration = min_dist - dist;
    let point = center_a + normal * (radius_a - penetration * 0.5);

    Some(Contact {
        normal,
        penetration,
        point,
    })
}

/// Axis-aligned box overlap test.
///
/// The axis with the smaller overlap becomes the contact normal. On an exact
/// tie the X axis wins. The normal's sign follows the centre-to-centre
/// direction, positive when the centres coincide.
pub fn aabb_aabb(a: &Aabb, b: &Aabb) -> Option<Contact> {
    let overlap_x = (a.max.x - b.min.x).min(b.max.x - a.min.x);
    let overlap_y = (a.max.y - b.min.y).min(b.max.y - a.min.y);

    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    let delta = b.center() - a.center();
    let (normal, penetration) = if overlap_x <= overlap_y {
        let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
        (Vec2::new(sign, 0.0), overlap_x)
    } else {
        let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
        (Vec2::new(0.0, sign), overlap_y)
    };

    // Centre of the overlapping region
    let point = (a.min.max(b.min) + a.max.min(b.max)) * 0.5;

    Some(Contact {
        normal,
        penetration,
        point,
    })
}

/// Box-circle test with the normal pointing from the box toward the circle.
///
/// A centre outside the box collides when it is closer than `radius` to the
/// clamped point. A centre inside (or on the edge) is pushed out through the
/// nearest face, checked in the order left, right, bottom, top.
pub fn aabb_circle(rect: &Aabb, center: Vec2, radius: f32) -> Option<Contact> {
    if radius < 0.0 {
        return None;
    }

    if !rect.contains_point(center) {
        let nearest = rect.clamp_point(center);
        let diff = center - nearest;
        let dist_sq = diff.length_squared();
        if dist_sq >= radius * radius {
            return None;
        }
        let dist = dist_sq.sqrt();
        return Some(Contact {
            normal: diff / dist,
            penetration: radius - dist,
            point: nearest,
        });
    }

    let faces = [
        (center.x - rect.min.x, Vec2::NEG_X),
        (rect.max.x - center.x, Vec2::X),
        (center.y - rect.min.y, Vec2::NEG_Y),
        (rect.max.y - center.y, Vec2::Y),
    ];
    let (mut depth, mut normal) = faces[0];
    for &(face_depth, face_normal) in &faces[1..] {
        if face_depth < depth {
            depth = face_depth;
            normal = face_normal;
        }
    }

    Some(Contact {
        normal,
        penetration: depth + radius,
        point: center + normal * depth,
    })
}

/// Detect overlap between two shapes placed at the given entity positions.
///
/// The returned normal always points from A toward B.
pub fn detect_contact(
    shape_a: &Shape,
    position_a: Vec2,
    shape_b: &Shape,
    position_b: Vec2,
) -> Option<Contact> {
    match (shape_a, shape_b) {
        (
            Shape::Circle {
                center: center_a,
                radius: radius_a,
            },
            Shape::Circle {
                center: center_b,
                radius: radius_b,
            },
        ) => circle_circle(
            position_a + *center_a,
            *radius_a,
            position_b + *center_b,
            *radius_b,
        ),
        (Shape::Rectangle { .. }, Shape::Rectangle { .. }) => {
            aabb_aabb(&shape_a.aabb(position_a), &shape_b.aabb(position_b))
        }
        (Shape::Rectangle { .. }, Shape::Circle { center, radius }) => {
            aabb_circle(&shape_a.aabb(position_a), position_b + *center, *radius)
        }
        (Shape::Circle { center, radius }, Shape::Rectangle { .. }) => {
            aabb_circle(&shape_b.aabb(position_b), position_a + *center, *radius)
                .map(Contact::flipped)
        }
    }
}

/// Pairwise narrowphase over an entity list.
///
/// There is no broadphase: every unordered pair is tested. Entities missing a
/// `Collider` or `Transform` are skipped without error.
#[derive(Debug, Clone, Default)]
pub struct CollisionDetector {
    respect_layers: bool,
}

impl CollisionDetector {
    pub fn new(config: &CollisionConfig) -> Self {
        Self {
            respect_layers: config.respect_layers,
        }
    }

    /// Whether pairs are filtered through [`CollisionLayers::should_collide`].
    pub fn respects_layers(&self) -> bool {
        self.respect_layers
    }

    /// Test every unordered pair of `entities`, in list order, and return one
    /// [`Collision`] per overlapping pair. Trigger colliders are included.
    pub fn detect_collisions(
        &self,
        world: &hecs::World,
        entities: &[hecs::Entity],
        timestamp: f64,
    ) -> Vec<Collision> {
        let bodies: Vec<(hecs::Entity, Collider, Vec2)> = entities
            .iter()
            .filter_map(|&entity| body(world, entity).map(|(c, p)| (entity, c, p)))
            .collect();

        let mut collisions = Vec::new();
        for (i, (entity_a, collider_a, position_a)) in bodies.iter().enumerate() {
            for (entity_b, collider_b, position_b) in &bodies[i + 1..] {
                if let Some(collision) = self.test_pair(
                    (*entity_a, collider_a, *position_a),
                    (*entity_b, collider_b, *position_b),
                    timestamp,
                ) {
                    collisions.push(collision);
                }
            }
        }
        collisions
    }

    /// Test a single ordered pair. Returns `None` when either entity lacks the
    /// required components or the shapes do not overlap.
    pub fn detect_pair(
        &self,
        world: &hecs::World,
        entity_a: hecs::Entity,
        entity_b: hecs::Entity,
        timestamp: f64,
    ) -> Option<Collision> {
        let (collider_a, position_a) = body(world, entity_a)?;
        let (collider_b, position_b) = body(world, entity_b)?;
        self.test_pair(
            (entity_a, &collider_a, position_a),
            (entity_b, &collider_b, position_b),
            timestamp,
        )
    }

    fn test_pair(
        &self,
        (entity_a, collider_a, position_a): (hecs::Entity, &Collider, Vec2),
        (entity_b, collider_b, position_b): (hecs::Entity, &Collider, Vec2),
        timestamp: f64,
    ) -> Option<Collision> {
        if self.respect_layers && !CollisionLayers::colliders_interact(collider_a, collider_b) {
            return None;
        }

        let contact = detect_contact(
            &collider_a.shape,
            position_a,
            &collider_b.shape,
            position_b,
        )?;

        // Duplicate entries in the input list are the only way to get here with a == b
        Collision::new(entity_a, entity_b, contact, timestamp)
            .ok()
            .map(|c| c.with_triggers(collider_a.trigger, collider_b.trigger))
    }
}

/// Snapshot of the components detection needs, if both are present.
fn body(world: &hecs::World, entity: hecs::Entity) -> Option<(Collider, Vec2)> {
    let collider = world.get::<&Collider>(entity).ok()?;
    let transform = world.get::<&Transform>(entity).ok()?;
    Some((*collider, transform.position))
}
