//! Pairwise contact resolution: positional separation plus an equal-mass impulse.
//!
//! Every collision is resolved on its own. Several simultaneous contacts on one
//! entity are applied one after another and may leave some overlap behind.

use glam::Vec2;

use crate::ecs::components::physics::{Collider, Velocity};
use crate::ecs::components::transform::Transform;

use super::contact::Collision;
use super::CollisionConfig;

/// Converts collisions into position and velocity changes.
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    restitution: f32,
    epsilon: f32,
}

impl CollisionResolver {
    /// Create a resolver from the restitution and epsilon in `config`.
    pub fn new(config: &CollisionConfig) -> Self {
        Self::with_params(config.restitution, config.epsilon)
    }

    /// Create a resolver directly. Restitution is clamped to [0, 1] and a
    /// negative epsilon to 0.
    pub fn with_params(restitution: f32, epsilon: f32) -> Self {
        Self {
            restitution: clamp_restitution(restitution),
            epsilon: epsilon.max(0.0),
        }
    }

    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    pub fn set_restitution(&mut self, restitution: f32) {
        self.restitution = clamp_restitution(restitution);
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Resolve each collision independently, in the order given.
    pub fn resolve_collisions(&self, world: &mut hecs::World, collisions: &[Collision]) {
        for collision in collisions {
            self.resolve(world, collision);
        }
    }

    /// Separate the two bodies along the contact normal and remove their
    /// closing velocity.
    ///
    /// Does nothing for trigger pairs, for penetration at or below epsilon, and
    /// for a zero-length normal. Missing transforms or velocities only skip the
    /// steps that need them.
    pub fn resolve(&self, world: &mut hecs::World, collision: &Collision) {
        let contact = collision.contact;
        if contact.penetration.is_nan() || contact.penetration <= self.epsilon {
            return;
        }

        let entity_a = collision.entity_a();
        let entity_b = collision.entity_b();
        if collision.is_trigger() || is_trigger(world, entity_a) || is_trigger(world, entity_b) {
            return;
        }

        let normal = contact.normal.normalize_or_zero();
        if normal == Vec2::ZERO {
            return;
        }

        separate(world, entity_a, entity_b, normal, contact.penetration);
        self.apply_impulse(world, entity_a, entity_b, normal);
    }

    fn apply_impulse(
        &self,
        world: &mut hecs::World,
        entity_a: hecs::Entity,
        entity_b: hecs::Entity,
        normal: Vec2,
    ) {
        let vel_a = velocity_of(world, entity_a);
        let vel_b = velocity_of(world, entity_b);
        if vel_a.is_none() && vel_b.is_none() {
            return;
        }

        // A body without a Velocity behaves as if at rest
        let mut new_a = vel_a.unwrap_or(Vec2::ZERO);
        let mut new_b = vel_b.unwrap_or(Vec2::ZERO);

        // Negative when the bodies are closing along the normal
        let relative_speed = new_b.dot(normal) - new_a.dot(normal);
        if relative_speed < 0.0 {
            let impulse = -(1.0 + self.restitution) * relative_speed * 0.5;
            new_a -= normal * impulse;
            new_b += normal * impulse;
        }

        // Neither body may keep moving into the other
        let a_into_b = new_a.dot(normal);
        if a_into_b > 0.0 {
            new_a -= normal * a_into_b;
        }
        let b_into_a = new_b.dot(-normal);
        if b_into_a > 0.0 {
            new_b += normal * b_into_a;
        }

        if vel_a.is_some() {
            if let Ok(mut v) = world.get::<&mut Velocity>(entity_a) {
                v.velocity = new_a;
            }
        }
        if vel_b.is_some() {
            if let Ok(mut v) = world.get::<&mut Velocity>(entity_b) {
                v.velocity = new_b;
            }
        }
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(&CollisionConfig::default())
    }
}

/// Push A against the normal and B along it. With only one transform present
/// that side takes the full correction.
fn separate(
    world: &mut hecs::World,
    entity_a: hecs::Entity,
    entity_b: hecs::Entity,
    normal: Vec2,
    penetration: f32,
) {
    let has_a = world.get::<&Transform>(entity_a).is_ok();
    let has_b = world.get::<&Transform>(entity_b).is_ok();

    let (shift_a, shift_b) = match (has_a, has_b) {
        (true, true) => (penetration * 0.5, penetration * 0.5),
        (true, false) => (penetration, 0.0),
        (false, true) => (0.0, penetration),
        (false, false) => return,
    };

    if let Ok(mut t) = world.get::<&mut Transform>(entity_a) {
        t.position -= normal * shift_a;
    }
    if let Ok(mut t) = world.get::<&mut Transform>(entity_b) {
        t.position += normal * shift_b;
    }
}

fn is_trigger(world: &hecs::World, entity: hecs::Entity) -> bool {
    world
        .get::<&Collider>(entity)
        .map(|c| c.trigger)
        .unwrap_or(false)
}

fn velocity_of(world: &hecs::World, entity: hecs::Entity) -> Option<Vec2> {
    world.get::<&Velocity>(entity).ok().map(|v| v.velocity)
}

fn clamp_restitution(restitution: f32) -> f32 {
    if restitution.is_nan() {
        0.0
    } else {
        restitution.clamp(0.0, 1.0)
    }
}
