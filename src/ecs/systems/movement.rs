//! Velocity integration for entities with a Transform and Velocity.

use crate::ecs::components::physics::Velocity;
use crate::ecs::components::transform::Transform;

/// Integrate motion using semi-implicit Euler: v += a * dt, then p += v * dt.
pub fn movement_system(world: &mut hecs::World, dt: f32) {
    for (_, (transform, velocity)) in world.query_mut::<(&mut Transform, &mut Velocity)>() {
        velocity.velocity += velocity.acceleration * dt;
        transform.position += velocity.velocity * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_constant_velocity() {
        let mut world = hecs::World::new();
        let entity = world.spawn((Transform::identity(), Velocity::from_xy(2.0, -1.0)));

        for _ in 0..10 {
            movement_system(&mut world, 0.1);
        }

        let t = world.get::<&Transform>(entity).unwrap();
        assert!((t.position - Vec2::new(2.0, -1.0)).length() < 1e-4);
    }

    #[test]
    fn test_acceleration_feeds_velocity_first() {
        let mut world = hecs::World::new();
        let entity = world.spawn((
            Transform::identity(),
            Velocity {
                velocity: Vec2::ZERO,
                acceleration: Vec2::new(0.0, -10.0),
            },
        ));

        movement_system(&mut world, 0.5);

        let v = world.get::<&Velocity>(entity).unwrap();
        let t = world.get::<&Transform>(entity).unwrap();
        assert!((v.velocity - Vec2::new(0.0, -5.0)).length() < 1e-5);
        assert!((t.position - Vec2::new(0.0, -2.5)).length() < 1e-5);
    }

    #[test]
    fn test_entities_without_velocity_untouched() {
        let mut world = hecs::World::new();
        let entity = world.spawn((Transform::from_xy(1.0, 1.0),));

        movement_system(&mut world, 1.0);

        let t = world.get::<&Transform>(entity).unwrap();
        assert_eq!(t.position, Vec2::new(1.0, 1.0));
    }
}
