//! Shared setup helpers for rein2d benchmarks.
//!
//! ## Running
//!
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench collision
//!
//! Filter by group:
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench collision -- narrowphase

use glam::Vec2;
use rein2d::{Collider, CollisionConfig, CollisionManager, Shape, Transform, Velocity};

/// Spawn `n` circles in a grid spaced so neighbours overlap.
pub fn setup_circle_world(n: usize) -> (hecs::World, Vec<hecs::Entity>) {
    spawn_grid(n, 1.5, |_| Shape::circle(1.0))
}

/// Alternating circles and rectangles, neighbours overlapping.
#[allow(clippy::manual_is_multiple_of)]
pub fn setup_mixed_world(n: usize) -> (hecs::World, Vec<hecs::Entity>) {
    spawn_grid(n, 1.5, |i| {
        if i % 2 == 0 {
            Shape::circle(1.0)
        } else {
            Shape::centered_rectangle(2.0, 2.0)
        }
    })
}

/// Circles spread far apart (no overlaps).
pub fn setup_sparse_world(n: usize) -> (hecs::World, Vec<hecs::Entity>) {
    spawn_grid(n, 10.0, |_| Shape::circle(0.5))
}

/// A manager with every entity in `entities` registered.
pub fn setup_manager(entities: &[hecs::Entity]) -> CollisionManager {
    let mut manager = CollisionManager::new(CollisionConfig::default());
    for &entity in entities {
        manager.register_collider(entity);
    }
    manager
}

fn spawn_grid(
    n: usize,
    spacing: f32,
    shape: impl Fn(usize) -> Shape,
) -> (hecs::World, Vec<hecs::Entity>) {
    let mut world = hecs::World::new();
    let cols = (n as f32).sqrt().ceil() as usize;

    let entities = (0..n)
        .map(|i| {
            let position = Vec2::new((i % cols) as f32, (i / cols) as f32) * spacing;
            world.spawn((
                Transform::from_position(position),
                Velocity::new(-position.normalize_or_zero()),
                Collider::new(shape(i)),
            ))
        })
        .collect();
    (world, entities)
}
