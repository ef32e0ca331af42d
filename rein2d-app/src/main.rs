//! Headless demo: circles bouncing inside a walled arena with a trigger zone.
//!
//! Run with `RUST_LOG=rein2d=trace` to see every transition from the library.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use rein2d::{
    movement_system, Collider, Collision, CollisionConfig, CollisionListener, CollisionManager,
    Shape, Transform, Velocity,
};
use tracing_subscriber::EnvFilter;

const ARENA: Vec2 = Vec2::new(100.0, 60.0);
const WALL: f32 = 4.0;
const BALLS: usize = 12;
const FRAMES: usize = 600;
const DT: f32 = 1.0 / 60.0;

#[derive(Debug, Default)]
struct Tally {
    enters: usize,
    exits: usize,
    zone_visits: usize,
}

/// Logs transitions and counts how often balls enter the trigger zone.
struct ArenaListener {
    zone: hecs::Entity,
    tally: Rc<RefCell<Tally>>,
}

impl CollisionListener for ArenaListener {
    fn on_collision_enter(&mut self, collision: &Collision) {
        let mut tally = self.tally.borrow_mut();
        tally.enters += 1;
        if let Some(ball) = collision.other(self.zone) {
            tally.zone_visits += 1;
            tracing::info!(ball = ball.id(), "ball entered zone");
        }
    }

    fn on_collision_exit(&mut self, collision: &Collision) {
        self.tally.borrow_mut().exits += 1;
        if let Some(ball) = collision.other(self.zone) {
            tracing::info!(ball = ball.id(), "ball left zone");
        }
    }
}

struct Arena {
    zone: hecs::Entity,
    walls: Vec<(hecs::Entity, Vec2)>,
}

fn spawn_arena(world: &mut hecs::World, manager: &mut CollisionManager) -> Arena {
    let walls = [
        (Vec2::new(-WALL, -WALL), Vec2::new(WALL, ARENA.y + 2.0 * WALL)),
        (Vec2::new(ARENA.x, -WALL), Vec2::new(WALL, ARENA.y + 2.0 * WALL)),
        (Vec2::new(0.0, -WALL), Vec2::new(ARENA.x, WALL)),
        (Vec2::new(0.0, ARENA.y), Vec2::new(ARENA.x, WALL)),
    ];
    let walls = walls
        .into_iter()
        .map(|(position, size)| {
            let wall = world.spawn((
                Transform::from_position(position),
                Collider::new(Shape::rectangle(size.x, size.y)),
            ));
            manager.register_collider(wall);
            (wall, position)
        })
        .collect();

    let zone = world.spawn((
        Transform::from_position(ARENA * 0.5),
        Collider::trigger(Shape::centered_rectangle(20.0, 20.0)),
    ));
    manager.register_collider(zone);

    let cols = 4;
    for i in 0..BALLS {
        let x = 15.0 + (i % cols) as f32 * 22.0;
        let y = 10.0 + (i / cols) as f32 * 18.0;
        let angle = i as f32 * 0.9;
        let ball = world.spawn((
            Transform::from_xy(x, y),
            Velocity::new(Vec2::from_angle(angle) * 25.0),
            Collider::new(Shape::circle(2.5)),
        ));
        manager.register_collider(ball);
    }

    Arena { zone, walls }
}

/// Resolution splits every correction evenly, so walls get nudged too. Put them back.
fn pin_walls(world: &mut hecs::World, walls: &[(hecs::Entity, Vec2)]) {
    for &(wall, position) in walls {
        if let Ok(mut transform) = world.get::<&mut Transform>(wall) {
            transform.position = position;
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mut world = hecs::World::new();
    let mut manager = CollisionManager::new(CollisionConfig {
        restitution: 0.9,
        ..CollisionConfig::default()
    });

    let arena = spawn_arena(&mut world, &mut manager);
    let tally = Rc::new(RefCell::new(Tally::default()));
    manager.add_listener(Box::new(ArenaListener {
        zone: arena.zone,
        tally: tally.clone(),
    }));

    for _ in 0..FRAMES {
        movement_system(&mut world, DT);
        manager.update(&mut world, DT);
        pin_walls(&mut world, &arena.walls);
    }

    let tally = tally.borrow();
    tracing::info!(
        seconds = manager.elapsed(),
        enters = tally.enters,
        exits = tally.exits,
        zone_visits = tally.zone_visits,
        active = manager.active_collision_count(),
        "simulation finished"
    );

    let escaped = world
        .query::<(&Transform, &Velocity)>()
        .iter()
        .filter(|(_, (t, _))| {
            t.position.x < -WALL
                || t.position.y < -WALL
                || t.position.x > ARENA.x + WALL
                || t.position.y > ARENA.y + WALL
        })
        .count();
    if escaped > 0 {
        tracing::warn!(escaped, "balls escaped the arena");
    }

    Ok(())
}
