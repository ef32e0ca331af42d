//! 2D collision detection and response.
//!
//! # Architecture
//!
//! [`CollisionManager::update`] runs once per frame:
//!
//! 1. Prune registered entities that no longer exist
//! 2. Narrowphase over every registered pair (no broadphase)
//! 3. Resolve non-trigger contacts (positional split + equal-mass impulse)
//! 4. Diff this frame's pairs against the last frame's (enter / stay / exit)
//! 5. Notify listeners

pub mod collider;
pub mod contact;
pub mod error;
pub mod events;
pub mod layers;
pub mod narrowphase;
pub mod solver;

use std::collections::HashMap;

pub use self::collider::Aabb;
pub use self::contact::{Collision, Contact, PairKey};
pub use self::error::PhysicsError;
pub use self::events::{CollisionEvent, CollisionEventKind, CollisionListener};
pub use self::layers::CollisionLayers;
pub use self::narrowphase::CollisionDetector;
pub use self::solver::CollisionResolver;

/// Configuration for collision handling.
#[derive(Debug, Clone)]
pub struct CollisionConfig {
    /// Coefficient of restitution, clamped to [0, 1]. Default: 0.3.
    pub restitution: f32,
    /// Penetration at or below this depth is not resolved. Default: 1e-4.
    pub epsilon: f32,
    /// Skip pairs whose layer and mask bits exclude each other. Default: false.
    pub respect_layers: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            epsilon: 1e-4,
            respect_layers: false,
        }
    }
}

/// Drives detection and resolution each frame and tracks which pairs are
/// currently touching.
pub struct CollisionManager {
    config: CollisionConfig,
    detector: CollisionDetector,
    resolver: CollisionResolver,
    /// Registered entities in registration order.
    colliders: Vec<hecs::Entity>,
    /// Pairs overlapping as of the last update.
    active: HashMap<PairKey, Collision>,
    events: Vec<CollisionEvent>,
    listeners: Vec<Box<dyn CollisionListener>>,
    elapsed: f64,
}

impl CollisionManager {
    /// Create a new manager with the given configuration.
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            detector: CollisionDetector::new(&config),
            resolver: CollisionResolver::new(&config),
            config,
            colliders: Vec::new(),
            active: HashMap::new(),
            events: Vec::new(),
            listeners: Vec::new(),
            elapsed: 0.0,
        }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    pub fn detector(&self) -> &CollisionDetector {
        &self.detector
    }

    pub fn resolver(&self) -> &CollisionResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut CollisionResolver {
        &mut self.resolver
    }

    /// Simulation time accumulated from `update` calls, in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Add an entity to the set checked every update.
    ///
    /// Returns `false` if it was already registered.
    pub fn register_collider(&mut self, entity: hecs::Entity) -> bool {
        if self.colliders.contains(&entity) {
            return false;
        }
        self.colliders.push(entity);
        tracing::debug!(?entity, "collider registered");
        true
    }

    /// Remove an entity and forget every active pair it belongs to.
    ///
    /// No exit event is raised for the purged pairs. Returns `false` if the
    /// entity was not registered.
    pub fn unregister_collider(&mut self, entity: hecs::Entity) -> bool {
        let Some(index) = self.colliders.iter().position(|&e| e == entity) else {
            return false;
        };
        self.colliders.remove(index);

        let before = self.active.len();
        self.active.retain(|key, _| !key.contains(entity));
        tracing::debug!(
            ?entity,
            purged = before - self.active.len(),
            "collider unregistered"
        );
        true
    }

    pub fn is_registered(&self, entity: hecs::Entity) -> bool {
        self.colliders.contains(&entity)
    }

    pub fn registered_count(&self) -> usize {
        self.colliders.len()
    }

    /// Register a listener notified after every update.
    pub fn add_listener(&mut self, listener: Box<dyn CollisionListener>) {
        self.listeners.push(listener);
    }

    /// Run one detection and resolution pass.
    ///
    /// `dt` only advances the clock used for collision timestamps.
    pub fn update(&mut self, world: &mut hecs::World, dt: f32) {
        self.elapsed += f64::from(dt);

        let before = self.colliders.len();
        self.colliders.retain(|&entity| world.contains(entity));
        if self.colliders.len() != before {
            tracing::debug!(
                pruned = before - self.colliders.len(),
                "dropped despawned colliders"
            );
        }

        let collisions = self
            .detector
            .detect_collisions(world, &self.colliders, self.elapsed);

        let physical: Vec<Collision> = collisions
            .iter()
            .filter(|c| !c.is_trigger_pair())
            .copied()
            .collect();
        self.resolver.resolve_collisions(world, &physical);

        self.track_transitions(collisions);

        for event in &self.events {
            for listener in &mut self.listeners {
                events::dispatch(listener.as_mut(), event);
            }
        }
    }

    /// Replace the active map with this frame's collisions and record the
    /// resulting transitions.
    fn track_transitions(&mut self, collisions: Vec<Collision>) {
        self.events.clear();

        let mut next = HashMap::with_capacity(collisions.len());
        for collision in collisions {
            let key = collision.pair_key();
            let kind = if self.active.contains_key(&key) {
                CollisionEventKind::Stay
            } else {
                tracing::trace!(
                    a = ?collision.entity_a(),
                    b = ?collision.entity_b(),
                    penetration = collision.contact.penetration,
                    "collision enter"
                );
                CollisionEventKind::Enter
            };
            self.events.push(CollisionEvent { kind, collision });
            next.insert(key, collision);
        }

        let mut exited: Vec<(PairKey, Collision)> = self
            .active
            .drain()
            .filter(|(key, _)| !next.contains_key(key))
            .collect();
        exited.sort_by_key(|(key, _)| *key);
        for (key, collision) in exited {
            tracing::trace!(a = ?key.first(), b = ?key.second(), "collision exit");
            self.events.push(CollisionEvent {
                kind: CollisionEventKind::Exit,
                collision,
            });
        }

        self.active = next;
    }

    /// Transitions produced by the most recent update.
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Number of pairs overlapping as of the last update.
    pub fn active_collision_count(&self) -> usize {
        self.active.len()
    }

    pub fn active_collisions(&self) -> impl Iterator<Item = &Collision> {
        self.active.values()
    }

    pub fn is_colliding(&self, a: hecs::Entity, b: hecs::Entity) -> bool {
        self.active.contains_key(&PairKey::new(a, b))
    }

    /// Active collisions that involve `entity`.
    pub fn collisions_for(&self, entity: hecs::Entity) -> impl Iterator<Item = &Collision> {
        self.active.values().filter(move |c| c.involves(entity))
    }

    /// Forget all registered entities, active pairs and pending events.
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.active.clear();
        self.events.clear();
    }
}

impl Default for CollisionManager {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::ecs::components::physics::{Collider, Shape, Velocity};
    use crate::ecs::components::transform::Transform;

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    struct Counts {
        enter: usize,
        stay: usize,
        exit: usize,
    }

    struct CountingListener(Rc<RefCell<Counts>>);

    impl CollisionListener for CountingListener {
        fn on_collision_enter(&mut self, _collision: &Collision) {
            self.0.borrow_mut().enter += 1;
        }

        fn on_collision_stay(&mut self, _collision: &Collision) {
            self.0.borrow_mut().stay += 1;
        }

        fn on_collision_exit(&mut self, _collision: &Collision) {
            self.0.borrow_mut().exit += 1;
        }
    }

    fn circle(world: &mut hecs::World, x: f32, trigger: bool) -> hecs::Entity {
        let collider = if trigger {
            Collider::trigger(Shape::circle(1.0))
        } else {
            Collider::new(Shape::circle(1.0))
        };
        world.spawn((Transform::from_xy(x, 0.0), Velocity::default(), collider))
    }

    fn place(world: &mut hecs::World, entity: hecs::Entity, x: f32) {
        world.get::<&mut Transform>(entity).unwrap().position = Vec2::new(x, 0.0);
    }

    fn kinds(manager: &CollisionManager) -> Vec<CollisionEventKind> {
        manager.events().iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_collision_config_default() {
        let config = CollisionConfig::default();
        assert!((config.restitution - 0.3).abs() < 1e-6);
        assert!((config.epsilon - 1e-4).abs() < 1e-9);
        assert!(!config.respect_layers);
    }

    #[test]
    fn test_enter_stay_exit_sequence() {
        let mut world = hecs::World::new();
        let a = circle(&mut world, 0.0, false);
        let b = circle(&mut world, 1.5, false);

        let mut manager = CollisionManager::default();
        let counts = Rc::new(RefCell::new(Counts::default()));
        manager.add_listener(Box::new(CountingListener(counts.clone())));
        manager.register_collider(a);
        manager.register_collider(b);

        let mut per_frame = Vec::new();
        for frame in 1..=4 {
            // Resolution separates the pair, so put it back each frame
            place(&mut world, a, 0.0);
            place(&mut world, b, if frame <= 3 { 1.5 } else { 10.0 });
            manager.update(&mut world, 1.0 / 60.0);
            per_frame.push(kinds(&manager));
        }

        assert_eq!(per_frame[0], vec![CollisionEventKind::Enter]);
        assert_eq!(per_frame[1], vec![CollisionEventKind::Stay]);
        assert_eq!(per_frame[2], vec![CollisionEventKind::Stay]);
        assert_eq!(per_frame[3], vec![CollisionEventKind::Exit]);
        assert_eq!(
            *counts.borrow(),
            Counts {
                enter: 1,
                stay: 2,
                exit: 1
            }
        );
        assert_eq!(manager.active_collision_count(), 0);
    }

    #[test]
    fn test_unregister_purges_without_exit() {
        let mut world = hecs::World::new();
        let a = circle(&mut world, 0.0, true);
        let b = circle(&mut world, 1.0, true);

        let mut manager = CollisionManager::default();
        let counts = Rc::new(RefCell::new(Counts::default()));
        manager.add_listener(Box::new(CountingListener(counts.clone())));
        manager.register_collider(a);
        manager.register_collider(b);

        manager.update(&mut world, 1.0 / 60.0);
        assert_eq!(manager.active_collision_count(), 1);
        assert!(manager.is_colliding(b, a));

        assert!(manager.unregister_collider(a));
        assert_eq!(manager.active_collision_count(), 0);
        assert!(!manager.is_registered(a));

        manager.update(&mut world, 1.0 / 60.0);
        assert!(manager.events().is_empty());
        assert_eq!(counts.borrow().exit, 0);
        assert!(!manager.unregister_collider(a));
    }

    #[test]
    fn test_trigger_pair_reported_but_not_resolved() {
        let mut world = hecs::World::new();
        let a = circle(&mut world, 0.0, true);
        let b = circle(&mut world, 1.0, true);

        let mut manager = CollisionManager::default();
        manager.register_collider(a);
        manager.register_collider(b);
        manager.update(&mut world, 1.0 / 60.0);

        assert_eq!(kinds(&manager), vec![CollisionEventKind::Enter]);
        assert_eq!(world.get::<&Transform>(a).unwrap().position, Vec2::ZERO);
        assert_eq!(
            world.get::<&Transform>(b).unwrap().position,
            Vec2::new(1.0, 0.0)
        );
    }

    #[test]
    fn test_solid_pair_is_separated() {
        let mut world = hecs::World::new();
        let a = circle(&mut world, 0.0, false);
        let b = circle(&mut world, 1.0, false);
        world.get::<&mut Velocity>(a).unwrap().velocity = Vec2::new(3.0, 0.0);
        world.get::<&mut Velocity>(b).unwrap().velocity = Vec2::new(-3.0, 0.0);

        let mut manager = CollisionManager::new(CollisionConfig {
            restitution: 0.0,
            ..CollisionConfig::default()
        });
        manager.register_collider(a);
        manager.register_collider(b);
        manager.update(&mut world, 1.0 / 60.0);

        let pa = world.get::<&Transform>(a).unwrap().position;
        let pb = world.get::<&Transform>(b).unwrap().position;
        assert!(((pb - pa).length() - 2.0).abs() < 1e-4);
        assert!(world.get::<&Velocity>(a).unwrap().velocity.x <= 1e-5);
        assert!(world.get::<&Velocity>(b).unwrap().velocity.x >= -1e-5);

        // The pair is still tracked this frame and exits on the next one
        assert_eq!(manager.active_collision_count(), 1);
        manager.update(&mut world, 1.0 / 60.0);
        assert_eq!(kinds(&manager), vec![CollisionEventKind::Exit]);
    }

    #[test]
    fn test_despawned_entity_exits_and_is_pruned() {
        let mut world = hecs::World::new();
        let a = circle(&mut world, 0.0, true);
        let b = circle(&mut world, 1.0, true);

        let mut manager = CollisionManager::default();
        manager.register_collider(a);
        manager.register_collider(b);
        manager.update(&mut world, 1.0 / 60.0);

        world.despawn(b).unwrap();
        manager.update(&mut world, 1.0 / 60.0);

        assert_eq!(kinds(&manager), vec![CollisionEventKind::Exit]);
        assert_eq!(manager.registered_count(), 1);
        assert_eq!(manager.active_collision_count(), 0);
    }

    #[test]
    fn test_unregistered_entities_are_ignored() {
        let mut world = hecs::World::new();
        let a = circle(&mut world, 0.0, true);
        let _b = circle(&mut world, 1.0, true);

        let mut manager = CollisionManager::default();
        assert!(manager.register_collider(a));
        assert!(!manager.register_collider(a));
        manager.update(&mut world, 1.0 / 60.0);

        assert_eq!(manager.active_collision_count(), 0);
        assert_eq!(manager.registered_count(), 1);
    }

    #[test]
    fn test_queries_and_timestamps() {
        let mut world = hecs::World::new();
        let a = circle(&mut world, 0.0, true);
        let b = circle(&mut world, 1.0, true);
        let c = circle(&mut world, 1.5, true);
        let far = circle(&mut world, 50.0, true);

        let mut manager = CollisionManager::default();
        for entity in [a, b, c, far] {
            manager.register_collider(entity);
        }
        manager.update(&mut world, 0.25);
        manager.update(&mut world, 0.25);

        assert!((manager.elapsed() - 0.5).abs() < 1e-9);
        assert_eq!(manager.active_collision_count(), 3);
        assert_eq!(manager.collisions_for(a).count(), 2);
        assert_eq!(manager.collisions_for(far).count(), 0);
        assert!(manager.is_colliding(a, c));
        assert!(!manager.is_colliding(a, far));
        assert!(manager
            .active_collisions()
            .all(|collision| (collision.timestamp - 0.5).abs() < 1e-9));

        manager.clear();
        assert_eq!(manager.active_collision_count(), 0);
        assert_eq!(manager.registered_count(), 0);
        assert!(manager.events().is_empty());
    }

    #[test]
    fn test_exit_events_are_ordered_by_pair() {
        let mut world = hecs::World::new();
        let hub = circle(&mut world, 0.0, true);
        let spokes: Vec<_> = (0..3).map(|_| circle(&mut world, 0.5, true)).collect();

        let mut manager = CollisionManager::default();
        manager.register_collider(hub);
        for &spoke in &spokes {
            manager.register_collider(spoke);
        }
        manager.update(&mut world, 1.0 / 60.0);
        assert_eq!(manager.active_collision_count(), 6);

        for &spoke in &spokes {
            place(&mut world, spoke, 100.0 + spoke.id() as f32 * 10.0);
        }
        manager.update(&mut world, 1.0 / 60.0);

        let keys: Vec<PairKey> = manager
            .events()
            .iter()
            .map(|e| e.collision.pair_key())
            .collect();
        assert_eq!(keys.len(), 6);
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert!(manager
            .events()
            .iter()
            .all(|e| e.kind == CollisionEventKind::Exit));
    }
}
