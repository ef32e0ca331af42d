//! Contact and collision data passed from detection to resolution.

use glam::Vec2;

use super::error::PhysicsError;

/// Geometric summary of an overlap between two shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from shape A toward shape B.
    pub normal: Vec2,
    /// Overlap depth along `normal`. Never negative.
    pub penetration: f32,
    /// Approximate contact point in world space.
    pub point: Vec2,
}

impl Contact {
    /// The same contact seen from B's side.
    #[inline]
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Canonical key for an unordered entity pair (smaller entity first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(hecs::Entity, hecs::Entity);

impl PairKey {
    pub fn new(a: hecs::Entity, b: hecs::Entity) -> Self {
        if a < b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    #[inline]
    pub fn first(&self) -> hecs::Entity {
        self.0
    }

    #[inline]
    pub fn second(&self) -> hecs::Entity {
        self.1
    }

    #[inline]
    pub fn contains(&self, entity: hecs::Entity) -> bool {
        self.0 == entity || self.1 == entity
    }
}

/// A detected overlap between two distinct entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    entity_a: hecs::Entity,
    entity_b: hecs::Entity,
    /// Contact data with the normal pointing from A to B.
    pub contact: Contact,
    /// Simulation time (seconds) at which this collision was detected.
    pub timestamp: f64,
    /// Whether A's collider is a trigger.
    pub trigger_a: bool,
    /// Whether B's collider is a trigger.
    pub trigger_b: bool,
}

impl Collision {
    /// Pair two entities with their contact.
    ///
    /// Fails with [`PhysicsError::SelfCollision`] when `entity_a == entity_b`.
    pub fn new(
        entity_a: hecs::Entity,
        entity_b: hecs::Entity,
        contact: Contact,
        timestamp: f64,
    ) -> Result<Self, PhysicsError> {
        if entity_a == entity_b {
            return Err(PhysicsError::SelfCollision(entity_a));
        }
        Ok(Self {
            entity_a,
            entity_b,
            contact,
            timestamp,
            trigger_a: false,
            trigger_b: false,
        })
    }

    /// Builder-style trigger flags.
    pub fn with_triggers(mut self, trigger_a: bool, trigger_b: bool) -> Self {
        self.trigger_a = trigger_a;
        self.trigger_b = trigger_b;
        self
    }

    #[inline]
    pub fn entity_a(&self) -> hecs::Entity {
        self.entity_a
    }

    #[inline]
    pub fn entity_b(&self) -> hecs::Entity {
        self.entity_b
    }

    #[inline]
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.entity_a, self.entity_b)
    }

    #[inline]
    pub fn involves(&self, entity: hecs::Entity) -> bool {
        self.entity_a == entity || self.entity_b == entity
    }

    /// The entity on the other side of `entity`, if it takes part.
    pub fn other(&self, entity: hecs::Entity) -> Option<hecs::Entity> {
        if entity == self.entity_a {
            Some(self.entity_b)
        } else if entity == self.entity_b {
            Some(self.entity_a)
        } else {
            None
        }
    }

    /// True if either side is a trigger.
    #[inline]
    pub fn is_trigger(&self) -> bool {
        self.trigger_a || self.trigger_b
    }

    /// True if both sides are triggers.
    #[inline]
    pub fn is_trigger_pair(&self) -> bool {
        self.trigger_a && self.trigger_b
    }
}
