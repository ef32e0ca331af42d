//! Rein 2D collision core
//!
//! Narrow-phase collision detection, contact resolution and enter/stay/exit
//! bookkeeping for 2D entities stored in a hecs world.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **ecs** - Components (transform, velocity, collider) and systems (feature = "ecs")
//! 2. **physics** - Detection, resolution and the per-frame collision manager (feature = "physics")

#[cfg(feature = "ecs")]
pub mod ecs;

#[cfg(feature = "physics")]
pub mod physics;

#[cfg(feature = "ecs")]
pub use ecs::prelude::*;

#[cfg(feature = "physics")]
pub use physics::{
    Aabb, Collision, CollisionConfig, CollisionDetector, CollisionEvent, CollisionEventKind,
    CollisionLayers, CollisionListener, CollisionManager, CollisionResolver, Contact, PairKey,
    PhysicsError,
};

// Re-export glam for convenience
pub use glam;
