//! Errors raised by the collision core.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhysicsError {
    /// A collision was constructed with the same entity on both sides.
    #[error("entity {0:?} cannot collide with itself")]
    SelfCollision(hecs::Entity),
}
