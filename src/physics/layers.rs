//! Collision layer bits for filtering which colliders interact.

use crate::ecs::components::physics::Collider;

/// Common layer assignments. Bits 8-31 are free for game-specific use.
pub struct CollisionLayers;

impl CollisionLayers {
    pub const NONE: u32 = 0;
    pub const ALL: u32 = u32::MAX;

    pub const DEFAULT: u32 = 1 << 0;
    pub const PLAYER: u32 = 1 << 1;
    pub const ENEMY: u32 = 1 << 2;
    pub const PROJECTILE: u32 = 1 << 3;
    pub const ENVIRONMENT: u32 = 1 << 4;
    pub const TRIGGER: u32 = 1 << 5;
    pub const PICKUP: u32 = 1 << 6;

    /// A's layer must be in B's mask and B's layer must be in A's mask.
    #[inline]
    pub fn should_collide(layer_a: u32, mask_a: u32, layer_b: u32, mask_b: u32) -> bool {
        (layer_a & mask_b) != 0 && (layer_b & mask_a) != 0
    }

    /// Combine several layers into one mask.
    pub fn mask(layers: &[u32]) -> u32 {
        layers.iter().fold(Self::NONE, |acc, &layer| acc | layer)
    }

    /// Layer test for two colliders.
    #[inline]
    pub fn colliders_interact(a: &Collider, b: &Collider) -> bool {
        Self::should_collide(a.layer, a.mask, b.layer, b.mask)
    }
}
