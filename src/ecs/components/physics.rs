//! Physics components for ECS entities.

use glam::Vec2;

/// Linear motion component.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub velocity: Vec2,
    /// Integrated into `velocity` by the movement system. Ignored by collision.
    pub acceleration: Vec2,
}

impl Velocity {
    pub fn new(velocity: Vec2) -> Self {
        Self {
            velocity,
            acceleration: Vec2::ZERO,
        }
    }

    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::new(Vec2::new(x, y))
    }
}

/// Collider geometry, relative to the owning entity's transform position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Circle centred at `center` (offset from the transform position).
    Circle { center: Vec2, radius: f32 },
    /// Axis-aligned rectangle whose minimum corner sits at `origin`
    /// (offset from the transform position).
    Rectangle {
        origin: Vec2,
        width: f32,
        height: f32,
    },
}

impl Shape {
    /// Circle centred on the transform position.
    pub fn circle(radius: f32) -> Self {
        Shape::Circle {
            center: Vec2::ZERO,
            radius,
        }
    }

    /// Rectangle with its minimum corner on the transform position.
    pub fn rectangle(width: f32, height: f32) -> Self {
        Shape::Rectangle {
            origin: Vec2::ZERO,
            width,
            height,
        }
    }

    /// Rectangle centred on the transform position.
    pub fn centered_rectangle(width: f32, height: f32) -> Self {
        Shape::Rectangle {
            origin: Vec2::new(-width * 0.5, -height * 0.5),
            width,
            height,
        }
    }
}

/// Collision detection component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub shape: Shape,
    /// If true, generates collision events but no physical response.
    pub trigger: bool,
    /// Layer bits this collider occupies.
    pub layer: u32,
    /// Layer bits this collider wants to interact with.
    pub mask: u32,
}

impl Collider {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }

    pub fn trigger(shape: Shape) -> Self {
        Self {
            shape,
            trigger: true,
            ..Self::default()
        }
    }

    /// Builder-style layer/mask assignment.
    pub fn with_layers(mut self, layer: u32, mask: u32) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            shape: Shape::circle(0.5),
            trigger: false,
            layer: 1,
            mask: u32::MAX,
        }
    }
}
