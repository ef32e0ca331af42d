//! ECS systems (movement integration).

pub mod movement;

pub use movement::movement_system;
