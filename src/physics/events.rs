//! Enter/stay/exit transitions reported by the collision manager.

use super::contact::Collision;

/// Transition of a pair between two consecutive updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionEventKind {
    /// Overlapping now, not overlapping last update.
    Enter,
    /// Overlapping in both this and the previous update.
    Stay,
    /// Overlapping last update, not anymore.
    Exit,
}

/// A pair transition together with the collision that caused it.
///
/// For `Exit` the collision is the last one seen while the pair still overlapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub kind: CollisionEventKind,
    pub collision: Collision,
}

/// Observer for collision transitions. All methods default to no-ops.
pub trait CollisionListener {
    fn on_collision_enter(&mut self, _collision: &Collision) {}

    fn on_collision_stay(&mut self, _collision: &Collision) {}

    fn on_collision_exit(&mut self, _collision: &Collision) {}
}

/// Route an event to the matching listener method.
pub(crate) fn dispatch(listener: &mut dyn CollisionListener, event: &CollisionEvent) {
    match event.kind {
        CollisionEventKind::Enter => listener.on_collision_enter(&event.collision),
        CollisionEventKind::Stay => listener.on_collision_stay(&event.collision),
        CollisionEventKind::Exit => listener.on_collision_exit(&event.collision),
    }
}
