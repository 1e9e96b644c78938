use glam::Vec2;

use crate::body::Body;
use crate::error::PhysicsError;
use crate::types::*;

/// Collision test used by a body. Shapes are stateless strategies; the
/// body's [`Placement`] tells them where they are.
pub trait Shape {
    /// Static overlap test against `rect`.
    fn probe(&self, placement: Placement, rect: Rect) -> bool;

    /// Fraction of `delta` that `rect` can travel before entering this shape
    /// (1.0 = unobstructed, 0.0 = blocked from the start). `skin` is the gap
    /// kept in front of the obstacle.
    fn raycast(&self, placement: Placement, rect: Rect, delta: Vec2, skin: f32) -> f32;

    /// The exact rectangle this shape occupies, when it is a single box.
    fn as_rect(&self, _placement: Placement) -> Option<Rect> {
        None
    }
}

/// Physical world, as seen by entities during their tick.
pub trait PhysicsProbe {
    /// Attempt to displace a body by `delta`. Returns the fraction of `delta`
    /// actually applied.
    fn move_body(&mut self, id: BodyId, delta: Vec2) -> f32;

    /// True if any solid body other than `except` overlaps `rect`.
    fn is_solid(&self, rect: Rect, except: Option<BodyId>) -> bool;

    /// First body of `groups` overlapping `rect`, skipping `except` and, when
    /// `only_solid`, non-solid bodies.
    fn get_bodies_in_box(
        &self,
        rect: Rect,
        groups: CollisionGroups,
        only_solid: bool,
        except: Option<BodyId>,
    ) -> Option<BodyId>;
}

/// Physical world, as seen by the game session that owns it.
pub trait PhysicsApi: PhysicsProbe {
    /// Construct an empty world.
    fn new(cfg: PhysicsConfig) -> Result<Self, PhysicsError>
    where
        Self: Sized;

    // --- Registration ------------------------------------------------------

    fn add_body(&mut self, body: Body) -> BodyId;

    /// Unregister a body and hand it back. Stale ids return `None`.
    fn remove_body(&mut self, id: BodyId) -> Option<Body>;

    /// Drop every body and pending contact (level change).
    fn clear_bodies(&mut self);

    // --- Per-tick ----------------------------------------------------------

    /// Notify every overlapping pair, once per tick after all moves.
    fn check_for_overlaps(&mut self);

    /// Drain contacts queued since the previous drain.
    fn drain_contacts(&mut self) -> Vec<Contact>;
}
