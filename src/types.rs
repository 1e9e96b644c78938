use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;

slotmap::new_key_type! {
    /// Generational handle to a body registered in a [`crate::Physics`].
    ///
    /// A handle outlives its body safely: once the body is removed, lookups
    /// through a stale handle resolve to nothing.
    pub struct BodyId;
}

/// Axis-aligned rectangle, origin at its minimum corner.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Rectangle with non-negative size covering the same area.
    pub fn normalized(self) -> Self {
        let a = self.pos;
        let b = self.pos + self.size;
        Self { pos: a.min(b), size: (b - a).abs() }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn translated(self, delta: Vec2) -> Self {
        Self { pos: self.pos + delta, size: self.size }
    }

    /// Smallest rectangle containing both.
    pub fn union(self, other: Rect) -> Self {
        let min = self.min().min(other.min());
        let max = self.max().max(other.max());
        Self { pos: min, size: max - min }
    }

    /// Closed-interval overlap: rectangles sharing only an edge overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        debug_assert!(self.size.x >= 0.0 && self.size.y >= 0.0);
        debug_assert!(other.size.x >= 0.0 && other.size.y >= 0.0);

        overlap_segments(self.pos.x, self.max().x, other.pos.x, other.max().x)
            && overlap_segments(self.pos.y, self.max().y, other.pos.y, other.max().y)
    }
}

/// 1-D closed segment overlap test: `[a0, a1]` vs `[b0, b1]`.
#[inline]
pub fn overlap_segments(a0: f32, a1: f32, b0: f32, b1: f32) -> bool {
    let (first_start, first_end, second_start) = if a0 > b0 { (b0, b1, a0) } else { (a0, a1, b0) };
    second_start >= first_start && second_start <= first_end
}

/// Pose handed to a shape: where the body is and how large it is.
///
/// For a box body this is the box itself. For a tilemap body `translate` is
/// the grid origin and `scale` the size of one cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    pub translate: Vec2,
    pub scale: Vec2,
}

impl Placement {
    pub fn rect(&self) -> Rect {
        Rect::new(self.translate, self.scale)
    }
}

bitflags::bitflags! {
    /// Collision categories. A body belongs to `collision_group` and reacts to
    /// the categories in `collides_with`.
    #[repr(transparent)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CollisionGroups: u32 {
        const PLAYER       = 0x1;
        /// Player while not blinking after a hit.
        const SOLID_PLAYER = 0x2;
        const WALLS        = 0x4;
        const LADDER       = 0x8;
        const DOORS        = 0x10;
        const BONUS        = 0x20;
        const ALL          = !0;
    }
}

bitflags::bitflags! {
    /// What a body's owner can be asked to do by the party it touches.
    #[repr(transparent)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        const DAMAGEABLE = 1 << 0;
        const CLIMBABLE  = 1 << 1;
        const SWIMMABLE  = 1 << 2;
        const PLAYER     = 1 << 3;
        const CONVEYOR   = 1 << 4;
        const TELEPORTER = 1 << 5;
    }
}

/// How a contact was discovered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContactKind {
    /// The receiver's move (or the other's move) was stopped by a solid body.
    Blocked,
    /// Resting overlap found by `check_for_overlaps`.
    Overlap,
}

/// Collision notification delivered to `receiver` about `other`.
///
/// Carries a snapshot of the other party so handlers can query it without
/// reaching back into the engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    pub kind: ContactKind,
    pub receiver: BodyId,
    pub other: BodyId,
    pub other_group: CollisionGroups,
    pub other_capabilities: Capabilities,
    /// Solidity as observed at notification time (a pusher reads as
    /// non-solid while it drags its riders).
    pub other_solid: bool,
}

/// Tuning constants of the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gap kept between a stopped mover and the obstacle it ran into.
    pub skin: f32,
    /// Thickness of the strip probed beneath a body to find its floor.
    pub floor_probe_depth: f32,
    /// Maximum number of queued contacts; extra are dropped.
    pub max_contacts: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            skin: 0.001,
            floor_probe_depth: 0.1,
            max_contacts: 1024,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        for (field, value) in [("skin", self.skin), ("floor_probe_depth", self.floor_probe_depth)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PhysicsError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }
}

/// Snapshot of the registered population, for debug overlays.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PhysicsStats {
    pub bodies: usize,
    pub solid: usize,
    pub pushers: usize,
    /// Bodies currently resting on another body.
    pub riders: usize,
    pub pending_contacts: usize,
}
