use std::ops::{Deref, DerefMut};

use glam::Vec2;
use slotmap::SlotMap;

use crate::api::{PhysicsApi, PhysicsProbe};
use crate::body::Body;
use crate::error::PhysicsError;
use crate::types::*;

/// The set of bodies of one level, and the move/push/overlap rules between
/// them. Created fresh for every level load by the game session.
pub struct Physics {
    cfg: PhysicsConfig,
    bodies: SlotMap<BodyId, Body>,

    // Contacts queued for the gameplay layer
    contacts: Vec<Contact>,
    dropped_contacts: usize,

    // Pushers currently dragging others, innermost last
    pushing: Vec<BodyId>,
}

impl PhysicsApi for Physics {
    fn new(cfg: PhysicsConfig) -> Result<Self, PhysicsError> {
        cfg.validate()?;
        log::debug!("physics world created: {cfg:?}");
        Ok(Self {
            cfg,
            bodies: SlotMap::with_key(),
            contacts: Vec::new(),
            dropped_contacts: 0,
            pushing: Vec::new(),
        })
    }

    fn add_body(&mut self, body: Body) -> BodyId {
        let id = self.bodies.insert(body);
        log::debug!("add body {id:?} ({} registered)", self.bodies.len());
        id
    }

    fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let body = self.bodies.remove(id)?;
        for other in self.bodies.values_mut() {
            if other.floor == Some(id) {
                other.floor = None;
            }
        }
        log::debug!("remove body {id:?} ({} registered)", self.bodies.len());
        Some(body)
    }

    fn clear_bodies(&mut self) {
        self.bodies.clear();
        self.contacts.clear();
        self.dropped_contacts = 0;
        self.pushing.clear();
    }

    fn check_for_overlaps(&mut self) {
        let ids: Vec<BodyId> = self.bodies.keys().collect();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                let overlapping = match (self.bodies.get(a), self.bodies.get(b)) {
                    (Some(ba), Some(bb)) => Self::bodies_overlap(ba, bb),
                    _ => false,
                };
                if overlapping {
                    self.collide_bodies(a, b, ContactKind::Overlap);
                }
            }
        }
    }

    fn drain_contacts(&mut self) -> Vec<Contact> {
        if self.dropped_contacts > 0 {
            log::warn!(
                "{} contacts dropped (max_contacts = {})",
                self.dropped_contacts,
                self.cfg.max_contacts
            );
            self.dropped_contacts = 0;
        }
        std::mem::take(&mut self.contacts)
    }
}

impl PhysicsProbe for Physics {
    fn move_body(&mut self, id: BodyId, delta: Vec2) -> f32 {
        debug_assert!(self.bodies.contains_key(id), "move_body on unregistered body {id:?}");
        let Some(mover) = self.bodies.get(id) else {
            log::error!("move_body on unregistered body {id:?}");
            return 0.0;
        };
        let rect = mover.rect();
        let pusher = mover.pusher;

        let (fraction, blocker) = self.cast_box(rect, delta, mover.collides_with, Some(id));

        // Contact is reported even when the move does not happen at all
        if let Some(blocker) = blocker {
            self.collide_bodies(id, blocker, ContactKind::Blocked);
        }

        if fraction > 0.0 {
            let applied = delta * fraction;
            let target = rect.translated(applied);
            self.with_solid_cleared(id, |physics| {
                if pusher {
                    physics.push_others(id, target, applied);
                }
                if let Some(body) = physics.bodies.get_mut(id) {
                    body.pos += applied;
                }
            });
        }

        if !pusher {
            self.update_floor(id);
        }

        log::trace!("move {id:?} by {delta} -> {fraction:.4} (blocker {blocker:?})");
        fraction
    }

    fn is_solid(&self, rect: Rect, except: Option<BodyId>) -> bool {
        self.get_bodies_in_box(rect, CollisionGroups::ALL, true, except).is_some()
    }

    fn get_bodies_in_box(
        &self,
        rect: Rect,
        groups: CollisionGroups,
        only_solid: bool,
        except: Option<BodyId>,
    ) -> Option<BodyId> {
        self.bodies
            .iter()
            .filter(|&(id, _)| Some(id) != except)
            .filter(|(_, body)| !only_solid || body.solid)
            .filter(|(_, body)| body.collision_group.intersects(groups))
            .find(|(_, body)| body.probe(rect))
            .map(|(id, _)| id)
    }
}

impl Physics {
    pub fn config(&self) -> &PhysicsConfig {
        &self.cfg
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(id)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    /// Direct access, for teleports, respawns and shape changes.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    pub fn try_body(&self, id: BodyId) -> Result<&Body, PhysicsError> {
        self.bodies.get(id).ok_or(PhysicsError::UnknownBody)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter()
    }

    /// Read and reset the crushed flag of a body.
    pub fn take_crushed(&mut self, id: BodyId) -> bool {
        self.bodies
            .get_mut(id)
            .map(|b| std::mem::replace(&mut b.crushed, false))
            .unwrap_or(false)
    }

    /// Minimum swept fraction of `rect` moving by `delta` over the solid
    /// bodies of `groups`, and the body that produced it.
    pub fn cast_box(
        &self,
        rect: Rect,
        delta: Vec2,
        groups: CollisionGroups,
        except: Option<BodyId>,
    ) -> (f32, Option<BodyId>) {
        let mut fraction = 1.0f32;
        let mut blocker = None;
        for (id, body) in &self.bodies {
            if Some(id) == except || !body.solid || !body.collision_group.intersects(groups) {
                continue;
            }
            let f = body.raycast(rect, delta, self.cfg.skin);
            if f < fraction {
                fraction = f;
                blocker = Some(id);
            }
        }
        (fraction, blocker)
    }

    /// Drag the riders of `id` and the bodies overlapping `target` (the
    /// mover's rectangle after the move) by `delta`.
    fn push_others(&mut self, id: BodyId, target: Rect, delta: Vec2) {
        let Some(mask) = self.bodies.get(id).map(|b| b.collides_with) else { return };
        let ids: Vec<BodyId> = self.bodies.keys().collect();
        let mut riders = Vec::new();

        self.pushing.push(id);

        for &other in &ids {
            if other == id || self.pushing.contains(&other) {
                continue;
            }
            if self.bodies.get(other).is_some_and(|b| b.floor == Some(id)) {
                let f = self.move_body(other, delta);
                if f < 1.0 {
                    // Wedged between the mover and whatever stopped it
                    self.crush(id, other, f);
                } else if let Some(rider) = self.bodies.get_mut(other) {
                    // The floor probe ran while the mover was non-solid
                    rider.floor = Some(id);
                }
                log::trace!("{id:?} carried rider {other:?} ({f:.4})");
                riders.push(other);
            }
        }

        for &other in &ids {
            if other == id || riders.contains(&other) || self.pushing.contains(&other) {
                continue;
            }
            let Some(body) = self.bodies.get(other) else { continue };
            if !body.collision_group.intersects(mask) {
                continue;
            }
            // Only box bodies get shoved around; grids stay put
            let Some(rect) = body.as_rect() else { continue };
            if !rect.overlaps(&target) {
                continue;
            }
            let f = self.move_body(other, delta);
            if f < 1.0 {
                self.crush(id, other, f);
            }
        }

        self.pushing.pop();
    }

    /// Flag `victim` as crushed by `pusher` and report it as blocked by the
    /// pusher. Called mid-push, so the contact shows the pusher non-solid.
    fn crush(&mut self, pusher: BodyId, victim: BodyId, fraction: f32) {
        if let Some(body) = self.bodies.get_mut(victim) {
            body.crushed = true;
        }
        log::debug!("{pusher:?} crushed {victim:?} ({fraction:.4})");
        self.collide_bodies(victim, pusher, ContactKind::Blocked);
    }

    /// Run `f` with `id` non-solid. Solidity and the pusher stack are
    /// restored when the guard drops, unwinding included.
    fn with_solid_cleared<R>(&mut self, id: BodyId, f: impl FnOnce(&mut Self) -> R) -> R {
        let mut guard = SolidCleared::new(self, id);
        f(&mut *guard)
    }

    fn update_floor(&mut self, id: BodyId) {
        let Some(body) = self.bodies.get(id) else { return };
        let depth = self.cfg.floor_probe_depth;
        let inset = self.cfg.skin;
        // Inset sideways so a wall the body is flush against is not a floor
        let feet = Rect::new(
            Vec2::new(body.pos.x + inset, body.pos.y - depth),
            Vec2::new((body.size.x - 2.0 * inset).max(0.0), depth),
        );
        let floor = self.get_bodies_in_box(feet, body.collides_with, true, Some(id));
        if let Some(body) = self.bodies.get_mut(id) {
            body.floor = floor;
        }
    }

    fn bodies_overlap(a: &Body, b: &Body) -> bool {
        match (a.as_rect(), b.as_rect()) {
            (Some(ra), Some(rb)) => ra.overlaps(&rb),
            (Some(ra), None) => b.probe(ra),
            (None, Some(rb)) => a.probe(rb),
            // Two grids never touch
            (None, None) => false,
        }
    }

    /// Tell each side about the other, each filtered by its own mask.
    pub fn collide_bodies(&mut self, a: BodyId, b: BodyId, kind: ContactKind) {
        let (Some(ba), Some(bb)) = (self.bodies.get(a), self.bodies.get(b)) else { return };
        let b_hears = bb.collides_with.intersects(ba.collision_group);
        let a_hears = ba.collides_with.intersects(bb.collision_group);

        if b_hears {
            self.notify(b, a, kind);
        }
        if a_hears {
            self.notify(a, b, kind);
        }
    }

    fn notify(&mut self, receiver: BodyId, other: BodyId, kind: ContactKind) {
        let Some(o) = self.bodies.get(other) else { return };
        let contact = Contact {
            kind,
            receiver,
            other,
            other_group: o.collision_group,
            other_capabilities: o.capabilities,
            other_solid: o.solid,
        };

        if let Some(handler) = self.bodies.get_mut(receiver).and_then(|b| b.on_collision.as_mut()) {
            handler(&contact);
        }

        if self.contacts.len() < self.cfg.max_contacts {
            self.contacts.push(contact);
        } else if self.cfg.max_contacts > 0 {
            self.dropped_contacts += 1;
        }
    }

    /// Return debug stats for the registered bodies.
    pub fn debug_stats(&self) -> PhysicsStats {
        let mut stats = PhysicsStats {
            bodies: self.bodies.len(),
            pending_contacts: self.contacts.len(),
            ..Default::default()
        };
        for body in self.bodies.values() {
            stats.solid += body.solid as usize;
            stats.pushers += body.pusher as usize;
            stats.riders += body.floor.is_some_and(|f| self.bodies.contains_key(f)) as usize;
        }
        stats
    }
}

/// Keeps a body non-solid for as long as it lives.
struct SolidCleared<'a> {
    physics: &'a mut Physics,
    id: BodyId,
    was_solid: Option<bool>,
    pushing: usize,
}

impl<'a> SolidCleared<'a> {
    fn new(physics: &'a mut Physics, id: BodyId) -> Self {
        let was_solid = physics.bodies.get_mut(id).map(|b| std::mem::replace(&mut b.solid, false));
        let pushing = physics.pushing.len();
        Self { physics, id, was_solid, pushing }
    }
}

impl Deref for SolidCleared<'_> {
    type Target = Physics;

    fn deref(&self) -> &Physics {
        self.physics
    }
}

impl DerefMut for SolidCleared<'_> {
    fn deref_mut(&mut self) -> &mut Physics {
        self.physics
    }
}

impl Drop for SolidCleared<'_> {
    fn drop(&mut self) {
        if let (Some(solid), Some(body)) = (self.was_solid, self.physics.bodies.get_mut(self.id)) {
            body.solid = solid;
        }
        self.physics.pushing.truncate(self.pushing);
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            cfg: PhysicsConfig::default(),
            bodies: SlotMap::with_key(),
            contacts: Vec::new(),
            dropped_contacts: 0,
            pushing: Vec::new(),
        }
    }
}
