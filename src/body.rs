use std::fmt;
use std::rc::Rc;

use glam::Vec2;

use crate::api::Shape;
use crate::shape::ShapeBox;
use crate::types::*;

/// Called when a body is notified of a contact. Only called if
/// `receiver.collides_with` intersects the other body's group.
pub type CollisionHandler = Box<dyn FnMut(&Contact)>;

thread_local! {
    static DEFAULT_SHAPE: Rc<dyn Shape> = Rc::new(ShapeBox);
}

/// A collidable object. Entities own the gameplay state around it and keep
/// the [`BodyId`] returned when the body is registered.
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,

    /// Blocks other bodies that collide with its group.
    pub solid: bool,
    /// Drags riders and overlapping bodies along when it moves.
    pub pusher: bool,
    /// Set when a pusher forced this body into something else.
    pub crushed: bool,

    pub collision_group: CollisionGroups,
    pub collides_with: CollisionGroups,
    pub capabilities: Capabilities,

    /// The solid body this one rests on, recomputed on every move.
    pub floor: Option<BodyId>,

    pub shape: Rc<dyn Shape>,
    pub on_collision: Option<CollisionHandler>,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::ONE,
            solid: false,
            pusher: false,
            crushed: false,
            collision_group: CollisionGroups::PLAYER,
            collides_with: CollisionGroups::ALL,
            capabilities: Capabilities::empty(),
            floor: None,
            shape: DEFAULT_SHAPE.with(|s| s.clone()),
            on_collision: None,
        }
    }
}

impl Body {
    /// Box body at `pos` with the given `size`.
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size, ..Default::default() }
    }

    /// Body whose collision is a tile grid; `origin` is where cell (0,0)
    /// starts and `cell_size` the extent of one cell.
    pub fn tilemap(origin: Vec2, cell_size: Vec2, shape: Rc<dyn Shape>) -> Self {
        Self { pos: origin, size: cell_size, solid: true, shape, ..Default::default() }
    }

    pub fn solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    pub fn pusher(mut self, pusher: bool) -> Self {
        self.pusher = pusher;
        self
    }

    pub fn group(mut self, group: CollisionGroups) -> Self {
        self.collision_group = group;
        self
    }

    pub fn collides_with(mut self, mask: CollisionGroups) -> Self {
        self.collides_with = mask;
        self
    }

    pub fn capabilities(mut self, caps: Capabilities) -> Self {
        self.capabilities = caps;
        self
    }

    pub fn on_collision(mut self, handler: impl FnMut(&Contact) + 'static) -> Self {
        self.on_collision = Some(Box::new(handler));
        self
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    #[inline]
    pub fn placement(&self) -> Placement {
        Placement { translate: self.pos, scale: self.size }
    }

    /// Exact rectangle when the shape is a single box.
    pub fn as_rect(&self) -> Option<Rect> {
        self.shape.as_rect(self.placement())
    }

    pub fn probe(&self, rect: Rect) -> bool {
        self.shape.probe(self.placement(), rect)
    }

    pub fn raycast(&self, rect: Rect, delta: Vec2, skin: f32) -> f32 {
        self.shape.raycast(self.placement(), rect, delta, skin)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("pos", &self.pos)
            .field("size", &self.size)
            .field("solid", &self.solid)
            .field("pusher", &self.pusher)
            .field("crushed", &self.crushed)
            .field("collision_group", &self.collision_group)
            .field("collides_with", &self.collides_with)
            .field("capabilities", &self.capabilities)
            .field("floor", &self.floor)
            .field("has_handler", &self.on_collision.is_some())
            .finish()
    }
}
