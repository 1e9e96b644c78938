//! platbody: swept-AABB physics for a 2D platformer (bodies, pushers, floors,
//! tilemaps)

pub mod types;
pub mod api;
pub mod error;
pub mod body;
pub mod narrowphase;
pub mod shape;
pub mod tilemap;
pub mod world;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::error::PhysicsError;
pub use crate::body::{Body, CollisionHandler};
pub use crate::narrowphase::Narrowphase;
pub use crate::shape::{ShapeBox, ShapeTilemap};
pub use crate::tilemap::TileGrid;
pub use crate::world::Physics;

pub use glam::{IVec2, Vec2};
