use std::rc::{Rc, Weak};

use glam::{IVec2, Vec2};

use crate::api::Shape;
use crate::narrowphase::Narrowphase;
use crate::tilemap::TileGrid;
use crate::types::{Placement, Rect};

/// The body's own rectangle.
#[derive(Copy, Clone, Debug, Default)]
pub struct ShapeBox;

impl Shape for ShapeBox {
    fn probe(&self, placement: Placement, rect: Rect) -> bool {
        placement.rect().overlaps(&rect)
    }

    fn raycast(&self, placement: Placement, rect: Rect, delta: Vec2, skin: f32) -> f32 {
        Narrowphase::raycast_box(rect, delta, placement.rect(), skin)
    }

    fn as_rect(&self, placement: Placement) -> Option<Rect> {
        Some(placement.rect())
    }
}

/// A grid of solid/empty cells. The grid belongs to the room; the shape only
/// observes it, and a grid that has been dropped reads as empty.
#[derive(Clone, Debug)]
pub struct ShapeTilemap {
    tiles: Weak<TileGrid>,
}

/// Inclusive cell range, already clamped to the grid.
struct CellRange {
    min: IVec2,
    max: IVec2,
}

impl CellRange {
    fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        (self.min.y..=self.max.y).flat_map(move |y| (self.min.x..=self.max.x).map(move |x| IVec2::new(x, y)))
    }
}

impl ShapeTilemap {
    pub fn new(tiles: &Rc<TileGrid>) -> Self {
        Self { tiles: Rc::downgrade(tiles) }
    }

    pub fn tiles(&self) -> Option<Rc<TileGrid>> {
        let tiles = self.tiles.upgrade();
        if tiles.is_none() {
            log::warn!("tilemap shape outlived its tile grid; treating it as empty");
        }
        tiles
    }

    /// Cells whose half-open area `[x, x+1) × [y, y+1)` intersects `rect`,
    /// or `None` when the rect lies entirely outside the grid.
    fn covered_cells(tiles: &TileGrid, placement: Placement, rect: Rect) -> Option<CellRange> {
        let lo = (rect.min() - placement.translate) / placement.scale;
        let hi = (rect.max() - placement.translate) / placement.scale;

        let min = lo.floor().as_ivec2();
        let max = (hi.ceil().as_ivec2() - IVec2::ONE).max(min);

        let min = min.max(IVec2::ZERO);
        let max = max.min(tiles.size() - IVec2::ONE);
        if min.x > max.x || min.y > max.y {
            return None;
        }
        Some(CellRange { min, max })
    }

    fn cell_rect(placement: Placement, cell: IVec2) -> Rect {
        Rect::new(placement.translate + cell.as_vec2() * placement.scale, placement.scale)
    }
}

impl Shape for ShapeTilemap {
    fn probe(&self, placement: Placement, rect: Rect) -> bool {
        let Some(tiles) = self.tiles() else { return false };
        let Some(range) = Self::covered_cells(&tiles, placement, rect) else { return false };
        range.cells().any(|cell| tiles.is_solid_cell(cell))
    }

    fn raycast(&self, placement: Placement, rect: Rect, delta: Vec2, skin: f32) -> f32 {
        let Some(tiles) = self.tiles() else { return 1.0 };
        let swept = rect.union(rect.translated(delta));
        let Some(range) = Self::covered_cells(&tiles, placement, swept) else { return 1.0 };

        range
            .cells()
            .filter(|&cell| tiles.is_solid_cell(cell))
            .map(|cell| Narrowphase::raycast_box(rect, delta, Self::cell_rect(placement, cell), skin))
            .fold(1.0f32, f32::min)
    }
}
