use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;

/// Collision layer of a room: a grid of tile codes, `0` = empty, anything
/// else = solid.
///
/// Row `y` of the grid is the `y`-th row of cells going up from the grid
/// origin. Reads outside the grid return `0`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TileGridRepr", into = "TileGridRepr")]
pub struct TileGrid {
    size: IVec2,
    cells: Vec<i32>,
}

#[derive(Serialize, Deserialize)]
struct TileGridRepr {
    width: u32,
    height: u32,
    cells: Vec<i32>,
}

impl TryFrom<TileGridRepr> for TileGrid {
    type Error = PhysicsError;

    fn try_from(r: TileGridRepr) -> Result<Self, Self::Error> {
        let expected = r.width as usize * r.height as usize;
        if r.cells.len() != expected {
            return Err(PhysicsError::TileCountMismatch { expected, found: r.cells.len() });
        }
        Ok(Self { size: IVec2::new(r.width as i32, r.height as i32), cells: r.cells })
    }
}

impl From<TileGrid> for TileGridRepr {
    fn from(g: TileGrid) -> Self {
        Self { width: g.size.x as u32, height: g.size.y as u32, cells: g.cells }
    }
}

impl TileGrid {
    /// All-empty grid.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: IVec2::new(width as i32, height as i32),
            cells: vec![0; width as usize * height as usize],
        }
    }

    /// Build from rows, `rows[y][x]`. Every row must have the same length.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self, PhysicsError> {
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != width {
                return Err(PhysicsError::RaggedTileRows { row, expected: width, found: r.len() });
            }
            cells.extend_from_slice(r);
        }
        Ok(Self { size: IVec2::new(width as i32, rows.len() as i32), cells })
    }

    pub fn width(&self) -> u32 {
        self.size.x as u32
    }

    pub fn height(&self) -> u32 {
        self.size.y as u32
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    #[inline]
    pub fn is_inside(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.size.x && cell.y < self.size.y
    }

    #[inline]
    fn index(&self, cell: IVec2) -> usize {
        (cell.y * self.size.x + cell.x) as usize
    }

    /// Tile code at `cell`, `0` outside the grid.
    #[inline]
    pub fn get(&self, cell: IVec2) -> i32 {
        if self.is_inside(cell) { self.cells[self.index(cell)] } else { 0 }
    }

    /// Store a tile code. Writes outside the grid are ignored and reported.
    pub fn set(&mut self, cell: IVec2, value: i32) -> bool {
        if !self.is_inside(cell) {
            log::warn!("tile write outside grid: {cell} (size {})", self.size);
            return false;
        }
        let i = self.index(cell);
        self.cells[i] = value;
        true
    }

    #[inline]
    pub fn is_solid_cell(&self, cell: IVec2) -> bool {
        self.get(cell) != 0
    }

    /// Number of solid cells.
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_layout() {
        let g = TileGrid::from_rows(&[vec![1, 0, 0], vec![0, 0, 2]]).unwrap();
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 2);
        assert_eq!(g.get(IVec2::new(0, 0)), 1);
        assert_eq!(g.get(IVec2::new(2, 1)), 2);
        assert!(!g.is_solid_cell(IVec2::new(1, 1)));
        assert_eq!(g.solid_count(), 2);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = TileGrid::from_rows(&[vec![1, 0, 0], vec![0, 0]]).unwrap_err();
        assert_eq!(err, PhysicsError::RaggedTileRows { row: 1, expected: 3, found: 2 });
    }

    #[test]
    fn test_outside_reads_as_empty() {
        let mut g = TileGrid::new(2, 2);
        assert!(g.set(IVec2::new(1, 1), 7));
        assert!(!g.set(IVec2::new(2, 0), 7));
        assert_eq!(g.get(IVec2::new(-1, 0)), 0);
        assert_eq!(g.get(IVec2::new(0, 5)), 0);
        assert_eq!(g.get(IVec2::new(1, 1)), 7);
    }

    #[test]
    fn test_json_layer_round_trip_and_validation() {
        let g: TileGrid = serde_json::from_str(r#"{"width":2,"height":2,"cells":[0,1,1,0]}"#).unwrap();
        assert!(g.is_solid_cell(IVec2::new(1, 0)));
        assert!(g.is_solid_cell(IVec2::new(0, 1)));

        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(serde_json::from_str::<TileGrid>(&json).unwrap(), g);

        let bad = serde_json::from_str::<TileGrid>(r#"{"width":2,"height":2,"cells":[0,1,1]}"#);
        assert!(bad.is_err());
    }
}
