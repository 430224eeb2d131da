use glam::IVec2;

use super::MapGeometry;
use crate::constants::{CELL_HEIGHT, CELL_SIZE_X, CELL_SIZE_Y, MAX_HEIGHT_LEVEL};

/// Rectangular cell grid with one elevation level per cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoGrid {
    width: i32,
    height: i32,
    levels: Vec<i32>,
}

impl IsoGrid {
    /// Flat grid at level 0.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1) as i32;
        let height = height.max(1) as i32;
        Self {
            width,
            height,
            levels: vec![0; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.width || cell.y >= self.height {
            return None;
        }
        Some((cell.y * self.width + cell.x) as usize)
    }

    /// Sets a cell's level, clamped to the valid range. Returns false for
    /// cells outside the grid.
    pub fn set_level(&mut self, cell: IVec2, level: i32) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.levels[i] = level.clamp(0, MAX_HEIGHT_LEVEL);
                true
            }
            None => false,
        }
    }
}

impl MapGeometry for IsoGrid {
    fn cell_top_left(&self, cell: IVec2) -> IVec2 {
        let half_x = CELL_SIZE_X / 2;
        let half_y = CELL_SIZE_Y / 2;
        // Shifted right so cell (0, height - 1) starts at x = 0.
        IVec2::new(
            cell.x
                .saturating_sub(cell.y)
                .saturating_mul(half_x)
                .saturating_add((self.height - 1) * half_x),
            cell.x.saturating_add(cell.y).saturating_mul(half_y),
        )
    }

    fn cell_level(&self, cell: IVec2) -> Option<i32> {
        self.index(cell).map(|i| self.levels[i])
    }

    fn height_in_pixels_with_cell_height(&self) -> i32 {
        (self.width + self.height) * (CELL_SIZE_Y / 2) + MAX_HEIGHT_LEVEL * CELL_HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_cells_onto_the_diamond() {
        let grid = IsoGrid::new(4, 3);
        assert_eq!(grid.cell_top_left(IVec2::new(0, 0)), IVec2::new(48, 0));
        assert_eq!(grid.cell_top_left(IVec2::new(1, 0)), IVec2::new(72, 12));
        assert_eq!(grid.cell_top_left(IVec2::new(0, 2)), IVec2::new(0, 24));
        assert_eq!(grid.height_in_pixels_with_cell_height(), 7 * 12 + 14 * 15);
    }

    #[test]
    fn levels_are_clamped_and_bounded() {
        let mut grid = IsoGrid::new(2, 2);
        assert!(grid.set_level(IVec2::new(1, 1), 40));
        assert_eq!(grid.cell_level(IVec2::new(1, 1)), Some(MAX_HEIGHT_LEVEL));
        assert!(!grid.set_level(IVec2::new(2, 0), 3));
        assert_eq!(grid.cell_level(IVec2::new(-1, 0)), None);
        assert_eq!(grid.cell_level(IVec2::new(0, 0)), Some(0));
    }
}
