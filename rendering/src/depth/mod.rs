//! Draw-order keys for placed map objects.
//!
//! A key is a single `f32`; drawing in ascending key order gives correct
//! isometric occlusion. The key is made of a positional term (the isometric
//! row an object belongs to), an elevation term and a small per-category bias.

mod grid;

pub use grid::IsoGrid;

use game_types::{BuildingType, ObjectCategory, OverlayType, SmudgeType};
use glam::{IVec2, UVec2};

use crate::constants::{
    BRIDGE_HEIGHT, CELL_HEIGHT, CELL_SIZE_X, CELL_SIZE_Y, DEPTH_EPSILON, DEPTH_RENDER_STEP,
    DOWNWARDS_DEPTH_RENDER_SPACE, LEAK_THRESHOLD_PX,
};

/// Cell grid and elevation lookups the depth model needs from a map.
pub trait MapGeometry {
    /// Screen pixel of the top-left corner of a cell's bounding box.
    fn cell_top_left(&self, cell: IVec2) -> IVec2;
    /// Elevation level of a cell, `None` outside the map.
    fn cell_level(&self, cell: IVec2) -> Option<i32>;
    /// Full map height in pixels, including the highest elevation.
    fn height_in_pixels_with_cell_height(&self) -> i32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthCategory {
    Smudge,
    Overlay,
    HighBridge,
    Terrain,
    Infantry,
    Vehicle,
    Aircraft,
    Building,
}

impl DepthCategory {
    /// Tie-break rank at identical position and elevation.
    pub fn order(self) -> u32 {
        match self {
            Self::Smudge => 0,
            Self::Overlay => 1,
            Self::Terrain => 2,
            Self::Infantry | Self::Vehicle | Self::Aircraft => 3,
            Self::Building => 4,
            Self::HighBridge => 5,
        }
    }

    pub fn for_overlay(overlay: &OverlayType) -> Self {
        if overlay.is_high_bridge() {
            Self::HighBridge
        } else {
            Self::Overlay
        }
    }
}

impl From<ObjectCategory> for DepthCategory {
    fn from(category: ObjectCategory) -> Self {
        match category {
            ObjectCategory::Infantry => Self::Infantry,
            ObjectCategory::Vehicle => Self::Vehicle,
            ObjectCategory::Aircraft => Self::Aircraft,
            ObjectCategory::Building => Self::Building,
            ObjectCategory::Terrain => Self::Terrain,
            ObjectCategory::Overlay => Self::Overlay,
            ObjectCategory::Smudge => Self::Smudge,
        }
    }
}

/// Screen-space rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthQuery {
    pub category: DepthCategory,
    /// Cell the object is placed on (its foundation's top corner).
    pub cell: IVec2,
    /// Footprint in cells, at least 1x1.
    pub foundation: UVec2,
    /// Where the object's texture lands on screen.
    pub draw_bounds: ScreenRect,
}

impl DepthQuery {
    pub fn new(category: DepthCategory, cell: IVec2, draw_bounds: ScreenRect) -> Self {
        Self {
            category,
            cell,
            foundation: UVec2::ONE,
            draw_bounds,
        }
    }

    /// Query for a placed building, covering its whole foundation.
    pub fn building(building: &BuildingType, cell: IVec2, draw_bounds: ScreenRect) -> Self {
        let (width, height) = building.foundation;
        Self::new(DepthCategory::Building, cell, draw_bounds)
            .with_foundation(UVec2::new(width, height))
    }

    pub fn smudge(smudge: &SmudgeType, cell: IVec2, draw_bounds: ScreenRect) -> Self {
        let (width, height) = smudge.size;
        Self::new(DepthCategory::Smudge, cell, draw_bounds)
            .with_foundation(UVec2::new(width, height))
    }

    /// High bridges get their own category; other overlays sort as overlays.
    pub fn overlay(overlay: &OverlayType, cell: IVec2, draw_bounds: ScreenRect) -> Self {
        Self::new(DepthCategory::for_overlay(overlay), cell, draw_bounds)
    }

    pub fn with_foundation(mut self, foundation: UVec2) -> Self {
        self.foundation = foundation.max(UVec2::ONE);
        self
    }

    /// Southernmost cell of the foundation.
    pub fn anchor_cell(&self) -> IVec2 {
        let extent = self.foundation.min(UVec2::splat(i32::MAX as u32)).as_ivec2();
        self.cell.saturating_add(extent - IVec2::ONE)
    }
}

/// Pixel row that owns an object whose texture covers `bounds`, measured from
/// the top-left of its anchor cell.
pub fn owning_row(anchor_top_left: IVec2, bounds: &ScreenRect) -> i32 {
    let dy = bounds.bottom().saturating_sub(anchor_top_left.y);
    let whole_cells = dy / CELL_SIZE_Y;
    let fraction = dy % CELL_SIZE_Y;
    let mut row = anchor_top_left
        .y
        .saturating_add((whole_cells + 1).saturating_mul(CELL_SIZE_Y));

    let leaks_sideways = bounds.x < anchor_top_left.x
        || bounds.right() > anchor_top_left.x.saturating_add(CELL_SIZE_X);
    if fraction > LEAK_THRESHOLD_PX && leaks_sideways {
        // Belongs to the next isometric row down.
        row = row.saturating_add(CELL_SIZE_Y / 2);
    }

    row
}

/// Positional and elevation part of the key for an object owned by `row`.
pub fn position_depth(row: i32, level: i32, map_height_px: i32) -> f32 {
    let map_height = map_height_px.max(1) as f32;
    let pixel_depth = row as i64 + level as i64 * CELL_HEIGHT as i64;
    (pixel_depth as f32 / map_height) * DOWNWARDS_DEPTH_RENDER_SPACE
        + level as f32 * DEPTH_RENDER_STEP
}

/// Extra depth that lifts a high bridge deck above everything on its cell.
pub fn bridge_offset(level: i32, map_height_px: i32) -> f32 {
    let lift = (level as i64 + BRIDGE_HEIGHT as i64) * CELL_HEIGHT as i64;
    lift as f32 / map_height_px.max(1) as f32
}

/// Additive bias for `category`; `level` only matters for high bridges.
pub fn depth_bias(category: DepthCategory, level: i32, map_height_px: i32) -> f32 {
    let bias = DEPTH_EPSILON * category.order() as f32;
    match category {
        DepthCategory::HighBridge => bias + bridge_offset(level, map_height_px),
        _ => bias,
    }
}

/// Draw-order key of one placed object. Cells outside the map count as
/// level 0.
pub fn compute_depth(query: &DepthQuery, map: &impl MapGeometry) -> f32 {
    let map_height = map.height_in_pixels_with_cell_height();
    let anchor = query.anchor_cell();
    let anchor_top_left = map.cell_top_left(anchor);

    let (row, level_cell) = match query.category {
        // Terrain never leaks into the row below its own cell.
        DepthCategory::Terrain => (anchor_top_left.y.saturating_add(CELL_SIZE_Y), anchor),
        _ => (owning_row(anchor_top_left, &query.draw_bounds), query.cell),
    };
    let level = map.cell_level(level_cell).unwrap_or(0);

    position_depth(row, level, map_height) + depth_bias(query.category, level, map_height)
}
