// Map geometry and depth constants

// Isometric cell footprint in pixels
pub const CELL_SIZE_X: i32 = 48;
pub const CELL_SIZE_Y: i32 = 24;

// Screen-space rise of one elevation level
pub const CELL_HEIGHT: i32 = 15;
pub const MAX_HEIGHT_LEVEL: i32 = 14;

// Share of the [0, 1] depth range used by position; the rest separates levels
pub const DOWNWARDS_DEPTH_RENDER_SPACE: f32 = 0.75;
pub const DEPTH_RENDER_STEP: f32 =
    (1.0 - DOWNWARDS_DEPTH_RENDER_SPACE) / (MAX_HEIGHT_LEVEL + 1) as f32;

// Smallest step between object categories at the same position
pub const DEPTH_EPSILON: f32 = 1.0e-5;

// High bridge decks sit this many levels above their cell
pub const BRIDGE_HEIGHT: i32 = 4;

// Empirical: 1.5 cell heights. A row remainder is always below CELL_SIZE_Y,
// so this never exceeds it and the leak shift does not fire.
pub const LEAK_THRESHOLD_PX: i32 = CELL_SIZE_Y * 3 / 2;
