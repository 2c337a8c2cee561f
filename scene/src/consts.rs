//! Shared numeric constants for the scene crate.

// ── Grid ────────────────────────────────────────────────────────

/// World units per grid cell when a blueprint does not specify one.
pub const DEFAULT_CELL_SIZE: f64 = 0.6;

/// Smallest accepted grid dimension (cells per side).
pub const MIN_GRID_SIZE: u32 = 4;

/// Largest accepted grid dimension (cells per side).
pub const MAX_GRID_SIZE: u32 = 40;

// ── Placement ───────────────────────────────────────────────────

/// Wall props further than this many cells from every wall are not snapped.
pub const WALL_SNAP_THRESHOLD_CELLS: u32 = 1;

/// Floor props within this many cells of a wall are clamped off it.
pub const WALL_CLAMP_THRESHOLD_CELLS: u32 = 1;

/// Offset between a wall prop's back and the wall face (anti z-fighting).
pub const WALL_GAP: f64 = 0.02;

/// Gap left between a clamped floor prop's edge and the wall face.
pub const CLAMP_GAP: f64 = 0.05;

/// Default height of a floor prop's base above the room floor.
pub const FLOOR_Y_OFFSET: f64 = 0.16;

/// Default mounting height for wall props.
pub const WALL_Y_OFFSET: f64 = 1.2;

// ── Gestures ────────────────────────────────────────────────────

/// Press duration (ms) that selects a prop for movement.
pub const LONG_PRESS_MS: f64 = 600.0;

/// Pointer travel in screen pixels before a press turns into a drag.
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// Rotation step applied by the rotate command, in degrees.
pub const ROTATION_STEP_DEG: i32 = 90;
