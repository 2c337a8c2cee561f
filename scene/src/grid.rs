//! Grid ↔ world coordinate mapping.
//!
//! Rooms are centred on their local origin: cell `(0, 0)` is the north-west
//! corner and the room spans `±grid_width * cell_size / 2` on X and
//! `±grid_depth * cell_size / 2` on Z. Y is up and is left to the renderer and
//! the registry's vertical offsets.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::blueprint::Span;

/// A position in room-local (or world) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPos {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Add for WorldPos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

/// Integer cell coordinates. Signed so that off-grid drag candidates can be
/// represented and rejected rather than wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub z: i32,
}

impl GridPos {
    #[must_use]
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Cell size and grid extents of one room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// World units per cell.
    pub cell_size: f64,
    /// Number of cells along X.
    pub width: u32,
    /// Number of cells along Z.
    pub depth: u32,
}

impl GridSpec {
    #[must_use]
    pub fn new(cell_size: f64, width: u32, depth: u32) -> Self {
        Self { cell_size, width, depth }
    }

    /// Half the room's extent along X, in world units.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        f64::from(self.width) * self.cell_size / 2.0
    }

    /// Half the room's extent along Z, in world units.
    #[must_use]
    pub fn half_depth(&self) -> f64 {
        f64::from(self.depth) * self.cell_size / 2.0
    }

    /// World-space centre of a cell.
    #[must_use]
    pub fn cell_center(&self, pos: GridPos) -> WorldPos {
        grid_to_world(pos.x, pos.z, self.cell_size, self.width, self.depth)
    }

    /// Nearest cell to a world-space point (inverse of [`Self::cell_center`]).
    #[must_use]
    pub fn world_to_grid(&self, x: f64, z: f64) -> GridPos {
        GridPos {
            x: (x / self.cell_size + f64::from(self.width) / 2.0 - 0.5).round() as i32,
            z: (z / self.cell_size + f64::from(self.depth) / 2.0 - 0.5).round() as i32,
        }
    }

    /// Centre of a (possibly multi-cell) footprint anchored at `anchor`.
    #[must_use]
    pub fn footprint_center(&self, anchor: GridPos, span: Span) -> WorldPos {
        let c = self.cell_center(anchor);
        WorldPos {
            x: c.x + f64::from(span.w.saturating_sub(1)) * self.cell_size / 2.0,
            y: c.y,
            z: c.z + f64::from(span.d.saturating_sub(1)) * self.cell_size / 2.0,
        }
    }

    /// Anchor cell whose footprint is centred nearest to `(x, z)`.
    #[must_use]
    pub fn anchor_for_center(&self, x: f64, z: f64, span: Span) -> GridPos {
        self.world_to_grid(
            x - f64::from(span.w.saturating_sub(1)) * self.cell_size / 2.0,
            z - f64::from(span.d.saturating_sub(1)) * self.cell_size / 2.0,
        )
    }

    /// Whether a footprint anchored at `anchor` lies entirely inside the grid.
    #[must_use]
    pub fn contains_footprint(&self, anchor: GridPos, span: Span) -> bool {
        anchor.x >= 0
            && anchor.z >= 0
            && i64::from(anchor.x) + i64::from(span.w) <= i64::from(self.width)
            && i64::from(anchor.z) + i64::from(span.d) <= i64::from(self.depth)
    }
}

/// Map a cell index to the world-space centre of that cell, with the room
/// centred on the origin. Out-of-range indices map outside the floor.
#[must_use]
pub fn grid_to_world(x: i32, z: i32, cell_size: f64, grid_width: u32, grid_depth: u32) -> WorldPos {
    WorldPos {
        x: (f64::from(x) - f64::from(grid_width) / 2.0 + 0.5) * cell_size,
        y: 0.0,
        z: (f64::from(z) - f64::from(grid_depth) / 2.0 + 0.5) * cell_size,
    }
}

/// Round a world coordinate to the nearest multiple of `cell_size`.
#[must_use]
pub fn snap_to_grid(coord: f64, cell_size: f64) -> f64 {
    (coord / cell_size).round() * cell_size
}
