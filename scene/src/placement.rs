//! Wall snapping and floor bounds clamping.
//!
//! Walls occupy the outermost ring of cells: row `z = 0` is north, row
//! `z = depth - 1` south, column `x = 0` west and column `x = width - 1` east.
//! A wall's interior face is the inner edge of its wall cells. Distances are
//! measured in whole cells from the wall-cell index.
//!
//! Both algorithms are pure geometry. Malformed input (a span wider than the
//! room, say) produces a clamped but possibly overlapping position rather than
//! an error; nothing here panics.

#[cfg(test)]
#[path = "placement_test.rs"]
mod placement_test;

use crate::blueprint::{PropPlacement, Span, normalize_rotation};
use crate::consts::{CLAMP_GAP, WALL_CLAMP_THRESHOLD_CELLS, WALL_GAP, WALL_SNAP_THRESHOLD_CELLS};
use crate::grid::{GridPos, GridSpec, WorldPos};
use crate::registry::MountType;

/// One of the four room walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    North,
    South,
    West,
    East,
}

impl WallSide {
    /// Tie-break order when several walls are equally close.
    pub const PRIORITY: [WallSide; 4] = [WallSide::North, WallSide::South, WallSide::West, WallSide::East];

    /// Yaw (degrees) that makes a wall prop face into the room.
    #[must_use]
    pub fn facing_rotation(self) -> i32 {
        match self {
            Self::North => 0,
            Self::East => 90,
            Self::South => 180,
            Self::West => 270,
        }
    }
}

/// Final room-local position and yaw of a prop, before vertical offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: WorldPos,
    pub rotation: i32,
    /// The wall a wall prop was snapped to, if any.
    pub wall: Option<WallSide>,
}

/// Result of snapping a wall prop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSnap {
    pub side: WallSide,
    pub position: WorldPos,
    pub rotation: i32,
}

/// Distance in cells from a footprint to each wall, in [`WallSide::PRIORITY`]
/// order. Footprints poking outside the grid count as distance zero.
#[must_use]
pub fn wall_distances(anchor: GridPos, span: Span, spec: &GridSpec) -> [(WallSide, u32); 4] {
    let far_x = i64::from(anchor.x) + i64::from(span.w.max(1)) - 1;
    let far_z = i64::from(anchor.z) + i64::from(span.d.max(1)) - 1;
    let dist = |d: i64| u32::try_from(d.max(0)).unwrap_or(u32::MAX);
    [
        (WallSide::North, dist(i64::from(anchor.z))),
        (WallSide::South, dist(i64::from(spec.depth) - 1 - far_z)),
        (WallSide::West, dist(i64::from(anchor.x))),
        (WallSide::East, dist(i64::from(spec.width) - 1 - far_x)),
    ]
}

/// Closest wall and its distance; ties go to the earliest side in
/// [`WallSide::PRIORITY`].
#[must_use]
pub fn nearest_wall(anchor: GridPos, span: Span, spec: &GridSpec) -> (WallSide, u32) {
    let mut best = (WallSide::North, u32::MAX);
    for (side, d) in wall_distances(anchor, span, spec) {
        if d < best.1 {
            best = (side, d);
        }
    }
    best
}

/// Snap a wall prop anchored at `anchor` onto its nearest wall.
///
/// Returns `None` when every wall is more than one cell away; the prop then
/// keeps its raw position. A non-zero `rotation` is preserved, otherwise the
/// prop is turned to face into the room. The along-wall coordinate stays at
/// the footprint centre.
#[must_use]
pub fn snap_to_wall(anchor: GridPos, span: Span, rotation: i32, spec: &GridSpec) -> Option<WallSnap> {
    let (side, distance) = nearest_wall(anchor, span, spec);
    if distance > WALL_SNAP_THRESHOLD_CELLS {
        return None;
    }

    let cs = spec.cell_size;
    let (hx, hz) = (spec.half_width(), spec.half_depth());
    let mut position = spec.footprint_center(anchor, span);
    match side {
        WallSide::North => position.z = -hz + cs + WALL_GAP,
        WallSide::South => position.z = hz - cs - WALL_GAP,
        WallSide::West => position.x = -hx + cs + WALL_GAP,
        WallSide::East => position.x = hx - cs - WALL_GAP,
    }

    let rotation = normalize_rotation(rotation);
    let rotation = if rotation == 0 { side.facing_rotation() } else { rotation };
    Some(WallSnap { side, position, rotation })
}

/// Keep a floor prop's footprint from clipping through nearby walls.
///
/// On each axis where the footprint is within one cell of a wall, the centre
/// is clamped so the near edge stops `CLAMP_GAP` inside the wall's interior
/// face. The clamp only ever moves the centre away from the wall.
#[must_use]
pub fn clamp_to_bounds(center: WorldPos, anchor: GridPos, span: Span, spec: &GridSpec) -> WorldPos {
    let cs = spec.cell_size;
    let half_w = f64::from(span.w.max(1)) * cs / 2.0;
    let half_d = f64::from(span.d.max(1)) * cs / 2.0;
    let (hx, hz) = (spec.half_width(), spec.half_depth());
    let threshold = WALL_CLAMP_THRESHOLD_CELLS;

    let mut out = center;
    for (side, d) in wall_distances(anchor, span, spec) {
        if d > threshold {
            continue;
        }
        // Sequential max/min: f64::clamp would panic when the bounds cross.
        match side {
            WallSide::West => out.x = out.x.max(-hx + cs + half_w + CLAMP_GAP),
            WallSide::East => out.x = out.x.min(hx - cs - half_w - CLAMP_GAP),
            WallSide::North => out.z = out.z.max(-hz + cs + half_d + CLAMP_GAP),
            WallSide::South => out.z = out.z.min(hz - cs - half_d - CLAMP_GAP),
        }
    }
    out
}

/// Final room-local transform for a placement, dispatched on mount type.
#[must_use]
pub fn resolve(placement: &PropPlacement, mount: MountType, spec: &GridSpec) -> Transform {
    resolve_at(placement.anchor(), placement.footprint(), placement.rotation, mount, spec)
}

/// [`resolve`] for an anchor/span/rotation that is not (yet) a placement,
/// such as an in-flight drag or a placement ghost.
#[must_use]
pub fn resolve_at(anchor: GridPos, span: Span, rotation: i32, mount: MountType, spec: &GridSpec) -> Transform {
    let center = spec.footprint_center(anchor, span);
    let rotation = normalize_rotation(rotation);
    match mount {
        MountType::Wall => match snap_to_wall(anchor, span, rotation, spec) {
            Some(snap) => Transform { position: snap.position, rotation: snap.rotation, wall: Some(snap.side) },
            None => Transform { position: center, rotation, wall: None },
        },
        MountType::Floor => Transform {
            position: clamp_to_bounds(center, anchor, span, spec),
            rotation,
            wall: None,
        },
    }
}
