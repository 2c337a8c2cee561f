//! Debug overlay: per-cell classification markers.
//!
//! Cells come from the blueprint's legacy `cells` grid when it has one.
//! Otherwise every cell starts walkable, prop footprints become blocked (or
//! interaction), and doors are marked last. Grids larger than
//! [`MAX_GRID_SIZE`] are cropped to it.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use serde::Serialize;

use crate::blueprint::{CellKind, RoomBlueprint};
use crate::consts::MAX_GRID_SIZE;
use crate::grid::{GridPos, WorldPos};

// ── Colours ─────────────────────────────────────────────────────

const WALKABLE_COLOR: &str = "#22c55e";
const BLOCKED_COLOR: &str = "#ef4444";
const INTERACTION_COLOR: &str = "#3b82f6";
const DOOR_COLOR: &str = "#eab308";

/// Height of the marker plane above the floor, to avoid z-fighting.
const MARKER_LIFT: f64 = 0.01;

/// What the overlay labels each cell with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayOptions {
    pub show_coordinates: bool,
    pub show_prop_ids: bool,
}

/// One flat coloured marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayMarker {
    pub cell: GridPos,
    /// Room-local centre of the marker.
    pub position: WorldPos,
    pub kind: CellKind,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[must_use]
pub fn kind_color(kind: CellKind) -> &'static str {
    match kind {
        CellKind::Walkable => WALKABLE_COLOR,
        CellKind::Blocked => BLOCKED_COLOR,
        CellKind::Interaction => INTERACTION_COLOR,
        CellKind::Door => DOOR_COLOR,
    }
}

fn kind_glyph(kind: CellKind) -> char {
    match kind {
        CellKind::Walkable => '.',
        CellKind::Blocked => '#',
        CellKind::Interaction => 'i',
        CellKind::Door => 'D',
    }
}

struct Classified {
    kind: CellKind,
    prop_id: Option<String>,
}

/// Overlay dimensions in cells, cropped to `MAX_GRID_SIZE`. Blueprints
/// fetched from the backend never pass through `from_json`.
fn overlay_dims(bp: &RoomBlueprint) -> (usize, usize) {
    (bp.grid_width.min(MAX_GRID_SIZE) as usize, bp.grid_depth.min(MAX_GRID_SIZE) as usize)
}

/// Row-major classification grid, `out[z][x]`.
fn classify(bp: &RoomBlueprint) -> Vec<Vec<Classified>> {
    let (w, d) = overlay_dims(bp);
    let mut out: Vec<Vec<Classified>> = (0..d)
        .map(|_| (0..w).map(|_| Classified { kind: CellKind::Walkable, prop_id: None }).collect())
        .collect();

    if bp.cells.is_empty() {
        for p in &bp.placements {
            let span = p.footprint();
            let kind = if p.is_interaction() { CellKind::Interaction } else { CellKind::Blocked };
            for dz in 0..span.d as i32 {
                for dx in 0..span.w as i32 {
                    if let Some(c) = slot(&mut out, p.x + dx, p.z + dz) {
                        c.kind = kind;
                        if dx == 0 && dz == 0 {
                            c.prop_id = Some(p.prop_id.clone());
                        }
                    }
                }
            }
        }
        for door in bp.all_doors() {
            if let Some(c) = slot(&mut out, door.x, door.z) {
                c.kind = CellKind::Door;
            }
        }
    } else {
        for (z, row) in bp.cells.iter().enumerate().take(d) {
            for (x, cell) in row.iter().enumerate().take(w) {
                out[z][x] = Classified { kind: cell.kind, prop_id: cell.prop_id.clone() };
            }
        }
    }
    out
}

fn slot(grid: &mut [Vec<Classified>], x: i32, z: i32) -> Option<&mut Classified> {
    let (Ok(x), Ok(z)) = (usize::try_from(x), usize::try_from(z)) else {
        return None;
    };
    grid.get_mut(z)?.get_mut(x)
}

/// One marker per cell, row by row from the north wall.
#[must_use]
pub fn build_overlay(bp: &RoomBlueprint, options: OverlayOptions) -> Vec<OverlayMarker> {
    let spec = bp.grid();
    let (w, d) = overlay_dims(bp);
    let mut markers = Vec::with_capacity(w * d);
    for (z, row) in classify(bp).into_iter().enumerate() {
        for (x, c) in row.into_iter().enumerate() {
            let cell = GridPos::new(x as i32, z as i32);
            let mut label = Vec::new();
            if options.show_coordinates {
                label.push(format!("{x},{z}"));
            }
            if options.show_prop_ids
                && let Some(id) = c.prop_id
            {
                label.push(id);
            }
            let mut position = spec.cell_center(cell);
            position.y = MARKER_LIFT;
            markers.push(OverlayMarker {
                cell,
                position,
                kind: c.kind,
                color: kind_color(c.kind),
                label: if label.is_empty() { None } else { Some(label.join(" ")) },
            });
        }
    }
    markers
}

/// Text rendering of the classification grid, one line per row.
///
/// `.` walkable, `#` blocked, `i` interaction, `D` door.
#[must_use]
pub fn render_ascii(bp: &RoomBlueprint) -> String {
    let mut out = String::new();
    for row in classify(bp) {
        out.extend(row.iter().map(|c| kind_glyph(c.kind)));
        out.push('\n');
    }
    out
}
