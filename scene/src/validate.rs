//! Blueprint validation and drop checks.
//!
//! [`validate_blueprint`] reports every problem with a stored blueprint at
//! once, split into hard errors and informational warnings. [`check_drop`]
//! is the single-placement check used while moving or placing a prop: the
//! footprint must lie inside the grid and must not overlap any other
//! non-interaction placement.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use std::collections::HashMap;

use serde::Serialize;

use crate::blueprint::{PlacementKey, PropPlacement, RoomBlueprint, Span};
use crate::consts::{MAX_GRID_SIZE, MIN_GRID_SIZE};
use crate::grid::{GridPos, GridSpec};
use crate::registry::PropRegistry;

/// Interaction types a placement may declare.
pub const INTERACTION_TYPES: [&str; 3] = ["work", "coffee", "sleep"];

/// A hard validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("grid {axis} must be between {MIN_GRID_SIZE} and {MAX_GRID_SIZE}, got {value}")]
    GridSize { axis: &'static str, value: u32 },

    #[error("blueprint must have at least one door")]
    NoDoors,

    #[error("door at ({x},{z}) must be on a wall edge")]
    DoorNotOnWall { x: i32, z: i32 },

    #[error("walkable center ({x},{z}) is out of grid bounds")]
    WalkableCenterOutOfBounds { x: i32, z: i32 },

    #[error("placement {key} is out of grid bounds")]
    OutOfBounds { key: PlacementKey },

    #[error("placement {key} span {w}x{d} exceeds the grid")]
    SpanOutOfBounds { key: PlacementKey, w: u32, d: u32 },

    #[error("placement {key} overlaps {other}")]
    Overlap { key: PlacementKey, other: PlacementKey },

    #[error("placement {key} has unknown interaction type '{kind}'")]
    InteractionType { key: PlacementKey, kind: String },
}

/// Non-fatal findings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutWarning {
    /// The id has no registry entry; mods may supply it later.
    #[error("unknown prop id '{prop_id}' at ({x},{z})")]
    UnknownProp { prop_id: String, x: i32, z: i32 },

    #[error("doors ({doors}) and doorPositions ({door_positions}) have different counts")]
    DoorCountMismatch { doors: usize, door_positions: usize },
}

/// Outcome of [`validate_blueprint`]. Valid when `errors` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<LayoutError>,
    pub warnings: Vec<LayoutWarning>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Why a drop candidate was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropError {
    #[error("footprint at ({x},{z}) leaves the grid")]
    OutOfBounds { x: i32, z: i32 },

    #[error("footprint overlaps {other}")]
    Overlap { other: PlacementKey },
}

/// Whether two axis-aligned footprints share at least one cell.
#[must_use]
pub fn footprints_overlap(a: GridPos, a_span: Span, b: GridPos, b_span: Span) -> bool {
    let (ax, az) = (i64::from(a.x), i64::from(a.z));
    let (bx, bz) = (i64::from(b.x), i64::from(b.z));
    ax < bx + i64::from(b_span.w)
        && ax + i64::from(a_span.w) > bx
        && az < bz + i64::from(b_span.d)
        && az + i64::from(a_span.d) > bz
}

/// Check a footprint against the grid and the other placements.
///
/// `exclude` names the placement being moved; it never collides with itself.
/// Interaction placements are walk-through markers and never block.
///
/// # Errors
///
/// Returns the first reason the drop is illegal.
pub fn check_drop(
    spec: &GridSpec,
    placements: &[PropPlacement],
    anchor: GridPos,
    span: Span,
    exclude: Option<&PlacementKey>,
) -> Result<(), DropError> {
    if !spec.contains_footprint(anchor, span) {
        return Err(DropError::OutOfBounds { x: anchor.x, z: anchor.z });
    }
    let blocker = placements
        .iter()
        .filter(|p| !p.is_interaction())
        .filter(|p| exclude.is_none_or(|key| !key.matches(p)))
        .find(|p| footprints_overlap(anchor, span, p.anchor(), p.footprint()));
    match blocker {
        Some(other) => Err(DropError::Overlap { other: other.key() }),
        None => Ok(()),
    }
}

/// Validate a whole blueprint.
///
/// Checks grid size, doors, the walkable centre, and every placement's
/// bounds, overlap and interaction type. Prop ids missing from `registry`
/// are only warnings.
#[must_use]
pub fn validate_blueprint(bp: &RoomBlueprint, registry: &PropRegistry) -> ValidationReport {
    let mut report = ValidationReport::default();
    let size_range = MIN_GRID_SIZE..=MAX_GRID_SIZE;

    if !size_range.contains(&bp.grid_width) {
        report.errors.push(LayoutError::GridSize { axis: "width", value: bp.grid_width });
    }
    if !size_range.contains(&bp.grid_depth) {
        report.errors.push(LayoutError::GridSize { axis: "depth", value: bp.grid_depth });
    }

    check_doors(bp, &mut report);

    if let Some(center) = bp.walkable_center
        && !bp.grid().contains_footprint(center, Span::default())
    {
        report.errors.push(LayoutError::WalkableCenterOutOfBounds { x: center.x, z: center.z });
    }

    check_placements(bp, registry, &mut report);

    report
}

fn check_doors(bp: &RoomBlueprint, report: &mut ValidationReport) {
    if bp.doors.is_empty() && bp.door_positions.is_empty() {
        report.errors.push(LayoutError::NoDoors);
    }
    let max_x = i64::from(bp.grid_width) - 1;
    let max_z = i64::from(bp.grid_depth) - 1;
    for door in bp.all_doors() {
        let (x, z) = (i64::from(door.x), i64::from(door.z));
        let on_edge = x == 0 || x == max_x || z == 0 || z == max_z;
        if !on_edge {
            report.errors.push(LayoutError::DoorNotOnWall { x: door.x, z: door.z });
        }
    }
    if !bp.doors.is_empty() && !bp.door_positions.is_empty() && bp.doors.len() != bp.door_positions.len() {
        report.warnings.push(LayoutWarning::DoorCountMismatch {
            doors: bp.doors.len(),
            door_positions: bp.door_positions.len(),
        });
    }
}

fn check_placements(bp: &RoomBlueprint, registry: &PropRegistry, report: &mut ValidationReport) {
    let spec = bp.grid();
    let mut occupied: HashMap<GridPos, PlacementKey> = HashMap::new();

    for p in bp.effective_placements().iter() {
        let key = p.key();
        if !spec.contains_footprint(p.anchor(), Span::default()) {
            report.errors.push(LayoutError::OutOfBounds { key });
            continue;
        }

        let span = p.footprint();
        if !spec.contains_footprint(p.anchor(), span) {
            report.errors.push(LayoutError::SpanOutOfBounds { key: key.clone(), w: span.w, d: span.d });
        }

        if !p.is_interaction() {
            let mut clashed = false;
            for dz in 0..span.d {
                for dx in 0..span.w {
                    let cell = GridPos::new(p.x.saturating_add_unsigned(dx), p.z.saturating_add_unsigned(dz));
                    match occupied.get(&cell) {
                        Some(other) if !clashed => {
                            report.errors.push(LayoutError::Overlap { key: key.clone(), other: other.clone() });
                            clashed = true;
                        }
                        Some(_) => {}
                        None => {
                            occupied.insert(cell, key.clone());
                        }
                    }
                }
            }
        }

        if !registry.contains(&p.prop_id) {
            report.warnings.push(LayoutWarning::UnknownProp { prop_id: p.prop_id.clone(), x: p.x, z: p.z });
        }

        if let Some(kind) = &p.interaction_type
            && !INTERACTION_TYPES.contains(&kind.as_str())
        {
            report.errors.push(LayoutError::InteractionType { key, kind: kind.clone() });
        }
    }
}
