//! Blueprint model: rooms, grid cells, and prop placements.
//!
//! A [`RoomBlueprint`] is what the backend stores per room. It carries two
//! views of the same furniture: the flat `placements` list, which is
//! authoritative whenever it is non-empty, and the legacy `cells` grid, where
//! only anchor cells carry prop data and the remaining cells of a multi-cell
//! footprint point back at their anchor through `span_parent`.
//!
//! The JSON shape is camelCase to match the wire format (`gridWidth`,
//! `propId`, `spanParent`, ...).

#[cfg(test)]
#[path = "blueprint_test.rs"]
mod blueprint_test;

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CELL_SIZE, MAX_GRID_SIZE};
use crate::grid::{GridPos, GridSpec};

/// Errors produced while loading a blueprint.
#[derive(Debug, thiserror::Error)]
pub enum BlueprintError {
    /// The blueprint JSON could not be parsed.
    #[error("blueprint parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// One of the grid dimensions is zero or the cell size is not positive.
    #[error("invalid grid: {width}x{depth} cells of size {cell_size}")]
    InvalidGrid { width: u32, depth: u32, cell_size: f64 },
}

/// Multi-cell footprint of a prop, in cells along X (`w`) and Z (`d`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    #[serde(default = "one")]
    pub w: u32,
    #[serde(default = "one")]
    pub d: u32,
}

fn one() -> u32 {
    1
}

impl Default for Span {
    fn default() -> Self {
        Self { w: 1, d: 1 }
    }
}

impl Span {
    #[must_use]
    pub fn new(w: u32, d: u32) -> Self {
        Self { w, d }
    }

    /// Footprint after a quarter turn (width and depth swapped).
    #[must_use]
    pub fn rotated(self) -> Self {
        Self { w: self.d, d: self.w }
    }
}

/// Classification of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    #[default]
    Walkable,
    Blocked,
    Interaction,
    Door,
}

/// One square of the legacy layout grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(default = "yes")]
    pub walkable: bool,
    #[serde(default, rename = "type")]
    pub kind: CellKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Set on non-anchor cells of a multi-cell prop; points at the anchor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_parent: Option<GridPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_type: Option<String>,
}

fn yes() -> bool {
    true
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            walkable: true,
            kind: CellKind::Walkable,
            prop_id: None,
            rotation: None,
            span: None,
            span_parent: None,
            interaction_type: None,
        }
    }
}

impl Cell {
    /// Whether this cell is the anchor of a prop (carries rendering data).
    #[must_use]
    pub fn is_anchor(&self) -> bool {
        self.prop_id.is_some() && self.span_parent.is_none()
    }

    fn clear_prop(&mut self) {
        let had_prop = self.prop_id.is_some() || self.span_parent.is_some();
        self.prop_id = None;
        self.rotation = None;
        self.span = None;
        self.span_parent = None;
        self.interaction_type = None;
        if had_prop && self.kind != CellKind::Door {
            self.kind = CellKind::Walkable;
            self.walkable = true;
        }
    }
}

/// Whether a placement is a visible prop or only an interaction marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementType {
    #[default]
    Visual,
    Interaction,
}

/// One concrete prop instance in a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropPlacement {
    /// Registry id, with or without the `builtin:` namespace.
    pub prop_id: String,
    /// Anchor cell X.
    pub x: i32,
    /// Anchor cell Z.
    pub z: i32,
    /// Yaw in degrees (0, 90, 180 or 270 once normalised).
    #[serde(default)]
    pub rotation: i32,
    /// Footprint in world-axis cells; already reflects the rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    #[serde(default, rename = "type")]
    pub kind: PlacementType,
    /// `work`, `coffee` or `sleep` for interaction placements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_type: Option<String>,
}

impl PropPlacement {
    /// A 1×1 visual placement with no rotation.
    #[must_use]
    pub fn new(prop_id: impl Into<String>, x: i32, z: i32) -> Self {
        Self {
            prop_id: prop_id.into(),
            x,
            z,
            rotation: 0,
            span: None,
            kind: PlacementType::Visual,
            interaction_type: None,
        }
    }

    #[must_use]
    pub fn with_span(mut self, w: u32, d: u32) -> Self {
        self.span = Some(Span::new(w, d));
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: i32) -> Self {
        self.rotation = normalize_rotation(rotation);
        self
    }

    #[must_use]
    pub fn key(&self) -> PlacementKey {
        PlacementKey { prop_id: self.prop_id.clone(), x: self.x, z: self.z }
    }

    #[must_use]
    pub fn anchor(&self) -> GridPos {
        GridPos::new(self.x, self.z)
    }

    /// Footprint, defaulting to a single cell.
    #[must_use]
    pub fn footprint(&self) -> Span {
        self.span.unwrap_or_default()
    }

    #[must_use]
    pub fn is_interaction(&self) -> bool {
        self.kind == PlacementType::Interaction
    }
}

/// Identity of a placement on the wire: prop id plus anchor cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementKey {
    pub prop_id: String,
    pub x: i32,
    pub z: i32,
}

impl PlacementKey {
    #[must_use]
    pub fn new(prop_id: impl Into<String>, x: i32, z: i32) -> Self {
        Self { prop_id: prop_id.into(), x, z }
    }

    #[must_use]
    pub fn matches(&self, placement: &PropPlacement) -> bool {
        self.prop_id == placement.prop_id && self.x == placement.x && self.z == placement.z
    }
}

impl fmt::Display for PlacementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{},{}", self.prop_id, self.x, self.z)
    }
}

/// Door on a wall edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub x: i32,
    pub z: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<String>,
}

/// Interaction points grouped by activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionPoints {
    #[serde(default)]
    pub work: Vec<GridPos>,
    #[serde(default)]
    pub coffee: Vec<GridPos>,
    #[serde(default)]
    pub sleep: Vec<GridPos>,
}

/// A room's complete grid and prop-placement data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomBlueprint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub grid_width: u32,
    pub grid_depth: u32,
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    /// Legacy cell grid, indexed `cells[z][x]`. May be empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<Vec<Cell>>,
    #[serde(default)]
    pub placements: Vec<PropPlacement>,
    #[serde(default)]
    pub doors: Vec<Door>,
    /// Older spelling of `doors`; both are honoured.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub door_positions: Vec<Door>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walkable_center: Option<GridPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_points: Option<InteractionPoints>,
}

fn default_cell_size() -> f64 {
    DEFAULT_CELL_SIZE
}

impl RoomBlueprint {
    /// An empty room with no cells, placements or doors.
    #[must_use]
    pub fn new(name: impl Into<String>, grid_width: u32, grid_depth: u32, cell_size: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            grid_width,
            grid_depth,
            cell_size,
            cells: Vec::new(),
            placements: Vec::new(),
            doors: Vec::new(),
            door_positions: Vec::new(),
            walkable_center: None,
            interaction_points: None,
        }
    }

    /// Parse a blueprint from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::Parse`] for malformed JSON and
    /// [`BlueprintError::InvalidGrid`] for empty grids, grids wider or deeper
    /// than [`MAX_GRID_SIZE`], or a non-positive cell size. Small grids still
    /// parse so validation can report them.
    pub fn from_json(json: &str) -> Result<Self, BlueprintError> {
        let bp: Self = serde_json::from_str(json)?;
        let dims = 1..=MAX_GRID_SIZE;
        if !dims.contains(&bp.grid_width) || !dims.contains(&bp.grid_depth) || bp.cell_size <= 0.0 {
            return Err(BlueprintError::InvalidGrid {
                width: bp.grid_width,
                depth: bp.grid_depth,
                cell_size: bp.cell_size,
            });
        }
        Ok(bp)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::Parse`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, BlueprintError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[must_use]
    pub fn grid(&self) -> GridSpec {
        GridSpec::new(self.cell_size, self.grid_width, self.grid_depth)
    }

    /// The placements to render: the flat list when present, otherwise one
    /// placement per anchor cell of the legacy grid.
    #[must_use]
    pub fn effective_placements(&self) -> Cow<'_, [PropPlacement]> {
        if !self.placements.is_empty() {
            return Cow::Borrowed(&self.placements);
        }
        let mut derived = Vec::new();
        for (z, row) in self.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if !cell.is_anchor() {
                    continue;
                }
                let Some(prop_id) = cell.prop_id.clone() else {
                    continue;
                };
                derived.push(PropPlacement {
                    prop_id,
                    x: x as i32,
                    z: z as i32,
                    rotation: normalize_rotation(cell.rotation.unwrap_or(0)),
                    span: cell.span,
                    kind: if cell.kind == CellKind::Interaction {
                        PlacementType::Interaction
                    } else {
                        PlacementType::Visual
                    },
                    interaction_type: cell.interaction_type.clone(),
                });
            }
        }
        Cow::Owned(derived)
    }

    /// Index of the placement identified by `key`.
    #[must_use]
    pub fn position_of(&self, key: &PlacementKey) -> Option<usize> {
        self.placements.iter().position(|p| key.matches(p))
    }

    #[must_use]
    pub fn placement(&self, key: &PlacementKey) -> Option<&PropPlacement> {
        self.placements.iter().find(|p| key.matches(p))
    }

    /// Remove the placement identified by `key`, returning it if present.
    pub fn remove_placement(&mut self, key: &PlacementKey) -> Option<PropPlacement> {
        let idx = self.position_of(key)?;
        Some(self.placements.remove(idx))
    }

    /// All doors from both the current and the legacy field.
    pub fn all_doors(&self) -> impl Iterator<Item = &Door> {
        self.doors.iter().chain(self.door_positions.iter())
    }

    /// Promote legacy cells into the flat list when the list is empty.
    pub fn adopt_cell_placements(&mut self) {
        if self.placements.is_empty() {
            self.placements = self.effective_placements().into_owned();
        }
    }

    /// Rewrite the prop data carried by `cells` from `placements`, so the
    /// legacy view agrees with the authoritative list. No-op without cells.
    pub fn sync_cells(&mut self) {
        if self.cells.is_empty() {
            return;
        }
        for row in &mut self.cells {
            for cell in row {
                cell.clear_prop();
            }
        }
        for p in &self.placements {
            let span = p.footprint();
            for dz in 0..span.d as i32 {
                for dx in 0..span.w as i32 {
                    let Some(cell) = cell_mut(&mut self.cells, p.x + dx, p.z + dz) else {
                        continue;
                    };
                    if p.is_interaction() {
                        cell.kind = CellKind::Interaction;
                        cell.walkable = true;
                    } else if cell.kind != CellKind::Door {
                        cell.kind = CellKind::Blocked;
                        cell.walkable = false;
                    }
                    if dx == 0 && dz == 0 {
                        cell.prop_id = Some(p.prop_id.clone());
                        cell.rotation = Some(p.rotation);
                        cell.span = p.span;
                        cell.interaction_type.clone_from(&p.interaction_type);
                    } else {
                        cell.span_parent = Some(p.anchor());
                    }
                }
            }
        }
    }
}

fn cell_mut(cells: &mut [Vec<Cell>], x: i32, z: i32) -> Option<&mut Cell> {
    let (Ok(x), Ok(z)) = (usize::try_from(x), usize::try_from(z)) else {
        return None;
    };
    cells.get_mut(z)?.get_mut(x)
}

/// Normalise a yaw in degrees to `0..360`.
#[must_use]
pub fn normalize_rotation(deg: i32) -> i32 {
    deg.rem_euclid(360)
}
