//! Input model: pointer samples, keys, and the prop-movement gesture state.
//!
//! `PointerSample` is what the host hands the engine for every pointer event:
//! the screen position (for drag thresholds) plus the room-local floor point
//! its raycast hit, if any. `Gesture` tracks the press between pointer-down
//! and pointer-up; `MoveSession` is the single in-flight movement of a
//! selected prop and exists only between selection and confirm/cancel/delete.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::blueprint::{PlacementKey, PropPlacement, Span};
use crate::grid::{GridPos, WorldPos};

/// A point in screen space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`, in pixels.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One pointer event as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Pointer position on screen.
    pub screen: ScreenPoint,
    /// Room-local point where the pointer ray meets the floor, if it does.
    pub floor: Option<WorldPos>,
    /// Event timestamp in milliseconds (any monotonic origin).
    pub at_ms: f64,
}

impl PointerSample {
    #[must_use]
    pub fn new(screen: ScreenPoint, floor: Option<WorldPos>, at_ms: f64) -> Self {
        Self { screen, floor, at_ms }
    }
}

/// A keyboard key as reported by the browser (e.g. `"Escape"`, `"r"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_cancel(&self) -> bool {
        self.0 == "Escape"
    }

    #[must_use]
    pub fn is_confirm(&self) -> bool {
        self.0 == "Enter"
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_rotate(&self) -> bool {
        matches!(self.0.as_str(), "r" | "R")
    }
}

/// Coarse movement state, as shown to UI chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovePhase {
    #[default]
    Idle,
    Selected,
    Dragging,
}

/// Anchor, rotation and span of a placement, taken together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pose {
    pub anchor: GridPos,
    pub rotation: i32,
    pub span: Span,
}

impl Pose {
    #[must_use]
    pub fn of(placement: &PropPlacement) -> Self {
        Self { anchor: placement.anchor(), rotation: placement.rotation, span: placement.footprint() }
    }
}

/// A prop selected for movement: the ephemeral in-flight copy of its placement.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveSession {
    /// Identity of the placement as it was when selected.
    pub key: PlacementKey,
    pub prop_id: String,
    /// Current (candidate) anchor cell.
    pub position: GridPos,
    pub rotation: i32,
    pub span: Span,
    /// Whether `position` is a legal drop target.
    pub valid: bool,
    /// Most recent legal pose. Restored whole when a drop is rejected, since
    /// an anchor is only legal for the span it was checked with.
    pub last_valid: Pose,
    /// The placement as it was when selected.
    pub original: PropPlacement,
}

impl MoveSession {
    #[must_use]
    pub fn begin(placement: &PropPlacement) -> Self {
        Self {
            key: placement.key(),
            prop_id: placement.prop_id.clone(),
            position: placement.anchor(),
            rotation: placement.rotation,
            span: placement.footprint(),
            valid: true,
            last_valid: Pose::of(placement),
            original: placement.clone(),
        }
    }

    /// The candidate anchor, rotation and span.
    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose { anchor: self.position, rotation: self.rotation, span: self.span }
    }

    /// Put the candidate back to `pose`.
    pub fn restore(&mut self, pose: Pose) {
        self.position = pose.anchor;
        self.rotation = pose.rotation;
        self.span = pose.span;
    }

    /// Whether anything differs from the placement as selected.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.position != self.original.anchor()
            || self.rotation != self.original.rotation
            || self.span != self.original.footprint()
    }

    /// The placement this session would commit: the last legal pose, never
    /// a mix of a legal anchor with a later rotation.
    #[must_use]
    pub fn to_placement(&self) -> PropPlacement {
        let pose = self.last_valid;
        let span = if self.original.span.is_none() && pose.span == Span::default() {
            None
        } else {
            Some(pose.span)
        };
        PropPlacement {
            x: pose.anchor.x,
            z: pose.anchor.z,
            rotation: pose.rotation,
            span,
            ..self.original.clone()
        }
    }
}

/// Internal state for the press/drag gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    /// No pointer held.
    #[default]
    Idle,
    /// Pointer held on a prop, waiting for the long-press to select it.
    Pressing {
        /// The prop under the pointer at pointer-down.
        target: PlacementKey,
        /// Screen position at pointer-down.
        start: ScreenPoint,
        /// Timestamp of pointer-down.
        since_ms: f64,
    },
    /// Pointer held on the selected prop, not yet past the drag threshold.
    Holding {
        /// Screen position at pointer-down.
        start: ScreenPoint,
    },
    /// The selected prop follows the pointer.
    Dragging {
        /// Screen position of the previous pointer event.
        last_screen: ScreenPoint,
    },
}
