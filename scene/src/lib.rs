//! Room layout and prop placement engine for the virtual office.
//!
//! This crate owns everything between a room blueprint and the positioned
//! scene nodes handed to the 3D renderer: mapping grid cells to world space,
//! resolving prop ids through the registry, snapping wall props and clamping
//! floor props away from walls, and the long-press / drag / confirm gesture
//! state machine used to rearrange furniture. It performs no I/O. The host is
//! responsible for raycasting pointer events onto the floor, drawing the
//! emitted [`render::SceneNode`]s, and persisting the placement lists carried
//! by [`engine::Action::PlacementsUpdated`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] (movement controller) |
//! | [`blueprint`] | Room blueprint, cells and prop placements |
//! | [`grid`] | Grid ↔ world coordinate mapping |
//! | [`registry`] | Prop id → renderable entry lookup |
//! | [`placement`] | Wall snapping and floor bounds clamping |
//! | [`render`] | Room renderer producing positioned scene nodes |
//! | [`input`] | Pointer/key input types and the gesture state machine |
//! | [`overlay`] | Debug overlay: per-cell classification markers |
//! | [`validate`] | Blueprint validation and drop-target checks |
//! | [`preview`] | Placement ghost for the prop browser |
//! | [`consts`] | Shared numeric constants (thresholds, gaps, defaults) |

pub mod blueprint;
pub mod consts;
pub mod engine;
pub mod grid;
pub mod input;
pub mod overlay;
pub mod placement;
pub mod preview;
pub mod registry;
pub mod render;
pub mod validate;

pub use blueprint::{BlueprintError, PlacementKey, PropPlacement, RoomBlueprint, Span};
pub use engine::{Action, Engine, EngineCore, PlacementSink};
pub use grid::{GridPos, GridSpec, WorldPos};
pub use registry::{MountType, PropEntry, PropRegistry};
pub use render::SceneNode;
pub use validate::{ValidationReport, validate_blueprint};
