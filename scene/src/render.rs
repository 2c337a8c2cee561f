//! Room renderer: blueprint + registry → positioned scene nodes.
//!
//! The output is plain data for whatever 3D surface the host drives. Nodes
//! come out in placement order. The blueprint is never mutated; an in-flight
//! movement session only overrides the transform of its own node.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::blueprint::{PlacementKey, RoomBlueprint, Span};
use crate::grid::WorldPos;
use crate::input::MoveSession;
use crate::placement::resolve_at;
use crate::registry::{MountType, PropComponent, PropRegistry, normalize_id};

/// Visual state of a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    #[default]
    Placed,
    /// Selected for movement; the candidate position is legal.
    Selected,
    /// Being dragged over an illegal cell.
    InvalidDrop,
    /// Translucent preview of a prop not yet placed.
    Ghost,
}

/// One positioned prop, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    /// Identity of the placement this node draws.
    pub key: PlacementKey,
    /// Namespaced registry id.
    pub prop_id: String,
    pub component: PropComponent,
    pub mount_type: MountType,
    /// World position including room origin and vertical offset.
    pub position: WorldPos,
    /// Yaw in degrees.
    pub rotation: i32,
    pub span: Span,
    pub state: NodeState,
}

/// Build the scene nodes for one room placed at `origin`.
///
/// Placements whose id has no registry entry are skipped (interaction
/// markers usually have none). When `session` is given, its placement is
/// drawn at the session's candidate anchor, rotation and span instead.
#[must_use]
pub fn build_room(
    blueprint: &RoomBlueprint,
    origin: WorldPos,
    registry: &PropRegistry,
    session: Option<&MoveSession>,
) -> Vec<SceneNode> {
    let spec = blueprint.grid();
    let placements = blueprint.effective_placements();
    let mut nodes = Vec::with_capacity(placements.len());

    for p in placements.iter() {
        let Some(entry) = registry.get(&p.prop_id) else {
            tracing::debug!(prop_id = %p.prop_id, x = p.x, z = p.z, interaction = p.is_interaction(), "no registry entry; skipped");
            continue;
        };

        let key = p.key();
        let (anchor, span, rotation, state) = match session.filter(|s| s.key == key) {
            Some(s) => {
                let state = if s.valid { NodeState::Selected } else { NodeState::InvalidDrop };
                (s.position, s.span, s.rotation, state)
            }
            None => (p.anchor(), p.footprint(), p.rotation, NodeState::Placed),
        };

        let t = resolve_at(anchor, span, rotation, entry.mount_type, &spec);
        let lift = WorldPos::new(0.0, entry.y_offset, 0.0);
        nodes.push(SceneNode {
            key,
            prop_id: normalize_id(&p.prop_id),
            component: entry.component.clone(),
            mount_type: entry.mount_type,
            position: origin + t.position + lift,
            rotation: t.rotation,
            span,
            state,
        });
    }

    nodes
}
