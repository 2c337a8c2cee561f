//! Placement ghost: where a prop picked from a catalogue would land.

#[cfg(test)]
#[path = "preview_test.rs"]
mod preview_test;

use crate::blueprint::{PlacementKey, RoomBlueprint, Span};
use crate::grid::WorldPos;
use crate::placement::resolve_at;
use crate::registry::{PropRegistry, normalize_id};
use crate::render::{NodeState, SceneNode};
use crate::validate::{DropError, check_drop};

/// A translucent preview node and whether dropping it there is legal.
#[derive(Debug, Clone, PartialEq)]
pub struct Ghost {
    pub node: SceneNode,
    pub verdict: Result<(), DropError>,
}

impl Ghost {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.verdict.is_ok()
    }
}

/// Ghost for `prop_id` centred under the room-local floor point `floor`.
///
/// Returns `None` for ids the registry cannot resolve.
#[must_use]
pub fn ghost_at(
    blueprint: &RoomBlueprint,
    origin: WorldPos,
    registry: &PropRegistry,
    prop_id: &str,
    floor: WorldPos,
    span: Span,
) -> Option<Ghost> {
    let entry = registry.get(prop_id)?;
    let spec = blueprint.grid();
    let anchor = spec.anchor_for_center(floor.x, floor.z, span);
    let t = resolve_at(anchor, span, 0, entry.mount_type, &spec);
    let verdict = check_drop(&spec, &blueprint.effective_placements(), anchor, span, None);

    let prop_id = normalize_id(prop_id);
    let node = SceneNode {
        key: PlacementKey::new(prop_id.clone(), anchor.x, anchor.z),
        prop_id,
        component: entry.component.clone(),
        mount_type: entry.mount_type,
        position: origin + t.position + WorldPos::new(0.0, entry.y_offset, 0.0),
        rotation: t.rotation,
        span,
        state: NodeState::Ghost,
    };
    Some(Ghost { node, verdict })
}
