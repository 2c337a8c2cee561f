use serde::Serialize;

use crate::blueprint::{PlacementKey, PropPlacement, RoomBlueprint, Span, normalize_rotation};
use crate::consts::{DRAG_THRESHOLD_PX, LONG_PRESS_MS, ROTATION_STEP_DEG};
use crate::grid::{GridPos, WorldPos};
use crate::input::{Gesture, Key, MovePhase, MoveSession, PointerSample, ScreenPoint};
use crate::preview::{Ghost, ghost_at};
use crate::registry::PropRegistry;
use crate::render::{SceneNode, build_room};
use crate::validate::{DropError, check_drop};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Action {
    /// The selected prop changed; `None` when the selection was cleared.
    SelectionChanged(Option<PlacementKey>),
    /// The in-flight prop moved to a new candidate cell.
    DragUpdated { key: PlacementKey, anchor: GridPos, valid: bool },
    /// A drop or confirm was refused; the prop went back to its last legal cell.
    DropRejected { key: PlacementKey, reason: DropError },
    /// The committed placement list changed. Persist it.
    PlacementsUpdated(Vec<PropPlacement>),
    RenderNeeded,
}

/// Receives the committed placement list after a confirm or delete.
pub trait PlacementSink {
    fn on_update(&mut self, placements: &[PropPlacement]);
}

impl<F: FnMut(&[PropPlacement])> PlacementSink for F {
    fn on_update(&mut self, placements: &[PropPlacement]) {
        self(placements);
    }
}

/// Core controller state: one room's blueprint plus the movement session.
///
/// Separated from `Engine` so it can be tested without a registry or sink.
/// The blueprint's placement list is only mutated on confirm, delete and
/// placement of new props; drags mutate the session alone.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub blueprint: RoomBlueprint,
    /// World position of the room's centre.
    pub origin: WorldPos,
    pub gesture: Gesture,
    session: Option<MoveSession>,
}

impl EngineCore {
    #[must_use]
    pub fn new(mut blueprint: RoomBlueprint) -> Self {
        blueprint.adopt_cell_placements();
        Self { blueprint, origin: WorldPos::default(), gesture: Gesture::Idle, session: None }
    }

    // --- Data inputs ---

    /// Replace the room. Legacy cell layouts are promoted into the
    /// placement list so every later edit works on one list.
    pub fn load_blueprint(&mut self, mut blueprint: RoomBlueprint) {
        blueprint.adopt_cell_placements();
        self.blueprint = blueprint;
        self.gesture = Gesture::Idle;
        self.session = None;
    }

    /// Apply a placement list broadcast by the server. The last broadcast
    /// wins; a session whose placement disappeared is dropped.
    pub fn apply_remote_placements(&mut self, placements: Vec<PropPlacement>) -> Vec<Action> {
        self.blueprint.placements = placements;
        self.blueprint.sync_cells();

        let vanished = self
            .session
            .as_ref()
            .is_some_and(|s| self.blueprint.placement(&s.key).is_none());
        if vanished {
            tracing::debug!("selected placement removed remotely; session dropped");
            self.session = None;
            self.gesture = Gesture::Idle;
            return vec![Action::SelectionChanged(None), Action::RenderNeeded];
        }
        vec![Action::RenderNeeded]
    }

    /// Add a new prop at `anchor` after the usual drop check.
    ///
    /// # Errors
    ///
    /// Returns the [`DropError`] when the footprint leaves the grid or
    /// overlaps another prop; nothing is added.
    pub fn place_new(
        &mut self,
        prop_id: &str,
        anchor: GridPos,
        rotation: i32,
        span: Span,
    ) -> Result<Vec<Action>, DropError> {
        check_drop(&self.blueprint.grid(), &self.blueprint.placements, anchor, span, None)?;
        let mut placement = PropPlacement::new(prop_id, anchor.x, anchor.z).with_rotation(rotation);
        if span != Span::default() {
            placement.span = Some(span);
        }
        tracing::info!(key = %placement.key(), "prop placed");
        self.blueprint.placements.push(placement);
        Ok(self.commit())
    }

    // --- Input events ---

    /// Pointer pressed. `target` is the placement under the pointer, as
    /// found by the host's raycast.
    pub fn on_pointer_down(&mut self, sample: PointerSample, target: Option<PlacementKey>) -> Vec<Action> {
        let on_selected = match (&self.session, &target) {
            (Some(s), Some(t)) => s.key == *t,
            _ => false,
        };
        self.gesture = if on_selected {
            Gesture::Holding { start: sample.screen }
        } else if let Some(target) = target.filter(|t| self.blueprint.placement(t).is_some()) {
            Gesture::Pressing { target, start: sample.screen, since_ms: sample.at_ms }
        } else {
            Gesture::Idle
        };
        Vec::new()
    }

    /// Pointer moved while (possibly) held.
    pub fn on_pointer_move(&mut self, sample: PointerSample) -> Vec<Action> {
        match self.gesture.clone() {
            Gesture::Idle => Vec::new(),
            Gesture::Pressing { start, .. } => {
                if exceeds_threshold(start, sample.screen) {
                    // The press became a camera drag.
                    self.gesture = Gesture::Idle;
                    return Vec::new();
                }
                self.poll_long_press(sample.at_ms)
            }
            Gesture::Holding { start } => {
                if !exceeds_threshold(start, sample.screen) {
                    return Vec::new();
                }
                tracing::debug!("drag started");
                self.gesture = Gesture::Dragging { last_screen: sample.screen };
                self.drag_to(sample.floor)
            }
            Gesture::Dragging { .. } => {
                self.gesture = Gesture::Dragging { last_screen: sample.screen };
                self.drag_to(sample.floor)
            }
        }
    }

    /// Pointer released. Ends the gesture; a drop on an illegal cell snaps
    /// the prop back to its last legal cell. The prop stays selected.
    pub fn on_pointer_up(&mut self, sample: PointerSample) -> Vec<Action> {
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::Pressing { target, since_ms, .. } if sample.at_ms - since_ms >= LONG_PRESS_MS => {
                self.select(target)
            }
            Gesture::Dragging { .. } => self.revert_invalid(),
            _ => Vec::new(),
        }
    }

    /// Advance timers. Fires the long-press selection once the press has
    /// been held long enough.
    pub fn on_tick(&mut self, now_ms: f64) -> Vec<Action> {
        self.poll_long_press(now_ms)
    }

    /// Keyboard shortcuts while a prop is selected.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if self.session.is_none() {
            return Vec::new();
        }
        if key.is_cancel() {
            self.cancel()
        } else if key.is_confirm() {
            self.confirm()
        } else if key.is_delete() {
            self.delete()
        } else if key.is_rotate() {
            self.rotate()
        } else {
            Vec::new()
        }
    }

    // --- Session commands ---

    /// Turn the selected prop a quarter turn clockwise, swapping its span.
    pub fn rotate(&mut self) -> Vec<Action> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        session.rotation = normalize_rotation(session.rotation + ROTATION_STEP_DEG);
        session.span = session.span.rotated();
        let verdict = check_drop(
            &self.blueprint.grid(),
            &self.blueprint.placements,
            session.position,
            session.span,
            Some(&session.key),
        );
        session.valid = verdict.is_ok();
        if session.valid {
            session.last_valid = session.pose();
        }
        tracing::debug!(key = %session.key, rotation = session.rotation, valid = session.valid, "rotated");
        vec![
            Action::DragUpdated { key: session.key.clone(), anchor: session.position, valid: session.valid },
            Action::RenderNeeded,
        ]
    }

    /// Write the in-flight placement back and end the session.
    ///
    /// Refused while the candidate is illegal (e.g. after a rotation into a
    /// neighbour); the session stays open. The candidate is re-checked even
    /// when flagged valid, since remote placements may have landed since.
    pub fn confirm(&mut self) -> Vec<Action> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let verdict = check_drop(
            &self.blueprint.grid(),
            &self.blueprint.placements,
            session.position,
            session.span,
            Some(&session.key),
        );
        if let Err(reason) = verdict {
            session.valid = false;
            tracing::warn!(key = %session.key, %reason, "confirm refused");
            return vec![Action::DropRejected { key: session.key.clone(), reason }];
        }
        session.last_valid = session.pose();

        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        self.gesture = Gesture::Idle;
        let Some(idx) = self.blueprint.position_of(&session.key) else {
            tracing::warn!(key = %session.key, "confirmed placement no longer exists");
            return vec![Action::SelectionChanged(None), Action::RenderNeeded];
        };
        let placement = session.to_placement();
        tracing::info!(from = %session.key, to = %placement.key(), rotation = placement.rotation, "placement confirmed");
        self.blueprint.placements[idx] = placement;

        let mut actions = self.commit();
        actions.insert(0, Action::SelectionChanged(None));
        actions
    }

    /// Discard the in-flight change. The placement list is untouched.
    pub fn cancel(&mut self) -> Vec<Action> {
        self.gesture = Gesture::Idle;
        match self.session.take() {
            Some(session) => {
                tracing::debug!(key = %session.key, "move cancelled");
                vec![Action::SelectionChanged(None), Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    /// Remove the selected placement from the room.
    pub fn delete(&mut self) -> Vec<Action> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        self.gesture = Gesture::Idle;
        if self.blueprint.remove_placement(&session.key).is_none() {
            tracing::warn!(key = %session.key, "deleted placement no longer exists");
            return vec![Action::SelectionChanged(None), Action::RenderNeeded];
        }
        tracing::info!(key = %session.key, "placement deleted");
        let mut actions = self.commit();
        actions.insert(0, Action::SelectionChanged(None));
        actions
    }

    // --- Queries ---

    /// The in-flight session, if a prop is selected.
    #[must_use]
    pub fn session(&self) -> Option<&MoveSession> {
        self.session.as_ref()
    }

    /// Key of the selected placement, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&PlacementKey> {
        self.session.as_ref().map(|s| &s.key)
    }

    #[must_use]
    pub fn phase(&self) -> MovePhase {
        match (&self.session, &self.gesture) {
            (None, _) => MovePhase::Idle,
            (Some(_), Gesture::Dragging { .. }) => MovePhase::Dragging,
            (Some(_), _) => MovePhase::Selected,
        }
    }

    #[must_use]
    pub fn placements(&self) -> &[PropPlacement] {
        &self.blueprint.placements
    }

    // --- Internals ---

    fn poll_long_press(&mut self, now_ms: f64) -> Vec<Action> {
        let Gesture::Pressing { target, start, since_ms } = &self.gesture else {
            return Vec::new();
        };
        if now_ms - since_ms < LONG_PRESS_MS {
            return Vec::new();
        }
        let (target, start) = (target.clone(), *start);
        self.gesture = Gesture::Holding { start };
        self.select(target)
    }

    fn select(&mut self, target: PlacementKey) -> Vec<Action> {
        let Some(placement) = self.blueprint.placement(&target) else {
            return Vec::new();
        };
        if let Some(previous) = &self.session {
            tracing::debug!(previous = %previous.key, next = %target, "selection replaced");
        }
        self.session = Some(MoveSession::begin(placement));
        tracing::debug!(key = %target, "prop selected");
        vec![Action::SelectionChanged(Some(target)), Action::RenderNeeded]
    }

    fn drag_to(&mut self, floor: Option<WorldPos>) -> Vec<Action> {
        let (Some(floor), Some(session)) = (floor, self.session.as_mut()) else {
            return Vec::new();
        };
        let spec = self.blueprint.grid();
        let anchor = spec.anchor_for_center(floor.x, floor.z, session.span);
        if anchor == session.position {
            return Vec::new();
        }
        session.position = anchor;
        session.valid =
            check_drop(&spec, &self.blueprint.placements, anchor, session.span, Some(&session.key)).is_ok();
        if session.valid {
            session.last_valid = session.pose();
        }
        vec![
            Action::DragUpdated { key: session.key.clone(), anchor, valid: session.valid },
            Action::RenderNeeded,
        ]
    }

    fn revert_invalid(&mut self) -> Vec<Action> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let verdict = check_drop(
            &self.blueprint.grid(),
            &self.blueprint.placements,
            session.position,
            session.span,
            Some(&session.key),
        );
        let Err(reason) = verdict else {
            return Vec::new();
        };
        tracing::warn!(key = %session.key, %reason, "drop rejected");
        session.restore(session.last_valid);
        session.valid = true;
        vec![Action::DropRejected { key: session.key.clone(), reason }, Action::RenderNeeded]
    }

    fn commit(&mut self) -> Vec<Action> {
        self.blueprint.sync_cells();
        vec![Action::PlacementsUpdated(self.blueprint.placements.clone()), Action::RenderNeeded]
    }
}

fn exceeds_threshold(start: ScreenPoint, now: ScreenPoint) -> bool {
    start.distance(now) > DRAG_THRESHOLD_PX
}

/// The full room engine. Wraps `EngineCore` with the prop registry used for
/// drawing and the sink that persists committed placements.
pub struct Engine<S: PlacementSink> {
    pub core: EngineCore,
    registry: PropRegistry,
    sink: S,
}

impl<S: PlacementSink> Engine<S> {
    #[must_use]
    pub fn new(blueprint: RoomBlueprint, registry: PropRegistry, sink: S) -> Self {
        Self { core: EngineCore::new(blueprint), registry, sink }
    }

    #[must_use]
    pub fn registry(&self) -> &PropRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PropRegistry {
        &mut self.registry
    }

    // --- Delegated inputs ---

    pub fn load_blueprint(&mut self, blueprint: RoomBlueprint) {
        self.core.load_blueprint(blueprint);
    }

    pub fn apply_remote_placements(&mut self, placements: Vec<PropPlacement>) -> Vec<Action> {
        self.core.apply_remote_placements(placements)
    }

    /// See [`EngineCore::place_new`].
    ///
    /// # Errors
    ///
    /// Returns the [`DropError`] when the drop is illegal.
    pub fn place_new(
        &mut self,
        prop_id: &str,
        anchor: GridPos,
        rotation: i32,
        span: Span,
    ) -> Result<Vec<Action>, DropError> {
        let actions = self.core.place_new(prop_id, anchor, rotation, span)?;
        Ok(self.dispatch(actions))
    }

    pub fn on_pointer_down(&mut self, sample: PointerSample, target: Option<PlacementKey>) -> Vec<Action> {
        let actions = self.core.on_pointer_down(sample, target);
        self.dispatch(actions)
    }

    pub fn on_pointer_move(&mut self, sample: PointerSample) -> Vec<Action> {
        let actions = self.core.on_pointer_move(sample);
        self.dispatch(actions)
    }

    pub fn on_pointer_up(&mut self, sample: PointerSample) -> Vec<Action> {
        let actions = self.core.on_pointer_up(sample);
        self.dispatch(actions)
    }

    pub fn on_tick(&mut self, now_ms: f64) -> Vec<Action> {
        let actions = self.core.on_tick(now_ms);
        self.dispatch(actions)
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        let actions = self.core.on_key_down(key);
        self.dispatch(actions)
    }

    pub fn rotate(&mut self) -> Vec<Action> {
        let actions = self.core.rotate();
        self.dispatch(actions)
    }

    pub fn confirm(&mut self) -> Vec<Action> {
        let actions = self.core.confirm();
        self.dispatch(actions)
    }

    pub fn cancel(&mut self) -> Vec<Action> {
        let actions = self.core.cancel();
        self.dispatch(actions)
    }

    pub fn delete(&mut self) -> Vec<Action> {
        let actions = self.core.delete();
        self.dispatch(actions)
    }

    // --- Output ---

    /// Scene nodes for the current state, including the in-flight prop.
    #[must_use]
    pub fn scene(&self) -> Vec<SceneNode> {
        build_room(&self.core.blueprint, self.core.origin, &self.registry, self.core.session())
    }

    /// Placement ghost for a prop chosen in a browsing UI, under `floor`.
    #[must_use]
    pub fn ghost(&self, prop_id: &str, floor: WorldPos, span: Span) -> Option<Ghost> {
        ghost_at(&self.core.blueprint, self.core.origin, &self.registry, prop_id, floor, span)
    }

    fn dispatch(&mut self, actions: Vec<Action>) -> Vec<Action> {
        for action in &actions {
            if let Action::PlacementsUpdated(placements) = action {
                self.sink.on_update(placements);
            }
        }
        actions
    }
}
