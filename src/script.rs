//! Scripted input sessions.
//!
//! A script is JSON lines, one input per line, replayed against an
//! [`Engine`] exactly as a renderer would deliver them. Blank lines and
//! lines starting with `#` are skipped.
//!
//! ```text
//! {"op":"down","x":100,"y":100,"floor":[-6.5,-6.5],"t":0,"target":{"propId":"desk","x":3,"z":3}}
//! {"op":"tick","t":650}
//! {"op":"move","x":140,"y":100,"floor":[-4.5,-6.5],"t":700}
//! {"op":"up","x":140,"y":100,"t":720}
//! {"op":"key","key":"Enter"}
//! ```

use scene::input::{Key, PointerSample, ScreenPoint};
use scene::{Action, Engine, GridPos, PlacementKey, PlacementSink, SceneNode, Span, WorldPos};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("script line {line}: {source}")]
    Line { line: usize, source: serde_json::Error },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        floor: Option<[f64; 2]>,
        t: f64,
        #[serde(default)]
        target: Option<PlacementKey>,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        floor: Option<[f64; 2]>,
        t: f64,
    },
    Up {
        x: f64,
        y: f64,
        #[serde(default)]
        floor: Option<[f64; 2]>,
        t: f64,
    },
    Tick {
        t: f64,
    },
    Key {
        key: String,
    },
    Place {
        #[serde(rename = "propId")]
        prop_id: String,
        x: i32,
        z: i32,
        #[serde(default)]
        rotation: i32,
        #[serde(default)]
        span: Option<Span>,
    },
    Ghost {
        #[serde(rename = "propId")]
        prop_id: String,
        floor: [f64; 2],
        #[serde(default)]
        span: Option<Span>,
    },
}

/// What one step produced.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub actions: Vec<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ghost: Option<GhostReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GhostReport {
    pub node: SceneNode,
    pub valid: bool,
}

pub fn parse(text: &str) -> Result<Vec<Step>, ScriptError> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
        .map(|(i, l)| serde_json::from_str(l).map_err(|source| ScriptError::Line { line: i + 1, source }))
        .collect()
}

/// Feed every step to `engine`, in order.
pub fn replay<S: PlacementSink>(engine: &mut Engine<S>, steps: &[Step]) -> Vec<StepOutcome> {
    steps.iter().enumerate().map(|(i, step)| run_step(engine, i + 1, step)).collect()
}

fn run_step<S: PlacementSink>(engine: &mut Engine<S>, index: usize, step: &Step) -> StepOutcome {
    let mut outcome = StepOutcome { step: index, actions: Vec::new(), ghost: None, error: None };
    match step {
        Step::Down { x, y, floor, t, target } => {
            outcome.actions = engine.on_pointer_down(sample(*x, *y, *floor, *t), target.clone());
        }
        Step::Move { x, y, floor, t } => outcome.actions = engine.on_pointer_move(sample(*x, *y, *floor, *t)),
        Step::Up { x, y, floor, t } => outcome.actions = engine.on_pointer_up(sample(*x, *y, *floor, *t)),
        Step::Tick { t } => outcome.actions = engine.on_tick(*t),
        Step::Key { key } => outcome.actions = engine.on_key_down(&Key(key.clone())),
        Step::Place { prop_id, x, z, rotation, span } => {
            match engine.place_new(prop_id, GridPos::new(*x, *z), *rotation, span.unwrap_or_default()) {
                Ok(actions) => outcome.actions = actions,
                Err(e) => outcome.error = Some(e.to_string()),
            }
        }
        Step::Ghost { prop_id, floor, span } => {
            let point = WorldPos::new(floor[0], 0.0, floor[1]);
            match engine.ghost(prop_id, point, span.unwrap_or_default()) {
                Some(ghost) => {
                    let valid = ghost.is_valid();
                    outcome.ghost = Some(GhostReport { node: ghost.node, valid });
                }
                None => outcome.error = Some(format!("unknown prop {prop_id}")),
            }
        }
    }
    outcome
}

fn sample(x: f64, y: f64, floor: Option<[f64; 2]>, t: f64) -> PointerSample {
    PointerSample::new(ScreenPoint::new(x, y), floor.map(|[fx, fz]| WorldPos::new(fx, 0.0, fz)), t)
}

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;
