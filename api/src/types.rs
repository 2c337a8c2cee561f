//! Wire types for the rooms, blueprints and creator endpoints.

use scene::{PropPlacement, RoomBlueprint, Span};
use serde::{Deserialize, Serialize};

// =============================================================================
// ROOMS
// =============================================================================

/// A room as listed by `GET /api/rooms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub floor_style: Option<String>,
    #[serde(default)]
    pub wall_style: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub is_hq: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoomList {
    pub rooms: Vec<Room>,
}

// =============================================================================
// BLUEPRINTS
// =============================================================================

/// A stored blueprint with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub room_id: Option<String>,
    pub blueprint: RoomBlueprint,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    /// Non-fatal validation notes attached by the backend.
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Partial update for `PUT /api/blueprints/{id}`. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlueprintUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<RoomBlueprint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl BlueprintUpdate {
    /// Replace only the blueprint body.
    #[must_use]
    pub fn layout(blueprint: RoomBlueprint) -> Self {
        Self { blueprint: Some(blueprint), ..Self::default() }
    }
}

/// Body of `PATCH /api/blueprints/{id}/move-prop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePropRequest {
    pub prop_id: String,
    pub from_x: i32,
    pub from_z: i32,
    pub to_x: i32,
    pub to_z: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl MovePropRequest {
    /// Describe the move of one placement from `before` to `after`.
    #[must_use]
    pub fn between(before: &PropPlacement, after: &PropPlacement) -> Self {
        Self {
            prop_id: before.prop_id.clone(),
            from_x: before.x,
            from_z: before.z,
            to_x: after.x,
            to_z: after.z,
            rotation: (after.rotation != before.rotation).then_some(after.rotation),
            span: after.span,
        }
    }
}

/// Body of `DELETE /api/blueprints/{id}/delete-prop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePropRequest {
    pub prop_id: String,
    pub x: i32,
    pub z: i32,
}

impl From<&PropPlacement> for DeletePropRequest {
    fn from(p: &PropPlacement) -> Self {
        Self { prop_id: p.prop_id.clone(), x: p.x, z: p.z }
    }
}

/// Acknowledgement returned by the placement mutation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationAck {
    pub success: bool,
    pub blueprint_id: String,
}

// =============================================================================
// CREATOR
// =============================================================================

/// Body of `POST /api/creator/save-prop`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePropRequest {
    pub name: String,
    pub prop_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub parts: Vec<scene::registry::PropPart>,
    pub mount_type: scene::MountType,
    pub y_offset: f64,
}

/// An entry of `GET /api/creator/models`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelOption {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelList {
    pub models: Vec<ModelOption>,
    #[serde(default)]
    pub default: Option<String>,
}

/// Model catalogue for prop generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Models {
    pub models: Vec<ModelOption>,
    pub default: Option<String>,
}

impl From<ModelList> for Models {
    fn from(list: ModelList) -> Self {
        Self { models: list.models, default: list.default }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
