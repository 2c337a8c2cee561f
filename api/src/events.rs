//! Typed prop-generation events.
//!
//! The creator stream sends one JSON object per SSE event. The event name
//! selects the payload shape; names this client does not know decode to
//! [`GenerationEvent::Unknown`] so newer backends do not break older hosts.

use scene::registry::PropPart;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::sse::SseMessage;

/// How the backend produced the final code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    Ai,
    #[default]
    Template,
}

/// Payload of the terminal `complete` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedProp {
    pub name: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub method: GenerationMethod,
    #[serde(default)]
    pub parts: Vec<PropPart>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub model_label: Option<String>,
    #[serde(default)]
    pub generation_id: Option<String>,
    #[serde(default)]
    pub quality_score: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    Status { message: String, phase: Option<String> },
    Model { key: String, label: Option<String> },
    FullPrompt { prompt: String },
    Thinking { text: String },
    Text { text: String },
    Tool { name: String, input: String },
    ToolResult { message: String },
    Correction { message: String },
    Complete(Box<GeneratedProp>),
    Error { message: String },
    Unknown { event: String },
}

impl GenerationEvent {
    /// Decode one SSE message. Malformed JSON for a known event is an error.
    pub fn from_sse(message: &SseMessage) -> Result<Self, ApiError> {
        let data = message.data.as_str();
        let event = match message.event.as_str() {
            "status" => {
                let p: StatusPayload = payload(data)?;
                Self::Status { message: p.message, phase: p.phase }
            }
            "model" => {
                let p: ModelPayload = payload(data)?;
                Self::Model { key: p.model, label: p.model_label }
            }
            "full_prompt" => Self::FullPrompt { prompt: payload::<PromptPayload>(data)?.prompt },
            "thinking" => Self::Thinking { text: payload::<TextPayload>(data)?.text },
            "text" => Self::Text { text: payload::<TextPayload>(data)?.text },
            "tool" => {
                let p: ToolPayload = payload(data)?;
                Self::Tool { name: p.name, input: p.input }
            }
            "tool_result" => Self::ToolResult { message: payload::<MessagePayload>(data)?.message },
            "correction" => Self::Correction { message: payload::<MessagePayload>(data)?.message },
            "complete" => Self::Complete(Box::new(payload(data)?)),
            "error" => Self::Error { message: payload::<MessagePayload>(data)?.message },
            other => Self::Unknown { event: other.to_string() },
        };
        Ok(event)
    }

    /// Only `complete` ends a generation. An `error` may still be followed
    /// by a template fallback `complete`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

fn payload<T: DeserializeOwned>(data: &str) -> Result<T, ApiError> {
    serde_json::from_str(data).map_err(|e| ApiError::Parse(e.to_string()))
}

// =============================================================================
// PAYLOADS
// =============================================================================

#[derive(Deserialize)]
struct StatusPayload {
    #[serde(default)]
    message: String,
    #[serde(default)]
    phase: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelPayload {
    model: String,
    #[serde(default)]
    model_label: Option<String>,
}

#[derive(Deserialize)]
struct PromptPayload {
    prompt: String,
}

#[derive(Deserialize)]
struct TextPayload {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ToolPayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    input: String,
}

#[derive(Deserialize)]
struct MessagePayload {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;
