//! Generation state folded from the event stream.
//!
//! Hosts keep one [`GenerationState`] per generation and feed it every event
//! as it arrives. The state is what a creator panel draws: a status line,
//! the streaming thinking log, tool activity, corrections, and the result.

use crate::error::ApiError;
use crate::events::{GeneratedProp, GenerationEvent};

/// Oldest thinking/text lines are dropped past this many.
pub const MAX_LOG_LINES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationPhase {
    #[default]
    Idle,
    Generating,
    Complete,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub name: String,
    pub input: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationState {
    pub phase: GenerationPhase,
    pub prompt: String,
    pub status: String,
    pub model: Option<String>,
    pub model_label: Option<String>,
    pub full_prompt: Option<String>,
    pub thinking: Vec<String>,
    pub text: Vec<String>,
    pub tool_calls: Vec<ToolCall>,
    pub tool_results: usize,
    pub corrections: Vec<String>,
    pub result: Option<GeneratedProp>,
    pub error: Option<String>,
}

impl GenerationState {
    #[must_use]
    pub fn start(prompt: &str) -> Self {
        Self { phase: GenerationPhase::Generating, prompt: prompt.to_string(), ..Self::default() }
    }

    /// Fold one event. Events after completion or cancellation are ignored.
    pub fn apply(&mut self, event: &GenerationEvent) {
        if matches!(self.phase, GenerationPhase::Complete | GenerationPhase::Cancelled) {
            return;
        }
        match event {
            GenerationEvent::Status { message, .. } => self.status.clone_from(message),
            GenerationEvent::Model { key, label } => {
                self.model = Some(key.clone());
                self.model_label.clone_from(label);
            }
            GenerationEvent::FullPrompt { prompt } => self.full_prompt = Some(prompt.clone()),
            GenerationEvent::Thinking { text } => push_capped(&mut self.thinking, text),
            GenerationEvent::Text { text } => push_capped(&mut self.text, text),
            GenerationEvent::Tool { name, input } => {
                self.tool_calls.push(ToolCall { name: name.clone(), input: input.clone() });
            }
            GenerationEvent::ToolResult { .. } => self.tool_results += 1,
            GenerationEvent::Correction { message } => self.corrections.push(message.clone()),
            GenerationEvent::Complete(prop) => {
                self.phase = GenerationPhase::Complete;
                self.status = format!("generated {}", prop.name);
                self.result = Some(prop.as_ref().clone());
            }
            GenerationEvent::Error { message } => {
                self.phase = GenerationPhase::Failed;
                self.error = Some(message.clone());
            }
            GenerationEvent::Unknown { event } => {
                tracing::debug!(%event, "ignoring unknown generation event");
            }
        }
    }

    /// Record a transport failure that ended the stream.
    pub fn fail(&mut self, err: &ApiError) {
        if self.phase == GenerationPhase::Generating {
            self.phase = GenerationPhase::Failed;
            self.error = Some(err.to_string());
        }
    }

    pub fn cancel(&mut self) {
        if self.phase == GenerationPhase::Generating {
            self.phase = GenerationPhase::Cancelled;
            self.status = "cancelled".to_string();
        }
    }

    /// The stream closed. A generation still running at that point failed.
    pub fn close(&mut self) {
        if self.phase == GenerationPhase::Generating {
            self.phase = GenerationPhase::Failed;
            self.error = Some("stream ended before completion".to_string());
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        !matches!(self.phase, GenerationPhase::Idle | GenerationPhase::Generating)
    }
}

fn push_capped(log: &mut Vec<String>, line: &str) {
    if log.len() >= MAX_LOG_LINES {
        log.remove(0);
    }
    log.push(line.to_string());
}

#[cfg(test)]
#[path = "reducer_test.rs"]
mod reducer_test;
