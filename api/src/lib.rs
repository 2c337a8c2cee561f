//! Office backend client.
//!
//! Talks to the rooms, blueprints and creator endpoints over HTTP and
//! streams prop generation over server-sent events. Layouts travel as
//! [`scene::RoomBlueprint`] so the placement engine consumes them directly.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | `ApiConfig::from_env` |
//! | [`error`] | `ApiError` and its `ErrorCode` classification |
//! | [`types`] | Wire request/response shapes |
//! | [`client`] | `ApiClient` |
//! | [`sse`] | Incremental event-stream decoder |
//! | [`events`] | Typed generation events |
//! | [`reducer`] | `GenerationState` folded from events |
//! | [`stream`] | Cancellable generation stream |

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod reducer;
pub mod sse;
pub mod stream;
pub mod types;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};
pub use events::{GeneratedProp, GenerationEvent};
pub use reducer::{GenerationPhase, GenerationState};
pub use stream::GenerationStream;
pub use types::{BlueprintRecord, BlueprintUpdate, DeletePropRequest, MovePropRequest, MutationAck, Room};
