//! Typed HTTP client for the office backend.
//!
//! Every call is a single request with no automatic retry; callers decide
//! what to do with a [`retryable`](crate::ErrorCode::retryable) failure. In
//! demo mode, mutation calls fail with [`ApiError::ReadOnly`] before any
//! bytes leave the process.

use std::time::Duration;

use reqwest::Method;
use scene::registry::SavedProp;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::stream::GenerationStream;
use crate::types::{
    BlueprintRecord, BlueprintUpdate, DeletePropRequest, ModelList, Models, MovePropRequest, MutationAck, Room,
    RoomList, SavePropRequest,
};

const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Build a client. The request timeout is applied per call so the
    /// generation stream can outlive it.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    // =========================================================================
    // ROOMS & BLUEPRINTS
    // =========================================================================

    pub async fn list_rooms(&self) -> Result<Vec<Room>, ApiError> {
        let list: RoomList = self.send_json(Method::GET, "/api/rooms", &[], None::<&()>).await?;
        Ok(list.rooms)
    }

    /// Blueprints, optionally only those attached to `room_id`.
    pub async fn list_blueprints(&self, room_id: Option<&str>) -> Result<Vec<BlueprintRecord>, ApiError> {
        let query: Vec<(&str, &str)> = room_id.map(|id| ("room_id", id)).into_iter().collect();
        self.send_json(Method::GET, "/api/blueprints", &query, None::<&()>).await
    }

    pub async fn get_blueprint(&self, id: &str) -> Result<BlueprintRecord, ApiError> {
        self.send_json(Method::GET, &format!("/api/blueprints/{id}"), &[], None::<&()>).await
    }

    pub async fn save_blueprint(&self, id: &str, update: &BlueprintUpdate) -> Result<BlueprintRecord, ApiError> {
        self.guard_mutation("save_blueprint")?;
        tracing::info!(%id, "saving blueprint");
        self.send_json(Method::PUT, &format!("/api/blueprints/{id}"), &[], Some(update)).await
    }

    /// Move one placement. The backend answers 400 for out-of-bounds targets
    /// and 409 for overlaps.
    pub async fn move_prop(&self, blueprint_id: &str, request: &MovePropRequest) -> Result<MutationAck, ApiError> {
        self.guard_mutation("move_prop")?;
        tracing::info!(
            %blueprint_id,
            prop_id = %request.prop_id,
            from = ?(request.from_x, request.from_z),
            to = ?(request.to_x, request.to_z),
            "moving prop"
        );
        self.send_json(Method::PATCH, &format!("/api/blueprints/{blueprint_id}/move-prop"), &[], Some(request)).await
    }

    pub async fn delete_prop(&self, blueprint_id: &str, request: &DeletePropRequest) -> Result<MutationAck, ApiError> {
        self.guard_mutation("delete_prop")?;
        tracing::info!(%blueprint_id, prop_id = %request.prop_id, x = request.x, z = request.z, "deleting prop");
        self.send_json(Method::DELETE, &format!("/api/blueprints/{blueprint_id}/delete-prop"), &[], Some(request))
            .await
    }

    // =========================================================================
    // CREATOR
    // =========================================================================

    pub async fn list_saved_props(&self) -> Result<Vec<SavedProp>, ApiError> {
        self.send_json(Method::GET, "/api/creator/saved-props", &[], None::<&()>).await
    }

    pub async fn save_prop(&self, request: &SavePropRequest) -> Result<SavedProp, ApiError> {
        self.guard_mutation("save_prop")?;
        tracing::info!(prop_id = %request.prop_id, "saving generated prop");
        self.send_json(Method::POST, "/api/creator/save-prop", &[], Some(request)).await
    }

    pub async fn delete_saved_prop(&self, prop_id: &str) -> Result<(), ApiError> {
        self.guard_mutation("delete_saved_prop")?;
        tracing::info!(%prop_id, "deleting saved prop");
        let _: serde_json::Value =
            self.send_json(Method::DELETE, &format!("/api/creator/saved-props/{prop_id}"), &[], None::<&()>).await?;
        Ok(())
    }

    pub async fn list_models(&self) -> Result<Models, ApiError> {
        let list: ModelList = self.send_json(Method::GET, "/api/creator/models", &[], None::<&()>).await?;
        Ok(list.into())
    }

    /// Start a prop generation. Must be called inside a tokio runtime.
    ///
    /// Generation writes nothing on the backend until the prop is saved, so
    /// it stays available in demo mode.
    pub fn generate_prop_stream(&self, prompt: &str, model: Option<&str>) -> Result<GenerationStream, ApiError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ApiError::InvalidRequest("prompt must not be empty".into()));
        }
        let mut query = vec![("prompt", prompt)];
        if let Some(model) = model {
            query.push(("model", model));
        }
        let request = self
            .authorized(self.http.get(self.url("/api/creator/generate-prop-stream")))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .query(&query);
        Ok(GenerationStream::spawn(request, self.config.stream_capacity))
    }

    // =========================================================================
    // PLUMBING
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    fn guard_mutation(&self, operation: &'static str) -> Result<(), ApiError> {
        if self.config.demo_mode {
            tracing::warn!(operation, "mutation refused in demo mode");
            return Err(ApiError::ReadOnly { operation });
        }
        Ok(())
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let mut request = self
            .authorized(self.http.request(method.clone(), &url))
            .timeout(Duration::from_secs(self.config.timeouts.request_secs));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, %url, "api request");
        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "api request failed");
            ApiError::Request(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::Request(e.to_string()))?;
        if !status.is_success() {
            tracing::warn!(%method, %url, status = status.as_u16(), "api request rejected");
            return Err(ApiError::Response { status: status.as_u16(), body: text });
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }
}
