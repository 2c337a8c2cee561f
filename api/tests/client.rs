//! Client tests against an in-process fake backend.

use std::collections::HashMap;
use std::convert::Infallible;

use api::reducer::GenerationPhase;
use api::{ApiClient, ApiConfig, ApiError, DeletePropRequest, GenerationEvent, GenerationState, MovePropRequest};
use axum::body::Body;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use futures_util::stream;
use scene::PropPlacement;
use serde_json::{Value, json};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(ApiConfig::new(base_url)).unwrap()
}

fn blueprint_record(id: &str, room_id: &str) -> Value {
    json!({
        "id": id, "name": id, "room_id": room_id, "source": "user",
        "created_at": 1, "updated_at": 2,
        "blueprint": {"gridWidth": 20, "gridDepth": 20, "cellSize": 0.6,
            "placements": [{"propId": "desk-with-monitor", "x": 4, "z": 4}]}
    })
}

const GENERATION_BODY: &str = concat!(
    "event: status\ndata: {\"message\":\"Analyzing\",\"phase\":\"start\"}\n\n",
    ": keepalive\n\n",
    "event: model\ndata: {\"model\":\"sonnet\",\"modelLabel\":\"Sonnet\"}\n\n",
    "event: thinking\ndata: {\"text\":\"a mug is a cylinder\"}\n\n",
    "event: complete\ndata: {\"name\":\"CoffeeMug\",\"code\":\"\",\"method\":\"ai\",\"parts\":[]}\n\n",
);

fn kind(event: &GenerationEvent) -> &'static str {
    match event {
        GenerationEvent::Status { .. } => "status",
        GenerationEvent::Model { .. } => "model",
        GenerationEvent::Thinking { .. } => "thinking",
        GenerationEvent::Complete(_) => "complete",
        _ => "other",
    }
}

#[tokio::test]
async fn list_rooms_sends_api_key() {
    let app = Router::new().route(
        "/api/rooms",
        get(|headers: HeaderMap| async move {
            if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("secret") {
                return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Missing API key"})));
            }
            (StatusCode::OK, Json(json!({"rooms": [{"id": "hq", "name": "HQ", "is_hq": true}]})))
        }),
    );
    let base = serve(app).await;

    let anonymous = client(&base).list_rooms().await.unwrap_err();
    assert!(matches!(anonymous, ApiError::Response { status: 401, .. }));

    let mut config = ApiConfig::new(&base);
    config.api_key = Some("secret".into());
    let rooms = ApiClient::new(config).unwrap().list_rooms().await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert!(rooms[0].is_hq);
}

#[tokio::test]
async fn list_blueprints_filters_by_room() {
    let app = Router::new().route(
        "/api/blueprints",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            let all = [blueprint_record("bp-a", "dev"), blueprint_record("bp-b", "ops")];
            let picked: Vec<Value> =
                all.into_iter().filter(|r| q.get("room_id").is_none_or(|room| r["room_id"] == *room)).collect();
            Json(picked)
        }),
    );
    let base = serve(app).await;
    let api = client(&base);

    assert_eq!(api.list_blueprints(None).await.unwrap().len(), 2);
    let dev = api.list_blueprints(Some("dev")).await.unwrap();
    assert_eq!(dev.len(), 1);
    assert_eq!(dev[0].id, "bp-a");
    assert_eq!(dev[0].blueprint.placements[0], PropPlacement::new("desk-with-monitor", 4, 4));
}

#[tokio::test]
async fn move_prop_round_trip() {
    let app = Router::new().route(
        "/api/blueprints/{id}/move-prop",
        patch(|Path(id): Path<String>, Json(body): Json<Value>| async move {
            if body["toX"] == 19 {
                return (StatusCode::BAD_REQUEST, Json(json!({"detail": "Target position out of bounds"})));
            }
            if body["toX"] == 4 {
                return (StatusCode::CONFLICT, Json(json!({"detail": "Target position overlaps with desk"})));
            }
            assert_eq!(body["propId"], "plant");
            (StatusCode::OK, Json(json!({"success": true, "blueprintId": id})))
        }),
    );
    let base = serve(app).await;
    let api = client(&base);
    let before = PropPlacement::new("plant", 1, 1);

    let ack = api.move_prop("bp-1", &MovePropRequest::between(&before, &PropPlacement::new("plant", 2, 1))).await;
    assert_eq!(ack.unwrap().blueprint_id, "bp-1");

    let overlap = api
        .move_prop("bp-1", &MovePropRequest::between(&before, &PropPlacement::new("plant", 4, 4)))
        .await
        .unwrap_err();
    assert!(matches!(overlap, ApiError::Response { status: 409, .. }));
    assert_eq!(overlap.detail().as_deref(), Some("Target position overlaps with desk"));

    let bounds = api
        .move_prop("bp-1", &MovePropRequest::between(&before, &PropPlacement::new("plant", 19, 1)))
        .await
        .unwrap_err();
    assert!(matches!(bounds, ApiError::Response { status: 400, .. }));
}

#[tokio::test]
async fn delete_prop_sends_body() {
    let app = Router::new().route(
        "/api/blueprints/{id}/delete-prop",
        delete(|Path(id): Path<String>, Json(body): Json<Value>| async move {
            assert_eq!(body, json!({"propId": "lamp", "x": 3, "z": 7}));
            Json(json!({"success": true, "blueprintId": id}))
        }),
    );
    let base = serve(app).await;
    let ack = client(&base)
        .delete_prop("bp-2", &DeletePropRequest::from(&PropPlacement::new("lamp", 3, 7)))
        .await
        .unwrap();
    assert!(ack.success);
}

#[tokio::test]
async fn demo_mode_refuses_before_sending() {
    // Nothing listens on the discard port; a sent request would fail differently.
    let mut config = ApiConfig::new("http://127.0.0.1:9");
    config.demo_mode = true;
    let api = ApiClient::new(config).unwrap();
    let req = MovePropRequest::between(&PropPlacement::new("plant", 1, 1), &PropPlacement::new("plant", 2, 1));

    let err = api.move_prop("bp-1", &req).await.unwrap_err();
    assert!(matches!(err, ApiError::ReadOnly { operation: "move_prop" }));
    let err = api.delete_saved_prop("prop-x").await.unwrap_err();
    assert!(matches!(err, ApiError::ReadOnly { .. }));
}

#[tokio::test]
async fn unreachable_backend_is_retryable() {
    use api::ErrorCode;
    let err = client("http://127.0.0.1:9").list_rooms().await.unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
    assert!(err.retryable());
}

#[tokio::test]
async fn generation_stream_folds_to_complete() {
    let app = Router::new().route(
        "/api/creator/generate-prop-stream",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            assert_eq!(q.get("prompt").map(String::as_str), Some("a coffee mug"));
            assert_eq!(q.get("model").map(String::as_str), Some("sonnet"));
            ([(header::CONTENT_TYPE, "text/event-stream")], GENERATION_BODY)
        }),
    );
    let base = serve(app).await;
    let mut stream = client(&base).generate_prop_stream("  a coffee mug ", Some("sonnet")).unwrap();

    let mut state = GenerationState::start("a coffee mug");
    let mut names = Vec::new();
    while let Some(event) = stream.recv().await {
        let event = event.unwrap();
        names.push(kind(&event));
        state.apply(&event);
    }
    state.close();

    assert_eq!(names, ["status", "model", "thinking", "complete"]);
    assert_eq!(state.phase, GenerationPhase::Complete);
    assert_eq!(state.model_label.as_deref(), Some("Sonnet"));
    assert_eq!(state.result.map(|p| p.name).as_deref(), Some("CoffeeMug"));
}

#[tokio::test]
async fn generation_stream_reports_http_error() {
    let app = Router::new().route(
        "/api/creator/generate-prop-stream",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
    );
    let base = serve(app).await;
    let mut stream = client(&base).generate_prop_stream("lamp", None).unwrap();

    let first = stream.recv().await.unwrap().unwrap_err();
    assert!(matches!(first, ApiError::Response { status: 503, .. }));
    assert!(stream.recv().await.is_none());
}

#[tokio::test]
async fn cancel_closes_open_stream() {
    let app = Router::new().route(
        "/api/creator/generate-prop-stream",
        get(|| async {
            let first = stream::iter([Ok::<_, Infallible>("event: status\ndata: {\"message\":\"thinking\"}\n\n")]);
            let body = Body::from_stream(futures_util::StreamExt::chain(first, stream::pending()));
            ([(header::CONTENT_TYPE, "text/event-stream")], body).into_response()
        }),
    );
    let base = serve(app).await;
    let mut stream = client(&base).generate_prop_stream("lamp", None).unwrap();

    let first = stream.recv().await.unwrap().unwrap();
    assert!(matches!(first, GenerationEvent::Status { .. }));

    stream.cancel();
    assert!(stream.recv().await.is_none());
}

#[tokio::test]
async fn empty_prompt_rejected_locally() {
    let err = client("http://127.0.0.1:9").generate_prop_stream("   ", None).unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));
}
