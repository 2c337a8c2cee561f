use super::*;

fn sse(event: &str, data: &str) -> SseMessage {
    SseMessage { event: event.into(), data: data.into(), id: None }
}

#[test]
fn status_with_phase() {
    let ev = GenerationEvent::from_sse(&sse("status", r#"{"message":"Analyzing","phase":"start"}"#)).unwrap();
    assert_eq!(ev, GenerationEvent::Status { message: "Analyzing".into(), phase: Some("start".into()) });
}

#[test]
fn model_label_camel_case() {
    let ev = GenerationEvent::from_sse(&sse("model", r#"{"model":"sonnet","modelLabel":"Sonnet","modelId":"x"}"#))
        .unwrap();
    assert_eq!(ev, GenerationEvent::Model { key: "sonnet".into(), label: Some("Sonnet".into()) });
}

#[test]
fn tool_event() {
    let ev =
        GenerationEvent::from_sse(&sse("tool", r#"{"name":"Read","input":"{}","message":"Using tool: Read"}"#)).unwrap();
    assert_eq!(ev, GenerationEvent::Tool { name: "Read".into(), input: "{}".into() });
}

#[test]
fn complete_carries_parts() {
    let data = r##"{
        "name":"CoffeeMug","filename":"CoffeeMug.tsx","code":"export function CoffeeMug() {}",
        "method":"ai","model":"sonnet","generationId":"g1",
        "parts":[{"type":"cylinder","position":[0,0.1,0],"args":[0.1,0.1,0.2],"color":"#fff"}]
    }"##;
    let ev = GenerationEvent::from_sse(&sse("complete", data)).unwrap();
    assert!(ev.is_terminal());
    let GenerationEvent::Complete(prop) = ev else {
        panic!("expected complete");
    };
    assert_eq!(prop.name, "CoffeeMug");
    assert_eq!(prop.method, GenerationMethod::Ai);
    assert_eq!(prop.parts.len(), 1);
    assert_eq!(prop.parts[0].kind, "cylinder");
}

#[test]
fn error_does_not_end_generation() {
    let ev = GenerationEvent::from_sse(&sse("error", r#"{"message":"Prompt template not found"}"#)).unwrap();
    assert_eq!(ev, GenerationEvent::Error { message: "Prompt template not found".into() });
    assert!(!ev.is_terminal());
}

#[test]
fn unknown_event_is_ignored_not_failed() {
    let ev = GenerationEvent::from_sse(&sse("heartbeat", "not json")).unwrap();
    assert_eq!(ev, GenerationEvent::Unknown { event: "heartbeat".into() });
    assert!(!ev.is_terminal());
}

#[test]
fn malformed_known_event_is_parse_error() {
    let err = GenerationEvent::from_sse(&sse("thinking", "{")).unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}
