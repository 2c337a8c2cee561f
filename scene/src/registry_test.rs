#![allow(clippy::float_cmp)]

use super::*;

fn saved(prop_id: &str, mount_type: MountType) -> SavedProp {
    SavedProp {
        prop_id: prop_id.into(),
        name: "Neon Sign".into(),
        parts: vec![PropPart {
            kind: "box".into(),
            position: [0.0, 0.5, 0.0],
            rotation: [0.0, 0.0, 0.0],
            args: vec![1.0, 0.2, 0.1],
            color: "#ff00ff".into(),
            emissive: true,
        }],
        mount_type,
        y_offset: 1.5,
        created_at: "2026-01-01T00:00:00Z".into(),
    }
}

#[test]
fn normalize_adds_builtin_namespace() {
    assert_eq!(normalize_id("desk"), "builtin:desk");
    assert_eq!(normalize_id("builtin:desk"), "builtin:desk");
    assert_eq!(normalize_id("crewhub:gen123"), "crewhub:gen123");
}

#[test]
fn bare_and_namespaced_ids_resolve_identically() {
    let reg = PropRegistry::with_builtins();
    let bare = reg.get("desk-with-monitor");
    let full = reg.get("builtin:desk-with-monitor");
    assert!(bare.is_some());
    assert_eq!(bare, full);
}

#[test]
fn unknown_ids_return_none() {
    let reg = PropRegistry::with_builtins();
    for id in ["", ":", "nope", "builtin:", "crewhub:missing", "a:b:c", "🪑"] {
        assert!(reg.get(id).is_none(), "{id:?} should not resolve");
    }
}

#[test]
fn other_namespaces_kept_verbatim() {
    let mut reg = PropRegistry::new();
    reg.register_generated(&saved("crewhub:gen123", MountType::Wall));
    assert!(reg.get("crewhub:gen123").is_some());
    assert!(reg.get("gen123").is_none());
}

#[test]
fn register_replaces_last_wins() {
    let mut reg = PropRegistry::new();
    reg.register("lamp", PropEntry::floor("Lamp", "Lamp", "💡", "decoration"), PropSource::Builtin);
    reg.register("builtin:lamp", PropEntry::wall("WallLamp", "Wall Lamp", "💡", "decoration"), PropSource::Builtin);
    assert_eq!(reg.len(), 1);
    assert_eq!(reg.get("lamp").map(|e| e.mount_type), Some(MountType::Wall));
}

#[test]
fn register_generated_converts_saved_prop() {
    let mut reg = PropRegistry::new();
    reg.register_generated(&saved("crewhub:neon", MountType::Wall));
    let entry = reg.get("crewhub:neon").unwrap();
    assert_eq!(entry.source, PropSource::Generated);
    assert_eq!(entry.mount_type, MountType::Wall);
    assert_eq!(entry.y_offset, 1.5);
    assert!(matches!(&entry.component, PropComponent::Parts { parts } if parts.len() == 1));
}

#[test]
fn builtin_wall_props_are_wall_mounted() {
    let reg = PropRegistry::with_builtins();
    for id in ["whiteboard", "painting", "clock", "monitor-wall"] {
        assert_eq!(reg.get(id).map(|e| e.mount_type), Some(MountType::Wall), "{id}");
    }
    assert_eq!(reg.get("desk-with-monitor").map(|e| e.mount_type), Some(MountType::Floor));
}

#[test]
fn list_is_sorted() {
    let reg = PropRegistry::with_builtins();
    let ids: Vec<&str> = reg.list().into_iter().map(|(id, _)| id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert_eq!(ids.len(), reg.len());
    assert!(ids.iter().all(|id| id.starts_with("builtin:")));
}

#[test]
fn saved_prop_defaults_from_json() {
    let json = r#"{"propId": "crewhub:x", "name": "X", "parts": []}"#;
    let prop: SavedProp = serde_json::from_str(json).unwrap();
    assert_eq!(prop.mount_type, MountType::Floor);
    assert_eq!(prop.y_offset, 0.16);
}

#[test]
fn empty_registry() {
    let reg = PropRegistry::new();
    assert!(reg.is_empty());
    assert!(!reg.contains("desk"));
}
