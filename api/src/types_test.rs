use super::*;

#[test]
fn room_list_tolerates_missing_optionals() {
    let json = r##"{"rooms":[
        {"id":"hq","name":"Headquarters","is_hq":true,"sort_order":0,"created_at":1,"updated_at":2},
        {"id":"dev","name":"Dev Room","icon":"💻","color":"#3b82f6","project_id":null}
    ]}"##;
    let list: RoomList = serde_json::from_str(json).unwrap();
    assert_eq!(list.rooms.len(), 2);
    assert!(list.rooms[0].is_hq);
    assert_eq!(list.rooms[1].icon.as_deref(), Some("💻"));
    assert_eq!(list.rooms[1].project_id, None);
}

#[test]
fn blueprint_record_parses_nested_layout() {
    let json = r#"{
        "id":"bp-1","name":"Dev Room","room_id":"dev","source":"user",
        "created_at":10,"updated_at":20,
        "blueprint":{"gridWidth":20,"gridDepth":20,"cellSize":0.6,
            "placements":[{"propId":"desk-with-monitor","x":4,"z":4,"span":{"w":2,"d":1}}]}
    }"#;
    let record: BlueprintRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.room_id.as_deref(), Some("dev"));
    assert_eq!(record.blueprint.grid_width, 20);
    assert_eq!(record.blueprint.placements[0].span, Some(Span::new(2, 1)));
    assert!(record.warnings.is_empty());
}

#[test]
fn move_request_wire_shape() {
    let before = PropPlacement::new("desk", 4, 4).with_span(2, 1);
    let after = PropPlacement::new("desk", 6, 3).with_span(1, 2).with_rotation(90);
    let json = serde_json::to_value(MovePropRequest::between(&before, &after)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "propId": "desk", "fromX": 4, "fromZ": 4, "toX": 6, "toZ": 3,
            "rotation": 90, "span": {"w": 1, "d": 2}
        })
    );
}

#[test]
fn move_without_rotation_change_omits_rotation() {
    let before = PropPlacement::new("plant", 1, 1);
    let after = PropPlacement::new("plant", 2, 1);
    let json = serde_json::to_value(MovePropRequest::between(&before, &after)).unwrap();
    assert!(json.get("rotation").is_none());
    assert!(json.get("span").is_none());
}

#[test]
fn delete_request_from_placement() {
    let req = DeletePropRequest::from(&PropPlacement::new("lamp", 7, 2));
    assert_eq!(serde_json::to_value(req).unwrap(), serde_json::json!({"propId": "lamp", "x": 7, "z": 2}));
}

#[test]
fn layout_update_sends_only_blueprint() {
    let update = BlueprintUpdate::layout(RoomBlueprint::new("room", 4, 4, 1.0));
    let json = serde_json::to_value(update).unwrap();
    assert_eq!(json.as_object().map(|o| o.len()), Some(1));
    assert_eq!(json["blueprint"]["gridWidth"], 4);
}

#[test]
fn ack_parses_camel_case() {
    let ack: MutationAck = serde_json::from_str(r#"{"success":true,"blueprintId":"bp-9"}"#).unwrap();
    assert_eq!(ack, MutationAck { success: true, blueprint_id: "bp-9".into() });
}

#[test]
fn model_list_keeps_extra_fields_out() {
    let json = r#"{"models":[{"key":"sonnet","id":"anthropic/sonnet","label":"Sonnet","provider":"anthropic"}],"default":"sonnet"}"#;
    let models = Models::from(serde_json::from_str::<ModelList>(json).unwrap());
    assert_eq!(models.default.as_deref(), Some("sonnet"));
    assert_eq!(models.models[0].label.as_deref(), Some("Sonnet"));
}
