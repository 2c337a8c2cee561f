use super::*;
use crate::blueprint::{Door, PlacementType, PropPlacement};

fn derived_room() -> RoomBlueprint {
    let mut bp = RoomBlueprint::new("room", 5, 4, 1.0);
    bp.placements.push(PropPlacement::new("desk-small", 1, 1).with_span(2, 1));
    let mut marker = PropPlacement::new("work-point", 1, 2);
    marker.kind = PlacementType::Interaction;
    bp.placements.push(marker);
    bp.doors.push(Door { x: 0, z: 3, facing: None });
    bp
}

#[test]
fn one_marker_per_cell() {
    let bp = derived_room();
    let markers = build_overlay(&bp, OverlayOptions::default());
    assert_eq!(markers.len(), 20);
    assert!(markers.iter().all(|m| m.label.is_none()));
}

#[test]
fn derived_classification() {
    let bp = derived_room();
    let markers = build_overlay(&bp, OverlayOptions::default());
    let kind_at = |x: i32, z: i32| markers.iter().find(|m| m.cell == GridPos::new(x, z)).map(|m| m.kind);
    assert_eq!(kind_at(1, 1), Some(CellKind::Blocked));
    assert_eq!(kind_at(2, 1), Some(CellKind::Blocked));
    assert_eq!(kind_at(1, 2), Some(CellKind::Interaction));
    assert_eq!(kind_at(0, 3), Some(CellKind::Door));
    assert_eq!(kind_at(4, 0), Some(CellKind::Walkable));
}

#[test]
fn colors_follow_kind() {
    let bp = derived_room();
    for m in build_overlay(&bp, OverlayOptions::default()) {
        assert_eq!(m.color, kind_color(m.kind));
    }
}

#[test]
fn ascii_grid() {
    let bp = derived_room();
    assert_eq!(render_ascii(&bp), ".....\n.##..\n.i...\nD....\n");
}

#[test]
fn labels_when_requested() {
    let bp = derived_room();
    let options = OverlayOptions { show_coordinates: true, show_prop_ids: true };
    let markers = build_overlay(&bp, options);
    let anchor = markers.iter().find(|m| m.cell == GridPos::new(1, 1)).unwrap();
    assert_eq!(anchor.label.as_deref(), Some("1,1 desk-small"));
    let plain = markers.iter().find(|m| m.cell == GridPos::new(3, 0)).unwrap();
    assert_eq!(plain.label.as_deref(), Some("3,0"));
}

#[test]
fn cells_take_precedence() {
    let json = r#"{
        "gridWidth": 4, "gridDepth": 4,
        "cells": [
            [{"type": "door"}, {}, {}, {}],
            [{}, {"type": "blocked", "walkable": false}, {}, {}],
            [{}, {}, {"type": "interaction"}, {}],
            [{}, {}, {}, {}]
        ],
        "placements": [{"propId": "couch", "x": 3, "z": 3}]
    }"#;
    let bp = RoomBlueprint::from_json(json).unwrap();
    assert_eq!(render_ascii(&bp), "D...\n.#..\n..i.\n....\n");
}

#[test]
fn markers_sit_on_cell_centres() {
    let bp = derived_room();
    let markers = build_overlay(&bp, OverlayOptions::default());
    let spec = bp.grid();
    for m in &markers {
        let c = spec.cell_center(m.cell);
        assert!((m.position.x - c.x).abs() < 1e-9);
        assert!((m.position.z - c.z).abs() < 1e-9);
        assert!(m.position.y > 0.0);
    }
}

#[test]
fn oversized_grid_is_cropped() {
    let mut bp = RoomBlueprint::new("huge", 4_000_000_000, 4_000_000_000, 1.0);
    bp.placements.push(PropPlacement::new("plant", 2, 2));
    let markers = build_overlay(&bp, OverlayOptions::default());
    assert_eq!(markers.len(), (MAX_GRID_SIZE * MAX_GRID_SIZE) as usize);
    assert!(markers.iter().any(|m| m.cell == GridPos::new(2, 2) && m.kind == CellKind::Blocked));

    let ascii = render_ascii(&bp);
    assert_eq!(ascii.lines().count(), MAX_GRID_SIZE as usize);
    assert!(ascii.lines().all(|l| l.len() == MAX_GRID_SIZE as usize));
}
