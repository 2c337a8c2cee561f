#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn room(n: u32) -> GridSpec {
    GridSpec::new(1.0, n, n)
}

fn one() -> Span {
    Span::default()
}

// =============================================================
// Wall snap
// =============================================================

#[test]
fn snaps_to_north_wall_face() {
    let spec = room(20);
    let snap = snap_to_wall(GridPos::new(5, 0), one(), 0, &spec).unwrap();
    assert_eq!(snap.side, WallSide::North);
    assert_eq!(snap.rotation, 0);
    assert!(approx_eq(snap.position.z, -9.0 + WALL_GAP));
    assert!(approx_eq(snap.position.x, -4.5));
}

#[test]
fn one_cell_away_still_snaps() {
    let spec = room(20);
    let snap = snap_to_wall(GridPos::new(5, 1), one(), 0, &spec).unwrap();
    assert_eq!(snap.side, WallSide::North);
    assert!(approx_eq(snap.position.z, -9.0 + WALL_GAP));
}

#[test]
fn beyond_threshold_no_snap() {
    let spec = room(20);
    assert!(snap_to_wall(GridPos::new(5, 2), one(), 0, &spec).is_none());
    assert!(snap_to_wall(GridPos::new(10, 10), one(), 0, &spec).is_none());
}

#[test]
fn each_wall_faces_into_room() {
    let spec = room(20);
    let cases = [
        (GridPos::new(10, 19), WallSide::South, 180),
        (GridPos::new(0, 10), WallSide::West, 270),
        (GridPos::new(19, 10), WallSide::East, 90),
    ];
    for (anchor, side, rotation) in cases {
        let snap = snap_to_wall(anchor, one(), 0, &spec).unwrap();
        assert_eq!(snap.side, side);
        assert_eq!(snap.rotation, rotation);
    }
    let east = snap_to_wall(GridPos::new(19, 10), one(), 0, &spec).unwrap();
    assert!(approx_eq(east.position.x, 9.0 - WALL_GAP));
    let south = snap_to_wall(GridPos::new(10, 19), one(), 0, &spec).unwrap();
    assert!(approx_eq(south.position.z, 9.0 - WALL_GAP));
}

#[test]
fn corner_ties_follow_priority() {
    let spec = room(20);
    assert_eq!(snap_to_wall(GridPos::new(0, 0), one(), 0, &spec).map(|s| s.side), Some(WallSide::North));
    assert_eq!(snap_to_wall(GridPos::new(19, 19), one(), 0, &spec).map(|s| s.side), Some(WallSide::South));
    assert_eq!(snap_to_wall(GridPos::new(19, 0), one(), 0, &spec).map(|s| s.side), Some(WallSide::North));
    assert_eq!(snap_to_wall(GridPos::new(0, 1), one(), 0, &spec).map(|s| s.side), Some(WallSide::West));
}

#[test]
fn nonzero_rotation_preserved() {
    let spec = room(20);
    let snap = snap_to_wall(GridPos::new(0, 10), one(), 90, &spec).unwrap();
    assert_eq!(snap.side, WallSide::West);
    assert_eq!(snap.rotation, 90);
}

#[test]
fn span_counts_toward_far_wall() {
    let spec = room(10);
    // Footprint covers z = 5..=8, one cell from the south wall row.
    let snap = snap_to_wall(GridPos::new(4, 5), Span::new(1, 4), 0, &spec).unwrap();
    assert_eq!(snap.side, WallSide::South);
}

#[test]
fn wall_snap_idempotent() {
    let spec = GridSpec::new(0.6, 12, 9);
    for z in 0..9 {
        for x in 0..12 {
            for rotation in [0, 90, 180, 270] {
                let anchor = GridPos::new(x, z);
                let Some(first) = snap_to_wall(anchor, one(), rotation, &spec) else {
                    continue;
                };
                let second = snap_to_wall(anchor, one(), first.rotation, &spec).unwrap();
                assert_eq!(first, second, "anchor ({x},{z}) rotation {rotation}");
            }
        }
    }
}

// =============================================================
// Bounds clamp
// =============================================================

#[test]
fn clamp_pulls_edge_inside_north_face() {
    let spec = room(20);
    let anchor = GridPos::new(3, 0);
    let raw = spec.footprint_center(anchor, one());
    let out = clamp_to_bounds(raw, anchor, one(), &spec);
    assert!(approx_eq(out.z - 0.5, -9.0 + CLAMP_GAP));
    assert_eq!(out.x, raw.x);
}

#[test]
fn clamp_leaves_interior_untouched() {
    let spec = room(20);
    let anchor = GridPos::new(10, 10);
    let raw = spec.footprint_center(anchor, Span::new(2, 3));
    assert_eq!(clamp_to_bounds(raw, anchor, Span::new(2, 3), &spec), raw);
}

#[test]
fn clamp_moves_inward_only() {
    let spec = GridSpec::new(0.6, 14, 11);
    for z in 0..11 {
        for x in 0..14 {
            for span in [Span::new(1, 1), Span::new(2, 1), Span::new(1, 3)] {
                let anchor = GridPos::new(x, z);
                let raw = spec.footprint_center(anchor, span);
                let out = clamp_to_bounds(raw, anchor, span, &spec);
                assert!(out.x.abs() <= raw.x.abs() + EPSILON, "x moved outward at ({x},{z})");
                assert!(out.z.abs() <= raw.z.abs() + EPSILON, "z moved outward at ({x},{z})");
            }
        }
    }
}

#[test]
fn near_edge_constant_as_span_grows() {
    let spec = room(20);
    let anchor = GridPos::new(8, 0);
    let mut edges = Vec::new();
    for d in 1..=4 {
        let span = Span::new(1, d);
        let out = clamp_to_bounds(spec.footprint_center(anchor, span), anchor, span, &spec);
        edges.push(out.z - f64::from(d) / 2.0);
    }
    for edge in &edges {
        assert!(approx_eq(*edge, -9.0 + CLAMP_GAP));
    }
}

#[test]
fn span_wider_than_room_does_not_panic() {
    let spec = room(4);
    let anchor = GridPos::new(0, 0);
    let span = Span::new(10, 10);
    let out = clamp_to_bounds(spec.footprint_center(anchor, span), anchor, span, &spec);
    assert!(out.x.is_finite());
    assert!(out.z.is_finite());
}

// =============================================================
// Resolve
// =============================================================

#[test]
fn two_by_one_table_rotated_at_origin_corner() {
    let spec = room(10);
    let table = PropPlacement::new("conference-table", 0, 0).with_span(2, 1).with_rotation(90);
    let t = resolve(&table, MountType::Floor, &spec);
    assert_eq!(t.rotation, 90);
    assert_eq!(t.wall, None);
    // Footprint centre (-4.0, -4.5), clamped off the north and west walls.
    assert!(approx_eq(t.position.x, -4.0 + 1.0 + CLAMP_GAP));
    assert!(approx_eq(t.position.z, -4.5 + 1.0 + CLAMP_GAP));
}

#[test]
fn wall_prop_far_from_walls_keeps_raw_position() {
    let spec = room(20);
    let p = PropPlacement::new("painting", 10, 10).with_rotation(180);
    let t = resolve(&p, MountType::Wall, &spec);
    assert_eq!(t.wall, None);
    assert_eq!(t.rotation, 180);
    assert_eq!(t.position, spec.cell_center(GridPos::new(10, 10)));
}

#[test]
fn wall_prop_resolves_to_snap() {
    let spec = room(20);
    let p = PropPlacement::new("whiteboard", 19, 4);
    let t = resolve(&p, MountType::Wall, &spec);
    assert_eq!(t.wall, Some(WallSide::East));
    assert_eq!(t.rotation, 90);
}
