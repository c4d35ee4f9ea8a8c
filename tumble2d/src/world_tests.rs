use glam::Vec2;

use crate::{FigureLayout, FigureSprites, SegmentId, SpriteSize, World};

fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-3,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

fn test_sprites() -> FigureSprites {
    FigureSprites {
        head: SpriteSize::new(40.0, 40.0),
        torso: SpriteSize::new(80.0, 120.0),
        left_upper_arm: SpriteSize::new(20.0, 60.0),
        left_lower_arm: SpriteSize::new(18.0, 52.0),
        right_upper_arm: SpriteSize::new(20.0, 60.0),
        right_lower_arm: SpriteSize::new(18.0, 52.0),
        left_upper_leg: SpriteSize::new(24.0, 70.0),
        left_lower_leg: SpriteSize::new(22.0, 64.0),
        right_upper_leg: SpriteSize::new(24.0, 70.0),
        right_lower_leg: SpriteSize::new(22.0, 64.0),
    }
}

const VIEWPORT: Vec2 = Vec2::new(1280.0, 800.0);

fn test_layout() -> FigureLayout {
    FigureLayout::build(Vec2::new(640.0, 300.0), 1.0, &test_sprites()).unwrap()
}

#[test]
fn spawn_registers_whole_figure_at_once() {
    let mut world = World::new(VIEWPORT);
    let walls = world.body_count();

    let handles = world.spawn_figure(&test_layout());

    assert_eq!(handles.segment_count(), 10);
    assert_eq!(handles.joint_count(), 9);
    assert_eq!(world.body_count(), walls + 10);
    assert_eq!(world.joint_count(), 9);
}

#[test]
fn spawned_bodies_sit_at_their_layout_centers() {
    let mut world = World::new(VIEWPORT);
    let layout = test_layout();
    let handles = world.spawn_figure(&layout);

    for placement in &layout.placements {
        let handle = handles.segment(placement.id).unwrap();
        let (center, angle) = world.body_pose(handle).unwrap();
        assert_approx(center.x, placement.center.x);
        assert_approx(center.y, placement.center.y);
        assert_approx(angle, 0.0);
    }
}

#[test]
fn despawn_is_idempotent() {
    let mut world = World::new(VIEWPORT);
    let walls = world.body_count();
    let handles = world.spawn_figure(&test_layout());

    world.despawn_figure(&handles);
    assert_eq!(world.body_count(), walls);
    assert_eq!(world.joint_count(), 0);

    // Second pass over stale handles must be a no-op.
    world.despawn_figure(&handles);
    assert_eq!(world.body_count(), walls);

    assert!(world.body_pose(handles.segment(SegmentId::Torso).unwrap()).is_none());
}

#[test]
fn gravity_pulls_the_figure_down() {
    let mut world = World::new(VIEWPORT);
    world.set_gravity(0.0, 1.0);
    let handles = world.spawn_figure(&test_layout());
    let torso = handles.segment(SegmentId::Torso).unwrap();

    let (before, _) = world.body_pose(torso).unwrap();
    for _ in 0..30 {
        world.step(1.0 / 60.0);
    }
    let (after, _) = world.body_pose(torso).unwrap();
    assert!(after.y > before.y, "torso did not fall: {before:?} -> {after:?}");
}

#[test]
fn static_rects_stay_put_under_simulation() {
    let mut world = World::new(VIEWPORT);
    world.set_gravity(0.0, 1.0);
    let anchor = world.insert_static_rect(Vec2::new(200.0, 150.0), 120.0, 30.0);
    assert!(!world.is_dynamic(anchor));

    for _ in 0..30 {
        world.step(1.0 / 60.0);
    }
    let (center, _) = world.body_pose(anchor).unwrap();
    assert_approx(center.x, 200.0);
    assert_approx(center.y, 150.0);
}

#[test]
fn resize_moves_the_boundary_walls() {
    let mut world = World::new(VIEWPORT);
    world.resize(Vec2::new(640.0, 480.0));

    let [top, bottom, left, right] = world.walls();
    let (top_c, _) = world.body_pose(top).unwrap();
    assert_approx(top_c.x, 320.0);
    assert_approx(top_c.y, -25.0);
    let (bottom_c, _) = world.body_pose(bottom).unwrap();
    assert_approx(bottom_c.y, 505.0);
    let (left_c, _) = world.body_pose(left).unwrap();
    assert_approx(left_c.x, -25.0);
    let (right_c, _) = world.body_pose(right).unwrap();
    assert_approx(right_c.x, 665.0);
}

#[test]
fn velocity_override_steers_a_dragged_body() {
    let mut world = World::new(VIEWPORT);
    world.set_gravity(0.0, 0.0);
    let body = world.insert_dynamic_rect(Vec2::new(100.0, 100.0), 40.0, 20.0, 0.0);

    // Steer right for half a second.
    for _ in 0..30 {
        world.set_body_velocity(body, Vec2::new(120.0, 0.0));
        world.step(1.0 / 60.0);
    }
    let (center, _) = world.body_pose(body).unwrap();
    assert!(center.x > 140.0, "body was not steered: {center:?}");
}

#[test]
fn removing_a_missing_body_is_harmless() {
    let mut world = World::new(VIEWPORT);
    let body = world.insert_dynamic_rect(Vec2::new(50.0, 50.0), 10.0, 10.0, 0.5);
    world.remove_body(body);
    world.remove_body(body);
    assert!(world.body_pose(body).is_none());
}
