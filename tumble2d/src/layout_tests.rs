use glam::Vec2;

use crate::{Error, FigureLayout, FigureSprites, JointTuning, SegmentId, SpriteSize};

fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-4,
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

#[test]
fn every_joint_has_zero_rest_separation() {
    let layout = FigureLayout::build(Vec2::new(500.0, 300.0), 1.0, &test_sprites()).unwrap();

    assert_eq!(layout.joints.len(), 9);
    for joint in &layout.joints {
        let (a, b) = layout.joint_endpoints(joint).unwrap();
        assert_approx(a.x, b.x);
        assert_approx(a.y, b.y);
    }
}

#[test]
fn joint_graph_is_a_tree_rooted_at_torso() {
    let layout = FigureLayout::build(Vec2::ZERO, 1.0, &test_sprites()).unwrap();

    assert_eq!(layout.placements.len(), 10);
    assert_eq!(layout.joints.len(), 9);

    // Each segment except the torso is a child of exactly one joint.
    let mut children: Vec<SegmentId> = layout.joints.iter().map(|j| j.child).collect();
    children.sort_by_key(|id| id.label());
    children.dedup();
    assert_eq!(children.len(), 9);
    assert!(!children.contains(&SegmentId::Torso));

    // Walking parent links from every segment terminates at the torso.
    for id in SegmentId::ALL {
        let mut current = id;
        let mut hops = 0;
        while current != SegmentId::Torso {
            current = layout
                .joints
                .iter()
                .find(|j| j.child == current)
                .map(|j| j.parent)
                .expect("segment without a parent joint");
            hops += 1;
            assert!(hops <= 10, "cycle in joint graph");
        }
    }
}

#[test]
fn placement_matches_hand_computed_scenario() {
    // head 40x40, torso 80x120, scale 1, anchor (500, 300)
    let layout = FigureLayout::build(Vec2::new(500.0, 300.0), 1.0, &test_sprites()).unwrap();

    let head = layout.placement(SegmentId::Head).unwrap();
    assert_approx(head.center.x, 500.0);
    assert_approx(head.center.y, 220.0); // 300 - 60 - 20

    // Left shoulder socket: torso left edge, a quarter height above center.
    let shoulder = layout
        .joints
        .iter()
        .find(|j| j.child == SegmentId::LeftUpperArm)
        .unwrap();
    let (socket, _) = layout.joint_endpoints(shoulder).unwrap();
    assert_approx(socket.x, 460.0); // 500 - 40
    assert_approx(socket.y, 270.0); // 300 - 30

    // The upper arm hangs from the socket by half its own height.
    let arm = layout.placement(SegmentId::LeftUpperArm).unwrap();
    assert_approx(arm.center.x, 460.0);
    assert_approx(arm.center.y, 300.0); // 270 + 30

    // Hips attach a quarter of the torso width off center, at the bottom.
    let hip = layout
        .joints
        .iter()
        .find(|j| j.child == SegmentId::RightUpperLeg)
        .unwrap();
    let (socket, _) = layout.joint_endpoints(hip).unwrap();
    assert_approx(socket.x, 520.0); // 500 + 20
    assert_approx(socket.y, 360.0); // 300 + 60
}

#[test]
fn layout_is_translation_invariant() {
    let sprites = test_sprites();
    let a = FigureLayout::build(Vec2::new(100.0, 100.0), 1.0, &sprites).unwrap();
    let b = FigureLayout::build(Vec2::new(731.5, -42.25), 1.0, &sprites).unwrap();

    for id in SegmentId::ALL {
        let offset_a = a.placement(id).unwrap().center - Vec2::new(100.0, 100.0);
        let offset_b = b.placement(id).unwrap().center - Vec2::new(731.5, -42.25);
        assert_approx(offset_a.x, offset_b.x);
        assert_approx(offset_a.y, offset_b.y);
    }
}

#[test]
fn scale_shrinks_every_offset() {
    let sprites = test_sprites();
    let anchor = Vec2::new(500.0, 300.0);
    let half = FigureLayout::build(anchor, 0.5, &sprites).unwrap();

    let head = half.placement(SegmentId::Head).unwrap();
    assert_approx(head.center.y, 260.0); // 300 - 30 - 10

    // Offsets of the scaled build are exactly half the unscaled ones.
    let full = FigureLayout::build(anchor, 1.0, &sprites).unwrap();
    for id in SegmentId::ALL {
        let full_offset = full.placement(id).unwrap().center - anchor;
        let half_offset = half.placement(id).unwrap().center - anchor;
        assert_approx(half_offset.x, full_offset.x * 0.5);
        assert_approx(half_offset.y, full_offset.y * 0.5);
    }
}

#[test]
fn sub_pixel_coordinates_are_preserved() {
    let mut sprites = test_sprites();
    sprites.torso = SpriteSize::new(81.0, 121.0);
    sprites.head = SpriteSize::new(41.0, 41.0);

    let layout = FigureLayout::build(Vec2::new(0.0, 0.0), 1.0, &sprites).unwrap();
    let head = layout.placement(SegmentId::Head).unwrap();
    assert_approx(head.center.y, -81.0); // -60.5 - 20.5

    let shoulder = layout
        .joints
        .iter()
        .find(|j| j.child == SegmentId::LeftUpperArm)
        .unwrap();
    let (socket, _) = layout.joint_endpoints(shoulder).unwrap();
    assert_approx(socket.x, -40.5);
    assert_approx(socket.y, -30.25);
}

#[test]
fn rejects_bad_scale_and_sprite_sizes() {
    let sprites = test_sprites();
    assert!(matches!(
        FigureLayout::build(Vec2::ZERO, 0.0, &sprites),
        Err(Error::InvalidScale { .. })
    ));
    assert!(matches!(
        FigureLayout::build(Vec2::ZERO, f32::NAN, &sprites),
        Err(Error::InvalidScale { .. })
    ));

    let mut bad = sprites;
    bad.left_lower_leg = SpriteSize::new(0.0, 64.0);
    match FigureLayout::build(Vec2::ZERO, 1.0, &bad) {
        Err(Error::InvalidSpriteSize { segment, .. }) => {
            assert_eq!(segment, "leftLowerLeg");
        }
        other => panic!("expected InvalidSpriteSize, got {other:?}"),
    }
}

#[test]
fn tuning_defaults_to_loose_compliance() {
    let layout = FigureLayout::build(Vec2::ZERO, 1.0, &test_sprites()).unwrap();
    assert_approx(layout.tuning.compliance, 0.6);

    let rigid = layout.with_tuning(JointTuning { compliance: 1.0 });
    assert_approx(rigid.tuning.compliance, 1.0);
}
