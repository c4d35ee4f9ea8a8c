use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use crate::{Bindings, SegmentShape, SpriteTransform, World};

#[test]
fn transform_centers_the_sprite_on_the_body() {
    let t = SpriteTransform::for_sprite(Vec2::new(500.0, 300.0), 0.0, Vec2::new(100.0, 40.0));
    assert_eq!(t.translate, Vec2::new(450.0, 280.0));
    assert_eq!(t.rotation, 0.0);
}

#[test]
fn transform_is_idempotent_per_frame() {
    let center = Vec2::new(12.0, 40.5);
    let size = Vec2::new(24.0, 9.0);
    let first = SpriteTransform::for_sprite(center, 0.25, size);
    let second = SpriteTransform::for_sprite(center, 0.25, size);
    assert_eq!(first, second);
    assert_eq!(first.to_css(), second.to_css());
}

#[test]
fn css_output_translates_then_rotates() {
    let t = SpriteTransform::for_sprite(Vec2::new(24.0, 45.0), 0.25, Vec2::new(24.0, 9.0));
    assert_eq!(t.to_css(), "translate(12px, 40.5px) rotate(0.25rad)");
}

#[test]
fn bindings_grow_and_drain() {
    let mut world = World::new(Vec2::new(800.0, 600.0));
    let a = world.insert_static_rect(Vec2::new(100.0, 100.0), 10.0, 10.0);
    let b = world.insert_dynamic_rect(Vec2::new(200.0, 100.0), 10.0, 10.0, 0.5);

    let mut bindings: Bindings<&str> = Bindings::new();
    assert!(bindings.is_empty());
    bindings.push(a, "anchor");
    bindings.push(b, "micro");
    assert_eq!(bindings.len(), 2);

    let drained = bindings.drain();
    assert_eq!(drained.len(), 2);
    assert!(bindings.is_empty());
    assert_eq!(drained[0].element, "anchor");
}

#[test]
fn rect_hit_test_respects_rotation() {
    let shape = SegmentShape::Rect {
        width: 40.0,
        height: 20.0,
    };
    let center = Vec2::new(100.0, 100.0);

    assert!(shape.contains(center, 0.0, Vec2::new(118.0, 108.0)));
    assert!(!shape.contains(center, 0.0, Vec2::new(100.0, 115.0)));

    // Rotated a quarter turn, the long side now spans vertically.
    assert!(shape.contains(center, FRAC_PI_2, Vec2::new(100.0, 115.0)));
    assert!(!shape.contains(center, FRAC_PI_2, Vec2::new(118.0, 100.0)));
}

#[test]
fn circle_hit_test_ignores_rotation() {
    let shape = SegmentShape::Circle { radius: 20.0 };
    let center = Vec2::new(0.0, 0.0);
    assert!(shape.contains(center, 1.3, Vec2::new(14.0, 14.0)));
    assert!(!shape.contains(center, 1.3, Vec2::new(15.0, 15.0)));
}
