use approx::assert_abs_diff_eq;
use cordage::{ConstraintKind, ConstraintSystem, InterpolationConfig, PhysicsError, Rope, RopeConfig, SolverConfig, Vec2};

fn gravity_system(iterations: usize) -> ConstraintSystem {
    let config = SolverConfig::new()
        .with_gravity(Vec2::new(0.0, -9.81))
        .with_relaxation_iterations(iterations);
    ConstraintSystem::new(config).unwrap()
}

fn horizontal_rope(system: &mut ConstraintSystem, segments: usize) -> Rope {
    Rope::build(
        system,
        Vec2::new(0.0, 10.0),
        Vec2::new(10.0, 10.0),
        &RopeConfig::default().with_segments(segments),
    )
    .unwrap()
}

#[test]
fn rope_correct_point_count() {
    let mut system = gravity_system(8);
    let rope = horizontal_rope(&mut system, 10);
    assert_eq!(rope.len(), 11); // segments + 1
    assert_eq!(rope.segment_count(), 10);
    assert_eq!(system.len(), 11);
    assert_abs_diff_eq!(rope.rest_length(&system), 10.0, epsilon = 1e-4);
}

#[test]
fn zero_segments_rejected() {
    let mut system = gravity_system(8);
    let result = Rope::build(&mut system, Vec2::ZERO, Vec2::new(1.0, 0.0), &RopeConfig::default().with_segments(0));
    assert_eq!(result.err(), Some(PhysicsError::InvalidSegmentCount));
}

#[test]
fn rope_swings_under_gravity() {
    let mut system = gravity_system(8);
    let rope = horizontal_rope(&mut system, 10);

    for _ in 0..120 {
        system.update(1.0 / 60.0);
    }

    let positions = rope.positions(&system);
    let start = positions[0];
    let end = positions[positions.len() - 1];
    assert_eq!(start, Vec2::new(0.0, 10.0), "pinned anchor must not move");
    assert!(end.y < start.y, "End should drop below pinned start");
}

#[test]
fn anchored_chain_sag_stays_within_bounds() {
    let segments = 10;
    let config = SolverConfig::new()
        .with_gravity(Vec2::new(0.0, -9.81))
        .with_relaxation_iterations(40)
        .with_damping(0.99);
    let mut system = ConstraintSystem::new(config).unwrap();
    let rope = horizontal_rope(&mut system, segments);
    let max_span = segments as f32 * rope.segment_length();

    for _ in 0..600 {
        system.update(1.0 / 60.0);
        let positions = rope.positions(&system);
        let span = positions[0].distance(positions[segments]);
        assert!(span >= 0.0);
        assert!(span <= max_span * 1.05, "span {} exceeds {}", span, max_span);
    }

    // Damped, it ends up hanging below the anchor.
    let positions = rope.positions(&system);
    assert!(positions[segments].y < positions[0].y - max_span * 0.8);
    assert!(positions[segments].x.abs() < max_span * 0.5);
}

#[test]
fn rope_total_length_after_settling() {
    let segments = 10;
    let config = SolverConfig::new()
        .with_gravity(Vec2::new(0.0, -9.81))
        .with_relaxation_iterations(20)
        .with_damping(0.99);
    let mut system = ConstraintSystem::new(config).unwrap();
    let rope = Rope::build(
        &mut system,
        Vec2::new(0.0, 10.0),
        Vec2::new(10.0, 10.0),
        &RopeConfig::default().with_segments(segments).with_pins(true, true),
    )
    .unwrap();

    for _ in 0..300 {
        system.update(1.0 / 60.0);
    }

    let diff = (rope.length(&system) - rope.rest_length(&system)).abs();
    assert!(diff < 0.5, "length differs from rest length by {}", diff);
}

#[test]
fn move_anchor_drags_rope() {
    let mut system = gravity_system(8);
    let rope = horizontal_rope(&mut system, 5);
    rope.move_anchor(&mut system, Vec2::new(3.0, 4.0)).unwrap();

    let anchor = system.point(rope.start().unwrap()).unwrap();
    assert_eq!(anchor.position, Vec2::new(3.0, 4.0));
    assert_eq!(anchor.previous_position, Vec2::new(0.0, 10.0));

    // Half-way through the frame the anchor is drawn between the two.
    let drawn = rope.interpolated_positions(&system, 0.5, &InterpolationConfig::default());
    assert_abs_diff_eq!(drawn[0].x, 1.5, epsilon = 1e-5);
    assert_abs_diff_eq!(drawn[0].y, 7.0, epsilon = 1e-5);
}

#[test]
fn cut_separates_tail() {
    let mut system = gravity_system(8);
    let mut rope = horizontal_rope(&mut system, 10);
    let tail = rope.cut(&mut system, 4).unwrap();

    assert_eq!(rope.len(), 5);
    assert_eq!(tail.len(), 6);
    assert_eq!(system.len(), 11);
    let last_head = system.point(rope.end().unwrap()).unwrap();
    assert!(last_head.constraints().is_empty());

    for _ in 0..120 {
        system.update(1.0 / 60.0);
    }
    // The tail has no anchor and falls freely.
    let tail_y = tail.positions(&system)[0].y;
    assert!(tail_y < 0.0, "tail should fall, y = {}", tail_y);
    assert_abs_diff_eq!(tail.rest_length(&system), 5.0, epsilon = 1e-4);
}

#[test]
fn cut_out_of_range_reported() {
    let mut system = gravity_system(8);
    let mut rope = horizontal_rope(&mut system, 3);
    assert_eq!(
        rope.cut(&mut system, 3).err(),
        Some(PhysicsError::SegmentOutOfBounds { index: 3, count: 3 })
    );
}

#[test]
fn lengthen_inserts_after_anchor() {
    let mut system = gravity_system(8);
    let mut rope = horizontal_rope(&mut system, 4);
    let second = rope.ids()[1];

    let inserted = rope.lengthen(&mut system).unwrap();

    assert_eq!(rope.segment_count(), 5);
    assert_eq!(system.len(), 6);
    assert_eq!(system.index_of(inserted), Some(1));
    assert_eq!(system.index_of(second), Some(2));
    assert_abs_diff_eq!(rope.rest_length(&system), 12.5, epsilon = 1e-4);

    let anchor = system.point(rope.start().unwrap()).unwrap();
    assert!(anchor.constraint_to(second).is_none());
    assert!(anchor.constraint_to(inserted).is_some());
}

#[test]
fn shorten_removes_after_anchor() {
    let mut system = gravity_system(8);
    let mut rope = horizontal_rope(&mut system, 4);
    let third = rope.ids()[2];

    let removed = rope.shorten(&mut system).unwrap();

    assert!(removed.id().is_none());
    assert_eq!(rope.segment_count(), 3);
    assert_eq!(system.len(), 4);
    let anchor = system.point(rope.start().unwrap()).unwrap();
    assert_eq!(anchor.constraint_to(third).map(|c| c.kind()), Some(ConstraintKind::Distance));

    let report = system.update(1.0 / 60.0);
    assert_eq!(report.dangling, 0);
}

#[test]
fn shorten_single_segment_rejected() {
    let mut system = gravity_system(8);
    let mut rope = horizontal_rope(&mut system, 1);
    assert!(matches!(rope.shorten(&mut system), Err(PhysicsError::InvalidSegmentCount)));
}

#[test]
fn slack_rope_allows_compression() {
    let mut system = ConstraintSystem::new(SolverConfig::new()).unwrap();
    let rope = Rope::build(
        &mut system,
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 0.0),
        &RopeConfig::default()
            .with_segments(10)
            .with_kind(ConstraintKind::NotMoreThan),
    )
    .unwrap();
    // Push the free end back toward its neighbour: nothing pushes it out again.
    let end = rope.end().unwrap();
    system.point_mut(end).unwrap().reset_position(Vec2::new(9.5, 0.0));
    system.update(1.0 / 60.0);
    assert_abs_diff_eq!(system.point(end).unwrap().position.x, 9.5, epsilon = 1e-4);
}

#[test]
fn detach_removes_every_point() {
    let mut system = gravity_system(8);
    let rope = horizontal_rope(&mut system, 6);
    assert_eq!(rope.detach(&mut system), 7);
    assert!(system.is_empty());
}

#[test]
fn detach_after_external_removal_counts_live_points() {
    let mut system = gravity_system(8);
    let rope = horizontal_rope(&mut system, 4);
    let other = horizontal_rope(&mut system, 2);
    system.remove_part(rope.ids()[2]).unwrap();

    assert_eq!(rope.detach(&mut system), 4);
    assert_eq!(system.ids(), other.ids());
}
