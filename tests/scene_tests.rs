//! End-to-end simulation tests driving `Scene` through its event entry
//! points and per-frame step, with no GPU involved.

use std::time::{Duration, Instant};

use wavetank::input::MouseButton;
use wavetank::motion::{CLICK_SLOW_FACTOR, INITIAL_SLOW_FACTOR, REST_SLOW_FACTOR};
use wavetank::scene::Scene;
use wavetank::targets::TARGET_TOLERANCE;
use wavetank::{Vec2, Vec3};

fn scene() -> Scene {
    let mut scene = Scene::new(800, 600);
    scene.clock.start();
    scene
}

fn click(scene: &mut Scene, ndc: Vec2) {
    scene.pointer_down(MouseButton::Left, ndc);
    scene.pointer_up(MouseButton::Left, ndc);
}

// ============================================================================
// Wall containment
// ============================================================================

#[test]
fn test_ball_stays_inside_frustum() {
    let mut scene = scene();
    let half = scene.camera.frustum_size() * 0.5;
    let r = scene.ball.radius;

    // Hard diagonal launch, far above any speed the regimes produce.
    scene.ball.velocity = Vec3::new(0.6, 0.37, 0.0);
    for _ in 0..500 {
        scene.step(Instant::now());
        let p = scene.ball.position;
        assert!(p.x >= -half.x + r - 1e-4 && p.x <= half.x - r + 1e-4);
        assert!(p.y >= -half.y + r - 1e-4 && p.y <= half.y - r + 1e-4);
    }
}

// ============================================================================
// Target dequeue
// ============================================================================

#[test]
fn test_near_target_dequeues_in_one_step() {
    let mut scene = scene();
    scene.ball.velocity = Vec3::ZERO;
    scene.targets.enqueue(Vec3::new(0.3, 0.0, 0.0), 0.0);

    scene.step(Instant::now());
    assert!(scene.targets.is_empty());
}

#[test]
fn test_far_target_keeps_queue_and_sets_velocity() {
    let mut scene = scene();
    scene.ball.velocity = Vec3::ZERO;
    scene.targets.enqueue(Vec3::new(4.0, 0.0, 0.0), 0.0);

    scene.step(Instant::now());
    assert_eq!(scene.targets.len(), 1);
    assert!(scene.ball.velocity.x > 0.0);
    assert!(scene.ball.velocity.y.abs() < 1e-6);
}

// ============================================================================
// Attractor ring buffer
// ============================================================================

#[test]
fn test_attractor_overflow_keeps_count_and_overwrites() {
    let mut scene = scene();
    let capacity = scene.attractors.capacity();

    for i in 0..=capacity {
        scene.add_attractor(Some(Vec3::new(i as f32, 0.0, 0.0)));
    }

    assert_eq!(scene.attractors.len(), capacity);
    // The extra add wrapped to slot zero.
    assert_eq!(
        scene.attractors.get(0).unwrap().position.x,
        capacity as f32
    );
}

// ============================================================================
// Click-pulse lifetime
// ============================================================================

#[test]
fn test_click_pulse_expires_after_one_time_unit() {
    let mut scene = scene();
    click(&mut scene, Vec2::ZERO);
    assert!(scene.ripple.is_active());

    // 0.01 per step: alive at roughly t0 + 0.95 ...
    for _ in 0..95 {
        scene.step(Instant::now());
    }
    assert!(scene.ripple.is_active());
    // ... retired shortly past t0 + 1.0.
    for _ in 0..10 {
        scene.step(Instant::now());
    }
    assert!(!scene.ripple.is_active());
}

#[test]
fn test_second_click_restarts_pulse() {
    let mut scene = scene();
    click(&mut scene, Vec2::ZERO);
    for _ in 0..50 {
        scene.step(Instant::now());
    }
    click(&mut scene, Vec2::new(0.4, 0.4));
    let restarted = scene.ripple.start_time();
    assert!((restarted - scene.time()).abs() < 1e-5);

    // The first pulse's expiry point passes without retiring the second.
    for _ in 0..60 {
        scene.step(Instant::now());
    }
    assert!(scene.ripple.is_active());
}

// ============================================================================
// Idle decay staging
// ============================================================================

#[test]
fn test_decay_stages_across_click_and_rest() {
    let mut scene = scene();
    assert_eq!(scene.decay.slow_factor, INITIAL_SLOW_FACTOR);

    // Click at screen center: the target sits on the ball, so the queue
    // drains on the next step.
    click(&mut scene, Vec2::ZERO);
    assert_eq!(scene.decay.slow_factor, CLICK_SLOW_FACTOR);

    let t0 = Instant::now();
    scene.step(t0); // dequeues the reached target
    scene.step(t0); // idle frame schedules the rest check
    assert_eq!(scene.decay.slow_factor, CLICK_SLOW_FACTOR);

    scene.step(t0 + Duration::from_millis(501));
    assert_eq!(scene.decay.slow_factor, REST_SLOW_FACTOR);
}

#[test]
fn test_enqueued_target_leaves_slow_factor_alone() {
    let mut scene = scene();
    click(&mut scene, Vec2::ZERO);
    let t0 = Instant::now();
    scene.step(t0);
    scene.step(t0);
    scene.step(t0 + Duration::from_millis(501));
    assert_eq!(scene.decay.slow_factor, REST_SLOW_FACTOR);

    // A target entering the queue directly does not touch the factor.
    scene.targets.enqueue(Vec3::new(3.0, 0.0, 0.0), 0.0);
    scene.step(t0 + Duration::from_millis(502));
    assert_eq!(scene.decay.slow_factor, REST_SLOW_FACTOR);
}

// ============================================================================
// Resize invalidation
// ============================================================================

#[test]
fn test_resize_drops_targets_and_updates_uniform_frustum() {
    let mut scene = scene();
    click(&mut scene, Vec2::new(0.5, 0.2));
    click(&mut scene, Vec2::new(-0.3, 0.4));
    assert_eq!(scene.targets.len(), 2);

    scene.resize(600, 800);
    assert!(scene.targets.is_empty());

    let uniforms = scene.ripple_uniforms();
    let frustum = scene.camera.frustum_size();
    assert_eq!(uniforms.frustum, [frustum.x, frustum.y]);
    assert!((frustum.x / frustum.y - 600.0 / 800.0).abs() < 1e-5);
}

// ============================================================================
// Scenario: FIFO pursuit
// ============================================================================

#[test]
fn test_targets_visited_in_insertion_order() {
    let mut scene = scene();
    scene.ball.velocity = Vec3::ZERO;

    let clicks = [
        Vec2::new(-0.6, -0.5),
        Vec2::new(0.7, 0.4),
        Vec2::new(0.0, 0.0),
    ];
    let expected: Vec<Vec3> = clicks
        .iter()
        .map(|&ndc| scene.camera.plane_hit(ndc).unwrap().plane)
        .collect();
    for &ndc in &clicks {
        click(&mut scene, ndc);
    }
    assert_eq!(scene.targets.len(), 3);

    let mut visited = Vec::new();
    let mut remaining = scene.targets.len();
    for _ in 0..20_000 {
        scene.step(Instant::now());
        if scene.targets.len() < remaining {
            remaining = scene.targets.len();
            visited.push(scene.ball.position);
        }
        if remaining == 0 {
            break;
        }
    }

    assert_eq!(visited.len(), 3, "ball should reach every target");
    for (reached, target) in visited.iter().zip(&expected) {
        // Dequeue happens within the tolerance radius (plus one frame of
        // travel slack).
        assert!(reached.distance(*target) <= TARGET_TOLERANCE + 0.1);
    }
}
