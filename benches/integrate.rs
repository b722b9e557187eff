//! Benchmarks for the CPU-side frame step.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Instant;

use wavetank::scene::Scene;
use wavetank::{Vec2, Vec3};

fn bench_scene_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_step");

    group.bench_function("idle", |b| {
        let mut scene = Scene::new(1280, 720);
        scene.clock.start();
        let now = Instant::now();
        b.iter(|| {
            scene.step(now);
            black_box(scene.ball.position)
        })
    });

    group.bench_function("seeking_with_attractors", |b| {
        let mut scene = Scene::with_attractor_capacity(1280, 720, 8);
        scene.clock.start();
        for i in 0..8 {
            let angle = i as f32 * std::f32::consts::TAU / 8.0;
            scene.add_attractor(Some(Vec3::new(angle.cos() * 4.0, angle.sin() * 2.0, 0.0)));
        }
        // A far target that is re-queued whenever it drains keeps the
        // seek regime active for every iteration.
        let now = Instant::now();
        b.iter(|| {
            if scene.targets.is_empty() {
                scene.targets.enqueue(Vec3::new(8.0, 3.0, 0.0), 0.5);
            }
            scene.step(now);
            black_box(scene.ball.position)
        })
    });

    group.finish();
}

fn bench_uniform_packing(c: &mut Criterion) {
    let mut scene = Scene::new(1280, 720);
    scene.clock.start();
    scene.step(Instant::now());

    c.bench_function("ripple_uniforms", |b| {
        b.iter(|| black_box(scene.ripple_uniforms()))
    });
}

fn bench_plane_hit(c: &mut Criterion) {
    let scene = Scene::new(1280, 720);
    c.bench_function("plane_hit", |b| {
        b.iter(|| black_box(scene.camera.plane_hit(Vec2::new(0.37, -0.61))))
    });
}

criterion_group!(
    benches,
    bench_scene_step,
    bench_uniform_packing,
    bench_plane_hit
);
criterion_main!(benches);
