use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use glam::Vec2;
use neptune::{FluidScene, FluidSimulation};

fn primed_scene(size: usize) -> FluidScene {
    let mut scene = FluidScene::new((size, size));
    scene.injector_mut().radius = 0.5;
    scene.activate();
    scene.move_to_world(Vec2::new(-0.3, 0.0));
    scene.move_to_world(Vec2::new(0.3, 0.0));
    for _ in 0..3 {
        scene.step(1.0 / 60.0);
    }
    scene.deactivate();
    scene
}

fn benchmark_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_step");
    group.sample_size(20);

    for size in [32, 64, 128].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut scene = primed_scene(size);
            b.iter(|| {
                black_box(scene.step(1.0 / 60.0));
            });
        });
    }
    group.finish();
}

fn benchmark_interactive_burst(c: &mut Criterion) {
    c.bench_function("stroke_64x64_20steps", |b| {
        b.iter(|| {
            let mut scene = FluidScene::new((64, 64));
            scene.injector_mut().radius = 0.5;
            scene.activate();
            scene.move_to_world(Vec2::new(-1.0, 0.0));
            for frame in 0..20 {
                scene.move_to_world(Vec2::new(-1.0 + frame as f32 * 0.1, 0.0));
                black_box(scene.step(1.0 / 60.0));
            }
        });
    });
}

criterion_group!(benches, benchmark_step, benchmark_interactive_burst);
criterion_main!(benches);
