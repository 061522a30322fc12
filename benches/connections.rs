//! Benchmarks for the per-frame CPU work of the particle field.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;

use glowfield::canvas::DrawList;
use glowfield::config::FieldConfig;
use glowfield::field::ParticleField;

fn field(width: f32, height: f32, count: usize) -> ParticleField {
    let config = FieldConfig {
        wide_count: count,
        narrow_count: count,
        ..Default::default()
    };
    let mut field = ParticleField::with_seed(config, 42);
    field.rebuild(Vec2::new(width, height), width);
    field
}

fn bench_links(c: &mut Criterion) {
    let mut group = c.benchmark_group("links");

    for count in [40usize, 80, 160, 320] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let field = field(1280.0, 720.0, count);
            b.iter(|| black_box(field.links().count()))
        });
    }

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    group.bench_function("narrow_40", |b| {
        let mut field = field(480.0, 800.0, 40);
        let mut canvas = DrawList::with_extent(480.0, 800.0);
        b.iter(|| {
            field.frame(&mut canvas);
            black_box(canvas.shapes().len())
        })
    });

    group.bench_function("wide_80", |b| {
        let mut field = field(1280.0, 720.0, 80);
        let mut canvas = DrawList::with_extent(1280.0, 720.0);
        b.iter(|| {
            field.frame(&mut canvas);
            black_box(canvas.shapes().len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_links, bench_frame);
criterion_main!(benches);
