//! Benchmarks for the CPU side of a tick.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use blobdrift::gpu::{pack_balls, BallGpu};
use blobdrift::{BlobConfig, FrameLoop, FrictionPolicy, RenderFrame, RenderSink, ViewportState};

struct NullSink;

impl RenderSink for NullSink {
    type Error = ();

    fn publish(&mut self, frame: &RenderFrame<'_>) -> Result<(), ()> {
        black_box(frame.len());
        Ok(())
    }
}

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");

    for count in [32u32, 256, 4096] {
        group.bench_with_input(BenchmarkId::new("cubic_drag", count), &count, |b, &count| {
            let config = BlobConfig::new().with_seed(1).with_particle_count(count);
            let (mut frame, _tx) =
                FrameLoop::new(&config, ViewportState::new(16.0 / 9.0), 60.0).unwrap();
            b.iter(|| black_box(frame.simulate(16_667.0)))
        });

        group.bench_with_input(BenchmarkId::new("inertia_clamp", count), &count, |b, &count| {
            let config = BlobConfig::new()
                .with_seed(1)
                .with_particle_count(count)
                .with_friction_policy(FrictionPolicy::InertiaClamp {
                    target_max_speed: 0.05,
                });
            let (mut frame, _tx) =
                FrameLoop::new(&config, ViewportState::new(16.0 / 9.0), 60.0).unwrap();
            b.iter(|| black_box(frame.simulate(16_667.0)))
        });
    }

    group.finish();
}

fn bench_publish(c: &mut Criterion) {
    let config = BlobConfig::new().with_seed(2).with_particle_count(256);
    let (mut frame, _tx) = FrameLoop::new(&config, ViewportState::new(1.0), 60.0).unwrap();

    c.bench_function("tick_null_sink_256", |b| {
        let mut sink = NullSink;
        b.iter(|| frame.tick_with_delta(16_667.0, &mut sink))
    });

    c.bench_function("pack_balls_256", |b| {
        let mut out: Vec<BallGpu> = Vec::new();
        let frame = RenderFrame {
            pos_rad: frame.particles().pos_rad(),
            color: frame.particles().color(),
            params: frame.particles().params(),
            aspect_ratio: None,
            tail_critical_value: 0.1,
            draw: true,
            limit_time: true,
        };
        b.iter(|| {
            pack_balls(&frame, &mut out);
            black_box(out.len())
        })
    });
}

criterion_group!(benches, bench_simulate, bench_publish);
criterion_main!(benches);
