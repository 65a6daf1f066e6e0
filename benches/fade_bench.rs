//! `clip16` saturation throughput.
//!
//! **Goal:** saturating the mix accumulator down to `i16` should be
//! trivial compared to the mixing arithmetic that feeds it.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pcm_bufferengine::types::clip16;

fn bench_clip16(c: &mut Criterion) {
    let mut group = c.benchmark_group("clip16");

    let inputs: Vec<(&str, i32)> = vec![
        ("in_range", 12_345),
        ("positive_overflow", i16::MAX as i32 + 5_000),
        ("negative_overflow", i16::MIN as i32 - 5_000),
    ];

    for (name, value) in inputs {
        group.bench_function(BenchmarkId::new("single", name), |b| {
            b.iter(|| black_box(clip16(black_box(value))));
        });
    }

    group.bench_function("stereo_second_1s", |b| {
        let samples: Vec<i32> = (0..44_100 * 2)
            .map(|i| (i as i32 * 37) - 20_000)
            .collect();

        b.iter(|| {
            let mut acc = 0i64;
            for &s in &samples {
                acc += clip16(black_box(s)) as i64;
            }
            black_box(acc);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_clip16);
criterion_main!(benches);
