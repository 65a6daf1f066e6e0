//! Chunk pool and ring allocator throughput.
//!
//! **Goal:** descriptor alloc/commit/retire and ring reserve/commit should
//! be negligible next to the audio they gate.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pcm_bufferengine::pool::Pool;
use pcm_bufferengine::ring::Ring;

fn bench_pool_alloc_retire_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool");

    group.bench_function("alloc_commit_retire", |b| {
        let mut pool = Pool::new(64);
        b.iter(|| {
            let handle = pool.alloc().expect("pool never drains in this benchmark");
            pool.commit(handle, 0, 32_768, false);
            black_box(pool.retire_head());
        });
    });

    group.finish();
}

fn bench_ring_reserve_commit_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring");

    group.bench_function("reserve_grow_commit", |b| {
        let mut ring = Ring::new(vec![0u8; 1 << 20].into_boxed_slice());
        b.iter(|| {
            if ring.should_wrap() {
                ring.wrap_to_start();
            }
            let len = 32_768.min(ring.contiguous_remaining());
            {
                let buf = ring.reserve_mut(len);
                buf.fill(0x42);
            }
            ring.grow_pending(len);
            black_box(ring.commit_pending());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_pool_alloc_retire_cycle,
    bench_ring_reserve_commit_cycle
);
criterion_main!(benches);
