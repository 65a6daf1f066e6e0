//! Crossfade mix engine throughput: fade-out-in-place and fade-in mixing.
//!
//! **Goal:** mixing a chunk's worth of incoming samples into the buffered
//! tail of the outgoing track should stay far below the per-chunk DMA
//! budget.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use pcm_bufferengine::config::Settings;
use pcm_bufferengine::driver::PcmDriver;
use pcm_bufferengine::power::SysPower;
use pcm_bufferengine::supervisor::AudioSupervisor;
use pcm_bufferengine::types::CrossfadeMode;
use pcm_bufferengine::PcmBufferEngine;
use std::sync::Arc;

struct NoopDriver;
impl PcmDriver for NoopDriver {
    fn play_data(&self, _addr: usize, _size: usize) {}
    fn play_stop(&self) {}
    fn play_pause(&self, _pause: bool) {}
    fn is_playing(&self) -> bool {
        false
    }
    fn is_paused(&self) -> bool {
        false
    }
    fn bytes_waiting(&self) -> usize {
        0
    }
}

struct NoopSupervisor;
impl AudioSupervisor for NoopSupervisor {
    fn track_finished(&self) {}
    fn position_advance(&self, _bytes: usize) {}
}

struct NoopPower;
impl SysPower for NoopPower {
    fn set_cpu_boost(&self, _boost: bool) {}
    fn set_thread_priority(&self, _priority: pcm_bufferengine::power::ThreadPriority) {}
}

fn build_engine() -> PcmBufferEngine {
    let mut settings = Settings::new(44_100);
    settings.crossfade = CrossfadeMode::On;
    let capacity = PcmBufferEngine::required_capacity(&settings);

    PcmBufferEngine::new(
        vec![0u8; capacity].into_boxed_slice(),
        settings,
        Arc::new(NoopDriver),
        Arc::new(NoopSupervisor),
        Arc::new(NoopPower),
    )
    .expect("benchmark settings always validate")
}

fn prime_with_audio(engine: &PcmBufferEngine, target_bytes: usize) {
    let chunk = vec![0u8; 32_768];
    while engine.unplayed_bytes() < target_bytes {
        let committed = engine.write_chunk(false, |buf| {
            let n = chunk.len().min(buf.len());
            buf[..n].copy_from_slice(&chunk[..n]);
            n
        });
        if !committed {
            break;
        }
    }
}

fn bench_fade_in_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossfade");

    group.bench_function("fade_in_mix_32768_bytes", |b| {
        let engine = build_engine();
        prime_with_audio(&engine, 44_100 * 4 * 2);
        let incoming = vec![0x11u8; 32_768];

        b.iter_batched(
            || {
                engine.crossfade_init();
                engine.crossfade_start();
            },
            |()| {
                black_box(engine.write_chunk(false, |buf| {
                    let n = incoming.len().min(buf.len());
                    buf[..n].copy_from_slice(&incoming[..n]);
                    n
                }));
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_fade_in_mix);
criterion_main!(benches);
