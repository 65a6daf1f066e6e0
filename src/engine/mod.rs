//! The PCM Buffer Engine: chunk pool + ring allocator + producer/DMA/
//! crossfade/voice logic, wired together behind one lock.
//!
//! The whole engine lives behind a single [`parking_lot::Mutex`] except for
//! a handful of diagnostic counters kept in plain atomics so a monitoring
//! thread can sample them without contending with the audio path. The DMA
//! callback models a hardware interrupt that must never block; correct
//! callers never contend on it (the driver contract guarantees
//! non-reentrance and the producer/voice threads are the only other
//! writers), but `try_lock` is used there anyway so a bug can't deadlock
//! real audio hardware.

mod beep;
mod crossfade;
mod dma;
mod lifecycle;
mod producer;
mod voice;

use crate::config::Settings;
use crate::driver::PcmDriver;
use crate::error::{ConfigError, PcmBufError, Result};
use crate::pool::Pool;
use crate::power::SysPower;
use crate::ring::Ring;
use crate::supervisor::AudioSupervisor;
use crate::types::{ChunkHandle, MIX_CHUNK};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Heuristic matching the original sizing formula: enough descriptors to
/// cover the arena at a conservative average chunk size, plus a few spares
/// for in-flight/voice/crossfade bookkeeping.
const MINAVG_CHUNK: usize = 24_576;

fn descriptor_count(pcm_bytes: usize) -> usize {
    (pcm_bytes / MINAVG_CHUNK).max(8) + 4
}

/// State for an in-progress or active crossfade.
pub(crate) struct CrossfadeState {
    pub init: bool,
    pub active: bool,
    pub manual: bool,
    pub chunk: Option<ChunkHandle>,
    pub sample: usize,
    pub fade_in_total: usize,
    pub fade_in_rem: usize,
}

impl CrossfadeState {
    fn idle() -> Self {
        CrossfadeState {
            init: false,
            active: false,
            manual: false,
            chunk: None,
            sample: 0,
            fade_in_total: 0,
            fade_in_rem: 0,
        }
    }
}

/// State for the auxiliary voice/beep mixer.
pub(crate) struct VoiceState {
    pub chunk: Option<ChunkHandle>,
    pub sample: usize,
}

impl VoiceState {
    fn idle() -> Self {
        VoiceState {
            chunk: None,
            sample: 0,
        }
    }
}

pub(crate) struct EngineInner {
    pub pool: Pool,
    pub ring: Ring,
    pub fade_scratch: Box<[u8]>,
    pub voice_scratch: Box<[u8]>,
    pub settings: Settings,
    pub unplayed_bytes: usize,
    pub dma_running: bool,
    pub low_latency_mode: bool,
    pub last_chunk_bytes: usize,
    pub crossfade: CrossfadeState,
    pub voice: VoiceState,
    /// Set by the crossfade "flush" path; the next commit splices over the
    /// buffered tail instead of appending normally.
    pub flush_pending: bool,
    /// Standalone armed-but-not-yet-observed end-of-track flag, kept apart
    /// from `ChunkDescriptor::end_of_track` per the original's two-flag
    /// scheme (see SPEC_FULL.md §9.1): the DMA callback consults the
    /// descriptor's own copy when retiring, and falls back to this one only
    /// in the empty-read-list branch.
    pub end_of_track_pending: bool,
    pub track_transition: bool,
    pub boosted: bool,
}

impl EngineInner {
    fn freq(&self) -> u32 {
        self.settings.native_frequency
    }
}

/// The PCM playback buffer sitting between codecs/voice producers and a
/// fixed-rate DMA sink.
pub struct PcmBufferEngine {
    pub(crate) inner: Mutex<EngineInner>,
    pub(crate) driver: Arc<dyn PcmDriver>,
    pub(crate) supervisor: Arc<dyn AudioSupervisor>,
    pub(crate) power: Arc<dyn SysPower>,
    underruns: AtomicU64,
    dma_lock_contentions: AtomicU64,
}

impl PcmBufferEngine {
    /// Bytes the host must allocate for `new`'s `arena` argument, given
    /// `settings`: PCM storage plus the fixed fade and voice scratch spans.
    pub fn required_capacity(settings: &Settings) -> usize {
        let pcm_bytes =
            (settings.native_frequency as f32 * 4.0 * settings.arena_seconds()) as usize;
        pcm_bytes + 2 * MIX_CHUNK
    }

    /// Subdivide `arena` into the PCM ring, fade scratch, and voice scratch
    /// spans (Design Notes: "arena + index handles") and build the
    /// descriptor pool.
    pub fn new(
        arena: Box<[u8]>,
        settings: Settings,
        driver: Arc<dyn PcmDriver>,
        supervisor: Arc<dyn AudioSupervisor>,
        power: Arc<dyn SysPower>,
    ) -> Result<Self> {
        settings.validate().map_err(PcmBufError::Config)?;

        let required = 2 * MIX_CHUNK + crate::types::MIN_CHUNK;
        if arena.len() < required {
            return Err(PcmBufError::Config(ConfigError::ArenaTooSmall {
                available: arena.len(),
                required,
            }));
        }

        let mut storage = arena.into_vec();
        let fade_scratch = storage.split_off(storage.len() - MIX_CHUNK).into_boxed_slice();
        let voice_scratch = storage.split_off(storage.len() - MIX_CHUNK).into_boxed_slice();
        let pcm_arena = storage.into_boxed_slice();

        let pool = Pool::new(descriptor_count(pcm_arena.len()));
        let ring = Ring::new(pcm_arena);

        debug!(
            pcm_bytes = ring.arena_size(),
            descriptors = pool.capacity(),
            freq = settings.native_frequency,
            "initialized PCM buffer engine"
        );

        Ok(PcmBufferEngine {
            inner: Mutex::new(EngineInner {
                pool,
                ring,
                fade_scratch,
                voice_scratch,
                settings,
                unplayed_bytes: 0,
                dma_running: false,
                low_latency_mode: false,
                last_chunk_bytes: 0,
                crossfade: CrossfadeState::idle(),
                voice: VoiceState::idle(),
                flush_pending: false,
                end_of_track_pending: false,
                track_transition: false,
                boosted: false,
            }),
            driver,
            supervisor,
            power,
            underruns: AtomicU64::new(0),
            dma_lock_contentions: AtomicU64::new(0),
        })
    }

    /// Enable/disable low-latency mode (admission control gets stricter;
    /// see Producer Path).
    pub fn set_low_latency_mode(&self, enabled: bool) {
        self.inner.lock().low_latency_mode = enabled;
    }

    pub fn is_low_latency_mode(&self) -> bool {
        self.inner.lock().low_latency_mode
    }

    /// Free bytes in the PCM arena (diagnostics; mirrors `pcmbuf_free`).
    pub fn free_bytes(&self) -> usize {
        let inner = self.inner.lock();
        inner
            .ring
            .arena_size()
            .saturating_sub(inner.unplayed_bytes + inner.ring.pending_bytes())
    }

    pub fn arena_size(&self) -> usize {
        self.inner.lock().ring.arena_size()
    }

    /// Number of descriptors currently on the read list (mirrors
    /// `pcmbuf_used_descs`).
    pub fn used_descriptors(&self) -> usize {
        self.inner.lock().pool.used_descriptors()
    }

    /// Total descriptor pool capacity (mirrors `pcmbuf_descs`).
    pub fn descriptor_count(&self) -> usize {
        self.inner.lock().pool.capacity()
    }

    pub fn unplayed_bytes(&self) -> usize {
        self.inner.lock().unplayed_bytes
    }

    pub fn is_crossfade_enabled(&self) -> bool {
        self.inner.lock().settings.crossfade != crate::types::CrossfadeMode::Off
    }

    /// Total underruns observed by the DMA callback (diagnostics only).
    pub fn underrun_count(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }

    pub(crate) fn record_underrun(&self) {
        let count = self.underruns.fetch_add(1, Ordering::Relaxed) + 1;
        if count % 1000 == 0 {
            warn!(total = count, "PCM buffer underrun");
        }
    }

    pub(crate) fn record_dma_lock_contention(&self) {
        let count = self.dma_lock_contentions.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(
            total = count,
            "DMA callback found the engine lock held; publishing silence for this tick"
        );
    }
}
