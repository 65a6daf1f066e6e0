//! Shared test doubles for integration tests.

use pcm_bufferengine::driver::PcmDriver;
use pcm_bufferengine::power::{SysPower, ThreadPriority};
use pcm_bufferengine::supervisor::AudioSupervisor;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct MockDriver {
    pub playing: AtomicBool,
    pub paused: AtomicBool,
    pub last_play: Mutex<Option<(usize, usize)>>,
    pub stop_count: AtomicUsize,
    pub peak: Mutex<Option<usize>>,
}

impl PcmDriver for MockDriver {
    fn play_data(&self, addr: usize, size: usize) {
        self.playing.store(true, Ordering::SeqCst);
        *self.last_play.lock().unwrap() = Some((addr, size));
    }

    fn play_stop(&self) {
        self.playing.store(false, Ordering::SeqCst);
        self.stop_count.fetch_add(1, Ordering::SeqCst);
    }

    fn play_pause(&self, pause: bool) {
        self.paused.store(pause, Ordering::SeqCst);
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn bytes_waiting(&self) -> usize {
        0
    }

    fn peak_offset(&self) -> Option<usize> {
        *self.peak.lock().unwrap()
    }
}

#[derive(Default)]
pub struct MockSupervisor {
    pub finished_count: AtomicUsize,
    pub advanced_bytes: AtomicU64,
}

impl AudioSupervisor for MockSupervisor {
    fn track_finished(&self) {
        self.finished_count.fetch_add(1, Ordering::SeqCst);
    }

    fn position_advance(&self, bytes: usize) {
        self.advanced_bytes.fetch_add(bytes as u64, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MockPower {
    pub boosted: AtomicBool,
}

impl SysPower for MockPower {
    fn set_cpu_boost(&self, boost: bool) {
        self.boosted.store(boost, Ordering::SeqCst);
    }

    fn set_thread_priority(&self, _priority: ThreadPriority) {}
}

/// Fill `buf` with a constant byte pattern and return its full length, the
/// shape every test's `write_chunk` fill closure needs.
pub fn fill_with(byte: u8) -> impl Fn(&mut [u8]) -> usize {
    move |buf: &mut [u8]| {
        buf.fill(byte);
        buf.len()
    }
}
