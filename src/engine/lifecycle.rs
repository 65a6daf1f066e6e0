//! Lifecycle control: start/stop/pause and buffer health reporting.

use crate::engine::{CrossfadeState, PcmBufferEngine, VoiceState};
use crate::types::FRAME_BYTES;
use tracing::info;

impl PcmBufferEngine {
    /// Kick off playback from a cold buffer by publishing the first
    /// buffered chunk to the driver directly, rather than waiting for a
    /// DMA tick that will never come unsolicited. Returns `false` if
    /// nothing is buffered yet.
    pub fn play_start(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.dma_running {
            return true;
        }
        match inner.pool.read_head() {
            Some(handle) => {
                let desc = inner.pool.descriptor(handle);
                self.driver.play_data(desc.addr, desc.size);
                inner.dma_running = true;
                info!(bytes = desc.size, "playback started");
                true
            }
            None => false,
        }
    }

    /// Hard stop: abandon the driver, discard every buffered chunk, and
    /// reset crossfade/voice state back to idle.
    pub fn play_stop(&self) {
        let mut inner = self.inner.lock();
        self.driver.play_stop();
        let discarded = inner.pool.discard_read_list();
        inner.unplayed_bytes = inner.unplayed_bytes.saturating_sub(discarded);
        inner.dma_running = false;
        inner.crossfade = CrossfadeState::idle();
        inner.voice = VoiceState::idle();
        inner.flush_pending = false;
        inner.end_of_track_pending = false;
        inner.track_transition = false;
        info!(discarded, "playback stopped");
    }

    pub fn pause(&self, pause: bool) {
        self.driver.play_pause(pause);
    }

    pub fn is_paused(&self) -> bool {
        self.driver.is_paused()
    }

    /// `true` once buffered occupancy has fallen below the configured
    /// watermark and the producer should be prioritized.
    pub fn is_low_data(&self) -> bool {
        let inner = self.inner.lock();
        inner.unplayed_bytes < inner.settings.watermark_bytes(inner.ring.arena_size())
    }

    /// Estimated end-to-end latency in milliseconds: buffered-but-unplayed
    /// bytes plus whatever the driver itself is still holding.
    pub fn latency_ms(&self) -> u32 {
        let inner = self.inner.lock();
        let bytes = inner.unplayed_bytes as u64 + self.driver.bytes_waiting() as u64;
        let freq = inner.freq().max(1) as u64;
        ((bytes * 1000) / (freq * FRAME_BYTES as u64)) as u32
    }

    /// Arm standalone end-of-track so the next retire still notifies the
    /// supervisor even if the final descriptor's own copy of the flag
    /// didn't survive (e.g. it was merged away during a flush).
    pub fn mark_end_of_track(&self) {
        self.inner.lock().end_of_track_pending = true;
    }
}
