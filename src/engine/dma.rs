//! DMA callback path: the audio interrupt driver calls this to report that
//! it just finished playing a chunk and to learn what's next.
//!
//! Must never block. `try_lock` models that constraint: if some other
//! thread is holding the engine lock when this fires, the driver contract
//! has already been violated elsewhere, and the only safe response left is
//! to publish silence for this tick and record the contention.

use super::EngineInner;
use crate::engine::PcmBufferEngine;
use tracing::trace;

impl PcmBufferEngine {
    /// Retire the chunk that just finished, commit any trailing bytes the
    /// producer queued behind it, and hand the driver the next chunk to
    /// play (or stop it if the buffer has run dry).
    pub fn dma_callback(&self) {
        let Some(mut inner) = self.inner.try_lock() else {
            self.record_dma_lock_contention();
            self.driver.play_stop();
            return;
        };

        self.retire_phase(&mut inner);
        self.trailing_commit_phase(&mut inner);
        self.publish_phase(&mut inner);
    }

    fn retire_phase(&self, inner: &mut EngineInner) {
        if let Some((_, desc)) = inner.pool.retire_head() {
            inner.unplayed_bytes = inner.unplayed_bytes.saturating_sub(desc.size);

            if inner.track_transition {
                self.supervisor.position_advance(desc.size);
            }

            if desc.end_of_track || inner.end_of_track_pending {
                inner.end_of_track_pending = false;
                inner.track_transition = false;
                self.supervisor.track_finished();
                trace!("track finished draining");
            }
        }
    }

    /// In low-latency mode, flush any pending (reserved-but-not-yet-
    /// committed) bytes still sitting at the ring's write cursor so they
    /// become visible to this tick's publish phase instead of waiting on
    /// the next producer write.
    fn trailing_commit_phase(&self, inner: &mut EngineInner) {
        if !inner.low_latency_mode || inner.ring.pending_bytes() == 0 {
            return;
        }
        let (addr, size) = inner.ring.commit_pending();
        if let Some(handle) = inner.pool.alloc() {
            inner.pool.commit(handle, addr, size, false);
            inner.unplayed_bytes += size;
        }
    }

    fn publish_phase(&self, inner: &mut EngineInner) {
        match inner.pool.read_head() {
            Some(handle) => {
                let desc = inner.pool.descriptor(handle);
                self.driver.play_data(desc.addr, desc.size);
                inner.dma_running = true;
            }
            None => {
                if inner.dma_running {
                    self.record_underrun();
                }
                inner.dma_running = false;
                self.driver.play_stop();
            }
        }
    }
}
