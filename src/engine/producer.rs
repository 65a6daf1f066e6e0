//! Producer path: codec (and, during a crossfade, the next track's codec)
//! threads request buffer space and commit finished chunks here. Admission
//! control keeps the engine from overcommitting memory ahead of what DMA
//! can drain, and a CPU-boost policy engages when occupancy drops below
//! the configured watermark.

use super::EngineInner;
use crate::engine::PcmBufferEngine;
use crate::power::ThreadPriority;
use crate::types::{FRAME_BYTES, MIN_CHUNK, MIX_CHUNK, TARGET_CHUNK};

impl PcmBufferEngine {
    /// Ask for up to a target-sized span of arena space, call `fill` to
    /// populate it, and commit whatever `fill` actually wrote (rounded
    /// down to a whole frame). Returns `false` if the engine has no room
    /// right now — the caller should back off and retry once DMA has
    /// retired more chunks.
    ///
    /// While a crossfade's fade-in window is open, writes are routed
    /// through the mix engine instead of appended as a fresh chunk; once
    /// the window closes mid-call the remainder is committed normally.
    pub fn write_chunk<F>(&self, end_of_track: bool, fill: F) -> bool
    where
        F: FnOnce(&mut [u8]) -> usize,
    {
        let mut inner = self.inner.lock();

        if inner.crossfade.active {
            let mut tmp = [0u8; MIX_CHUNK];
            let written = fill(&mut inner.fade_scratch);
            let written = (written - written % FRAME_BYTES).min(MIX_CHUNK);
            tmp[..written].copy_from_slice(&inner.fade_scratch[..written]);

            let consumed = Self::mix_fade_in(&mut inner, &tmp[..written]);
            if consumed >= written {
                return true;
            }
            let remaining = written - consumed;
            return self.commit_into_ring(&mut inner, end_of_track, remaining, |buf| {
                buf[..remaining].copy_from_slice(&tmp[consumed..consumed + remaining]);
                remaining
            });
        }

        self.commit_into_ring(&mut inner, end_of_track, TARGET_CHUNK, fill)
    }

    /// Reserve up to `want` bytes in the ring (wrapping first if the
    /// remaining contiguous span is too small), hand them to `fill`, and
    /// commit whatever it wrote.
    fn commit_into_ring<F>(
        &self,
        inner: &mut EngineInner,
        end_of_track: bool,
        want: usize,
        fill: F,
    ) -> bool
    where
        F: FnOnce(&mut [u8]) -> usize,
    {
        if inner.pool.is_write_exhausted() {
            return false;
        }
        if inner.ring.should_wrap() {
            inner.ring.wrap_to_start();
        }

        let budget = want
            .min(inner.ring.contiguous_remaining())
            .min(free_bytes_locked(inner));
        if budget < MIN_CHUNK {
            return false;
        }

        let written = {
            let buf = inner.ring.reserve_mut(budget);
            fill(buf)
        };
        let written = written - written % FRAME_BYTES;
        if written == 0 {
            return false;
        }

        inner.ring.grow_pending(written);
        let (addr, size) = inner.ring.commit_pending();

        // Admission above already confirmed a free descriptor under this
        // same lock, so `alloc` cannot fail here.
        let handle = match inner.pool.alloc() {
            Some(h) => h,
            None => return false,
        };

        if inner.flush_pending {
            let discarded = inner.pool.splice_after_head(handle, addr, size, end_of_track);
            inner.unplayed_bytes = inner.unplayed_bytes.saturating_sub(discarded);
            inner.flush_pending = false;
        } else {
            inner.pool.commit(handle, addr, size, end_of_track);
        }

        inner.unplayed_bytes += size;
        inner.last_chunk_bytes = size;
        self.apply_boost_policy(inner);
        true
    }

    fn apply_boost_policy(&self, inner: &mut EngineInner) {
        let watermark = inner.settings.watermark_bytes(inner.ring.arena_size());
        let want_boost = inner.unplayed_bytes < watermark;
        if want_boost != inner.boosted {
            inner.boosted = want_boost;
            self.power.set_cpu_boost(want_boost);
            self.power.set_thread_priority(if want_boost {
                ThreadPriority::PlaybackMax
            } else {
                ThreadPriority::Playback
            });
        }
    }
}

fn free_bytes_locked(inner: &EngineInner) -> usize {
    inner
        .ring
        .arena_size()
        .saturating_sub(inner.unplayed_bytes + inner.ring.pending_bytes())
}
