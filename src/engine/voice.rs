//! Voice mixer: overlays short spoken announcements or beeps onto whatever
//! is already buffered, a fixed [`MIX_CHUNK`] span ahead of the driver's
//! live play position so there's always room to mix before DMA reaches it.

use crate::engine::{EngineInner, PcmBufferEngine, VoiceState};
use crate::types::{clip16, ChunkHandle, FRAME_BYTES, MIX_CHUNK};

impl PcmBufferEngine {
    /// Mix `samples` (frame-aligned PCM) into the buffer starting just
    /// ahead of the driver's current play position. Returns `false` if
    /// there isn't enough buffered audio ahead of the play point to mix
    /// into, or the driver can't report a play position at all.
    pub fn mix_voice(&self, samples: &[u8]) -> bool {
        let mut inner = self.inner.lock();
        let Some(peak) = self.driver.peak_offset() else {
            return false;
        };

        let mut chunk = match inner.voice.chunk {
            Some(h) => h,
            None => match locate_chunk_ahead(&inner, peak) {
                Some((h, sample)) => {
                    inner.voice = VoiceState {
                        chunk: Some(h),
                        sample,
                    };
                    h
                }
                None => return false,
            },
        };

        let len = samples.len().min(MIX_CHUNK) & !(FRAME_BYTES - 1);
        let mut mixed = 0usize;

        for frame in samples[..len].chunks_exact(FRAME_BYTES) {
            let byte_offset = loop {
                let desc = inner.pool.descriptor(chunk);
                let offset = desc.addr + inner.voice.sample * FRAME_BYTES;
                if offset + FRAME_BYTES <= desc.addr + desc.size {
                    break Some(offset);
                }
                match desc.link {
                    Some(next) => {
                        chunk = next;
                        inner.voice.chunk = Some(next);
                        inner.voice.sample = 0;
                    }
                    None => break None,
                }
            };
            let Some(byte_offset) = byte_offset else { break };

            for ch in 0..2 {
                let off = byte_offset + ch * 2;
                let existing =
                    i16::from_le_bytes(inner.ring.sample_slice(off, 2).try_into().unwrap());
                let incoming = i16::from_le_bytes([frame[ch * 2], frame[ch * 2 + 1]]);
                let mixed_sample = clip16(existing as i32 + incoming as i32);
                inner
                    .ring
                    .sample_slice_mut(off, 2)
                    .copy_from_slice(&mixed_sample.to_le_bytes());
            }

            inner.voice.sample += 1;
            mixed += FRAME_BYTES;
        }

        mixed > 0
    }

    pub fn voice_reset(&self) {
        self.inner.lock().voice = VoiceState::idle();
    }
}

/// Walk forward from the read head to the chunk and in-chunk frame offset
/// sitting `MIX_CHUNK` bytes ahead of the driver's reported play position
/// (itself an offset into the head chunk), so the mix never catches up to
/// the live play point mid-write.
fn locate_chunk_ahead(inner: &EngineInner, peak_in_head: usize) -> Option<(ChunkHandle, usize)> {
    let mut cursor = inner.pool.read_head()?;
    let mut ahead = MIX_CHUNK + peak_in_head;
    loop {
        let desc = inner.pool.descriptor(cursor);
        if ahead < desc.size {
            return Some((cursor, ahead / FRAME_BYTES));
        }
        ahead -= desc.size;
        cursor = desc.link?;
    }
}
