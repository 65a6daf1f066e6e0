//! Crossfade & mix engine: fades the buffered tail of an outgoing track in
//! place, then additively mixes the head of the incoming track over it
//! with a rising gain ramp until the fade-in window closes.

use super::EngineInner;
use crate::engine::{CrossfadeState, PcmBufferEngine};
use crate::types::{clip16, FRAME_BYTES};
use tracing::debug;

/// Gain steps are held constant within this span and stepped between
/// spans, rather than recomputed every frame.
const FADE_QUANTUM_MS: u32 = 100;

impl PcmBufferEngine {
    /// Arm the crossfade ahead of a detected track boundary. Idempotent.
    pub fn crossfade_init(&self) {
        let mut inner = self.inner.lock();
        if inner.crossfade.init {
            return;
        }
        inner.crossfade.init = true;
        let freq = inner.freq();
        let fade_in_total =
            (inner.settings.crossfade_fade_in_duration * freq as f32) as usize * FRAME_BYTES;
        inner.crossfade.fade_in_total = fade_in_total.max(FRAME_BYTES);
        debug!(fade_in_total, "crossfade armed");
    }

    pub fn is_crossfade_active(&self) -> bool {
        self.inner.lock().crossfade.active
    }

    /// Fade out the buffered tail of the outgoing track in place (unless
    /// running in pure mixmode) and open the fade-in window for the
    /// incoming track. Returns `false` if there isn't enough buffered
    /// audio to fade over — the track was too short, and the caller should
    /// fall back to a hard cut.
    pub fn crossfade_start(&self) -> bool {
        let mut inner = self.inner.lock();
        if !inner.crossfade.init || inner.crossfade.active {
            return false;
        }

        let freq = inner.freq();
        let fade_out_total =
            (inner.settings.crossfade_fade_out_duration * freq as f32) as usize * FRAME_BYTES;
        let fade_out_total = fade_out_total.max(FRAME_BYTES);

        if inner.pool.read_list_bytes() < fade_out_total {
            inner.crossfade.init = false;
            return false;
        }

        if !inner.settings.crossfade_fade_out_mixmode {
            fade_out_tail(&mut inner, fade_out_total);
        }

        inner.crossfade.active = true;
        inner.crossfade.manual = false;
        inner.crossfade.chunk = inner.pool.read_tail();
        inner.crossfade.sample = 0;
        inner.crossfade.fade_in_rem = inner.crossfade.fade_in_total;
        inner.track_transition = true;
        debug!(fade_out_total, "crossfade started");
        true
    }

    /// Additively mix `data` (frame-aligned PCM) into the buffered tail of
    /// the outgoing track instead of appending a fresh chunk, ramping the
    /// incoming track's gain up from silence. Returns the number of bytes
    /// consumed; once the fade-in window closes the caller resumes normal
    /// commits for anything left over.
    pub(crate) fn mix_fade_in(inner: &mut EngineInner, data: &[u8]) -> usize {
        let Some(mut chunk) = inner.crossfade.chunk else {
            inner.crossfade.active = false;
            return 0;
        };

        let quantum_frames =
            (inner.freq().max(1) as usize * FADE_QUANTUM_MS as usize / 1000).max(1);
        let total_frames = (inner.crossfade.fade_in_total / FRAME_BYTES).max(1);
        let total_quanta = total_frames.div_ceil(quantum_frames).max(1);
        let mut remaining_frames = inner.crossfade.fade_in_rem / FRAME_BYTES;
        let mut done_frames = total_frames - remaining_frames;

        let mut consumed = 0usize;
        for frame in data.chunks_exact(FRAME_BYTES) {
            if remaining_frames == 0 {
                break;
            }

            let byte_offset = loop {
                let desc = inner.pool.descriptor(chunk);
                let offset = desc.addr + inner.crossfade.sample * FRAME_BYTES;
                if offset + FRAME_BYTES <= desc.addr + desc.size {
                    break Some(offset);
                }
                match desc.link {
                    Some(next) => {
                        chunk = next;
                        inner.crossfade.chunk = Some(next);
                        inner.crossfade.sample = 0;
                    }
                    None => break None,
                }
            };
            let Some(byte_offset) = byte_offset else { break };

            let quantum = done_frames / quantum_frames;
            let ramp = (quantum * 256 / total_quanta).min(256) as i32;

            for ch in 0..2 {
                let off = byte_offset + ch * 2;
                let existing =
                    i16::from_le_bytes(inner.ring.sample_slice(off, 2).try_into().unwrap());
                let incoming = i16::from_le_bytes([frame[ch * 2], frame[ch * 2 + 1]]);
                let mixed = existing as i32 + ((incoming as i32 * ramp) >> 8);
                inner
                    .ring
                    .sample_slice_mut(off, 2)
                    .copy_from_slice(&clip16(mixed).to_le_bytes());
            }

            inner.crossfade.sample += 1;
            consumed += FRAME_BYTES;
            remaining_frames -= 1;
            done_frames += 1;
        }

        inner.crossfade.fade_in_rem = remaining_frames * FRAME_BYTES;
        if remaining_frames == 0 {
            inner.crossfade.active = false;
            inner.crossfade.init = false;
            inner.track_transition = false;
            debug!("crossfade fade-in complete");
        }
        consumed
    }

    /// Discard everything buffered past the current DMA chunk and begin
    /// the new track with no fade — used for a manual track-skip while a
    /// crossfade is already in progress.
    pub fn crossfade_flush(&self) {
        let mut inner = self.inner.lock();
        inner.crossfade = CrossfadeState::idle();
        inner.flush_pending = true;
    }
}

/// Attenuate the last `fade_bytes` of the read list toward silence,
/// in-place, stepping the gain once per [`FADE_QUANTUM_MS`] span.
fn fade_out_tail(inner: &mut EngineInner, fade_bytes: usize) {
    let quantum_frames = (inner.freq().max(1) as usize * FADE_QUANTUM_MS as usize / 1000).max(1);
    let total_frames = (fade_bytes / FRAME_BYTES).max(1);
    let total_quanta = total_frames.div_ceil(quantum_frames).max(1);

    let spans = collect_tail_spans(inner, fade_bytes);
    let mut frame_idx = 0usize;
    for (addr, size) in spans {
        let frame_count = size / FRAME_BYTES;
        for frame in 0..frame_count {
            let quantum = frame_idx / quantum_frames;
            let ramp = (256 - (quantum * 256 / total_quanta).min(256)) as i32;
            let byte_offset = addr + frame * FRAME_BYTES;
            for ch in 0..2 {
                let off = byte_offset + ch * 2;
                let sample =
                    i16::from_le_bytes(inner.ring.sample_slice(off, 2).try_into().unwrap());
                let scaled = clip16((sample as i32 * ramp) >> 8);
                inner
                    .ring
                    .sample_slice_mut(off, 2)
                    .copy_from_slice(&scaled.to_le_bytes());
            }
            frame_idx += 1;
        }
    }
}

/// `(addr, size)` spans covering the last `fade_bytes` of the read list,
/// in playback order.
fn collect_tail_spans(inner: &EngineInner, fade_bytes: usize) -> Vec<(usize, usize)> {
    let total = inner.pool.read_list_bytes();
    let skip = total.saturating_sub(fade_bytes);

    let mut spans = Vec::new();
    let mut cursor = inner.pool.read_head();
    let mut walked = 0usize;
    while let Some(handle) = cursor {
        let desc = inner.pool.descriptor(handle);
        if walked + desc.size > skip {
            let start_in_chunk = skip.saturating_sub(walked);
            spans.push((desc.addr + start_in_chunk, desc.size - start_in_chunk));
        }
        walked += desc.size;
        cursor = desc.link;
    }
    spans
}
