//! Beep synthesis: a short square wave synthesized directly into a scratch
//! span and mixed in via the voice mixer, for UI feedback tones with no
//! audio-file round trip.

use crate::engine::PcmBufferEngine;
use crate::types::{clip16, FRAME_BYTES};
use tracing::debug;

/// Peak amplitude for synthesized beeps, conservative enough not to clip
/// when mixed atop existing playback.
const BEEP_AMPLITUDE: i32 = 8_192;

impl PcmBufferEngine {
    /// Synthesize `duration_ms` of a square wave at `frequency_hz` and mix
    /// it into the live buffer. Returns `false` if the driver can't report
    /// a play position to mix against — per the voice mixer's contract,
    /// that's a skip, not an error.
    pub fn beep(&self, frequency_hz: u32, duration_ms: u32) -> bool {
        let freq = self.inner.lock().freq();
        let frame_count = (freq as u64 * duration_ms as u64 / 1000) as usize;
        let period_frames = (freq / frequency_hz.max(1)).max(1) as usize;

        let mut buf = vec![0u8; frame_count * FRAME_BYTES];
        for (frame_idx, frame) in buf.chunks_exact_mut(FRAME_BYTES).enumerate() {
            let phase = frame_idx % period_frames;
            let sample = if phase < period_frames / 2 {
                BEEP_AMPLITUDE
            } else {
                -BEEP_AMPLITUDE
            };
            let bytes = clip16(sample).to_le_bytes();
            frame[0..2].copy_from_slice(&bytes);
            frame[2..4].copy_from_slice(&bytes);
        }

        let played = self.mix_voice(&buf);
        if !played {
            debug!(
                frequency_hz,
                duration_ms, "beep skipped: no play position to mix against"
            );
        }
        played
    }
}
