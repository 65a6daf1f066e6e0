//! Buffer engine configuration.
//!
//! Unlike the wider player, this core has no TOML/database config of its
//! own — it is a library embedded by a host that already resolved its
//! settings. `Settings` is the plain struct the host hands in, validated
//! the same explicit-`Result` way the rest of the stack validates config.

use crate::error::ConfigError;
use crate::types::{CrossfadeMode, FRAME_BYTES};

/// Buffer engine configuration knobs.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Native playback sample rate (frames/sec/channel).
    pub native_frequency: u32,

    /// Automatic crossfade gating.
    pub crossfade: CrossfadeMode,

    /// Gap, in seconds, from trigger to first faded-in sample mixing.
    pub crossfade_fade_in_delay: f32,

    /// Length, in seconds, of the linear fade-in ramp.
    pub crossfade_fade_in_duration: f32,

    /// Offset, in seconds, from the end of buffered audio at which
    /// fade-out starts.
    pub crossfade_fade_out_delay: f32,

    /// Length, in seconds, of the linear fade-out ramp.
    pub crossfade_fade_out_duration: f32,

    /// If true, skip fade-out entirely and only additively mix the
    /// incoming track (pure mixmode).
    pub crossfade_fade_out_mixmode: bool,

    /// Consulted by the `Shuffle`/`ShuffleAndTrackSkip` crossfade modes.
    pub playlist_shuffle: bool,

    /// Memory-constrained builds size the arena to ~1s instead of several.
    pub memory_constrained: bool,
}

impl Settings {
    /// Reasonable desktop-class defaults: 44.1 kHz, 1s/1s crossfade.
    pub fn new(native_frequency: u32) -> Self {
        Settings {
            native_frequency,
            crossfade: CrossfadeMode::Off,
            crossfade_fade_in_delay: 0.0,
            crossfade_fade_in_duration: 1.0,
            crossfade_fade_out_delay: 0.0,
            crossfade_fade_out_duration: 1.0,
            crossfade_fade_out_mixmode: false,
            playlist_shuffle: false,
            memory_constrained: false,
        }
    }

    /// Reject non-finite/negative durations and an unusable sample rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.native_frequency == 0 {
            return Err(ConfigError::InvalidSampleRate(self.native_frequency));
        }

        for (field, value) in [
            ("crossfade_fade_in_delay", self.crossfade_fade_in_delay),
            ("crossfade_fade_in_duration", self.crossfade_fade_in_duration),
            ("crossfade_fade_out_delay", self.crossfade_fade_out_delay),
            ("crossfade_fade_out_duration", self.crossfade_fade_out_duration),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDuration { field, value });
            }
        }

        Ok(())
    }

    /// Arena duration in seconds per Design §3: enough to hold 2s headroom
    /// plus the full fade-out delay/duration, or 1s flat on small-memory
    /// builds where crossfade granularity matters less than footprint.
    pub(crate) fn arena_seconds(&self) -> f32 {
        if self.memory_constrained {
            1.0
        } else {
            2.0 + self.crossfade_fade_out_delay + self.crossfade_fade_out_duration + 1.0
        }
    }

    /// Occupancy, in bytes, above which the producer releases its CPU
    /// boost request. Overridden to "nearly full" when crossfade is on,
    /// so there's always enough tail to fade.
    pub(crate) fn watermark_bytes(&self, arena_size: usize) -> usize {
        if self.crossfade != CrossfadeMode::Off {
            return arena_size.saturating_sub(self.native_frequency as usize * FRAME_BYTES);
        }
        if self.memory_constrained {
            (self.native_frequency as usize * FRAME_BYTES) / 4
        } else {
            self.native_frequency as usize * FRAME_BYTES * 2
        }
    }
}
