//! Narrow contract toward the hardware DMA sink.
//!
//! The engine never talks to an audio device directly — decoding,
//! resampling, and device binding live outside this crate. `PcmDriver` is
//! the only surface it needs: start/stop/pause a fixed-rate stream and
//! report how much it has buffered internally.

/// Hardware (or simulated) PCM output sink.
///
/// Implementors run the actual DMA/stream; the engine calls into this trait
/// from the producer thread to start/stop/pause playback and to query
/// driver-side occupancy for latency reporting. The completion callback
/// itself is invoked by the implementor from whatever context models the
/// hardware interrupt — the engine's [`crate::engine::PcmBufferEngine::dma_callback`]
/// is what it should call.
pub trait PcmDriver: Send + Sync {
    /// Begin (or resume) streaming. `addr`/`size` describe the first chunk
    /// to play, taken from the engine's arena.
    fn play_data(&self, addr: usize, size: usize);

    /// Hard stop; any in-flight chunk is abandoned.
    fn play_stop(&self);

    /// Pause or resume without losing the current position.
    fn play_pause(&self, pause: bool);

    fn is_playing(&self) -> bool;

    fn is_paused(&self) -> bool;

    /// Bytes the driver itself still holds (e.g. in a hardware FIFO),
    /// counted toward [`crate::engine::PcmBufferEngine::latency`].
    fn bytes_waiting(&self) -> usize;

    /// Byte offset into the currently-playing chunk the driver has
    /// actually reached, if the platform can report it. Used by the beep
    /// path to overlay a tone a few milliseconds ahead of the play point.
    /// `None` on platforms without a peak-buffer probe — the beep path
    /// treats that as "skip the live overlay", not as an error.
    fn peak_offset(&self) -> Option<usize> {
        None
    }
}
