//! Narrow contract back toward the track-sequencing layer.
//!
//! Playlist/queue management is out of scope for this core; it only needs
//! to be told when a track has actually finished draining through DMA, and
//! to report how far playback has advanced within a track transition.

/// Callbacks the engine fires as chunks are retired.
pub trait AudioSupervisor: Send + Sync {
    /// The chunk carrying `end_of_track` has been fully handed to the
    /// driver; the track is done from the buffer's point of view.
    fn track_finished(&self);

    /// Called during an in-progress track transition as each retired
    /// chunk's bytes are accounted for, so the supervisor can keep its own
    /// playback-position estimate in sync with what's actually been sent
    /// to hardware.
    fn position_advance(&self, bytes: usize);
}
