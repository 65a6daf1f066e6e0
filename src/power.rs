//! Narrow contract toward platform CPU/thread scheduling hints.
//!
//! On platforms without a boost/priority facility this collapses to a
//! no-op implementation — the watermark-driven policy in
//! [`crate::engine::producer`] still runs, it just has nothing to call.

/// Priority tier requested for the codec/voice threads as occupancy drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadPriority {
    /// Normal playback priority.
    Playback,
    /// Elevated priority used when the buffer is critically low.
    PlaybackMax,
}

/// CPU-frequency/thread-priority hints driven by buffer occupancy.
pub trait SysPower: Send + Sync {
    /// Request (or release) a CPU frequency boost.
    fn set_cpu_boost(&self, boost: bool);

    /// Raise or lower the codec/voice thread priority tier.
    fn set_thread_priority(&self, priority: ThreadPriority);
}

/// Boost/priority hooks that do nothing — the correct choice on platforms
/// with no such facility, rather than emulating one with sleeps.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPower;

impl SysPower for NoopPower {
    fn set_cpu_boost(&self, _boost: bool) {}
    fn set_thread_priority(&self, _priority: ThreadPriority) {}
}
