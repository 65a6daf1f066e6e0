//! Byte-ring allocator over the PCM arena.
//!
//! Carves contiguous chunks out of a single wrap-around byte buffer. The
//! producer grows a pending (uncommitted) span at the write cursor via
//! [`Ring::grow_pending`], then [`Ring::commit_pending`] turns it into an
//! addressable span and advances the cursor, wrapping to the arena base
//! when the remaining contiguous run gets too small to be useful.

use crate::types::MIN_CHUNK;

pub struct Ring {
    arena: Box<[u8]>,
    write_pos: usize,
    fill_pos: usize,
}

impl Ring {
    pub fn new(arena: Box<[u8]>) -> Self {
        Ring {
            arena,
            write_pos: 0,
            fill_pos: 0,
        }
    }

    pub fn arena_size(&self) -> usize {
        self.arena.len()
    }

    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    pub fn pending_bytes(&self) -> usize {
        self.fill_pos
    }

    /// Byte offset one past the committed-but-not-yet-flushed span; this is
    /// where the next reservation begins.
    pub fn cursor(&self) -> usize {
        self.write_pos + self.fill_pos
    }

    /// Bytes available before the arena runs off the end (not wrapping).
    pub fn contiguous_remaining(&self) -> usize {
        self.arena.len() - self.cursor()
    }

    /// `true` when the remaining contiguous run is too small to bother
    /// with — the producer should commit what it has and wrap instead.
    pub fn should_wrap(&self) -> bool {
        self.contiguous_remaining() < MIN_CHUNK
    }

    pub fn wrap_to_start(&mut self) {
        debug_assert_eq!(self.fill_pos, 0, "wrap must follow a commit");
        self.write_pos = 0;
    }

    /// Mutable view of the next `len` bytes at the cursor, for the producer
    /// to write fresh samples into.
    pub fn reserve_mut(&mut self, len: usize) -> &mut [u8] {
        let start = self.cursor();
        &mut self.arena[start..start + len]
    }

    pub fn grow_pending(&mut self, bytes: usize) {
        self.fill_pos += bytes;
    }

    /// Turn the pending span into a committed one, returning its
    /// `(addr, size)`, and advance the ring cursor past it.
    pub fn commit_pending(&mut self) -> (usize, usize) {
        let addr = self.write_pos;
        let size = self.fill_pos;
        self.write_pos = (self.write_pos + self.fill_pos) % self.arena.len().max(1);
        self.fill_pos = 0;
        (addr, size)
    }

    pub fn sample_slice(&self, addr: usize, size: usize) -> &[u8] {
        &self.arena[addr..addr + size]
    }

    pub fn sample_slice_mut(&mut self, addr: usize, size: usize) -> &mut [u8] {
        &mut self.arena[addr..addr + size]
    }
}
