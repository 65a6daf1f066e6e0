//! Chunk descriptor pool.
//!
//! Descriptors live in a fixed-capacity array and move between two
//! intrusive singly-linked lists addressed by [`ChunkHandle`] index:
//!
//! - the **read list** (FIFO): chunks committed by the producer, awaiting
//!   DMA. Producers append at `read_tail`; the DMA callback pops `read_head`.
//! - the **write list** (free list): descriptors not currently describing
//!   any audio. `write_tail` is a sentinel that is never handed out, so the
//!   write list can never be fully drained — `write_head == write_tail`
//!   means "no real free descriptor left", not "list is empty".
//!
//! Recycling a descriptor makes it the *new* sentinel tail and frees the
//! previous sentinel for reuse, which is what keeps the free list from ever
//! running out entirely: there is always exactly one unusable node, and it
//! moves.

use crate::types::{ChunkDescriptor, ChunkHandle};

pub struct Pool {
    descriptors: Vec<ChunkDescriptor>,
    read_head: Option<ChunkHandle>,
    read_tail: Option<ChunkHandle>,
    write_head: Option<ChunkHandle>,
    write_tail: Option<ChunkHandle>,
}

impl Pool {
    /// Build a pool of `capacity` descriptors, all initially free.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "pool needs at least one usable descriptor plus the sentinel");

        let mut descriptors = vec![ChunkDescriptor::empty(); capacity];
        for i in 0..capacity - 1 {
            descriptors[i].link = Some(ChunkHandle((i + 1) as u32));
        }

        Pool {
            descriptors,
            read_head: None,
            read_tail: None,
            write_head: Some(ChunkHandle(0)),
            write_tail: Some(ChunkHandle((capacity - 1) as u32)),
        }
    }

    pub fn descriptor(&self, handle: ChunkHandle) -> ChunkDescriptor {
        self.descriptors[handle.index()]
    }

    pub fn read_head(&self) -> Option<ChunkHandle> {
        self.read_head
    }

    pub fn read_tail(&self) -> Option<ChunkHandle> {
        self.read_tail
    }

    /// `true` once only the reserved sentinel remains on the free list —
    /// the producer must wait for a retire before it can commit again.
    pub fn is_write_exhausted(&self) -> bool {
        self.write_head == self.write_tail
    }

    /// Pull a descriptor off the free list. `None` if exhausted.
    pub fn alloc(&mut self) -> Option<ChunkHandle> {
        let head = self.write_head?;
        if self.is_write_exhausted() {
            return None;
        }
        self.write_head = self.descriptors[head.index()].link;
        Some(head)
    }

    fn recycle(&mut self, handle: ChunkHandle) {
        self.descriptors[handle.index()] = ChunkDescriptor::empty();
        let old_tail = self
            .write_tail
            .expect("write list always has a sentinel tail");
        self.descriptors[old_tail.index()].link = Some(handle);
        self.write_tail = Some(handle);
    }

    /// Fill `handle` with chunk data and append it to the read list.
    pub fn commit(&mut self, handle: ChunkHandle, addr: usize, size: usize, end_of_track: bool) {
        self.descriptors[handle.index()] = ChunkDescriptor {
            addr,
            size,
            link: None,
            end_of_track,
        };

        match self.read_tail {
            Some(tail) => self.descriptors[tail.index()].link = Some(handle),
            None => self.read_head = Some(handle),
        }
        self.read_tail = Some(handle);
    }

    /// Splice `handle` in immediately after the current read head, discarding
    /// (and recycling) everything that used to follow it. Used by the
    /// crossfade "flush" path to drop a buffered tail without fading it.
    /// Returns the number of bytes discarded.
    pub fn splice_after_head(
        &mut self,
        handle: ChunkHandle,
        addr: usize,
        size: usize,
        end_of_track: bool,
    ) -> usize {
        let Some(head) = self.read_head else {
            self.descriptors[handle.index()] = ChunkDescriptor {
                addr,
                size,
                link: None,
                end_of_track,
            };
            self.read_head = Some(handle);
            self.read_tail = Some(handle);
            return 0;
        };

        let old_next = self.descriptors[head.index()].link;
        self.descriptors[handle.index()] = ChunkDescriptor {
            addr,
            size,
            link: old_next,
            end_of_track,
        };
        self.descriptors[head.index()].link = Some(handle);

        if old_next.is_none() {
            self.read_tail = Some(handle);
            return 0;
        }

        let mut discarded = 0usize;
        let mut cursor = old_next;
        while let Some(node) = cursor {
            let desc = self.descriptors[node.index()];
            discarded += desc.size;
            cursor = desc.link;
            self.recycle(node);
        }
        self.read_tail = Some(handle);
        discarded
    }

    /// Pop the read head, recycle it, and hand back its old contents so the
    /// caller can inspect `end_of_track`/`size` before it's gone.
    pub fn retire_head(&mut self) -> Option<(ChunkHandle, ChunkDescriptor)> {
        let head = self.read_head?;
        let desc = self.descriptors[head.index()];
        self.read_head = desc.link;
        if self.read_head.is_none() {
            self.read_tail = None;
        }
        self.recycle(head);
        Some((head, desc))
    }

    /// Commit a chunk back onto the read list without touching the free
    /// list, used by the trailing-commit phase of the DMA callback.
    pub fn commit_trailing(&mut self, handle: ChunkHandle, addr: usize, size: usize, end_of_track: bool) {
        self.commit(handle, addr, size, end_of_track);
    }

    /// Total bytes currently on the read list (diagnostics / invariant checks).
    pub fn read_list_bytes(&self) -> usize {
        let mut total = 0;
        let mut cursor = self.read_head;
        while let Some(handle) = cursor {
            let desc = self.descriptors[handle.index()];
            total += desc.size;
            cursor = desc.link;
        }
        total
    }

    /// Number of descriptors currently on the read list.
    pub fn used_descriptors(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.read_head;
        while let Some(handle) = cursor {
            count += 1;
            cursor = self.descriptors[handle.index()].link;
        }
        count
    }

    /// Total descriptor count in the pool.
    pub fn capacity(&self) -> usize {
        self.descriptors.len()
    }

    /// Walk to the handle following `handle` on whatever list it's on.
    pub fn next(&self, handle: ChunkHandle) -> Option<ChunkHandle> {
        self.descriptors[handle.index()].link
    }

    /// Discard the whole read list back onto the free list (used by
    /// `play_stop`). Returns the total bytes reclaimed.
    pub fn discard_read_list(&mut self) -> usize {
        let mut total = 0;
        while let Some((_, desc)) = self.retire_head() {
            total += desc.size;
        }
        total
    }
}
