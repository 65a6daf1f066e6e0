//! Property tests for the chunk pool and ring allocator's core invariants.

use pcm_bufferengine::pool::Pool;
use pcm_bufferengine::ring::Ring;
use pcm_bufferengine::types::clip16;
use proptest::prelude::*;

proptest! {
    /// P1: the free list never permanently exhausts — every descriptor
    /// handed out and later retired becomes allocatable again.
    #[test]
    fn pool_free_list_recovers_after_full_drain(capacity in 2usize..64, cycles in 1usize..8) {
        let mut pool = Pool::new(capacity);
        let expected_allocatable = capacity - 1;

        for _ in 0..cycles {
            let mut handles = Vec::new();
            while let Some(h) = pool.alloc() {
                handles.push(h);
            }
            prop_assert_eq!(handles.len(), expected_allocatable);

            for h in &handles {
                pool.commit(*h, 0, 4, false);
            }
            while pool.retire_head().is_some() {}

            prop_assert!(!pool.is_write_exhausted());
        }
    }

    /// P2: chunks retire in the same order they were committed (FIFO).
    #[test]
    fn pool_retires_fifo(sizes in prop::collection::vec(4usize..=4096, 1..20)) {
        let mut pool = Pool::new(sizes.len() + 2);
        let mut committed = Vec::new();

        for (i, &size) in sizes.iter().enumerate() {
            let frame_aligned = size - size % 4;
            let handle = pool.alloc().expect("pool sized for every element");
            pool.commit(handle, i * 4096, frame_aligned.max(4), false);
            committed.push(frame_aligned.max(4));
        }

        for expected_size in committed {
            let (_, desc) = pool.retire_head().expect("as many retires as commits");
            prop_assert_eq!(desc.size, expected_size);
        }
        prop_assert!(pool.retire_head().is_none());
    }

    /// P3: total bytes on the read list always equals the sum of the
    /// sizes of its member descriptors (no double-counting, no loss).
    #[test]
    fn pool_read_list_bytes_matches_descriptor_sum(sizes in prop::collection::vec(4usize..=8192, 0..16)) {
        let mut pool = Pool::new(sizes.len() + 2);
        let mut total = 0usize;
        for (i, &size) in sizes.iter().enumerate() {
            let frame_aligned = (size - size % 4).max(4);
            let handle = pool.alloc().unwrap();
            pool.commit(handle, i * 8192, frame_aligned, false);
            total += frame_aligned;
        }
        prop_assert_eq!(pool.read_list_bytes(), total);
        prop_assert_eq!(pool.used_descriptors(), sizes.len());
    }

    /// P4: the ring allocator never hands out a committed span that
    /// overruns the arena, and cumulative committed bytes across a wrap
    /// cycle never exceed the arena size between wraps.
    #[test]
    fn ring_commits_stay_in_bounds(arena_size in 8192usize..(1 << 18), writes in prop::collection::vec(1usize..4096, 1..40)) {
        let mut ring = Ring::new(vec![0u8; arena_size].into_boxed_slice());

        for &want in &writes {
            if ring.should_wrap() {
                ring.wrap_to_start();
            }
            let len = want.min(ring.contiguous_remaining());
            if len == 0 {
                continue;
            }
            {
                let buf = ring.reserve_mut(len);
                prop_assert_eq!(buf.len(), len);
            }
            ring.grow_pending(len);
            let (addr, size) = ring.commit_pending();
            prop_assert!(addr + size <= arena_size);
        }
    }

    /// P5: `clip16` is idempotent on its own output and never produces a
    /// value outside the signed 16-bit range regardless of input.
    #[test]
    fn clip16_is_total_and_idempotent(x in any::<i32>()) {
        let once = clip16(x);
        let twice = clip16(once as i32);
        prop_assert_eq!(once, twice);
    }
}
