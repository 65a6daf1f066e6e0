//! # PCM Buffer Engine
//!
//! The chunk-descriptor/byte-arena ring buffer sitting between
//! variable-rate audio decoders and a fixed-rate DMA hardware sink.
//!
//! **Purpose:** absorb decoder jitter, hand fixed chunks to a hardware
//! driver on demand, and perform sample-accurate crossfading and a small
//! voice/beep overlay mixer, all without allocating or blocking on the
//! DMA-callback path.
//!
//! **Architecture:** a fixed pool of chunk descriptors linked into a read
//! (FIFO) and a write (free) list, addressing spans of a single
//! producer/consumer byte ring. See [`engine`] for the component that ties
//! pool, ring, and mix state together behind one lock.

pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod pool;
pub mod power;
pub mod ring;
pub mod supervisor;
pub mod types;

pub use config::Settings;
pub use engine::PcmBufferEngine;
pub use error::{ConfigError, PcmBufError, Result};
