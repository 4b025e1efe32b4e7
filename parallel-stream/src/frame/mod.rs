//! Frame storage and the producer/ISR hand-off.
//!
//! A [`Frame`] is one transmission unit: `F` 16-bit samples in bus wiring
//! order. [`FrameHandoff`] owns the two frames of the double buffer and the
//! [`ReadySignal`](crate::sync::ReadySignal) that passes them between the
//! producer task and the refill ISR.

mod handoff;

pub use handoff::{FrameClaim, FrameHandoff, FrameReader, FrameWriter};

use crate::generator::Sample;

/// `F` samples, 4-byte aligned so the bus DMA can read whole words.
#[repr(C, align(4))]
#[derive(Clone, PartialEq, Eq)]
pub struct Frame<const F: usize> {
    samples: [u16; F],
}

impl<const F: usize> Frame<F> {
    /// Frame size in bytes.
    pub const BYTES: usize = F * 2;

    /// Create a frame of silence.
    ///
    /// # Panics
    ///
    /// `F` must be even and at least 2, so that every wired slot stays inside
    /// the frame. Evaluated at compile time when used in a `const` context.
    pub const fn zeroed() -> Self {
        assert!(F >= 2 && F % 2 == 0, "frame size must be even and at least 2");
        Frame { samples: [0; F] }
    }

    /// Samples in memory (wiring) order.
    pub fn samples(&self) -> &[u16; F] {
        &self.samples
    }

    /// Mutable access to the samples in memory order.
    pub fn samples_mut(&mut self) -> &mut [u16; F] {
        &mut self.samples
    }

    /// Store a generated sample at its wired slot.
    pub fn write(&mut self, sample: Sample) {
        self.samples[sample.wire_slot()] = sample.value;
    }

    /// Overwrite every sample with zero.
    pub fn silence(&mut self) {
        self.samples.fill(0);
    }

    /// Whether every sample is zero.
    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0)
    }

    /// Copy the frame into driver memory as little-endian 16-bit words.
    ///
    /// Bytes of `dest` beyond the frame are zeroed. Returns the number of
    /// bytes copied from the frame. `dest` must hold at least
    /// [`BYTES`](Self::BYTES); in release builds a shorter buffer receives
    /// only the leading samples.
    pub fn copy_to(&self, dest: &mut [u8]) -> usize {
        debug_assert!(
            dest.len() >= Self::BYTES,
            "driver buffer shorter than frame: {} < {}",
            dest.len(),
            Self::BYTES
        );
        let mut copied = 0;
        for (word, &sample) in dest.chunks_exact_mut(2).zip(self.samples.iter()) {
            word.copy_from_slice(&sample.to_le_bytes());
            copied += 2;
        }
        dest[copied..].fill(0);
        copied
    }
}

impl<const F: usize> Default for Frame<F> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<const F: usize> core::fmt::Debug for Frame<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Frame")
            .field("samples", &F)
            .field("first", &self.samples[0])
            .field("last", &self.samples[F - 1])
            .finish()
    }
}
