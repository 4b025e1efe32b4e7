//! Calibration ramp generator.
//!
//! The stream carries a 16-bit sawtooth: the sample at position `p` has value
//! `p`, and positions run through the full `u16` range before wrapping back
//! to zero. Everything here is a pure function of the position so the
//! waveform can be checked without any hand-off machinery.
//!
//! ## Bus wiring
//!
//! The I2S parallel peripheral transmits each 32-bit word with its two 16-bit
//! halves swapped, so `[A, B, C, D]` in memory appears on the bus as
//! `[B, A, D, C]`. Samples are therefore stored at [`wire_slot()`] (the slot
//! with bit 0 flipped) to come out of the bus in position order.

use core::iter::FusedIterator;

/// One generated sample and where it lands in its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Position within the current ramp pass.
    pub position: u16,
    /// Logical slot inside the frame (`position mod F`).
    pub slot: usize,
    /// Sample value.
    pub value: u16,
}

impl Sample {
    /// Whether this sample opens a new frame.
    pub const fn starts_frame(&self) -> bool {
        self.slot == 0
    }

    /// Index in frame memory after the bus wiring transform.
    pub const fn wire_slot(&self) -> usize {
        wire_slot(self.slot)
    }
}

/// Slot of `position` within a frame of `frame_samples` samples.
///
/// # Panics
///
/// Panics if `frame_samples` is 0.
pub const fn slot(position: u16, frame_samples: usize) -> usize {
    position as usize % frame_samples
}

/// Sample value at `position`.
pub const fn value(position: u16) -> u16 {
    position
}

/// Map a logical slot to its index in frame memory.
///
/// Flips bit 0, so applying it twice returns the original slot.
pub const fn wire_slot(slot: usize) -> usize {
    slot ^ 1
}

/// Compute the sample at `position` for frames of `F` samples.
///
/// # Panics
///
/// Panics if `F` is 0.
pub const fn sample<const F: usize>(position: u16) -> Sample {
    Sample {
        position,
        slot: slot(position, F),
        value: value(position),
    }
}

/// Endless ramp over all 16-bit positions, restarting at 0 after 65535.
///
/// # Panics
///
/// `F` must be even and at least 2, the same constraint as
/// [`Frame`](crate::frame::Frame). Checked by [`Ramp::new()`].
#[derive(Debug, Clone)]
pub struct Ramp<const F: usize> {
    position: u16,
}

impl<const F: usize> Ramp<F> {
    /// Start a ramp at position 0.
    pub const fn new() -> Self {
        assert!(F >= 2 && F % 2 == 0, "frame size must be even and at least 2");
        Ramp { position: 0 }
    }

    /// The sample the next call to [`next()`](Iterator::next) will yield.
    pub const fn peek(&self) -> Sample {
        sample::<F>(self.position)
    }

    /// Move to the following position, wrapping after 65535.
    pub fn advance(&mut self) {
        self.position = self.position.wrapping_add(1);
    }

    /// Restart the pass at position 0.
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

impl<const F: usize> Default for Ramp<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const F: usize> Iterator for Ramp<F> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        let sample = self.peek();
        self.advance();
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<const F: usize> FusedIterator for Ramp<F> {}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::constants::{FRAME_SAMPLES, RAMP_PERIOD};
    use std::vec::Vec;

    #[test]
    fn slot_and_value_over_full_range() {
        for p in 0..=u16::MAX {
            let s = sample::<FRAME_SAMPLES>(p);
            assert_eq!(s.slot, p as usize % FRAME_SAMPLES);
            assert_eq!(s.value as usize, p as usize % RAMP_PERIOD);
            assert_eq!(s.position, p);
        }
    }

    #[test]
    fn wire_slot_flips_bit_zero() {
        assert_eq!(wire_slot(0), 1);
        assert_eq!(wire_slot(1), 0);
        assert_eq!(wire_slot(2), 3);
        assert_eq!(wire_slot(1023), 1022);
    }

    #[test]
    fn wire_slot_is_an_involution() {
        for s in 0..FRAME_SAMPLES {
            assert_eq!(wire_slot(wire_slot(s)), s);
            assert!(wire_slot(s) < FRAME_SAMPLES);
        }
    }

    #[test]
    fn frame_starts_every_frame_size() {
        let starts = Ramp::<8>::new()
            .take(64)
            .filter(Sample::starts_frame)
            .map(|s| s.position)
            .collect::<Vec<_>>();
        assert_eq!(starts, [0, 8, 16, 24, 32, 40, 48, 56]);
    }

    #[test]
    fn ramp_wraps_after_last_position() {
        let mut ramp = Ramp::<FRAME_SAMPLES>::new();
        for _ in 0..u16::MAX {
            ramp.advance();
        }
        assert_eq!(ramp.next().map(|s| s.value), Some(u16::MAX));
        let wrapped = ramp.next().unwrap();
        assert_eq!(wrapped.position, 0);
        assert!(wrapped.starts_frame());
    }

    #[test]
    fn ramp_is_periodic() {
        let mut ramp = Ramp::<FRAME_SAMPLES>::new();
        let first_pass_start: [Sample; 16] = core::array::from_fn(|_| ramp.next().unwrap());
        for _ in 16..RAMP_PERIOD {
            ramp.next();
        }
        let second_pass_start: [Sample; 16] = core::array::from_fn(|_| ramp.next().unwrap());
        assert_eq!(first_pass_start, second_pass_start);
    }

    #[test]
    fn reset_restarts_pass() {
        let mut ramp = Ramp::<4>::new();
        ramp.nth(10);
        ramp.reset();
        assert_eq!(ramp.peek(), sample::<4>(0));
    }

    #[test]
    #[should_panic(expected = "frame size must be even")]
    fn empty_frame_size_rejected() {
        let _ = Ramp::<0>::new();
    }

    #[test]
    #[should_panic(expected = "frame size must be even")]
    fn odd_frame_size_rejected() {
        let _ = Ramp::<5>::new();
    }

    #[test]
    fn partial_last_frame_when_size_does_not_divide_period() {
        // 65536 % 6 == 4: the last frame of a pass is cut short and the next
        // pass opens a fresh frame at position 0.
        assert_eq!(slot(u16::MAX, 6), 3);
        assert!(sample::<6>(0).starts_frame());
    }
}
