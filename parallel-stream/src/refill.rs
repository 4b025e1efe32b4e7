//! Interrupt-context refill of the bus driver's transmit memory.
//!
//! The bus driver calls [`Refill::refill()`] from its DMA interrupt each time
//! it needs the next chunk of data. [`RefillCallback`] answers with the frame
//! the producer most recently published, or with silence if the producer has
//! fallen behind.
//!
//! ```text
//! Producer task            FrameHandoff              Bus ISR
//! ┌───────────┐  publish  ┌──────────────┐  claim   ┌──────────────┐
//! │ fill back ├──────────►│ token + frame├─────────►│ copy → DMA   │
//! │   frame   │◄──────────┤              │◄─────────┤ or zero fill │
//! └───────────┘   wake    └──────────────┘ release  └──────────────┘
//! ```
//!
//! ## Usage from an ISR
//!
//! ```ignore
//! // In the bus driver's "buffer needed" interrupt:
//! if let RefillOutcome::Filled { yield_requested: true } = refill.refill(dma_buf) {
//!     // Ask the scheduler to switch to the woken producer on ISR exit.
//! }
//! ```

use crate::frame::FrameReader;

/// What a refill put into the driver buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefillOutcome {
    /// The published frame was copied in.
    Filled {
        /// The producer was parked waiting for this frame to be taken and has
        /// been woken; the ISR should request a context switch on return.
        yield_requested: bool,
    },
    /// No frame was ready; the buffer was zero filled.
    Underrun,
}

/// Callback invoked by a bus driver from interrupt context.
///
/// Implementations must not block or allocate.
pub trait Refill {
    /// Fill `buf` (the driver's transmit memory) with the next chunk.
    fn refill(&mut self, buf: &mut [u8]) -> RefillOutcome;
}

/// Refill callback backed by the ISR side of a [`FrameHandoff`](crate::frame::FrameHandoff).
pub struct RefillCallback<'a, const F: usize> {
    reader: FrameReader<'a, F>,
    underruns: u32,
}

impl<'a, const F: usize> RefillCallback<'a, F> {
    /// Wrap the reader endpoint of a hand-off.
    pub fn new(reader: FrameReader<'a, F>) -> Self {
        RefillCallback {
            reader,
            underruns: 0,
        }
    }

    /// Number of refills that found no frame ready (wraps on overflow).
    pub fn underruns(&self) -> u32 {
        self.underruns
    }
}

impl<const F: usize> Refill for RefillCallback<'_, F> {
    fn refill(&mut self, buf: &mut [u8]) -> RefillOutcome {
        match self.reader.try_claim() {
            Some(claim) => {
                claim.frame().copy_to(buf);
                // Releasing only after the copy keeps the producer off this
                // frame until the driver has its own copy.
                let received = claim.release();
                RefillOutcome::Filled {
                    yield_requested: received.woke_task,
                }
            }
            None => {
                buf.fill(0);
                self.underruns = self.underruns.wrapping_add(1);
                RefillOutcome::Underrun
            }
        }
    }
}
