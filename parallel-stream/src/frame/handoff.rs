//! Double-buffer ownership hand-off.
//!
//! [`FrameHandoff`] holds two frames and splits into exactly one
//! [`FrameWriter`] (producer task) and one [`FrameReader`] (refill ISR).
//!
//! ## Protocol
//!
//! Tokens on the [`ReadySignal`] alternate between the two frames. Each
//! [`FrameWriter::publish()`] posts the frame being filled and moves on to the
//! other one. The writer starts on frame 1, which the first token publishes
//! before any sample has been written:
//!
//! ```text
//! token:      0        1        2        3
//! publishes:  frame 1  frame 0  frame 1  frame 0   (reader alternates too)
//! then fills: frame 0  frame 1  frame 0  frame 1
//! ```
//!
//! Token `k` therefore publishes the frame completed during the previous
//! frame period; token 0 publishes the untouched zeroed frame (silence).
//! [`FrameWriter::publish()`] only completes once token `k - 1` has been
//! released, and the reader releases a token only after it has finished
//! copying the frame out. The frame the writer touches is never the one the
//! reader may be reading.
//!
//! ## Startup
//!
//! Until the reader has serviced its first refill the stream is not live and
//! [`FrameWriter::frame_mut()`] returns `None`. The producer drops samples
//! in that window but keeps publishing on schedule.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

use super::Frame;
use crate::sync::{Claim, ReadySignal, Received};

/// Two frames plus the signal that hands them between contexts.
///
/// Const-constructible so it can live in a `static` (for example behind a
/// `StaticCell`) for the lifetime of the program.
pub struct FrameHandoff<const F: usize> {
    frames: [UnsafeCell<Frame<F>>; 2],
    ready: ReadySignal,
    /// Set once the bus has pulled its first frame.
    live: AtomicBool,
}

// SAFETY: Frame memory is only reached through the single FrameWriter and the
// single FrameReader handed out by `split()`. The token protocol documented
// above guarantees they never access the same frame concurrently, and the
// signal's acquire/release ordering publishes frame contents between them.
unsafe impl<const F: usize> Sync for FrameHandoff<F> {}

impl<const F: usize> FrameHandoff<F> {
    /// Create a hand-off with both frames silent.
    pub const fn new() -> Self {
        FrameHandoff {
            frames: [
                UnsafeCell::new(Frame::zeroed()),
                UnsafeCell::new(Frame::zeroed()),
            ],
            ready: ReadySignal::new(),
            live: AtomicBool::new(false),
        }
    }

    /// Split into the producer and ISR endpoints.
    ///
    /// Resets the hand-off to its initial state: both frames silent, no
    /// token pending, stream not yet live.
    pub fn split(&mut self) -> (FrameWriter<'_, F>, FrameReader<'_, F>) {
        for frame in self.frames.iter_mut() {
            frame.get_mut().silence();
        }
        self.ready.reset();
        *self.live.get_mut() = false;

        let this = &*self;
        (
            FrameWriter {
                handoff: this,
                filling: 1,
            },
            FrameReader {
                handoff: this,
                next: 1,
            },
        )
    }

    /// Whether the bus has started pulling frames.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// The signal carrying frame-ready tokens.
    pub fn ready(&self) -> &ReadySignal {
        &self.ready
    }
}

impl<const F: usize> Default for FrameHandoff<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer endpoint: fills one frame while the other is in flight.
pub struct FrameWriter<'a, const F: usize> {
    handoff: &'a FrameHandoff<F>,
    /// Index of the frame currently being filled.
    filling: usize,
}

impl<'a, const F: usize> FrameWriter<'a, F> {
    /// Publish the frame being filled and switch to filling the other one.
    ///
    /// Waits while the reader still holds the last published frame. This is
    /// the producer's only suspension point.
    pub async fn publish(&mut self) {
        self.handoff.ready.send().await;
        self.filling ^= 1;
    }

    /// The frame to write into, or `None` while the stream is not live.
    pub fn frame_mut(&mut self) -> Option<&mut Frame<F>> {
        if !self.handoff.is_live() {
            return None;
        }
        // SAFETY: `filling` is the frame neither published by the pending
        // token nor held by the reader (see module docs). `&mut self`
        // prevents handing out two references at once.
        Some(unsafe { &mut *self.handoff.frames[self.filling].get() })
    }

    /// Index of the frame being filled (0 or 1).
    pub fn filling(&self) -> usize {
        self.filling
    }

    /// Whether a published frame is still waiting for the reader.
    pub fn is_pending(&self) -> bool {
        self.handoff.ready.is_pending()
    }
}

/// ISR endpoint: takes published frames for transmission.
pub struct FrameReader<'a, const F: usize> {
    handoff: &'a FrameHandoff<F>,
    /// Index of the frame the next token publishes.
    next: usize,
}

impl<'a, const F: usize> FrameReader<'a, F> {
    /// Claim the published frame, if a token is pending. Never blocks.
    ///
    /// Also marks the stream live: the first refill means the bus is running.
    pub fn try_claim(&mut self) -> Option<FrameClaim<'_, 'a, F>> {
        let handoff = self.handoff;
        handoff.live.store(true, Ordering::Release);
        let claim = handoff.ready.try_claim()?;
        Some(FrameClaim {
            reader: self,
            claim,
        })
    }
}

/// A published frame held by the reader until [`release()`](Self::release).
///
/// Dropping the claim without releasing it leaves the token pending, so the
/// same frame is offered again on the next refill.
#[must_use = "dropping a claim leaves the frame published"]
pub struct FrameClaim<'r, 'a, const F: usize> {
    reader: &'r mut FrameReader<'a, F>,
    claim: Claim<'a>,
}

impl<'r, 'a, const F: usize> FrameClaim<'r, 'a, F> {
    /// The published frame.
    pub fn frame(&self) -> &Frame<F> {
        let handoff = self.reader.handoff;
        // SAFETY: A pending token means the writer is either filling the other
        // frame or waiting in `publish()`; it cannot touch `next` until the
        // token is released.
        unsafe { &*handoff.frames[self.reader.next].get() }
    }

    /// Hand the frame back to the writer and consume the token.
    pub fn release(self) -> Received {
        self.reader.next ^= 1;
        self.claim.release()
    }
}
