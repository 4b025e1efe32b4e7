//! Producer task: generates the ramp and hands frames to the ISR.
//!
//! [`Producer`] owns the writer endpoint of a [`FrameHandoff`](crate::frame::FrameHandoff)
//! and walks the [`Ramp`] one position at a time. At every frame boundary it
//! publishes the frame it has just filled, which waits until the refill ISR
//! has taken the previous one. That wait is the backpressure: the producer is
//! never more than one frame ahead of the bus.
//!
//! ## Usage with an async executor
//!
//! ```ignore
//! static HANDOFF: StaticCell<FrameHandoff<FRAME_SAMPLES>> = StaticCell::new();
//!
//! let (writer, reader) = HANDOFF.init(FrameHandoff::new()).split();
//! stream::start(&mut bus, &StreamConfig::default(), RefillCallback::new(reader))?;
//!
//! #[embassy_executor::task]
//! async fn producer_task(mut producer: Producer<'static, FRAME_SAMPLES>) {
//!     producer.run().await
//! }
//! spawner.must_spawn(producer_task(Producer::new(writer)));
//! ```

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use log::debug;

use crate::constants::RAMP_PERIOD;
use crate::frame::FrameWriter;
use crate::generator::{Ramp, Sample};

/// Stand-in pin for producers without a debug pulse.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPulse;

impl ErrorType for NoPulse {
    type Error = Infallible;
}

impl OutputPin for NoPulse {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Fills frames with the calibration ramp.
///
/// `P` is pulsed high then low at each frame boundary, so a scope can trigger
/// on frame timing. The pulse comes after the previous frame has been
/// published: its edge marks the completed hand-off, not the moment the
/// producer reached the boundary, and it lags the boundary by however long
/// the producer waited for the ISR.
pub struct Producer<'a, const F: usize, P = NoPulse> {
    writer: FrameWriter<'a, F>,
    ramp: Ramp<F>,
    pulse: P,
    /// Samples dropped because the stream was not live yet.
    skipped: u32,
}

impl<'a, const F: usize> Producer<'a, F> {
    /// Create a producer without a debug pulse.
    pub fn new(writer: FrameWriter<'a, F>) -> Self {
        Self::with_pulse(writer, NoPulse)
    }
}

impl<'a, const F: usize, P: OutputPin> Producer<'a, F, P> {
    /// Create a producer that pulses `pulse` at every frame boundary.
    pub fn with_pulse(writer: FrameWriter<'a, F>, pulse: P) -> Self {
        Producer {
            writer,
            ramp: Ramp::new(),
            pulse,
            skipped: 0,
        }
    }

    /// Produce one sample.
    ///
    /// At a frame boundary this first publishes the previous frame, waiting
    /// for the ISR if it still holds the one before. The sample is then
    /// written, or dropped if the stream is not live yet. Dropping the future
    /// while it waits leaves the position unchanged.
    pub async fn step(&mut self) -> Sample {
        let sample = self.ramp.peek();
        if sample.starts_frame() {
            self.writer.publish().await;
            // Pin errors are ignored; the pulse is a debugging aid only.
            self.pulse.set_high().ok();
            self.pulse.set_low().ok();
        }

        match self.writer.frame_mut() {
            Some(frame) => frame.write(sample),
            None => self.skipped = self.skipped.wrapping_add(1),
        }
        self.ramp.advance();
        sample
    }

    /// Produce one full pass of the ramp, positions 0 through 65535.
    pub async fn run_pass(&mut self) {
        self.ramp.reset();
        for _ in 0..RAMP_PERIOD {
            self.step().await;
        }
    }

    /// Produce forever.
    pub async fn run(&mut self) {
        debug!("producer started: {} samples per frame", F);
        loop {
            self.run_pass().await;
        }
    }

    /// Position of the next sample.
    pub fn position(&self) -> u16 {
        self.ramp.peek().position
    }

    /// Number of samples dropped before the stream went live (wraps).
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// Give back the writer endpoint and the pulse pin.
    pub fn release(self) -> (FrameWriter<'a, F>, P) {
        (self.writer, self.pulse)
    }
}
