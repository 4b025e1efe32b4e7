//! # parallel-stream
//!
//! A `no_std`, zero-allocation double-buffered sample streamer for the I2S
//! peripheral of an ESP32 running in 16-bit parallel (LCD) mode. A low
//! priority producer task fills one frame with a 16-bit calibration ramp
//! while the bus drains the other through an interrupt-driven refill
//! callback. The bus never stalls: if no frame is ready it is sent silence.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Sync | [`sync`] | [`ReadySignal`], the capacity-1 frame-ready mailbox |
//! | Memory | [`frame`] | Frame storage and the writer/reader hand-off |
//! | Data | [`generator`] | Ramp positions, values and bus wiring slots |
//! | Task | [`producer`] | Async producer filling and publishing frames |
//! | ISR | [`refill`] | Refill callback copying frames into DMA memory |
//! | Driver | [`bus`] / [`stream`] | Bus driver boundary and bring-up |
//! | Setup | [`config`] / [`error`] | Validated configuration and errors |
//!
//! ## Quick start
//!
//! ```ignore
//! use parallel_stream::{FrameHandoff, Producer, RefillCallback, StreamConfig};
//! use parallel_stream::constants::FRAME_SAMPLES;
//! use static_cell::StaticCell;
//!
//! static HANDOFF: StaticCell<FrameHandoff<FRAME_SAMPLES>> = StaticCell::new();
//!
//! let (writer, reader) = HANDOFF.init(FrameHandoff::new()).split();
//!
//! // `bus` is a platform driver implementing `ParallelBus`.
//! parallel_stream::stream::start(&mut bus, &StreamConfig::default(), RefillCallback::new(reader))?;
//!
//! // In the producer task:
//! Producer::new(writer).run().await;
//! ```
//!
//! ## Stream parameters
//!
//! - **Frame size:** 1024 samples ([`constants::FRAME_SAMPLES`])
//! - **Bus clock:** 3.33 MHz ([`constants::CLOCK_RATE_HZ`])
//! - **Sample format:** `u16`, sent least significant byte first
//! - **Ramp period:** 65536 samples ([`constants::RAMP_PERIOD`])

#![no_std]

pub mod constants;
pub mod sync;
pub mod frame;
pub mod generator;
pub mod producer;
pub mod refill;
pub mod bus;
pub mod config;
pub mod error;
pub mod stream;


pub use bus::{BusConfig, BusWidth, ParallelBus, PinMapping};
pub use config::{ConfigError, StreamConfig};
pub use error::Error;
pub use frame::{Frame, FrameHandoff, FrameReader, FrameWriter};
pub use generator::{Ramp, Sample};
pub use producer::{NoPulse, Producer};
pub use refill::{Refill, RefillCallback, RefillOutcome};
pub use sync::ReadySignal;
