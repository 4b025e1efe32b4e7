//! Boundary to the parallel bus peripheral driver.
//!
//! The driver itself (clock generation, pin multiplexing, DMA descriptors) is
//! platform code. This module only fixes what the stream hands it.

use fugit::HertzU32;

use crate::constants::{BUS_PINS, BUS_WIDTH_BITS, CLOCK_RATE_HZ, DEBUG_PULSE_PIN};
use crate::refill::Refill;

/// Data width of one bus word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BusWidth {
    /// 16 data lines, one sample per bus clock.
    Sixteen,
}

impl BusWidth {
    /// Number of data lines.
    pub const fn bits(self) -> u8 {
        match self {
            BusWidth::Sixteen => BUS_WIDTH_BITS,
        }
    }
}

/// GPIO assignment for each data bit, least significant first.
///
/// `None` leaves a bit unconnected, which is how the debug-pulse mode frees
/// the top two lines for scope triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMapping {
    pins: [Option<u8>; 16],
}

impl PinMapping {
    /// The stock wiring: [`BUS_PINS`] on all 16 bits.
    pub const fn new() -> Self {
        let mut pins = [None; 16];
        let mut i = 0;
        while i < 16 {
            pins[i] = Some(BUS_PINS[i]);
            i += 1;
        }
        PinMapping { pins }
    }

    /// Build a mapping from explicit pin assignments.
    pub const fn from_pins(pins: [Option<u8>; 16]) -> Self {
        PinMapping { pins }
    }

    /// Release bits 14 and 15 so their GPIOs can carry the debug pulse.
    pub const fn with_debug_pulse(mut self) -> Self {
        self.pins[14] = None;
        self.pins[15] = None;
        self
    }

    /// Whether the top two bits are released for the debug pulse.
    pub const fn debug_pulse(&self) -> bool {
        self.pins[14].is_none() && self.pins[15].is_none()
    }

    /// GPIO to pulse at frame boundaries, when in debug-pulse mode.
    pub const fn debug_pulse_pin(&self) -> Option<u8> {
        if self.debug_pulse() {
            Some(DEBUG_PULSE_PIN)
        } else {
            None
        }
    }

    /// The GPIO carrying `bit`, if connected.
    pub fn pin(&self, bit: usize) -> Option<u8> {
        self.pins.get(bit).copied().flatten()
    }

    /// All assignments, least significant bit first.
    pub fn pins(&self) -> &[Option<u8>; 16] {
        &self.pins
    }

    /// Number of connected data bits.
    pub fn connected(&self) -> usize {
        self.pins.iter().filter(|p| p.is_some()).count()
    }
}

impl Default for PinMapping {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a bus driver needs to run the stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusConfig {
    /// Data pin assignment.
    pub pins: PinMapping,
    /// Bits per bus word.
    pub width: BusWidth,
    /// Bus clock.
    pub clock_rate: HertzU32,
    /// Size of each transmit buffer the driver refills, in bytes.
    pub buffer_size_bytes: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig {
            pins: PinMapping::new(),
            width: BusWidth::Sixteen,
            clock_rate: HertzU32::from_raw(CLOCK_RATE_HZ),
            buffer_size_bytes: crate::constants::FRAME_BYTES,
        }
    }
}

/// A parallel bus peripheral that streams refilled buffers.
///
/// The driver calls `R::refill()` from its interrupt each time a transmit
/// buffer of `buffer_size_bytes` needs new data.
pub trait ParallelBus<R: Refill> {
    /// Error type for setup operations.
    type Error;

    /// Apply the configuration and register the refill callback.
    fn configure(&mut self, config: &BusConfig, refill: R) -> Result<(), Self::Error>;

    /// Start clocking data out.
    fn start(&mut self) -> Result<(), Self::Error>;
}
