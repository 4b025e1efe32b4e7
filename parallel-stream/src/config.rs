//! Stream configuration and validation.
//!
//! [`StreamConfig`] holds the knobs an application chooses. Frame size is a
//! const generic, so it is fixed at compile time and only checked here for
//! the byte count it implies.

use core::fmt;

use fugit::HertzU32;

use crate::bus::{BusConfig, BusWidth, PinMapping};
use crate::constants::CLOCK_RATE_HZ;
use crate::frame::Frame;

/// Invalid stream configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The bus clock is 0 Hz.
    ZeroClockRate,
    /// The same GPIO is assigned to two data bits.
    DuplicatePin(u8),
    /// No data bit is connected.
    NoDataPins,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroClockRate => write!(f, "bus clock rate is zero"),
            ConfigError::DuplicatePin(pin) => write!(f, "GPIO{pin} assigned to more than one data bit"),
            ConfigError::NoDataPins => write!(f, "no data pins connected"),
        }
    }
}

/// Application-side settings for a stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamConfig {
    /// Bus clock.
    pub clock_rate: HertzU32,
    /// Data pin assignment.
    pub pins: PinMapping,
}

impl StreamConfig {
    /// Stock settings: 3.33 MHz clock on the default pins.
    pub const fn new() -> Self {
        StreamConfig {
            clock_rate: HertzU32::from_raw(CLOCK_RATE_HZ),
            pins: PinMapping::new(),
        }
    }

    /// Use a different bus clock.
    pub const fn with_clock_rate(mut self, clock_rate: HertzU32) -> Self {
        self.clock_rate = clock_rate;
        self
    }

    /// Use a different pin assignment.
    pub const fn with_pins(mut self, pins: PinMapping) -> Self {
        self.pins = pins;
        self
    }

    /// Free the top two data lines for the frame-boundary debug pulse.
    pub const fn with_debug_pulse(mut self) -> Self {
        self.pins = self.pins.with_debug_pulse();
        self
    }

    /// Check the settings for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_rate.raw() == 0 {
            return Err(ConfigError::ZeroClockRate);
        }
        if self.pins.connected() == 0 {
            return Err(ConfigError::NoDataPins);
        }

        let pins = self.pins.pins();
        for (i, pin) in pins.iter().enumerate() {
            let Some(pin) = *pin else { continue };
            if pins[i + 1..].contains(&Some(pin)) {
                return Err(ConfigError::DuplicatePin(pin));
            }
        }
        Ok(())
    }

    /// Validate and produce the driver configuration for frames of `F` samples.
    pub fn bus_config<const F: usize>(&self) -> Result<BusConfig, ConfigError> {
        self.validate()?;
        Ok(BusConfig {
            pins: self.pins,
            width: BusWidth::Sixteen,
            clock_rate: self.clock_rate,
            buffer_size_bytes: Frame::<F>::BYTES,
        })
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use fugit::RateExtU32;
    use std::string::ToString;

    #[test]
    fn default_is_valid() {
        let cfg = StreamConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        let bus = cfg.bus_config::<1024>().unwrap();
        assert_eq!(bus.buffer_size_bytes, 2048);
        assert_eq!(bus.clock_rate.raw(), 3_333_333);
        assert_eq!(bus.width, BusWidth::Sixteen);
    }

    #[test]
    fn custom_clock_reaches_bus_config() {
        let clock: HertzU32 = 2_500_000.Hz();
        let bus = StreamConfig::new().with_clock_rate(clock).bus_config::<64>().unwrap();
        assert_eq!(bus.clock_rate, clock);
        assert_eq!(bus.clock_rate.raw(), 2_500_000);
    }

    #[test]
    fn zero_clock_rejected() {
        let cfg = StreamConfig::new().with_clock_rate(0.Hz());
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroClockRate));
    }

    #[test]
    fn duplicate_pin_rejected() {
        let mut pins = [None; 16];
        pins[0] = Some(4);
        pins[1] = Some(5);
        pins[7] = Some(4);
        let cfg = StreamConfig::new().with_pins(PinMapping::from_pins(pins));
        assert_eq!(cfg.bus_config::<64>(), Err(ConfigError::DuplicatePin(4)));
    }

    #[test]
    fn empty_mapping_rejected() {
        let cfg = StreamConfig::new().with_pins(PinMapping::from_pins([None; 16]));
        assert_eq!(cfg.validate(), Err(ConfigError::NoDataPins));
    }

    #[test]
    fn debug_pulse_config_is_valid() {
        let cfg = StreamConfig::new().with_debug_pulse().with_clock_rate(1_000_000.Hz());
        let bus = cfg.bus_config::<256>().unwrap();
        assert!(bus.pins.debug_pulse());
        assert_eq!(bus.buffer_size_bytes, 512);
        assert_eq!(bus.clock_rate.raw(), 1_000_000);
    }

    #[test]
    fn errors_display() {
        assert_eq!(ConfigError::ZeroClockRate.to_string(), "bus clock rate is zero");
        assert_eq!(
            ConfigError::DuplicatePin(9).to_string(),
            "GPIO9 assigned to more than one data bit"
        );
    }
}
