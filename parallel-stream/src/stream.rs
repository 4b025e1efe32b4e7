//! One-shot stream bring-up.
//!
//! [`start()`] validates the configuration, registers the refill callback
//! with the bus driver and starts transmission. After it returns the driver
//! pulls frames on its own; the producer task is spawned separately.

use log::{debug, info};

use crate::bus::ParallelBus;
use crate::config::StreamConfig;
use crate::error::Error;
use crate::refill::RefillCallback;

/// Configure `bus` for frames of `F` samples and start it.
///
/// Nothing is written to the bus if the configuration is invalid.
pub fn start<'a, B, const F: usize>(
    bus: &mut B,
    config: &StreamConfig,
    refill: RefillCallback<'a, F>,
) -> Result<(), Error<B::Error>>
where
    B: ParallelBus<RefillCallback<'a, F>>,
{
    let bus_config = config.bus_config::<F>()?;
    info!(
        "starting parallel stream: {} bits at {} Hz, {} byte frames",
        bus_config.width.bits(),
        bus_config.clock_rate.raw(),
        bus_config.buffer_size_bytes,
    );
    if let Some(pin) = bus_config.pins.debug_pulse_pin() {
        debug!("debug pulse on GPIO{}", pin);
    }

    bus.configure(&bus_config, refill).map_err(Error::Bus)?;
    bus.start().map_err(Error::Bus)?;
    debug!("parallel bus running");
    Ok(())
}
