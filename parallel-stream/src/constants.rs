/// Number of 16-bit samples per frame.
pub const FRAME_SAMPLES: usize = 1024;

/// Size of one frame in driver memory, in bytes.
pub const FRAME_BYTES: usize = FRAME_SAMPLES * 2;

/// Number of positions in one ramp pass (the full 16-bit range).
pub const RAMP_PERIOD: usize = 1 << 16;

/// Parallel bus clock in Hz (3.33 MHz).
pub const CLOCK_RATE_HZ: u32 = 3_333_333;

/// Data bits per bus word.
pub const BUS_WIDTH_BITS: u8 = 16;

/// Default GPIO for each data bit, least significant first.
pub const BUS_PINS: [u8; 16] = [2, 4, 5, 9, 10, 12, 13, 14, 15, 18, 19, 21, 22, 23, 25, 26];

/// GPIO pulsed at every frame boundary when the debug pulse is enabled.
pub const DEBUG_PULSE_PIN: u8 = 25;
