//! Configuration constants for the dual ADC streamer firmware

/// CPU frequency in Hz, from `MCU_FREQ_HZ` at build time
pub const CPU_FREQ_HZ: u32 = parse_hz(option_env!("MCU_FREQ_HZ"), 16_000_000);

/// UART baud rate
pub const BAUD_RATE: u32 = 1_000_000;

/// ADC channel wired to the horizontal sensor
pub const HORIZONTAL_CHANNEL: u8 = 0;

/// ADC channel wired to the vertical sensor
pub const VERTICAL_CHANNEL: u8 = 1;

/// Full-scale reading of the 10-bit converter
pub const ADC_MAX: u16 = 1023;

/// PORTC bit driving the sensor-enable line
pub const SENSOR_ENABLE_BIT: u8 = 7;

/// Bytes consumed from the host start message
pub const HANDSHAKE_CAPACITY: usize = 20;

/// Delay between start message bytes in milliseconds
pub const HANDSHAKE_BYTE_DELAY_MS: u16 = 1;

/// Delay closing every sampling cycle in milliseconds
pub const CYCLE_DELAY_MS: u16 = 1;

/// Capacity of one formatted output line
pub const LINE_CAPACITY: usize = 20;

/// Decimal frequency text to Hz. Missing, empty or non-numeric text gives
/// `fallback`.
pub const fn parse_hz(text: Option<&str>, fallback: u32) -> u32 {
    let bytes = match text {
        Some(text) => text.as_bytes(),
        None => return fallback,
    };
    if bytes.is_empty() {
        return fallback;
    }

    let mut hz: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return fallback;
        }
        hz = hz * 10 + (b - b'0') as u32;
        i += 1;
    }
    hz
}

/// How a sampling cycle ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Fixed delay after every cycle; the host rate is stored but ignored.
    FixedDelay,
    /// Hold each cycle to `1 / rate` seconds measured from the cycle start.
    /// A rate of zero behaves like `FixedDelay`.
    FromRate,
}

/// Runtime knobs of the sampler. The firmware uses `Default`.
#[derive(Debug, Clone, Copy)]
pub struct SamplerConfig {
    pub pacing: Pacing,
    /// Give up waiting for the start message after this many microseconds.
    /// `None` waits forever.
    pub handshake_timeout_us: Option<u32>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            pacing: if cfg!(feature = "rate-pacing") {
                Pacing::FromRate
            } else {
                Pacing::FixedDelay
            },
            handshake_timeout_us: None,
        }
    }
}
