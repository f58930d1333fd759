//! Start message exchange with the host
//!
//! The host opens the link and sends the desired sample rate as ASCII
//! decimal digits. There is no terminator: the message ends when the line
//! goes quiet for one byte delay or when [`HANDSHAKE_CAPACITY`] bytes have
//! arrived.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::serial;
use heapless::Vec;
use log::debug;

use crate::config::{HANDSHAKE_BYTE_DELAY_MS, HANDSHAKE_CAPACITY};
use crate::poll::{block_until, Monotonic, PollError};

/// Raw bytes of the start message
pub type StartMessage = Vec<u8, HANDSHAKE_CAPACITY>;

/// Wait for the first byte of the start message, then drain the rest.
pub fn collect<S, D, C>(
    serial: &mut S,
    delay: &mut D,
    clock: &C,
    timeout_us: Option<u32>,
) -> Result<StartMessage, PollError<S::Error>>
where
    S: serial::Read<u8>,
    D: DelayMs<u16>,
    C: Monotonic + ?Sized,
{
    let first = block_until(clock, timeout_us, || serial.read())?;

    let mut message = StartMessage::new();
    let mut next = Some(first);
    while let Some(byte) = next {
        if message.push(byte).is_err() {
            break;
        }
        delay.delay_ms(HANDSHAKE_BYTE_DELAY_MS);
        if message.is_full() {
            break;
        }

        next = match serial.read() {
            Ok(byte) => Some(byte),
            Err(nb::Error::WouldBlock) => None,
            Err(nb::Error::Other(_)) => {
                debug!("receive error ends start message at {} bytes", message.len());
                None
            }
        };
    }

    Ok(message)
}

/// Parse a base-10 rate the way the host tooling expects.
///
/// Leading whitespace and one `+` are skipped, digits are read up to the
/// first non-digit. Anything unparseable, including a negative number,
/// yields zero. Values past `u32::MAX` saturate.
pub fn parse_rate(bytes: &[u8]) -> u32 {
    let mut chars = bytes
        .iter()
        .copied()
        .skip_while(u8::is_ascii_whitespace)
        .peekable();

    match chars.peek() {
        Some(b'+') => {
            chars.next();
        }
        Some(b'-') => return 0,
        _ => {}
    }

    chars
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |rate, digit| {
            rate.saturating_mul(10).saturating_add(u32::from(digit - b'0'))
        })
}

/// Collect the start message and parse it into a sample rate.
pub fn receive_rate<S, D, C>(
    serial: &mut S,
    delay: &mut D,
    clock: &C,
    timeout_us: Option<u32>,
) -> Result<u32, PollError<S::Error>>
where
    S: serial::Read<u8>,
    D: DelayMs<u16>,
    C: Monotonic + ?Sized,
{
    let message = collect(serial, delay, clock, timeout_us)?;
    let rate = parse_rate(&message);
    debug!("start message of {} bytes, rate {}", message.len(), rate);
    Ok(rate)
}
