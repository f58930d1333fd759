//! Error type shared by the handshake and the sampling loop

use crate::line::LineOverflow;
use crate::poll::PollError;

/// Failures surfaced by the sampler. `SE` is the serial error type, `AE` the
/// ADC error type of the hardware in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<SE, AE> {
    /// Serial receive or transmit failed
    Serial(SE),
    /// Conversion failed
    Adc(AE),
    /// Formatted line did not fit its buffer
    LineOverflow,
    /// Polling gave up before the hardware flag flipped
    Timeout,
}

pub type Result<T, SE, AE> = core::result::Result<T, Error<SE, AE>>;

impl<SE, AE> From<PollError<SE>> for Error<SE, AE> {
    fn from(e: PollError<SE>) -> Self {
        match e {
            PollError::Timeout => Error::Timeout,
            PollError::Other(e) => Error::Serial(e),
        }
    }
}

impl<SE, AE> From<LineOverflow> for Error<SE, AE> {
    fn from(_: LineOverflow) -> Self {
        Error::LineOverflow
    }
}
