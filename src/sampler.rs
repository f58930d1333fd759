//! The sampling loop: one handshake, then one CSV line per cycle forever.
//!
//! The two phases are separate types. A [`Sampler`] in the
//! [`AwaitingStart`] state can only run the handshake; [`Sampler::start`]
//! hands back a [`Streaming`] sampler, which is the only state that can
//! write to the serial link.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;
use embedded_hal::serial;
use log::{debug, trace};

use crate::config::{Pacing, SamplerConfig, CYCLE_DELAY_MS};
use crate::error::{Error, Result};
use crate::handshake;
use crate::line;
use crate::poll::{spin_until_elapsed, Monotonic};
use crate::sensors::{power_on, Sample, SampleSource};

type SerialError<S> = <S as serial::Read<u8>>::Error;

/// Waiting for the host start message
pub struct AwaitingStart;

/// Handshake done; streaming samples
pub struct Streaming {
    rate: u32,
    cycle_start: u32,
}

pub struct Sampler<S, Src, D, C, State = AwaitingStart> {
    serial: S,
    source: Src,
    delay: D,
    clock: C,
    config: SamplerConfig,
    state: State,
}

impl<S, Src, D, C> Sampler<S, Src, D, C, AwaitingStart>
where
    S: serial::Read<u8>,
    Src: SampleSource,
    D: DelayMs<u16>,
    C: Monotonic,
{
    pub fn new(serial: S, source: Src, delay: D, clock: C, config: SamplerConfig) -> Self {
        Self {
            serial,
            source,
            delay,
            clock,
            config,
            state: AwaitingStart,
        }
    }

    /// Power the sensors and block until the host sends its start message.
    pub fn start<P: OutputPin>(
        mut self,
        enable: &mut P,
    ) -> Result<Sampler<S, Src, D, C, Streaming>, SerialError<S>, Src::Error> {
        power_on(enable);

        let rate = handshake::receive_rate(
            &mut self.serial,
            &mut self.delay,
            &self.clock,
            self.config.handshake_timeout_us,
        )?;
        debug!("streaming at requested rate {}", rate);

        Ok(Sampler {
            serial: self.serial,
            source: self.source,
            delay: self.delay,
            clock: self.clock,
            config: self.config,
            state: Streaming {
                rate,
                cycle_start: 0,
            },
        })
    }
}

impl<S, Src, D, C> Sampler<S, Src, D, C, Streaming>
where
    S: serial::Read<u8> + serial::Write<u8, Error = SerialError<S>>,
    Src: SampleSource,
    D: DelayMs<u16>,
    C: Monotonic,
{
    /// Rate the host asked for in the start message
    pub fn rate(&self) -> u32 {
        self.state.rate
    }

    /// Timestamp taken at the start of the most recent cycle
    pub fn cycle_start(&self) -> u32 {
        self.state.cycle_start
    }

    /// Read both channels, send one line and wait out the cycle.
    pub fn cycle(&mut self) -> Result<Sample, SerialError<S>, Src::Error> {
        let start = self.clock.micros();
        self.state.cycle_start = start;

        let result = self.emit();
        self.pace(start);
        result
    }

    pub fn run(mut self) -> ! {
        loop {
            if self.cycle().is_err() {
                trace!("cycle failed");
            }
        }
    }

    pub fn release(self) -> (S, Src, D, C) {
        (self.serial, self.source, self.delay, self.clock)
    }

    fn emit(&mut self) -> Result<Sample, SerialError<S>, Src::Error> {
        let sample = self.source.sample().map_err(Error::Adc)?;
        let line = line::format(&sample)?;
        for &byte in line.as_bytes() {
            nb::block!(self.serial.write(byte)).map_err(Error::Serial)?;
        }
        Ok(sample)
    }

    fn pace(&mut self, start: u32) {
        match cycle_period_us(self.config.pacing, self.state.rate) {
            Some(period) => spin_until_elapsed(&self.clock, start, period),
            None => self.delay.delay_ms(CYCLE_DELAY_MS),
        }
    }
}

/// Cycle length enforced from the cycle start, if the pacing uses one.
pub fn cycle_period_us(pacing: Pacing, rate: u32) -> Option<u32> {
    match pacing {
        // Rates past 1 MHz would give a zero period; keep the fixed delay
        Pacing::FromRate if rate > 0 && rate <= 1_000_000 => Some(1_000_000 / rate),
        _ => None,
    }
}
