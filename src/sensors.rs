//! Horizontal and vertical sensor channels

use core::marker::PhantomData;

use embedded_hal::adc::{Channel, OneShot};
use embedded_hal::digital::v2::OutputPin;
use log::trace;

/// One reading per channel, taken within the same cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub horizontal: u16,
    pub vertical: u16,
}

/// Anything that can produce a [`Sample`], blocking until both readings
/// are available.
pub trait SampleSource {
    type Error;

    fn sample(&mut self) -> Result<Sample, Self::Error>;
}

/// Two channels of a single converter. Conversions run back to back:
/// vertical first, then horizontal.
pub struct Sensors<ADC, A, H, V> {
    adc: A,
    horizontal: H,
    vertical: V,
    _adc: PhantomData<ADC>,
}

impl<ADC, A, H, V> Sensors<ADC, A, H, V>
where
    H: Channel<ADC>,
    V: Channel<ADC>,
{
    pub fn new(adc: A, horizontal: H, vertical: V) -> Self {
        Self {
            adc,
            horizontal,
            vertical,
            _adc: PhantomData,
        }
    }

    pub fn release(self) -> (A, H, V) {
        (self.adc, self.horizontal, self.vertical)
    }
}

impl<ADC, A, H, V> SampleSource for Sensors<ADC, A, H, V>
where
    H: Channel<ADC>,
    V: Channel<ADC>,
    A: OneShot<ADC, u16, H>,
    A: OneShot<ADC, u16, V, Error = <A as OneShot<ADC, u16, H>>::Error>,
{
    type Error = <A as OneShot<ADC, u16, H>>::Error;

    fn sample(&mut self) -> Result<Sample, Self::Error> {
        let vertical = nb::block!(<A as OneShot<ADC, u16, V>>::read(&mut self.adc, &mut self.vertical))?;
        let horizontal =
            nb::block!(<A as OneShot<ADC, u16, H>>::read(&mut self.adc, &mut self.horizontal))?;
        Ok(Sample { horizontal, vertical })
    }
}

/// Drive the sensor-enable line high. Errors are dropped: the pin is never
/// read back.
pub fn power_on<P: OutputPin>(enable: &mut P) {
    if enable.set_high().is_err() {
        trace!("sensor enable write failed");
    }
}
