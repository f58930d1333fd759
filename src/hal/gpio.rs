use avr_device::atmega2560::PORTC;
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::OutputPin;

pub trait PinMode {}
pub struct Input;
pub struct Output;
impl PinMode for Input {}
impl PinMode for Output {}

#[derive(Debug)]
pub struct Pin<PORT, const PIN: u8, MODE> {
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

impl<const P: u8> Pin<PORTC, P, Input> {
    /// Pins come up as inputs after reset.
    fn reset_state() -> Self {
        Pin {
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

impl<const P: u8, MODE: PinMode> Pin<PORTC, P, MODE> {
    pub fn into_output(self) -> Pin<PORTC, P, Output> {
        // Set DDRC bit
        unsafe {
            (*PORTC::ptr()).ddrc.modify(|r, w| w.bits(r.bits() | (1 << P)));
        }
        Pin {
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

impl<const P: u8> OutputPin for Pin<PORTC, P, Output> {
    type Error = Infallible;

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        unsafe {
            (*PORTC::ptr()).portc.modify(|r, w| w.bits(r.bits() | (1 << P)));
        }
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        unsafe {
            (*PORTC::ptr()).portc.modify(|r, w| w.bits(r.bits() & !(1 << P)));
        }
        Ok(())
    }
}

// Arduino Mega pin definitions
pub mod board {
    use super::*;
    use crate::config::SENSOR_ENABLE_BIT;

    /// Sensor-enable line, digital pin 30 (PC7)
    pub type SensorEnable = Pin<PORTC, SENSOR_ENABLE_BIT, Output>;

    /// Claims PORTC for the sensor-enable line.
    pub fn sensor_enable(_port: PORTC) -> SensorEnable {
        Pin::reset_state().into_output()
    }
}
