use avr_device::atmega2560::ADC;
use core::convert::Infallible;
use embedded_hal::adc::{Channel, OneShot};

use super::bits::{adcsra_enable, admux_select, conversion_step, mux_bits, ConversionStep, ADSC, REFS0};

/// Single converter, one conversion in flight at a time.
pub struct Adc {
    adc: ADC,
    pending: Option<u8>,
}

impl Adc {
    pub fn new(adc: ADC) -> Self {
        Self { adc, pending: None }
    }

    pub fn release(self) -> ADC {
        self.adc
    }

    fn start(&mut self, channel: u8) {
        unsafe {
            // Reference AVCC, then enable at clk/128 (125 kHz @ 16 MHz)
            self.adc.admux.modify(|r, w| w.bits(r.bits() | (1 << REFS0)));
            self.adc.adcsra.modify(|r, w| w.bits(adcsra_enable(r.bits())));
            // MUX5 off, free running off
            self.adc.adcsrb.write(|w| w.bits(0));
            self.adc.admux.modify(|r, w| w.bits(admux_select(r.bits(), channel)));

            self.adc.adcsra.modify(|r, w| w.bits(r.bits() | (1 << ADSC)));
        }
        self.pending = Some(mux_bits(channel));
    }

    fn busy(&self) -> bool {
        self.adc.adcsra.read().bits() & (1 << ADSC) != 0
    }
}

impl<PIN> OneShot<Adc, u16, PIN> for Adc
where
    PIN: Channel<Adc, ID = u8>,
{
    type Error = Infallible;

    fn read(&mut self, _pin: &mut PIN) -> nb::Result<u16, Self::Error> {
        let channel = PIN::channel();
        match conversion_step(self.pending, channel, self.busy()) {
            ConversionStep::Wait => Err(nb::Error::WouldBlock),
            ConversionStep::Collect => {
                self.pending = None;
                Ok(self.adc.adc.read().bits())
            }
            ConversionStep::Start => {
                self.start(channel);
                Err(nb::Error::WouldBlock)
            }
        }
    }
}

macro_rules! adc_channels {
    ($($name:ident => $id:expr),+ $(,)?) => {
        $(
            pub struct $name;

            impl Channel<Adc> for $name {
                type ID = u8;

                fn channel() -> u8 {
                    $id
                }
            }
        )+
    };
}

adc_channels!(
    Adc0 => 0,
    Adc1 => 1,
    Adc2 => 2,
    Adc3 => 3,
    Adc4 => 4,
    Adc5 => 5,
    Adc6 => 6,
    Adc7 => 7,
);
