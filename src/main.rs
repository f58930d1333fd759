#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    use avr_device::atmega2560::Peripherals;
    use dual_adc_streamer::config::BAUD_RATE;
    use dual_adc_streamer::hal::{gpio, Adc, Adc0, Adc1, SystemClock, Uart};
    use dual_adc_streamer::{Sampler, SamplerConfig, Sensors};

    let dp = Peripherals::take().unwrap();

    let clock = SystemClock::start(dp.TC0);
    let serial = Uart::new(dp.USART0, BAUD_RATE);
    let mut enable = gpio::board::sensor_enable(dp.PORTC);
    // Horizontal sensor on ADC0, vertical on ADC1
    let sensors = Sensors::new(Adc::new(dp.ADC), Adc0, Adc1);

    // Timer0 overflow and USART0 receive
    unsafe { avr_device::interrupt::enable() };

    let sampler = Sampler::new(serial, sensors, clock, clock, SamplerConfig::default());
    match sampler.start(&mut enable) {
        Ok(streaming) => streaming.run(),
        // Only reachable with a handshake timeout configured
        #[allow(clippy::empty_loop)]
        Err(_) => loop {},
    }
}

// Host builds only exist so the library tests can link.
#[cfg(not(target_arch = "avr"))]
fn main() {}
