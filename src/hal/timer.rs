use avr_device::atmega2560::TC0;
use avr_device::interrupt::{self, Mutex};
use core::cell::Cell;
use embedded_hal::blocking::delay::DelayMs;

use super::bits::{timer0_micros, TIMER0_DIV64, TOIE0, TOV0};
use crate::poll::{spin_until_elapsed, Monotonic};

static OVERFLOWS: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

/// Timer0 in normal mode at clk/64, counting overflows in `TIMER0_OVF`.
///
/// The handle is `Copy`: every copy reads the same counter, so one can pace
/// the loop while another serves as the delay provider.
#[derive(Clone, Copy)]
pub struct SystemClock {
    _private: (),
}

impl SystemClock {
    /// Takes ownership of TC0 and starts counting. Interrupts must be
    /// enabled for the count to advance past one overflow.
    pub fn start(tc0: TC0) -> Self {
        unsafe {
            tc0.tccr0a.write(|w| w.bits(0));
            tc0.tcnt0.write(|w| w.bits(0));
            tc0.timsk0.write(|w| w.bits(1 << TOIE0));
            tc0.tccr0b.write(|w| w.bits(TIMER0_DIV64));
        }
        Self { _private: () }
    }
}

impl Monotonic for SystemClock {
    fn micros(&self) -> u32 {
        interrupt::free(|cs| {
            let tc0 = unsafe { &*TC0::ptr() };
            let overflows = OVERFLOWS.borrow(cs).get();
            let tcnt = tc0.tcnt0.read().bits();
            let pending = tc0.tifr0.read().bits() & (1 << TOV0) != 0;
            timer0_micros(overflows, tcnt, pending)
        })
    }
}

impl DelayMs<u16> for SystemClock {
    fn delay_ms(&mut self, ms: u16) {
        let start = self.micros();
        spin_until_elapsed(&*self, start, u32::from(ms) * 1000);
    }
}

#[avr_device::interrupt(atmega2560)]
fn TIMER0_OVF() {
    interrupt::free(|cs| {
        let overflows = OVERFLOWS.borrow(cs);
        overflows.set(overflows.get().wrapping_add(1));
    });
}
