use avr_device::atmega2560::USART0;
use avr_device::interrupt::{self, Mutex};
use core::cell::RefCell;
use core::convert::Infallible;
use embedded_hal::serial;
use heapless::spsc::Queue;

use super::bits::{ubrr_double_speed, RXCIE0, RXEN0, TXEN0, U2X0, UCSR0C_8N1, UDRE0};
use crate::config::CPU_FREQ_HZ;

// One slot stays empty, so this holds 63 bytes: about 0.6 ms of traffic at
// 1 Mbaud, enough to ride out a 1 ms gap between reads.
const RX_QUEUE_LEN: usize = 64;

// Filled by USART0_RX, drained by `read`
static RX_QUEUE: Mutex<RefCell<Queue<u8, RX_QUEUE_LEN>>> = Mutex::new(RefCell::new(Queue::new()));

/// USART0 in double-speed 8N1. Receive is interrupt driven, transmit polls
/// the data register empty flag.
pub struct Uart {
    usart: USART0,
}

impl Uart {
    pub fn new(usart: USART0, baud: u32) -> Self {
        unsafe {
            usart.ubrr0.write(|w| w.bits(ubrr_double_speed(CPU_FREQ_HZ, baud)));
            usart.ucsr0a.write(|w| w.bits(1 << U2X0));
            usart.ucsr0c.write(|w| w.bits(UCSR0C_8N1));
            usart
                .ucsr0b
                .write(|w| w.bits((1 << RXEN0) | (1 << TXEN0) | (1 << RXCIE0)));
        }

        Self { usart }
    }

    pub fn release(self) -> USART0 {
        unsafe { self.usart.ucsr0b.write(|w| w.bits(0)) };
        self.usart
    }

    fn tx_ready(&self) -> bool {
        self.usart.ucsr0a.read().bits() & (1 << UDRE0) != 0
    }
}

impl serial::Read<u8> for Uart {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        interrupt::free(|cs| RX_QUEUE.borrow(cs).borrow_mut().dequeue()).ok_or(nb::Error::WouldBlock)
    }
}

impl serial::Write<u8> for Uart {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        if !self.tx_ready() {
            return Err(nb::Error::WouldBlock);
        }
        unsafe { self.usart.udr0.write(|w| w.bits(byte)) };
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        if self.tx_ready() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

#[avr_device::interrupt(atmega2560)]
fn USART0_RX() {
    let byte = unsafe { (*USART0::ptr()).udr0.read().bits() };
    interrupt::free(|cs| {
        // Queue full: drop the byte
        RX_QUEUE.borrow(cs).borrow_mut().enqueue(byte).ok();
    });
}
