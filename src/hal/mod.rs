pub mod bits;

#[cfg(target_arch = "avr")]
pub mod adc;
#[cfg(target_arch = "avr")]
pub mod gpio;
#[cfg(target_arch = "avr")]
pub mod timer;
#[cfg(target_arch = "avr")]
pub mod uart;

// Re-export commonly used types
#[cfg(target_arch = "avr")]
pub use adc::{Adc, Adc0, Adc1};
#[cfg(target_arch = "avr")]
pub use gpio::{Input, Output, Pin};
#[cfg(target_arch = "avr")]
pub use timer::SystemClock;
#[cfg(target_arch = "avr")]
pub use uart::Uart;
