//! Firmware for a two-channel analog sensor streamer.
//!
//! After reset the device powers its sensors, waits for the host to send a
//! sample rate as ASCII digits, then streams `"<horizontal>,<vertical>\n"`
//! lines over USART0 at 1 Mbaud, forever.
//!
//! Everything above [`hal`] talks to hardware through `embedded-hal` traits
//! and [`poll::Monotonic`], so the loop runs against mocks on the host.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

pub mod config;
pub mod error;
pub mod hal;
pub mod handshake;
pub mod line;
pub mod poll;
pub mod sampler;
pub mod sensors;

pub use config::{Pacing, SamplerConfig};
pub use error::{Error, Result};
pub use poll::Monotonic;
pub use sampler::{AwaitingStart, Sampler, Streaming};
pub use sensors::{Sample, SampleSource, Sensors};
