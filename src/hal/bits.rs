//! Register bit layouts and the arithmetic the drivers do on them.
//! Kept free of register access so it builds and tests off target.

use crate::config::CPU_FREQ_HZ;

// ADMUX
pub const REFS0: u8 = 6;
// ADCSRA
pub const ADEN: u8 = 7;
pub const ADSC: u8 = 6;
pub const ADC_PRESCALER_DIV128: u8 = 0b111;

// UCSR0A
pub const RXC0: u8 = 7;
pub const UDRE0: u8 = 5;
pub const U2X0: u8 = 1;
// UCSR0B
pub const RXCIE0: u8 = 7;
pub const RXEN0: u8 = 4;
pub const TXEN0: u8 = 3;
// UCSR0C: asynchronous, no parity, 1 stop bit, 8 data bits
pub const UCSR0C_8N1: u8 = 0b0000_0110;

// TCCR0B: clk/64
pub const TIMER0_DIV64: u8 = 0b011;
// TIMSK0 / TIFR0
pub const TOIE0: u8 = 0;
pub const TOV0: u8 = 0;

/// Timer0 prescaler
pub const TIMER0_PRESCALE: u32 = 64;

/// Microseconds per Timer0 tick (4 at 16 MHz)
pub const MICROS_PER_TICK: u32 = TIMER0_PRESCALE / (CPU_FREQ_HZ / 1_000_000);

/// Only MUX2..0 are driven; channel numbers past 7 alias onto 0..7.
#[inline]
pub const fn mux_bits(channel: u8) -> u8 {
    channel & 0b0000_0111
}

/// ADMUX with AVCC reference and `channel` selected, other bits kept.
#[inline]
pub const fn admux_select(admux: u8, channel: u8) -> u8 {
    ((admux | (1 << REFS0)) & 0xF8) | mux_bits(channel)
}

/// ADCSRA with the converter enabled at clk/128, other bits kept.
#[inline]
pub const fn adcsra_enable(adcsra: u8) -> u8 {
    adcsra | (1 << ADEN) | ADC_PRESCALER_DIV128
}

/// What a one-shot read does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStep {
    /// Select the channel and set ADSC
    Start,
    /// Converter busy; poll again
    Wait,
    /// Conversion for this channel finished; read ADC
    Collect,
}

/// Next step for a read of `channel`, given the channel whose conversion is
/// in flight (if any) and the ADSC flag.
///
/// A result pending for a different channel is abandoned, never returned.
/// If that conversion is still running it is allowed to finish first: MUX
/// must not change under a running conversion.
#[inline]
pub const fn conversion_step(pending: Option<u8>, channel: u8, busy: bool) -> ConversionStep {
    let ours = match pending {
        Some(active) => active == mux_bits(channel),
        None => false,
    };
    match (ours, busy) {
        (_, true) => ConversionStep::Wait,
        (true, false) => ConversionStep::Collect,
        (false, false) => ConversionStep::Start,
    }
}

/// UBRR0 for double-speed mode, rounded to nearest.
#[inline]
pub const fn ubrr_double_speed(cpu_hz: u32, baud: u32) -> u16 {
    ((cpu_hz + baud * 4) / (baud * 8) - 1) as u16
}

/// Timer0 overflow count and counter value to microseconds.
///
/// An overflow that fired while interrupts were masked is still pending in
/// TOV0; count it unless the counter has not moved past the wrap yet.
#[inline]
pub const fn timer0_micros(overflows: u32, tcnt: u8, overflow_pending: bool) -> u32 {
    let overflows = if overflow_pending && tcnt < 255 {
        overflows.wrapping_add(1)
    } else {
        overflows
    };
    ((overflows << 8).wrapping_add(tcnt as u32)).wrapping_mul(MICROS_PER_TICK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BAUD_RATE, HORIZONTAL_CHANNEL, VERTICAL_CHANNEL};

    #[test]
    fn channels_alias_modulo_eight() {
        for channel in 0..=u8::MAX {
            assert_eq!(mux_bits(channel), channel % 8);
        }
        assert_eq!(mux_bits(8), 0);
        assert_eq!(mux_bits(9), 1);
    }

    #[test]
    fn sensor_channels_select_distinct_mux() {
        let horizontal = admux_select(0, HORIZONTAL_CHANNEL);
        let vertical = admux_select(0, VERTICAL_CHANNEL);
        assert_eq!(horizontal, 0b0100_0000);
        assert_eq!(vertical, 0b0100_0001);
    }

    #[test]
    fn reselect_clears_previous_channel() {
        let admux = admux_select(0, 7);
        assert_eq!(admux_select(admux, 1), 0b0100_0001);
    }

    #[test]
    fn idle_converter_starts_requested_channel() {
        assert_eq!(conversion_step(None, VERTICAL_CHANNEL, false), ConversionStep::Start);
    }

    #[test]
    fn running_conversion_is_waited_on() {
        assert_eq!(conversion_step(Some(1), VERTICAL_CHANNEL, true), ConversionStep::Wait);
        assert_eq!(conversion_step(Some(1), VERTICAL_CHANNEL, false), ConversionStep::Collect);
    }

    #[test]
    fn other_channel_result_is_never_returned() {
        // Vertical result left over when horizontal is asked for
        assert_eq!(conversion_step(Some(1), HORIZONTAL_CHANNEL, false), ConversionStep::Start);
        assert_eq!(conversion_step(Some(0), VERTICAL_CHANNEL, false), ConversionStep::Start);
    }

    #[test]
    fn mux_is_not_switched_under_running_conversion() {
        assert_eq!(conversion_step(Some(1), HORIZONTAL_CHANNEL, true), ConversionStep::Wait);
        assert_eq!(conversion_step(None, HORIZONTAL_CHANNEL, true), ConversionStep::Wait);
    }

    #[test]
    fn aliased_channel_matches_pending_mux() {
        assert_eq!(conversion_step(Some(1), 9, false), ConversionStep::Collect);
    }

    #[test]
    fn adc_enable_sets_aden_and_div128() {
        assert_eq!(adcsra_enable(0), 0x87);
        assert_eq!(adcsra_enable(1 << ADSC), 0xC7);
    }

    #[test]
    fn one_megabaud_at_16mhz() {
        assert_eq!(ubrr_double_speed(CPU_FREQ_HZ, BAUD_RATE), 1);
        assert_eq!(ubrr_double_speed(CPU_FREQ_HZ, 115_200), 16);
        assert_eq!(ubrr_double_speed(CPU_FREQ_HZ, 9600), 207);
    }

    #[test]
    fn timer_ticks_to_micros() {
        assert_eq!(MICROS_PER_TICK, 4);
        assert_eq!(timer0_micros(0, 0, false), 0);
        assert_eq!(timer0_micros(0, 250, false), 1000);
        assert_eq!(timer0_micros(1, 0, false), 1024);
    }

    #[test]
    fn pending_overflow_is_counted() {
        assert_eq!(timer0_micros(0, 2, true), 1024 + 8);
        assert_eq!(timer0_micros(0, 255, true), 1020);
    }
}
