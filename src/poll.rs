//! Busy-wait polling on hardware flags

/// Free-running microsecond counter. Wraps at `u32::MAX`.
pub trait Monotonic {
    fn micros(&self) -> u32;
}

impl<C: Monotonic + ?Sized> Monotonic for &C {
    #[inline]
    fn micros(&self) -> u32 {
        (**self).micros()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollError<E> {
    Timeout,
    Other(E),
}

/// Microseconds since `start`, correct across one counter wrap.
#[inline]
pub fn elapsed_since<C: Monotonic + ?Sized>(clock: &C, start: u32) -> u32 {
    clock.micros().wrapping_sub(start)
}

/// Spin on `poll` until it stops returning `WouldBlock`.
///
/// With `timeout_us == None` this never gives up, which is what the firmware
/// wants: the only ways out are the flag flipping or a reset.
pub fn block_until<C, T, E, F>(
    clock: &C,
    timeout_us: Option<u32>,
    mut poll: F,
) -> Result<T, PollError<E>>
where
    C: Monotonic + ?Sized,
    F: FnMut() -> nb::Result<T, E>,
{
    let start = clock.micros();
    loop {
        match poll() {
            Ok(value) => return Ok(value),
            Err(nb::Error::Other(e)) => return Err(PollError::Other(e)),
            Err(nb::Error::WouldBlock) => {}
        }

        if let Some(limit) = timeout_us {
            if elapsed_since(clock, start) >= limit {
                return Err(PollError::Timeout);
            }
        }
    }
}

/// Spin until `period_us` have passed since `start`.
pub fn spin_until_elapsed<C: Monotonic + ?Sized>(clock: &C, start: u32, period_us: u32) {
    while elapsed_since(clock, start) < period_us {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Advances by `step` on every read.
    struct StepClock {
        now: Cell<u32>,
        step: u32,
    }

    impl StepClock {
        fn new(start: u32, step: u32) -> Self {
            Self { now: Cell::new(start), step }
        }
    }

    impl Monotonic for StepClock {
        fn micros(&self) -> u32 {
            let now = self.now.get();
            self.now.set(now.wrapping_add(self.step));
            now
        }
    }

    #[test]
    fn returns_once_flag_flips() {
        let clock = StepClock::new(0, 1);
        let mut polls = 0;
        let result: Result<u8, PollError<()>> = block_until(&clock, None, || {
            polls += 1;
            if polls < 5 {
                Err(nb::Error::WouldBlock)
            } else {
                Ok(b'7')
            }
        });
        assert_eq!(result, Ok(b'7'));
        assert_eq!(polls, 5);
    }

    #[test]
    fn gives_up_after_timeout() {
        let clock = StepClock::new(0, 10);
        let result: Result<(), PollError<()>> =
            block_until(&clock, Some(100), || Err(nb::Error::WouldBlock));
        assert_eq!(result, Err(PollError::Timeout));
    }

    #[test]
    fn hardware_errors_end_the_wait() {
        let clock = StepClock::new(0, 1);
        let result: Result<(), PollError<&str>> =
            block_until(&clock, None, || Err(nb::Error::Other("overrun")));
        assert_eq!(result, Err(PollError::Other("overrun")));
    }

    #[test]
    fn elapsed_survives_counter_wrap() {
        let clock = StepClock::new(u32::MAX - 4, 0);
        let start = clock.micros();
        clock.now.set(5);
        assert_eq!(elapsed_since(&clock, start), 10);
    }

    #[test]
    fn spin_stops_at_period() {
        let clock = StepClock::new(0, 3);
        spin_until_elapsed(&clock, 0, 30);
        assert!(clock.now.get() >= 30);
    }
}
