//! Monotonic clock abstraction
//!
//! Sensor records stamp their change/poll times and the fusion strategies
//! derive their integration step from an injected `TimeSource`, so the whole
//! tick pipeline can be driven deterministically on the host.

use core::cell::Cell;

/// Monotonic microsecond clock.
///
/// Firmware builds wrap the hardware timer; host tests use [`MockTime`].
///
/// # Example
///
/// ```
/// use quadfc_core::traits::{MockTime, TimeSource};
///
/// let clock = MockTime::new();
/// let stamp = clock.now_us();
/// clock.advance(150_000);
/// assert_eq!(clock.elapsed_since(stamp), 150_000);
/// ```
pub trait TimeSource: Clone {
    /// Microseconds since boot.
    fn now_us(&self) -> u64;

    /// Milliseconds since boot (truncated).
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    /// Microseconds elapsed since `reference_us`.
    ///
    /// Saturates to zero when the reference lies in the future.
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

/// Manually advanced clock for tests and replay.
///
/// Interior mutability lets a test advance the clock while a
/// `SensorBank` or `Ins` holds it.
#[derive(Debug, Clone, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

impl MockTime {
    /// Clock starting at t = 0.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Clock starting at `us`.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    /// Move forward by `us`.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get().saturating_add(us));
    }
}

impl TimeSource for MockTime {
    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}

/// Borrowed clocks, so a test can keep driving a [`MockTime`] it lent out.
impl<T: TimeSource> TimeSource for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}
