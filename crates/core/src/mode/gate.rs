//! Flight mode gate
//!
//! Maps sensor health to the highest flight mode the vehicle may enter.
//! Every sensor above the tolerated error level caps the result one tier
//! below the lowest mode that needs it; the tightest cap wins.

use crate::sensors::{ErrorLevel, SensorHealth};

use super::FlightMode;

/// Highest flight mode permitted by `records`.
///
/// Records whose error level exceeds `max_tolerable` each contribute a
/// ceiling of `min_flight_mode().below()`. With no such record the result
/// is [`FlightMode::HIGHEST`]. A failing sensor needed by the lowest tier
/// floors the result at [`FlightMode::LOWEST`] instead of underflowing.
pub fn highest_flight_mode<'a, I>(records: I, max_tolerable: ErrorLevel) -> FlightMode
where
    I: IntoIterator<Item = &'a SensorHealth>,
{
    records
        .into_iter()
        .filter(|record| record.error_level() > max_tolerable)
        .map(|record| record.min_flight_mode().below())
        .min()
        .unwrap_or(FlightMode::HIGHEST)
}
