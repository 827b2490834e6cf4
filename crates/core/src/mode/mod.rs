//! Flight mode tiers and sensor-health gating
//!
//! The gate is a pure function over sensor health; mode arbitration itself
//! (stick input, arming) lives outside the core and only reads the ceiling.

mod flight_mode;
mod gate;

pub use flight_mode::FlightMode;
pub use gate::highest_flight_mode;
