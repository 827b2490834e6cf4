//! Platform-agnostic trait abstractions.
//!
//! Platform implementations (hardware timers) live in the firmware; the core
//! only depends on these traits and ships mocks for host testing.

pub mod time;

pub use time::{MockTime, TimeSource};
