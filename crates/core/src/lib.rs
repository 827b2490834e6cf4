//! quadfc_core - Pure no_std flight controller core
//!
//! Sensor health tracking, flight-mode gating, rotation math and attitude
//! estimation for a multirotor. Everything here is platform-agnostic and
//! tested on host; drivers, scheduling and persistence live in the firmware.
//!
//! # Design Principles
//!
//! - **Pure no_std**: No heap, no std library dependencies
//! - **Trait abstractions**: The monotonic clock is injected via [`traits::TimeSource`]
//! - **Single owner**: [`ins::Ins`] owns the sensor bank; each tick borrows it
//!   exclusively for ingest, then reads it for health, gating and fusion
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)
//! - [`math`]: Vectors, matrices, Euler angles and quaternions
//! - [`sensors`]: Sensor records, calibration and health classification
//! - [`mode`]: Flight-mode tiers and the sensor-health gate
//! - [`fusion`]: Complementary and Madgwick attitude estimators
//! - [`ins`]: Inertial navigation facade and control tick
//! - [`parameters`]: Parameter store and configuration groups
//! - [`logging`]: Log macros routed to defmt or the host console

#![cfg_attr(not(test), no_std)]

pub mod logging;

pub mod fusion;
pub mod ins;
pub mod math;
pub mod mode;
pub mod parameters;
pub mod sensors;
pub mod traits;
