//! Sensor records and the sensor bank
//!
//! Raw samples from the hardware polling layer land in typed records owned
//! by a [`SensorBank`]. Each record classifies its own health every tick;
//! the bank feeds those levels to the flight-mode gate.
//!
//! # Tick order
//!
//! 1. Ingest samples (`SensorBank::update_*`, exclusive borrow)
//! 2. [`SensorBank::check_errors`]
//! 3. [`SensorBank::highest_flight_mode`] (read-only)
//! 4. Fusion (read-only)

use core::fmt;

use crate::mode::FlightMode;

pub mod auxiliary;
pub mod bank;
pub mod barometer;
pub mod calibration;
pub mod gps;
pub mod health;
pub mod vector;

pub use auxiliary::{Battery, Ultrasonic};
pub use bank::SensorBank;
pub use barometer::Barometer;
pub use calibration::{estimate_bias, AxisCalibration, ImuCalibration};
pub use gps::{GeoPoint, Gps, GpsDate, GpsReading, GpsTime};
pub use health::{ErrorLevel, FaultRule, HealthConfig, SensorHealth};
pub use vector::VectorSensor;

/// Physical sensor kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    Accelerometer,
    Gyroscope,
    Magnetometer,
    Barometer,
    Gps,
    Ultrasonic,
    Battery,
}

impl SensorKind {
    /// Lowest flight mode that needs this sensor
    pub fn min_flight_mode(self) -> FlightMode {
        match self {
            SensorKind::Accelerometer => FlightMode::Level,
            SensorKind::Gyroscope => FlightMode::Rate,
            SensorKind::Magnetometer => FlightMode::GpsHold,
            SensorKind::Barometer => FlightMode::AltitudeHold,
            SensorKind::Gps => FlightMode::GpsHold,
            SensorKind::Ultrasonic | SensorKind::Battery => FlightMode::Dreaming,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "accelerometer",
            SensorKind::Gyroscope => "gyroscope",
            SensorKind::Magnetometer => "magnetometer",
            SensorKind::Barometer => "barometer",
            SensorKind::Gps => "gps",
            SensorKind::Ultrasonic => "ultrasonic",
            SensorKind::Battery => "battery",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Index of the six records scanned by the flight-mode gate
///
/// The ultrasonic range finder is held by the bank but is not gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SensorId {
    Accelerometer = 0,
    Gyroscope = 1,
    Magnetometer = 2,
    Barometer = 3,
    Gps = 4,
    Battery = 5,
}

impl SensorId {
    pub const COUNT: usize = 6;

    /// Gated records in bank order
    pub const ALL: [SensorId; SensorId::COUNT] = [
        SensorId::Accelerometer,
        SensorId::Gyroscope,
        SensorId::Magnetometer,
        SensorId::Barometer,
        SensorId::Gps,
        SensorId::Battery,
    ];

    pub fn kind(self) -> SensorKind {
        match self {
            SensorId::Accelerometer => SensorKind::Accelerometer,
            SensorId::Gyroscope => SensorKind::Gyroscope,
            SensorId::Magnetometer => SensorKind::Magnetometer,
            SensorId::Barometer => SensorKind::Barometer,
            SensorId::Gps => SensorKind::Gps,
            SensorId::Battery => SensorKind::Battery,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}
