//! GPS receiver record
//!
//! Each sentence group of a fix (location, date, time, speed, course,
//! altitude) is independently optional; `None` means the receiver flagged
//! that group invalid.

use super::health::{ErrorLevel, HealthConfig, SensorHealth};
use super::SensorKind;

/// Geographic position (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// UTC date of a fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GpsDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// UTC time of a fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GpsTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub centisecond: u8,
}

/// One decoded receiver update
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GpsReading {
    pub location: Option<GeoPoint>,
    pub date: Option<GpsDate>,
    pub time: Option<GpsTime>,
    /// Ground speed (m/s)
    pub speed: Option<f64>,
    /// Course over ground (degrees)
    pub course: Option<f64>,
    /// Altitude above MSL (m)
    pub altitude: Option<f64>,
    /// Satellites used in the fix
    pub satellites: u8,
    /// Horizontal dilution of precision (< 2 good, < 8 usable)
    pub hdop: f64,
}

/// GPS receiver with an update timeout
#[derive(Debug, Clone, Copy)]
pub struct Gps {
    health: SensorHealth,
    reading: GpsReading,
}

impl Gps {
    pub fn new(config: &HealthConfig) -> Self {
        Self {
            health: SensorHealth::new(SensorKind::Gps, config.rule(SensorKind::Gps)),
            reading: GpsReading::default(),
        }
    }

    /// Store a decoded update received at `now_us`.
    ///
    /// Every update counts as a change; receivers repeat identical fixes
    /// legitimately while stationary.
    pub fn update(&mut self, reading: GpsReading, now_us: u64) {
        self.health.mark_poll(now_us);
        self.health.mark_change(now_us);
        self.reading = reading;
    }

    /// Recompute the error level at `now_us`; returns the previous level
    pub fn check_error(&mut self, now_us: u64) -> ErrorLevel {
        self.health.reclassify(now_us, 0)
    }

    pub fn reading(&self) -> &GpsReading {
        &self.reading
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.reading.location
    }

    pub fn satellites(&self) -> u8 {
        self.reading.satellites
    }

    pub fn hdop(&self) -> f64 {
        self.reading.hdop
    }

    pub fn health(&self) -> &SensorHealth {
        &self.health
    }
}
