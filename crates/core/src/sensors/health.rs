//! Sensor health classification
//!
//! Every record carries a [`SensorHealth`] header whose error level is
//! recomputed each tick from the record's own state through its kind's
//! [`FaultRule`]. Faults are level-triggered: a level is never latched and
//! clears on the first tick where its condition no longer holds.

use core::fmt;

use crate::mode::FlightMode;

use super::SensorKind;

/// Sensor error severity, ordered from healthy to failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorLevel {
    /// Sensor delivers live, varying data
    #[default]
    Ok = 0,
    /// Degraded but flyable (e.g. missing calibration)
    Warning = 1,
    /// Sensor data must not be trusted
    Critical = 2,
}

impl ErrorLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorLevel::Ok => "OK",
            ErrorLevel::Warning => "WARNING",
            ErrorLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fault detection thresholds
///
/// Defaults: inertial sensors fail after 100 ms without a new value or
/// 100 identical samples, the barometer after 1000 identical altitudes and
/// GPS after 2 s without an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthConfig {
    /// Accelerometer/gyroscope/magnetometer liveness timeout (µs)
    pub imu_timeout_us: u64,
    /// Identical inertial samples before the sensor counts as stuck
    pub imu_repeat_cap: u32,
    /// Identical barometer altitudes before the sensor counts as stuck
    pub baro_repeat_cap: u32,
    /// GPS update timeout (µs)
    pub gps_timeout_us: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            imu_timeout_us: 100_000,
            imu_repeat_cap: 100,
            baro_repeat_cap: 1000,
            gps_timeout_us: 2_000_000,
        }
    }
}

impl HealthConfig {
    /// Fault rule applied to records of `kind`
    pub fn rule(&self, kind: SensorKind) -> FaultRule {
        match kind {
            SensorKind::Accelerometer | SensorKind::Gyroscope | SensorKind::Magnetometer => {
                FaultRule::StaleOrStuck {
                    timeout_us: self.imu_timeout_us,
                    repeat_cap: self.imu_repeat_cap,
                }
            }
            SensorKind::Barometer => FaultRule::Stuck {
                repeat_cap: self.baro_repeat_cap,
            },
            SensorKind::Gps => FaultRule::Stale {
                timeout_us: self.gps_timeout_us,
            },
            SensorKind::Ultrasonic | SensorKind::Battery => FaultRule::Never,
        }
    }
}

/// Per-kind fault condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultRule {
    /// No change for longer than `timeout_us`, or `repeat_cap` identical samples
    StaleOrStuck { timeout_us: u64, repeat_cap: u32 },
    /// `repeat_cap` identical samples
    Stuck { repeat_cap: u32 },
    /// No update for longer than `timeout_us`
    Stale { timeout_us: u64 },
    /// Informational sensor, always OK
    Never,
}

impl FaultRule {
    /// Saturation point of the repeat counter, if the rule counts repeats
    pub fn repeat_cap(&self) -> Option<u32> {
        match *self {
            FaultRule::StaleOrStuck { repeat_cap, .. } | FaultRule::Stuck { repeat_cap } => {
                Some(repeat_cap)
            }
            FaultRule::Stale { .. } | FaultRule::Never => None,
        }
    }

    /// Classify a record from the time since its last change and its repeat count
    pub fn evaluate(&self, since_change_us: u64, repeats: u32) -> ErrorLevel {
        let failed = match *self {
            FaultRule::StaleOrStuck {
                timeout_us,
                repeat_cap,
            } => since_change_us > timeout_us || repeats >= repeat_cap,
            FaultRule::Stuck { repeat_cap } => repeats >= repeat_cap,
            FaultRule::Stale { timeout_us } => since_change_us > timeout_us,
            FaultRule::Never => false,
        };
        if failed {
            ErrorLevel::Critical
        } else {
            ErrorLevel::Ok
        }
    }
}

/// Timing and error state shared by every sensor record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorHealth {
    kind: SensorKind,
    rule: FaultRule,
    last_change_us: u64,
    last_poll_us: u64,
    error: ErrorLevel,
}

impl SensorHealth {
    pub fn new(kind: SensorKind, rule: FaultRule) -> Self {
        Self {
            kind,
            rule,
            last_change_us: 0,
            last_poll_us: 0,
            error: ErrorLevel::Ok,
        }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn rule(&self) -> FaultRule {
        self.rule
    }

    /// Time of the last sample that differed from its predecessor (µs)
    pub fn last_change_us(&self) -> u64 {
        self.last_change_us
    }

    /// Time of the last ingest call, changed or not (µs)
    pub fn last_poll_us(&self) -> u64 {
        self.last_poll_us
    }

    pub fn error_level(&self) -> ErrorLevel {
        self.error
    }

    /// Lowest flight mode that needs this sensor
    pub fn min_flight_mode(&self) -> FlightMode {
        self.kind.min_flight_mode()
    }

    /// True when the sensor is in [`ErrorLevel::Critical`]
    pub fn is_error(&self) -> bool {
        self.error == ErrorLevel::Critical
    }

    pub(crate) fn mark_poll(&mut self, now_us: u64) {
        self.last_poll_us = now_us;
    }

    pub(crate) fn mark_change(&mut self, now_us: u64) {
        self.last_change_us = now_us;
    }

    /// Recompute the error level; returns the previous level.
    pub(crate) fn reclassify(&mut self, now_us: u64, repeats: u32) -> ErrorLevel {
        let previous = self.error;
        self.error = self
            .rule
            .evaluate(now_us.saturating_sub(self.last_change_us), repeats);
        previous
    }
}
