//! Three-axis sensor record (accelerometer, gyroscope, magnetometer)

use crate::math::Vec3;

use super::health::{ErrorLevel, HealthConfig, SensorHealth};
use super::SensorKind;

/// Three-axis sensor with liveness and stuck-value detection
///
/// A sample counts as changed when any component differs exactly from the
/// stored value. Identical samples bump a repeat counter that saturates at
/// the kind's cap.
#[derive(Debug, Clone, Copy)]
pub struct VectorSensor {
    health: SensorHealth,
    value: Vec3,
    previous: Vec3,
    repeat_count: u32,
}

impl VectorSensor {
    pub fn new(kind: SensorKind, config: &HealthConfig) -> Self {
        Self {
            health: SensorHealth::new(kind, config.rule(kind)),
            value: Vec3::ZERO,
            previous: Vec3::ZERO,
            repeat_count: 0,
        }
    }

    /// Ingest a sample taken at `now_us`
    pub fn update(&mut self, sample: Vec3, now_us: u64) {
        self.health.mark_poll(now_us);
        if sample != self.value {
            self.previous = self.value;
            self.value = sample;
            self.repeat_count = 0;
            self.health.mark_change(now_us);
        } else {
            let cap = self.health.rule().repeat_cap().unwrap_or(u32::MAX);
            self.repeat_count = self.repeat_count.saturating_add(1).min(cap);
        }
    }

    pub fn update_xyz(&mut self, x: f64, y: f64, z: f64, now_us: u64) {
        self.update(Vec3::new(x, y, z), now_us);
    }

    /// Recompute the error level at `now_us`; returns the previous level
    pub fn check_error(&mut self, now_us: u64) -> ErrorLevel {
        self.health.reclassify(now_us, self.repeat_count)
    }

    /// Latest sample
    pub fn value(&self) -> Vec3 {
        self.value
    }

    /// Distinct sample stored before the latest change
    pub fn previous(&self) -> Vec3 {
        self.previous
    }

    /// Consecutive identical samples since the last change
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn health(&self) -> &SensorHealth {
        &self.health
    }
}
