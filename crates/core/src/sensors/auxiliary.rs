//! Informational sensors: ultrasonic range finder and battery monitor
//!
//! Neither participates in fault detection; their error level stays OK.

use super::health::{ErrorLevel, HealthConfig, SensorHealth};
use super::SensorKind;

/// Downward ultrasonic range finder
#[derive(Debug, Clone, Copy)]
pub struct Ultrasonic {
    health: SensorHealth,
    /// Distance to ground (m)
    pub distance: f64,
    /// Rate of change of distance (m/s)
    pub speed: f64,
    pub out_of_range: bool,
    pub connected: bool,
}

impl Ultrasonic {
    pub fn new(config: &HealthConfig) -> Self {
        Self {
            health: SensorHealth::new(
                SensorKind::Ultrasonic,
                config.rule(SensorKind::Ultrasonic),
            ),
            distance: 0.0,
            speed: 0.0,
            out_of_range: false,
            connected: false,
        }
    }

    pub fn update(&mut self, distance: f64, speed: f64, out_of_range: bool, now_us: u64) {
        self.health.mark_poll(now_us);
        self.health.mark_change(now_us);
        self.distance = distance;
        self.speed = speed;
        self.out_of_range = out_of_range;
    }

    pub fn check_error(&mut self, now_us: u64) -> ErrorLevel {
        self.health.reclassify(now_us, 0)
    }

    pub fn health(&self) -> &SensorHealth {
        &self.health
    }
}

/// Flight battery monitor
#[derive(Debug, Clone, Copy)]
pub struct Battery {
    health: SensorHealth,
    /// Pack voltage (V)
    pub v_bat: f64,
    /// Average cell voltage (V)
    pub v_cell: f64,
    pub cell_count: u8,
}

impl Battery {
    pub fn new(config: &HealthConfig) -> Self {
        Self {
            health: SensorHealth::new(SensorKind::Battery, config.rule(SensorKind::Battery)),
            v_bat: 0.0,
            v_cell: 0.0,
            cell_count: 0,
        }
    }

    /// Store a pack voltage; the cell voltage is derived when the cell count is known
    pub fn update(&mut self, v_bat: f64, cell_count: u8, now_us: u64) {
        self.health.mark_poll(now_us);
        self.health.mark_change(now_us);
        self.v_bat = v_bat;
        self.cell_count = cell_count;
        self.v_cell = if cell_count > 0 {
            v_bat / f64::from(cell_count)
        } else {
            0.0
        };
    }

    pub fn check_error(&mut self, now_us: u64) -> ErrorLevel {
        self.health.reclassify(now_us, 0)
    }

    pub fn health(&self) -> &SensorHealth {
        &self.health
    }
}
