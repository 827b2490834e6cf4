//! Barometric altimeter record

use super::health::{ErrorLevel, HealthConfig, SensorHealth};
use super::SensorKind;

/// Barometer with stuck-altitude detection
///
/// Only the altitude participates in change detection; pressure and
/// temperature are carried along for telemetry. There is no liveness
/// timeout because baro drivers update far slower than the control loop.
#[derive(Debug, Clone, Copy)]
pub struct Barometer {
    health: SensorHealth,
    /// Altitude (m)
    altitude: f64,
    /// Pressure (atm)
    pressure: f64,
    /// Temperature (°C)
    temperature: f64,
    repeat_count: u32,
}

impl Barometer {
    pub fn new(config: &HealthConfig) -> Self {
        Self {
            health: SensorHealth::new(
                SensorKind::Barometer,
                config.rule(SensorKind::Barometer),
            ),
            altitude: 0.0,
            pressure: 0.0,
            temperature: 0.0,
            repeat_count: 0,
        }
    }

    /// Ingest a reading taken at `now_us`
    pub fn update(&mut self, altitude: f64, pressure: f64, temperature: f64, now_us: u64) {
        self.health.mark_poll(now_us);
        self.pressure = pressure;
        self.temperature = temperature;
        if altitude != self.altitude {
            self.altitude = altitude;
            self.repeat_count = 0;
            self.health.mark_change(now_us);
        } else {
            let cap = self.health.rule().repeat_cap().unwrap_or(u32::MAX);
            self.repeat_count = self.repeat_count.saturating_add(1).min(cap);
        }
    }

    /// Recompute the error level at `now_us`; returns the previous level
    pub fn check_error(&mut self, now_us: u64) -> ErrorLevel {
        self.health.reclassify(now_us, self.repeat_count)
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn health(&self) -> &SensorHealth {
        &self.health
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stuck_altitude_trips_on_the_thousandth_repeat() {
        let mut baro = Barometer::new(&HealthConfig::default());
        baro.update(120.5, 0.98, 21.0, 0);

        for i in 1..1000u64 {
            baro.update(120.5, 0.98, 21.0, i);
            baro.check_error(i);
            assert_eq!(baro.health().error_level(), ErrorLevel::Ok, "repeat {}", i);
        }

        baro.update(120.5, 0.98, 21.0, 1000);
        baro.check_error(1000);
        assert_eq!(baro.repeat_count(), 1000);
        assert_eq!(baro.health().error_level(), ErrorLevel::Critical);

        baro.update(120.5, 0.98, 21.0, 1001);
        assert_eq!(baro.repeat_count(), 1000);
    }

    #[test]
    fn pressure_changes_do_not_count_as_altitude_change() {
        let mut baro = Barometer::new(&HealthConfig::default());
        baro.update(10.0, 1.0, 20.0, 0);
        baro.update(10.0, 0.99, 20.5, 5);
        assert_eq!(baro.repeat_count(), 1);
        assert_eq!(baro.pressure(), 0.99);
        assert_eq!(baro.temperature(), 20.5);
        assert_eq!(baro.health().last_change_us(), 0);
    }

    #[test]
    fn no_timeout_for_slow_barometer() {
        let mut baro = Barometer::new(&HealthConfig::default());
        baro.update(10.0, 1.0, 20.0, 0);
        baro.check_error(60_000_000);
        assert_eq!(baro.health().error_level(), ErrorLevel::Ok);
    }

    #[test]
    fn new_altitude_clears_fault() {
        let mut baro = Barometer::new(&HealthConfig::default());
        for _ in 0..1000 {
            baro.update(0.0, 1.0, 20.0, 0);
        }
        baro.check_error(0);
        assert!(baro.health().is_error());

        baro.update(0.1, 1.0, 20.0, 1);
        baro.check_error(1);
        assert!(!baro.health().is_error());
        assert_eq!(baro.altitude(), 0.1);
    }
}
