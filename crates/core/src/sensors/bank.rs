//! Sensor bank
//!
//! Owns every sensor record and the injected clock. Ingest methods stamp
//! samples with the clock's current time; [`SensorBank::check_errors`]
//! reclassifies all records and logs transitions.

use crate::math::Vec3;
use crate::mode::{highest_flight_mode, FlightMode};
use crate::traits::TimeSource;

use super::auxiliary::{Battery, Ultrasonic};
use super::barometer::Barometer;
use super::calibration::ImuCalibration;
use super::gps::{Gps, GpsReading};
use super::health::{ErrorLevel, HealthConfig, SensorHealth};
use super::vector::VectorSensor;
use super::{SensorId, SensorKind};

/// Fixed set of sensor records fed by the hardware polling layer
#[derive(Debug, Clone)]
pub struct SensorBank<T: TimeSource> {
    clock: T,
    config: HealthConfig,
    calibration: ImuCalibration,
    accelerometer: VectorSensor,
    gyroscope: VectorSensor,
    magnetometer: VectorSensor,
    barometer: Barometer,
    gps: Gps,
    battery: Battery,
    ultrasonic: Ultrasonic,
}

impl<T: TimeSource> SensorBank<T> {
    /// Bank with default fault thresholds and no calibration
    pub fn new(clock: T) -> Self {
        Self::with_config(clock, HealthConfig::default())
    }

    pub fn with_config(clock: T, config: HealthConfig) -> Self {
        Self {
            clock,
            config,
            calibration: ImuCalibration::default(),
            accelerometer: VectorSensor::new(SensorKind::Accelerometer, &config),
            gyroscope: VectorSensor::new(SensorKind::Gyroscope, &config),
            magnetometer: VectorSensor::new(SensorKind::Magnetometer, &config),
            barometer: Barometer::new(&config),
            gps: Gps::new(&config),
            battery: Battery::new(&config),
            ultrasonic: Ultrasonic::new(&config),
        }
    }

    // --- Ingest ---

    /// Accelerometer sample (m/s²), calibrated before storage
    pub fn update_accelerometer(&mut self, raw: Vec3) {
        let now = self.clock.now_us();
        let sample = self.calibration.accelerometer.apply(raw);
        self.accelerometer.update(sample, now);
    }

    /// Gyroscope sample (deg/s), bias-corrected before storage
    pub fn update_gyroscope(&mut self, raw: Vec3) {
        let now = self.clock.now_us();
        let sample = self.calibration.gyroscope.apply(raw);
        self.gyroscope.update(sample, now);
    }

    /// Magnetometer sample (µT), hard/soft-iron corrected before storage
    pub fn update_magnetometer(&mut self, raw: Vec3) {
        let now = self.clock.now_us();
        let sample = self.calibration.magnetometer.apply(raw);
        self.magnetometer.update(sample, now);
    }

    pub fn update_accelerometer_xyz(&mut self, x: f64, y: f64, z: f64) {
        self.update_accelerometer(Vec3::new(x, y, z));
    }

    pub fn update_gyroscope_xyz(&mut self, x: f64, y: f64, z: f64) {
        self.update_gyroscope(Vec3::new(x, y, z));
    }

    pub fn update_magnetometer_xyz(&mut self, x: f64, y: f64, z: f64) {
        self.update_magnetometer(Vec3::new(x, y, z));
    }

    pub fn update_barometer(&mut self, altitude: f64, pressure: f64, temperature: f64) {
        let now = self.clock.now_us();
        self.barometer.update(altitude, pressure, temperature, now);
    }

    pub fn update_gps(&mut self, reading: GpsReading) {
        let now = self.clock.now_us();
        self.gps.update(reading, now);
    }

    pub fn update_battery(&mut self, v_bat: f64, cell_count: u8) {
        let now = self.clock.now_us();
        self.battery.update(v_bat, cell_count, now);
    }

    pub fn update_ultrasonic(&mut self, distance: f64, speed: f64, out_of_range: bool) {
        let now = self.clock.now_us();
        self.ultrasonic.update(distance, speed, out_of_range, now);
    }

    /// Mark the range finder as present or absent
    pub fn set_ultrasonic_connected(&mut self, connected: bool) {
        self.ultrasonic.connected = connected;
    }

    // --- Health ---

    /// Recompute every record's error level at the current time.
    ///
    /// Returns the number of gated records in [`ErrorLevel::Critical`].
    pub fn check_errors(&mut self) -> usize {
        let now = self.clock.now_us();

        let previous = [
            self.accelerometer.check_error(now),
            self.gyroscope.check_error(now),
            self.magnetometer.check_error(now),
            self.barometer.check_error(now),
            self.gps.check_error(now),
            self.battery.check_error(now),
        ];
        self.ultrasonic.check_error(now);

        for (id, previous) in SensorId::ALL.into_iter().zip(previous) {
            let current = self.health(id).error_level();
            if current > previous {
                crate::log_warn!(
                    "{} health {} -> {}",
                    id.kind().label(),
                    previous.as_str(),
                    current.as_str()
                );
            } else if current < previous {
                crate::log_info!(
                    "{} recovered {} -> {}",
                    id.kind().label(),
                    previous.as_str(),
                    current.as_str()
                );
            }
        }

        self.iter_health().filter(|h| h.is_error()).count()
    }

    /// Health header of a gated record
    pub fn health(&self, id: SensorId) -> &SensorHealth {
        match id {
            SensorId::Accelerometer => self.accelerometer.health(),
            SensorId::Gyroscope => self.gyroscope.health(),
            SensorId::Magnetometer => self.magnetometer.health(),
            SensorId::Barometer => self.barometer.health(),
            SensorId::Gps => self.gps.health(),
            SensorId::Battery => self.battery.health(),
        }
    }

    /// Health headers of the six gated records in bank order
    pub fn iter_health(&self) -> impl Iterator<Item = &SensorHealth> + '_ {
        SensorId::ALL.into_iter().map(move |id| self.health(id))
    }

    /// Highest flight mode the current health levels permit
    pub fn highest_flight_mode(&self, max_tolerable: ErrorLevel) -> FlightMode {
        highest_flight_mode(self.iter_health(), max_tolerable)
    }

    // --- Records ---

    pub fn accelerometer(&self) -> &VectorSensor {
        &self.accelerometer
    }

    pub fn gyroscope(&self) -> &VectorSensor {
        &self.gyroscope
    }

    pub fn magnetometer(&self) -> &VectorSensor {
        &self.magnetometer
    }

    pub fn barometer(&self) -> &Barometer {
        &self.barometer
    }

    pub fn gps(&self) -> &Gps {
        &self.gps
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    pub fn ultrasonic(&self) -> &Ultrasonic {
        &self.ultrasonic
    }

    // --- Clock, config, calibration ---

    pub fn clock(&self) -> &T {
        &self.clock
    }

    pub fn now_us(&self) -> u64 {
        self.clock.now_us()
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    pub fn calibration(&self) -> &ImuCalibration {
        &self.calibration
    }

    pub fn calibration_mut(&mut self) -> &mut ImuCalibration {
        &mut self.calibration
    }

    /// Replace the calibration; applies to samples ingested from now on
    pub fn set_calibration(&mut self, calibration: ImuCalibration) {
        self.calibration = calibration;
    }
}
