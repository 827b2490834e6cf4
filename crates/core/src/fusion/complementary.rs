//! Complementary filter
//!
//! Integrates the gyroscope and blends the result toward the attitude
//! observed by accelerometer and magnetometer with a fixed weight per
//! update. The observed attitude is built from Euler angles, so the blended
//! estimate goes through [`Quaternion::calibrate`] every update.

use crate::math::{Quaternion, Vec3, CALIBRATE_LIMIT_DEG};
use crate::sensors::SensorBank;
use crate::traits::TimeSource;

use super::kinematics::Kinematics;
use super::{observed_attitude, usable_accel, FusionStrategy, InsConfig, StepClock};

#[derive(Debug, Clone, Copy)]
pub struct Complementary {
    config: InsConfig,
    attitude: Quaternion,
    kinematics: Kinematics,
    clock: StepClock,
}

impl Complementary {
    pub fn new(config: &InsConfig) -> Self {
        Self {
            config: *config,
            attitude: Quaternion::forward(),
            kinematics: Kinematics::new(),
            clock: StepClock::default(),
        }
    }

    /// Gyro-only prediction over `dt` seconds
    fn predict<T: TimeSource>(&self, bank: &SensorBank<T>, dt: f64) -> Quaternion {
        let gyro = bank.gyroscope();
        if gyro.health().is_error() {
            return self.attitude;
        }
        let rate = gyro.value().to_rad();
        let q = self.attitude;
        (q + q * rate * (0.5 * dt)).normalize()
    }
}

impl FusionStrategy for Complementary {
    fn configure(&mut self, config: &InsConfig) {
        self.config = *config;
    }

    fn begin<T: TimeSource>(&mut self, bank: &SensorBank<T>) {
        self.attitude = observed_attitude(bank, &self.config, 0.0)
            .unwrap_or_else(Quaternion::forward)
            .calibrate(CALIBRATE_LIMIT_DEG);
        self.kinematics.reset(bank);
        self.clock.restart(bank.now_us());
        crate::log_debug!("complementary filter started");
    }

    fn handle<T: TimeSource>(&mut self, bank: &SensorBank<T>) {
        let dt = self.clock.step(bank.now_us());
        if dt <= 0.0 {
            return;
        }

        let predicted = self.predict(bank, dt);
        let yaw = predicted.to_euler_zyx().yaw();
        let blended = match observed_attitude(bank, &self.config, yaw) {
            Some(observed) => {
                // Same hemisphere, or the blend takes the long way round
                let observed = if predicted.dot(&observed) < 0.0 {
                    observed * -1.0
                } else {
                    observed
                };
                Quaternion::lerp(&predicted, &observed, 1.0 - self.config.cf_alpha)
            }
            None => predicted,
        };
        self.attitude = blended.calibrate(CALIBRATE_LIMIT_DEG);

        let accel = usable_accel(bank, &self.config);
        self.kinematics.update(bank, &self.attitude, accel, dt);
    }

    fn reset_altitude<T: TimeSource>(&mut self, bank: &SensorBank<T>) {
        self.kinematics.reset_altitude(bank);
    }

    fn attitude(&self) -> Quaternion {
        self.attitude
    }

    fn location(&self) -> Vec3 {
        self.kinematics.location()
    }

    fn velocity(&self) -> Vec3 {
        self.kinematics.velocity()
    }

    fn local_velocity(&self) -> Vec3 {
        self.kinematics.local_velocity()
    }
}
