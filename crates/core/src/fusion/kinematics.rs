//! Inertial dead reckoning shared by the fusion strategies
//!
//! World-frame specific force minus gravity is integrated twice. The
//! vertical position is pulled toward the barometric altitude above the
//! reference captured at reset, which bounds the vertical drift.

use crate::math::{Quaternion, Vec3, GRAVITY};
use crate::sensors::SensorBank;
use crate::traits::TimeSource;

/// Fraction of the barometer/estimate difference applied per update
const BARO_BLEND: f64 = 0.02;

/// Velocity and position integrator
#[derive(Debug, Clone, Copy, Default)]
pub struct Kinematics {
    location: Vec3,
    velocity: Vec3,
    /// Barometric altitude mapped to z = 0 (m)
    altitude_ref: f64,
    /// Heading-only attitude used for the local velocity frame
    heading: Quaternion,
}

impl Kinematics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero position and velocity; the current baro altitude becomes z = 0
    pub fn reset<T: TimeSource>(&mut self, bank: &SensorBank<T>) {
        *self = Self {
            altitude_ref: bank.barometer().altitude(),
            ..Self::default()
        };
    }

    /// Re-zero only the vertical axis
    pub fn reset_altitude<T: TimeSource>(&mut self, bank: &SensorBank<T>) {
        self.altitude_ref = bank.barometer().altitude();
        self.location.z = 0.0;
        self.velocity.z = 0.0;
    }

    /// Integrate one step of `dt` seconds.
    ///
    /// `accel` is the calibrated body-frame accelerometer sample, or `None`
    /// when it must not be trusted; the barometer correction still runs.
    pub fn update<T: TimeSource>(
        &mut self,
        bank: &SensorBank<T>,
        attitude: &Quaternion,
        accel: Option<Vec3>,
        dt: f64,
    ) {
        let yaw = attitude.to_euler_zyx().yaw();
        self.heading = Quaternion::from_axis_angle(&Vec3::new(0.0, 0.0, 1.0), yaw);

        if let Some(mut specific_force) = accel {
            attitude.rotate(&mut specific_force);
            let linear = specific_force - Vec3::new(0.0, 0.0, GRAVITY);
            self.velocity += linear * dt;
            self.location += self.velocity * dt;
        }

        let baro = bank.barometer();
        if !baro.health().is_error() {
            let baro_z = baro.altitude() - self.altitude_ref;
            self.location.z += (baro_z - self.location.z) * BARO_BLEND;
        }
    }

    pub fn location(&self) -> Vec3 {
        self.location
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Velocity rotated into the heading frame
    pub fn local_velocity(&self) -> Vec3 {
        let mut v = self.velocity;
        self.heading.rotate_reverse_z(&mut v);
        v
    }
}
