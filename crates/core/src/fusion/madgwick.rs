//! Madgwick gradient-descent filter
//!
//! Gyro integration corrected by one normalized gradient-descent step per
//! update toward the attitude that best explains the measured gravity and
//! magnetic field directions (MARG). Without a usable magnetometer only the
//! gravity objective is used (IMU mode); without a usable accelerometer the
//! gyroscope runs open loop.
//!
//! The objective functions and Jacobians are written out with `nalgebra`
//! fixed-size matrices; the gradient is `Jᵀ f`.

use nalgebra::{Matrix3x4, Vector3, Vector4};

use crate::math::{Quaternion, Vec3, CALIBRATE_LIMIT_DEG};
use crate::sensors::SensorBank;
use crate::traits::TimeSource;

use super::kinematics::Kinematics;
use super::{observed_attitude, usable_accel, usable_mag, FusionStrategy, InsConfig, StepClock};

#[derive(Debug, Clone, Copy)]
pub struct Madgwick {
    config: InsConfig,
    attitude: Quaternion,
    kinematics: Kinematics,
    clock: StepClock,
}

/// Gravity objective: expected minus measured body-frame gravity direction
fn gravity_terms(q: &Quaternion, a: Vec3) -> (Matrix3x4<f64>, Vector3<f64>) {
    let Quaternion { w, x, y, z } = *q;
    let f = Vector3::new(
        2.0 * (x * z - w * y) - a.x,
        2.0 * (w * x + y * z) - a.y,
        2.0 * (0.5 - x * x - y * y) - a.z,
    );
    #[rustfmt::skip]
    let j = Matrix3x4::new(
        -2.0 * y,  2.0 * z,  -2.0 * w, 2.0 * x,
         2.0 * x,  2.0 * w,   2.0 * z, 2.0 * y,
         0.0,     -4.0 * x,  -4.0 * y, 0.0,
    );
    (j, f)
}

/// Magnetic objective against the reference field `(bx, 0, bz)` derived
/// from the current estimate, so heading error never leaks into tilt
fn magnetic_terms(q: &Quaternion, m: Vec3) -> (Matrix3x4<f64>, Vector3<f64>) {
    let mut h = m;
    q.rotate(&mut h);
    let bx = h.length_2d();
    let bz = h.z;

    let Quaternion { w, x, y, z } = *q;
    let f = Vector3::new(
        2.0 * bx * (0.5 - y * y - z * z) + 2.0 * bz * (x * z - w * y) - m.x,
        2.0 * bx * (x * y - w * z) + 2.0 * bz * (w * x + y * z) - m.y,
        2.0 * bx * (w * y + x * z) + 2.0 * bz * (0.5 - x * x - y * y) - m.z,
    );
    #[rustfmt::skip]
    let j = Matrix3x4::new(
        -2.0 * bz * y,
        2.0 * bz * z,
        -4.0 * bx * y - 2.0 * bz * w,
        -4.0 * bx * z + 2.0 * bz * x,

        -2.0 * bx * z + 2.0 * bz * x,
        2.0 * bx * y + 2.0 * bz * w,
        2.0 * bx * x + 2.0 * bz * z,
        -2.0 * bx * w + 2.0 * bz * y,

        2.0 * bx * y,
        2.0 * bx * z - 4.0 * bz * x,
        2.0 * bx * w - 4.0 * bz * y,
        2.0 * bx * x,
    );
    (j, f)
}

/// Unit-length gradient of the combined objective, `None` at the optimum
fn gradient(q: &Quaternion, accel: Vec3, mag: Option<Vec3>) -> Option<Quaternion> {
    let (jg, fg) = gravity_terms(q, accel.normalized());
    let mut grad: Vector4<f64> = jg.transpose() * fg;
    if let Some(m) = mag {
        let (jb, fb) = magnetic_terms(q, m.normalized());
        grad += jb.transpose() * fb;
    }

    let norm = grad.norm();
    if norm <= 0.0 {
        return None;
    }
    let s = grad / norm;
    Some(Quaternion::new(s[0], s[1], s[2], s[3]))
}

impl Madgwick {
    pub fn new(config: &InsConfig) -> Self {
        Self {
            config: *config,
            attitude: Quaternion::forward(),
            kinematics: Kinematics::new(),
            clock: StepClock::default(),
        }
    }

    pub fn beta(&self) -> f64 {
        self.config.madgwick_beta
    }
}

impl FusionStrategy for Madgwick {
    fn configure(&mut self, config: &InsConfig) {
        self.config = *config;
    }

    fn begin<T: TimeSource>(&mut self, bank: &SensorBank<T>) {
        self.attitude = observed_attitude(bank, &self.config, 0.0)
            .unwrap_or_else(Quaternion::forward)
            .calibrate(CALIBRATE_LIMIT_DEG);
        self.kinematics.reset(bank);
        self.clock.restart(bank.now_us());
        crate::log_debug!("madgwick filter started, beta {}", self.config.madgwick_beta);
    }

    fn handle<T: TimeSource>(&mut self, bank: &SensorBank<T>) {
        let dt = self.clock.step(bank.now_us());
        if dt <= 0.0 {
            return;
        }

        let q = self.attitude;
        let gyro = bank.gyroscope();
        let rate = if gyro.health().is_error() {
            Vec3::ZERO
        } else {
            gyro.value().to_rad()
        };
        let mut q_dot = q * rate * 0.5;

        let accel = usable_accel(bank, &self.config);
        if let Some(a) = accel {
            let mag = usable_mag(bank, &self.config);
            if let Some(step) = gradient(&q, a, mag) {
                q_dot = q_dot + step * -self.config.madgwick_beta;
            }
        }

        self.attitude = (q + q_dot * dt).normalize();
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::Complementary;
    use crate::math::{EulerRotation, GRAVITY};
    use crate::traits::MockTime;

    const FIELD: Vec3 = Vec3::new(20.0, 0.0, -40.0);

    fn observe(bank: &mut SensorBank<&MockTime>, attitude: EulerRotation) {
        let mut gravity = Vec3::new(0.0, 0.0, GRAVITY);
        let mut field = FIELD;
        attitude.rotate_reverse(&mut gravity);
        attitude.rotate_reverse(&mut field);
        bank.update_accelerometer(gravity);
        bank.update_magnetometer(field);
    }

    #[test]
    fn test_objectives_vanish_at_true_attitude() {
        let attitude = EulerRotation::zyx(0.4, -0.3, 1.2);
        let q = Quaternion::from_euler(&attitude);

        let mut gravity = Vec3::new(0.0, 0.0, 1.0);
        attitude.rotate_reverse(&mut gravity);
        let (_, fg) = gravity_terms(&q, gravity);
        assert!(fg.norm() < 1e-9);

        let mut field = FIELD.normalized();
        attitude.rotate_reverse(&mut field);
        let (_, fb) = magnetic_terms(&q, field);
        assert!(fb.norm() < 1e-9);
    }

    #[test]
    fn test_begin_clamps_steep_pitch() {
        let clock = MockTime::new();
        let mut bank = SensorBank::new(&clock);
        observe(&mut bank, EulerRotation::zyx(0.0, 1.5, 0.0));

        let mut filter = Madgwick::new(&InsConfig::default());
        filter.begin(&bank);
        let limit = Vec3::splat(CALIBRATE_LIMIT_DEG).to_rad().x;
        assert!((filter.euler_attitude_zyx().pitch() - limit).abs() < 1e-6);

        // Both strategies start from the same attitude
        let mut complementary = Complementary::new(&InsConfig::default());
        complementary.begin(&bank);
        let a = filter.attitude();
        assert!(a.dot(&complementary.attitude()).abs() > 1.0 - 1e-12);
    }

    #[test]
    fn test_level_rest_is_stable() {
        let clock = MockTime::new();
        let mut bank = SensorBank::new(&clock);
        observe(&mut bank, EulerRotation::zyx(0.0, 0.0, 0.0));

        let mut filter = Madgwick::new(&InsConfig::default());
        filter.begin(&bank);
        for _ in 0..1000 {
            clock.advance(1_000);
            filter.handle(&bank);
        }

        let e = filter.euler_attitude_zyx();
        assert!(e.roll().abs() < 1e-3);
        assert!(e.pitch().abs() < 1e-3);
        assert!(e.yaw().abs() < 1e-3);
    }

    #[test]
    fn test_marg_converges_to_tilt_and_heading() {
        let clock = MockTime::new();
        let mut bank = SensorBank::new(&clock);
        observe(&mut bank, EulerRotation::zyx(0.0, 0.0, 0.0));

        let mut filter = Madgwick::new(&InsConfig::default());
        filter.begin(&bank);

        observe(&mut bank, EulerRotation::zyx(0.3, -0.2, 0.4));
        for _ in 0..10_000 {
            clock.advance(1_000);
            filter.handle(&bank);
        }

        let e = filter.euler_attitude_zyx();
        assert!((e.roll() - 0.3).abs() < 1e-2, "roll {}", e.roll());
        assert!((e.pitch() + 0.2).abs() < 1e-2, "pitch {}", e.pitch());
        assert!((e.yaw() - 0.4).abs() < 1e-2, "yaw {}", e.yaw());
    }

    #[test]
    fn test_imu_mode_converges_tilt() {
        let clock = MockTime::new();
        let mut bank = SensorBank::new(&clock);
        let config = InsConfig {
            algorithm: crate::fusion::FusionAlgorithm::Madgwick,
            use_mag: false,
            ..Default::default()
        };
        let mut filter = Madgwick::new(&config);
        filter.begin(&bank);

        observe(&mut bank, EulerRotation::zyx(-0.25, 0.0, 0.0));
        for _ in 0..10_000 {
            clock.advance(1_000);
            filter.handle(&bank);
        }

        let e = filter.euler_attitude_zyx();
        assert!((e.roll() + 0.25).abs() < 1e-2);
        assert!(e.pitch().abs() < 1e-2);
        assert_eq!(filter.beta(), 0.1);
    }
}
