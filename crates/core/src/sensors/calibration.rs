//! IMU calibration data and application
//!
//! Offset/scale calibration for accelerometer and magnetometer (hard/soft
//! iron, diagonal only) and a static bias for the gyroscope. The bank
//! applies calibration on ingest, so fault detection and fusion both see
//! calibrated samples.

use crate::math::Vec3;

/// Per-axis offset and scale
///
/// ```text
/// calibrated = (raw - offset) .* scale
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisCalibration {
    pub offset: Vec3,
    pub scale: Vec3,
}

impl Default for AxisCalibration {
    /// Identity: zero offset, unit scale
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            scale: Vec3::splat(1.0),
        }
    }
}

impl AxisCalibration {
    pub fn new(offset: Vec3, scale: Vec3) -> Self {
        Self { offset, scale }
    }

    /// Offset-only calibration (e.g. gyro bias)
    pub fn offset(offset: Vec3) -> Self {
        Self {
            offset,
            ..Default::default()
        }
    }

    pub fn apply(&self, raw: Vec3) -> Vec3 {
        (raw - self.offset) * self.scale
    }

    /// Heuristic: offset noticeably away from zero or scale away from one
    pub fn is_calibrated(&self, threshold: f64) -> bool {
        self.offset.length() > threshold || (self.scale - Vec3::splat(1.0)).length() > threshold
    }
}

/// Calibration for all inertial sensors
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImuCalibration {
    /// m/s²
    pub accelerometer: AxisCalibration,
    /// deg/s
    pub gyroscope: AxisCalibration,
    /// µT
    pub magnetometer: AxisCalibration,
}

impl ImuCalibration {
    /// True if any sensor carries non-default calibration
    pub fn is_calibrated(&self) -> bool {
        self.accelerometer.is_calibrated(0.01)
            || self.magnetometer.is_calibrated(0.01)
            || self.gyroscope.is_calibrated(0.001)
    }
}

/// Mean of static samples, used as a bias estimate.
///
/// The vehicle must be stationary while the samples are taken. Returns
/// zero for an empty slice.
pub fn estimate_bias(samples: &[Vec3]) -> Vec3 {
    if samples.is_empty() {
        return Vec3::ZERO;
    }

    let sum = samples.iter().fold(Vec3::ZERO, |acc, sample| acc + *sample);
    sum / samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_vec_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < EPSILON, "{} != {}", a, b);
    }

    #[test]
    fn default_is_identity() {
        let cal = ImuCalibration::default();
        let raw = Vec3::new(1.0, -2.0, 9.81);
        assert_eq!(cal.accelerometer.apply(raw), raw);
        assert_eq!(cal.magnetometer.apply(raw), raw);
        assert!(!cal.is_calibrated());
    }

    #[test]
    fn offset_then_scale() {
        let cal = AxisCalibration::new(Vec3::new(0.1, -0.05, 0.02), Vec3::new(1.01, 0.99, 1.02));
        let calibrated = cal.apply(Vec3::new(1.0, 2.0, 9.81));
        assert_vec_near(calibrated, Vec3::new(0.909, 2.0295, 9.9858));
    }

    #[test]
    fn hard_and_soft_iron() {
        let cal = AxisCalibration::new(Vec3::new(5.0, -3.0, 2.0), Vec3::new(1.1, 0.9, 1.05));
        let calibrated = cal.apply(Vec3::new(25.0, 17.0, 42.0));
        assert_vec_near(calibrated, Vec3::new(22.0, 18.0, 42.0));
    }

    #[test]
    fn calibrated_detection() {
        let gyro = ImuCalibration {
            gyroscope: AxisCalibration::offset(Vec3::new(0.01, -0.005, 0.002)),
            ..Default::default()
        };
        assert!(gyro.is_calibrated());

        let scale_only = ImuCalibration {
            accelerometer: AxisCalibration::new(Vec3::ZERO, Vec3::new(1.05, 1.0, 1.0)),
            ..Default::default()
        };
        assert!(scale_only.is_calibrated());
    }

    #[test]
    fn bias_is_sample_mean() {
        let samples = [
            Vec3::new(0.01, -0.005, 0.002),
            Vec3::new(0.011, -0.006, 0.001),
            Vec3::new(0.009, -0.004, 0.003),
            Vec3::new(0.010, -0.005, 0.002),
        ];
        assert_vec_near(estimate_bias(&samples), Vec3::new(0.01, -0.005, 0.002));
        assert_eq!(estimate_bias(&[]), Vec3::ZERO);
    }
}
