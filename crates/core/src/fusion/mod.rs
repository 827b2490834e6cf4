//! Sensor fusion strategies
//!
//! A strategy turns the sensor bank into an attitude, velocity and location
//! estimate. Strategies only read the bank; they run after health has been
//! recomputed for the tick.
//!
//! # Frames
//!
//! - Body: x forward, y left, z up. A level vehicle at rest reads +1 g on
//!   the accelerometer z axis.
//! - World: x north, y west, z up. The attitude quaternion rotates body
//!   vectors into the world frame.
//! - Gyroscope samples are deg/s, accelerometer m/s², magnetometer any
//!   consistent unit (only its direction is used).

use libm::{atan2, sqrt};

use crate::math::{EulerRotation, Quaternion, Vec3};
use crate::sensors::SensorBank;
use crate::traits::TimeSource;

pub mod complementary;
pub mod kinematics;
pub mod madgwick;

pub use complementary::Complementary;
pub use kinematics::Kinematics;
pub use madgwick::Madgwick;

/// Selectable fusion algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FusionAlgorithm {
    #[default]
    Complementary = 0,
    Madgwick = 1,
}

impl FusionAlgorithm {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(FusionAlgorithm::Complementary),
            1 => Some(FusionAlgorithm::Madgwick),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FusionAlgorithm::Complementary => "complementary",
            FusionAlgorithm::Madgwick => "madgwick",
        }
    }
}

/// Estimator configuration shared by all strategies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsConfig {
    pub algorithm: FusionAlgorithm,
    /// Correct attitude from the accelerometer
    pub use_acc: bool,
    /// Correct heading from the magnetometer
    pub use_mag: bool,
    /// Complementary filter gyro weight per update (0..1)
    pub cf_alpha: f64,
    /// Madgwick gradient step gain
    pub madgwick_beta: f64,
}

impl Default for InsConfig {
    fn default() -> Self {
        Self {
            algorithm: FusionAlgorithm::Complementary,
            use_acc: true,
            use_mag: true,
            cf_alpha: 0.98,
            madgwick_beta: 0.1,
        }
    }
}

/// Contract between the estimator facade and a fusion algorithm
///
/// All methods take the bank by shared reference; ingest and health
/// recomputation must already have happened for the tick.
pub trait FusionStrategy {
    /// Apply a new configuration; takes effect on the next update
    fn configure(&mut self, config: &InsConfig);

    /// Initialize the estimate from the current sensor state
    fn begin<T: TimeSource>(&mut self, bank: &SensorBank<T>);

    /// Advance the estimate to the bank's current time
    fn handle<T: TimeSource>(&mut self, bank: &SensorBank<T>);

    /// Discard the estimate and start over
    fn reset<T: TimeSource>(&mut self, bank: &SensorBank<T>) {
        self.begin(bank);
    }

    /// Re-zero the vertical position reference
    fn reset_altitude<T: TimeSource>(&mut self, bank: &SensorBank<T>);

    /// Body-to-world attitude
    fn attitude(&self) -> Quaternion;

    fn euler_attitude_zyx(&self) -> EulerRotation {
        self.attitude().to_euler_zyx()
    }

    /// World-frame position relative to the last `begin` (m)
    fn location(&self) -> Vec3;

    /// World-frame velocity (m/s)
    fn velocity(&self) -> Vec3;

    /// Velocity in the heading frame: x along the nose, y to the left (m/s)
    fn local_velocity(&self) -> Vec3;
}

/// Longest step integrated at once; longer gaps are truncated
pub(crate) const MAX_STEP_S: f64 = 0.1;

/// Integration step tracking shared by the strategies
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StepClock {
    last_us: Option<u64>,
}

impl StepClock {
    pub(crate) fn restart(&mut self, now_us: u64) {
        self.last_us = Some(now_us);
    }

    /// Seconds since the previous step, clamped to [`MAX_STEP_S`]
    pub(crate) fn step(&mut self, now_us: u64) -> f64 {
        let dt = match self.last_us {
            Some(last) => now_us.saturating_sub(last) as f64 * 1e-6,
            None => 0.0,
        };
        self.last_us = Some(now_us);
        dt.min(MAX_STEP_S)
    }
}

/// Accelerometer sample if it may be used for attitude correction
pub(crate) fn usable_accel<T: TimeSource>(bank: &SensorBank<T>, config: &InsConfig) -> Option<Vec3> {
    let acc = bank.accelerometer();
    let value = acc.value();
    (config.use_acc && !acc.health().is_error() && value.length() > 0.0).then_some(value)
}

/// Magnetometer sample if it may be used for heading correction
pub(crate) fn usable_mag<T: TimeSource>(bank: &SensorBank<T>, config: &InsConfig) -> Option<Vec3> {
    let mag = bank.magnetometer();
    let value = mag.value();
    (config.use_mag && !mag.health().is_error() && value.length() > 0.0).then_some(value)
}

/// Roll and pitch (rad) of the gravity reaction measured by the accelerometer
pub(crate) fn tilt_from_accel(acc: Vec3) -> (f64, f64) {
    let roll = atan2(acc.y, acc.z);
    let pitch = atan2(-acc.x, sqrt(acc.y * acc.y + acc.z * acc.z));
    (roll, pitch)
}

/// Tilt-compensated magnetic heading (rad), counterclockwise from north
pub(crate) fn heading_from_mag(mag: Vec3, roll: f64, pitch: f64) -> f64 {
    let mut level = mag;
    EulerRotation::zyx(roll, pitch, 0.0).rotate(&mut level);
    atan2(-level.y, level.x)
}

/// Attitude observed by accelerometer and magnetometer.
///
/// Without a usable magnetometer the yaw is taken from `fallback_yaw`.
/// `None` when the accelerometer cannot be used.
pub(crate) fn observed_attitude<T: TimeSource>(
    bank: &SensorBank<T>,
    config: &InsConfig,
    fallback_yaw: f64,
) -> Option<Quaternion> {
    let acc = usable_accel(bank, config)?;
    let (roll, pitch) = tilt_from_accel(acc);
    let yaw = usable_mag(bank, config)
        .map(|mag| heading_from_mag(mag, roll, pitch))
        .unwrap_or(fallback_yaw);
    Some(Quaternion::from_euler(&EulerRotation::zyx(roll, pitch, yaw)))
}
