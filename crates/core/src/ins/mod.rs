//! Inertial navigation system facade
//!
//! Owns the sensor bank and every fusion strategy, runs the active one and
//! exposes the derived attitude, rate and kinematic queries.
//!
//! # Tick
//!
//! [`Ins::tick`] runs one control cycle in the required order: ingest
//! (exclusive bank borrow) → health → flight-mode ceiling → fusion. The
//! steps stay individually callable for callers that drive them by hand.
//!
//! # Strategy switching
//!
//! Switching the fusion algorithm re-runs `begin` on the new strategy. The
//! estimate is reinitialized from the sensors, not carried over.

use crate::fusion::{Complementary, FusionAlgorithm, FusionStrategy, InsConfig, Madgwick};
use crate::math::{EulerRotation, Quaternion, Vec3};
use crate::mode::FlightMode;
use crate::sensors::{ErrorLevel, SensorBank};
use crate::traits::TimeSource;

/// Call a [`FusionStrategy`] method on the active strategy
macro_rules! on_active {
    ($ins:expr, $method:ident($($arg:expr),*)) => {
        match $ins.config.algorithm {
            FusionAlgorithm::Complementary => $ins.complementary.$method($($arg),*),
            FusionAlgorithm::Madgwick => $ins.madgwick.$method($($arg),*),
        }
    };
}

/// Outcome of one [`Ins::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Flight mode ceiling after this tick's health check
    pub highest_flight_mode: FlightMode,
    /// Ceiling before this tick
    pub previous_flight_mode: FlightMode,
    /// Gated sensors in CRITICAL
    pub critical_sensors: usize,
}

impl TickReport {
    pub fn ceiling_changed(&self) -> bool {
        self.highest_flight_mode != self.previous_flight_mode
    }
}

/// State estimator over a [`SensorBank`]
#[derive(Debug)]
pub struct Ins<T: TimeSource> {
    sensors: SensorBank<T>,
    config: InsConfig,
    complementary: Complementary,
    madgwick: Madgwick,
    max_tolerable: ErrorLevel,
    ceiling: FlightMode,
}

impl<T: TimeSource> Ins<T> {
    /// Estimator over `sensors`; call [`begin`](Self::begin) once samples arrive
    pub fn new(sensors: SensorBank<T>, config: InsConfig) -> Self {
        Self {
            sensors,
            config,
            complementary: Complementary::new(&config),
            madgwick: Madgwick::new(&config),
            max_tolerable: ErrorLevel::Warning,
            ceiling: FlightMode::LOWEST,
        }
    }

    // --- Lifecycle ---

    pub fn begin(&mut self) {
        crate::log_info!("ins begin: {}", self.config.algorithm.as_str());
        on_active!(self, begin(&self.sensors));
    }

    /// Advance the active strategy; health must be current
    pub fn handle(&mut self) {
        on_active!(self, handle(&self.sensors));
    }

    pub fn reset(&mut self) {
        crate::log_info!("ins reset");
        on_active!(self, reset(&self.sensors));
    }

    pub fn reset_altitude(&mut self) {
        on_active!(self, reset_altitude(&self.sensors));
    }

    /// One control cycle.
    ///
    /// `ingest` receives the bank exclusively to store this tick's samples.
    /// Health and the flight-mode ceiling are recomputed before the active
    /// strategy runs.
    pub fn tick<F>(&mut self, ingest: F) -> TickReport
    where
        F: FnOnce(&mut SensorBank<T>),
    {
        ingest(&mut self.sensors);

        let critical_sensors = self.sensors.check_errors();
        let previous = self.ceiling;
        let ceiling = self.sensors.highest_flight_mode(self.max_tolerable);
        if ceiling < previous {
            crate::log_warn!("flight mode ceiling {} -> {}", previous.label(), ceiling.label());
        } else if ceiling > previous {
            crate::log_info!("flight mode ceiling {} -> {}", previous.label(), ceiling.label());
        }
        self.ceiling = ceiling;

        self.handle();

        TickReport {
            highest_flight_mode: ceiling,
            previous_flight_mode: previous,
            critical_sensors,
        }
    }

    // --- Configuration ---

    pub fn fusion_algorithm(&self) -> FusionAlgorithm {
        self.config.algorithm
    }

    /// Select the fusion algorithm and restart it from the sensors
    pub fn set_fusion_algorithm(&mut self, algorithm: FusionAlgorithm) {
        if algorithm != self.config.algorithm {
            crate::log_info!(
                "fusion {} -> {}",
                self.config.algorithm.as_str(),
                algorithm.as_str()
            );
        }
        self.config.algorithm = algorithm;
        self.begin();
    }

    pub fn config(&self) -> &InsConfig {
        &self.config
    }

    /// Replace the configuration; a changed algorithm restarts as in
    /// [`set_fusion_algorithm`](Self::set_fusion_algorithm)
    pub fn set_config(&mut self, config: InsConfig) {
        self.complementary.configure(&config);
        self.madgwick.configure(&config);
        let algorithm = config.algorithm;
        let switched = algorithm != self.config.algorithm;
        self.config = InsConfig {
            algorithm: self.config.algorithm,
            ..config
        };
        if switched {
            self.set_fusion_algorithm(algorithm);
        }
    }

    /// Error level above which a sensor caps the flight mode (default WARNING)
    pub fn max_tolerable_error(&self) -> ErrorLevel {
        self.max_tolerable
    }

    pub fn set_max_tolerable_error(&mut self, level: ErrorLevel) {
        self.max_tolerable = level;
    }

    // --- Sensors and gate ---

    pub fn sensors(&self) -> &SensorBank<T> {
        &self.sensors
    }

    pub fn sensors_mut(&mut self) -> &mut SensorBank<T> {
        &mut self.sensors
    }

    /// Ceiling computed by the last [`tick`](Self::tick)
    pub fn highest_flight_mode(&self) -> FlightMode {
        self.ceiling
    }

    // --- Attitude ---

    pub fn euler_rotation_zyx(&self) -> EulerRotation {
        on_active!(self, euler_attitude_zyx())
    }

    pub fn quaternion(&self) -> Quaternion {
        on_active!(self, attitude())
    }

    /// Roll (rad)
    pub fn roll(&self) -> f64 {
        self.euler_rotation_zyx().roll()
    }

    /// Pitch (rad)
    pub fn pitch(&self) -> f64 {
        self.euler_rotation_zyx().pitch()
    }

    /// Yaw (rad), counterclockwise from north
    pub fn yaw(&self) -> f64 {
        self.euler_rotation_zyx().yaw()
    }

    /// True iff roll and pitch both lie strictly inside `(-limit, limit)` degrees
    pub fn is_angle_smaller_than_deg(&self, limit: f64) -> bool {
        let e = self.euler_rotation_zyx();
        let deg = Vec3::new(e.roll(), e.pitch(), 0.0).to_deg();
        deg.x > -limit && deg.x < limit && deg.y > -limit && deg.y < limit
    }

    // --- Rates (raw gyroscope, deg/s) ---

    pub fn roll_rate(&self) -> f64 {
        self.sensors.gyroscope().value().x
    }

    pub fn pitch_rate(&self) -> f64 {
        self.sensors.gyroscope().value().y
    }

    pub fn yaw_rate(&self) -> f64 {
        self.sensors.gyroscope().value().z
    }

    /// Accelerometer magnitude (m/s²)
    pub fn g_force(&self) -> f64 {
        self.sensors.accelerometer().value().length()
    }

    // --- Kinematics ---

    pub fn location(&self) -> Vec3 {
        on_active!(self, location())
    }

    pub fn velocity(&self) -> Vec3 {
        on_active!(self, velocity())
    }

    pub fn local_velocity(&self) -> Vec3 {
        on_active!(self, local_velocity())
    }
}
