//! Sensor health parameters
//!
//! # Parameters
//!
//! - `SENS_IMU_TMO` - Inertial sensor liveness timeout (ms)
//! - `SENS_IMU_RPT` - Identical inertial samples before a sensor counts as stuck
//! - `SENS_BARO_RPT` - Identical barometer altitudes before it counts as stuck
//! - `SENS_GPS_TMO` - GPS update timeout (ms)

use crate::sensors::HealthConfig;

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

/// Fault detection thresholds loaded from the parameter store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthParams {
    pub imu_timeout_ms: i32,
    pub imu_repeat_cap: i32,
    pub baro_repeat_cap: i32,
    pub gps_timeout_ms: i32,
}

impl Default for HealthParams {
    fn default() -> Self {
        Self {
            imu_timeout_ms: 100,
            imu_repeat_cap: 100,
            baro_repeat_cap: 1000,
            gps_timeout_ms: 2000,
        }
    }
}

impl HealthParams {
    /// Register health parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let defaults = Self::default();
        store.register(
            "SENS_IMU_TMO",
            ParamValue::Int(defaults.imu_timeout_ms),
            ParamFlags::empty(),
        )?;
        store.register(
            "SENS_IMU_RPT",
            ParamValue::Int(defaults.imu_repeat_cap),
            ParamFlags::empty(),
        )?;
        store.register(
            "SENS_BARO_RPT",
            ParamValue::Int(defaults.baro_repeat_cap),
            ParamFlags::empty(),
        )?;
        store.register(
            "SENS_GPS_TMO",
            ParamValue::Int(defaults.gps_timeout_ms),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load from the store; missing entries fall back to defaults
    pub fn from_store(store: &ParameterStore) -> Self {
        let defaults = Self::default();
        let int = |name: &str, default: i32| store.get(name).map_or(default, ParamValue::as_i32);

        Self {
            imu_timeout_ms: int("SENS_IMU_TMO", defaults.imu_timeout_ms),
            imu_repeat_cap: int("SENS_IMU_RPT", defaults.imu_repeat_cap),
            baro_repeat_cap: int("SENS_BARO_RPT", defaults.baro_repeat_cap),
            gps_timeout_ms: int("SENS_GPS_TMO", defaults.gps_timeout_ms),
        }
    }

    /// Validate and convert to fault rule thresholds.
    ///
    /// Timeouts and repeat caps must be positive.
    pub fn to_config(&self) -> Result<HealthConfig, ParameterError> {
        let positive = |name: &str, v: i32| {
            u32::try_from(v).ok().filter(|&v| v > 0).ok_or_else(|| {
                crate::log_error!("{} must be positive, got {}", name, v);
                ParameterError::OutOfRange
            })
        };
        let imu_timeout = positive("SENS_IMU_TMO", self.imu_timeout_ms)?;
        let imu_repeat_cap = positive("SENS_IMU_RPT", self.imu_repeat_cap)?;
        let baro_repeat_cap = positive("SENS_BARO_RPT", self.baro_repeat_cap)?;
        let gps_timeout = positive("SENS_GPS_TMO", self.gps_timeout_ms)?;

        Ok(HealthConfig {
            imu_timeout_us: u64::from(imu_timeout) * 1000,
            imu_repeat_cap,
            baro_repeat_cap,
            gps_timeout_us: u64::from(gps_timeout) * 1000,
        })
    }
}
