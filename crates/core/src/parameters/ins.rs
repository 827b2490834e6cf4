//! State estimator parameters
//!
//! # Parameters
//!
//! - `INS_FUSION` - Fusion algorithm (0 = complementary, 1 = Madgwick)
//! - `INS_USE_ACC` - Correct attitude from the accelerometer
//! - `INS_USE_MAG` - Correct heading from the magnetometer
//! - `INS_CF_ALPHA` - Complementary filter gyro weight (0..1)
//! - `INS_MAG_BETA` - Madgwick gradient gain

use crate::fusion::{FusionAlgorithm, InsConfig};

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

/// Estimator settings loaded from the parameter store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsParams {
    pub fusion: u8,
    pub use_acc: bool,
    pub use_mag: bool,
    pub cf_alpha: f32,
    pub mag_beta: f32,
}

impl Default for InsParams {
    fn default() -> Self {
        Self {
            fusion: FusionAlgorithm::Complementary as u8,
            use_acc: true,
            use_mag: true,
            cf_alpha: 0.98,
            mag_beta: 0.1,
        }
    }
}

impl InsParams {
    /// Register estimator parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let defaults = Self::default();
        store.register(
            "INS_FUSION",
            ParamValue::Int(i32::from(defaults.fusion)),
            ParamFlags::empty(),
        )?;
        store.register(
            "INS_USE_ACC",
            ParamValue::Bool(defaults.use_acc),
            ParamFlags::empty(),
        )?;
        store.register(
            "INS_USE_MAG",
            ParamValue::Bool(defaults.use_mag),
            ParamFlags::empty(),
        )?;
        store.register(
            "INS_CF_ALPHA",
            ParamValue::Float(defaults.cf_alpha),
            ParamFlags::empty(),
        )?;
        store.register(
            "INS_MAG_BETA",
            ParamValue::Float(defaults.mag_beta),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load from the store; missing entries fall back to defaults
    pub fn from_store(store: &ParameterStore) -> Self {
        let defaults = Self::default();

        let fusion = store
            .get("INS_FUSION")
            .map_or(defaults.fusion, |v| u8::try_from(v.as_i32()).unwrap_or(u8::MAX));
        let use_acc = store
            .get("INS_USE_ACC")
            .map_or(defaults.use_acc, ParamValue::as_bool);
        let use_mag = store
            .get("INS_USE_MAG")
            .map_or(defaults.use_mag, ParamValue::as_bool);
        let cf_alpha = store
            .get("INS_CF_ALPHA")
            .map_or(defaults.cf_alpha, ParamValue::as_f32);
        let mag_beta = store
            .get("INS_MAG_BETA")
            .map_or(defaults.mag_beta, ParamValue::as_f32);

        Self {
            fusion,
            use_acc,
            use_mag,
            cf_alpha,
            mag_beta,
        }
    }

    /// Validate and convert to an estimator configuration.
    ///
    /// An unknown algorithm selects the complementary filter. The filter
    /// weight must lie in [0, 1] and the Madgwick gain must be non-negative.
    pub fn to_config(&self) -> Result<InsConfig, ParameterError> {
        if !(0.0..=1.0).contains(&self.cf_alpha) || !(self.mag_beta >= 0.0) {
            crate::log_error!(
                "INS_CF_ALPHA {} / INS_MAG_BETA {} out of range",
                self.cf_alpha,
                self.mag_beta
            );
            return Err(ParameterError::OutOfRange);
        }

        let algorithm = FusionAlgorithm::from_u8(self.fusion).unwrap_or_else(|| {
            crate::log_warn!("unknown INS_FUSION {}, using complementary", self.fusion);
            FusionAlgorithm::Complementary
        });

        Ok(InsConfig {
            algorithm,
            use_acc: self.use_acc,
            use_mag: self.use_mag,
            cf_alpha: f64::from(self.cf_alpha),
            madgwick_beta: f64::from(self.mag_beta),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_defaults() {
        let mut store = ParameterStore::new();
        InsParams::register_defaults(&mut store).unwrap();

        assert_eq!(store.get("INS_FUSION"), Some(&ParamValue::Int(0)));
        assert_eq!(store.get("INS_USE_ACC"), Some(&ParamValue::Bool(true)));
        assert_eq!(store.get("INS_USE_MAG"), Some(&ParamValue::Bool(true)));
        assert!(store.get("INS_CF_ALPHA").is_some());
        assert!(store.get("INS_MAG_BETA").is_some());
    }

    #[test]
    fn test_defaults_match_config() {
        let mut store = ParameterStore::new();
        InsParams::register_defaults(&mut store).unwrap();

        let config = InsParams::from_store(&store).to_config().unwrap();
        let expected = InsConfig::default();
        assert_eq!(config.algorithm, expected.algorithm);
        assert_eq!(config.use_acc, expected.use_acc);
        assert_eq!(config.use_mag, expected.use_mag);
        assert!((config.cf_alpha - expected.cf_alpha).abs() < 1e-6);
        assert!((config.madgwick_beta - expected.madgwick_beta).abs() < 1e-6);
    }

    #[test]
    fn test_from_store_custom_values() {
        let mut store = ParameterStore::new();
        InsParams::register_defaults(&mut store).unwrap();
        store.set("INS_FUSION", ParamValue::Int(1)).unwrap();
        store.set("INS_USE_MAG", ParamValue::Int(0)).unwrap();
        store.set("INS_MAG_BETA", ParamValue::Float(0.25)).unwrap();

        let config = InsParams::from_store(&store).to_config().unwrap();
        assert_eq!(config.algorithm, FusionAlgorithm::Madgwick);
        assert!(!config.use_mag);
        assert!(config.use_acc);
        assert!((config.madgwick_beta - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_fusion_falls_back() {
        let params = InsParams {
            fusion: 9,
            ..Default::default()
        };
        assert_eq!(
            params.to_config().unwrap().algorithm,
            FusionAlgorithm::Complementary
        );

        let mut store = ParameterStore::new();
        InsParams::register_defaults(&mut store).unwrap();
        store.set("INS_FUSION", ParamValue::Int(-1)).unwrap();
        assert_eq!(
            InsParams::from_store(&store).to_config().unwrap().algorithm,
            FusionAlgorithm::Complementary
        );
    }

    #[test]
    fn test_rejects_out_of_range() {
        let params = InsParams {
            cf_alpha: 1.5,
            ..Default::default()
        };
        assert_eq!(params.to_config(), Err(ParameterError::OutOfRange));

        let params = InsParams {
            mag_beta: f32::NAN,
            ..Default::default()
        };
        assert_eq!(params.to_config(), Err(ParameterError::OutOfRange));
    }
}
