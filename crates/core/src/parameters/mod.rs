//! Parameter management types
//!
//! Tunable fault thresholds and estimator settings live in a fixed-capacity
//! [`ParameterStore`]. Each parameter group registers its defaults, loads
//! itself from the store and validates into the runtime configuration it
//! feeds. Flash persistence is left to the firmware.

pub mod error;
pub mod ins;
pub mod sensors;
pub mod storage;

pub use error::ParameterError;
pub use ins::InsParams;
pub use sensors::HealthParams;
pub use storage::{
    ParamFlags, ParamMetadata, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN,
};
