//! Rotation math kernel
//!
//! Value types for every estimate and rotation in the firmware: [`Vec3`],
//! [`Matrix3`], [`EulerRotation`] and [`Quaternion`]. All values are `f64`
//! and `Copy`; nothing here allocates.
//!
//! Only [`Vec3::to_unit_length`] guards against division by zero. NaN and
//! infinite inputs, zero quaternions and degenerate rotations propagate
//! unchecked, so callers that need bounded attitudes must validate results.
//!
//! `nalgebra` conversions are provided for interop with other estimators.

pub mod error;
pub mod euler;
pub mod matrix3;
pub mod quaternion;
pub mod vec3;

pub use error::ParseError;
pub use euler::{EulerMode, EulerRotation};
pub use matrix3::Matrix3;
pub use quaternion::{Quaternion, CALIBRATE_LIMIT_DEG};
pub use vec3::{Axis, Vec3, GRAVITY};
