//! Euler angle rotations
//!
//! Angles are radians: `x` = roll, `y` = pitch, `z` = yaw. The mode names the
//! intrinsic decomposition of the rotation matrix:
//!
//! ```text
//! ZYX:  R = Rz(z) · Ry(y) · Rx(x)   (aerospace yaw-pitch-roll)
//! XYZ:  R = Rx(x) · Ry(y) · Rz(z)
//! ```

use libm::{asin, atan2, cos, fabs, sin};

use super::matrix3::Matrix3;
use super::vec3::Vec3;

/// Decomposition order of an [`EulerRotation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EulerMode {
    Xyz,
    #[default]
    Zyx,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerRotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub mode: EulerMode,
}

fn rot_x(a: f64) -> Matrix3 {
    let (s, c) = (sin(a), cos(a));
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
}

fn rot_y(a: f64) -> Matrix3 {
    let (s, c) = (sin(a), cos(a));
    Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
}

fn rot_z(a: f64) -> Matrix3 {
    let (s, c) = (sin(a), cos(a));
    Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

/// asin with the argument clamped against rounding just outside [-1, 1]
fn asin_clamped(v: f64) -> f64 {
    asin(v.clamp(-1.0, 1.0))
}

impl EulerRotation {
    pub const fn new(x: f64, y: f64, z: f64, mode: EulerMode) -> Self {
        Self { x, y, z, mode }
    }

    /// ZYX rotation from roll, pitch, yaw (radians)
    pub const fn zyx(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self::new(roll, pitch, yaw, EulerMode::Zyx)
    }

    pub fn from_vec3(angles: Vec3, mode: EulerMode) -> Self {
        Self::new(angles.x, angles.y, angles.z, mode)
    }

    /// Angles as a vector (x, y, z)
    pub fn angles(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn roll(&self) -> f64 {
        self.x
    }

    pub fn pitch(&self) -> f64 {
        self.y
    }

    pub fn yaw(&self) -> f64 {
        self.z
    }

    pub fn to_matrix(&self) -> Matrix3 {
        match self.mode {
            EulerMode::Zyx => rot_z(self.z) * rot_y(self.y) * rot_x(self.x),
            EulerMode::Xyz => rot_x(self.x) * rot_y(self.y) * rot_z(self.z),
        }
    }

    /// Decompose a rotation matrix in the requested order.
    ///
    /// At gimbal lock (middle angle ±90°) the split between the outer two
    /// angles is arbitrary; the result still reproduces the matrix.
    pub fn from_matrix(m: &Matrix3, mode: EulerMode) -> Self {
        let r = |row, col| m.get(row, col);
        match mode {
            EulerMode::Zyx => Self::new(
                atan2(r(2, 1), r(2, 2)),
                asin_clamped(-r(2, 0)),
                atan2(r(1, 0), r(0, 0)),
                mode,
            ),
            EulerMode::Xyz => Self::new(
                atan2(-r(1, 2), r(2, 2)),
                asin_clamped(r(0, 2)),
                atan2(-r(0, 1), r(0, 0)),
                mode,
            ),
        }
    }

    /// Same orientation expressed in another decomposition order
    pub fn to_mode(&self, mode: EulerMode) -> EulerRotation {
        if mode == self.mode {
            return *self;
        }
        Self::from_matrix(&self.to_matrix(), mode)
    }

    /// Rotate `v` in place (body → reference)
    pub fn rotate(&self, v: &mut Vec3) {
        *v = self.to_matrix() * *v;
    }

    /// Undo [`rotate`](Self::rotate) in place (reference → body)
    pub fn rotate_reverse(&self, v: &mut Vec3) {
        *v = self.to_matrix().transpose() * *v;
    }

    /// Tilt magnitude in degrees: the larger of |x| and |y|.
    ///
    /// The z angle does not take part. Existing tilt gates are tuned
    /// against this value.
    pub fn max_deg(&self) -> f64 {
        let deg = Vec3::new(fabs(self.x), fabs(self.y), 0.0).to_deg();
        deg.x.max(deg.y)
    }

    /// |x| in degrees
    pub fn max_deg_except_yaw(&self) -> f64 {
        Vec3::new(fabs(self.x), 0.0, 0.0).to_deg().x
    }
}

impl From<EulerRotation> for Matrix3 {
    fn from(e: EulerRotation) -> Self {
        e.to_matrix()
    }
}
