//! Quaternion rotations
//!
//! Scalar-first `w + xi + yj + zk`, Hamilton convention. Orientation
//! quaternions are expected to be unit length; rotation helpers do not
//! renormalize on their own.

use core::ops::{Add, Mul, MulAssign};
use core::str::FromStr;

use libm::{cos, fabs, sin, sqrt};

use super::error::{parse_components, ParseError};
use super::euler::{EulerMode, EulerRotation};
use super::vec3::Vec3;

/// Default pitch limit for [`Quaternion::calibrate`] (degrees)
pub const CALIBRATE_LIMIT_DEG: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quaternion {
    /// Identity rotation
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Pure quaternion `(0, v)`
    pub const fn pure(v: Vec3) -> Self {
        Self::new(0.0, v.x, v.y, v.z)
    }

    /// Level, north-facing attitude (Euler 0, 0, 0)
    pub fn forward() -> Self {
        Self::from_euler(&EulerRotation::zyx(0.0, 0.0, 0.0))
    }

    /// Rotation of `theta` radians about `axis` (expected unit length)
    pub fn from_axis_angle(axis: &Vec3, theta: f64) -> Self {
        let half = theta * 0.5;
        let s = sin(half);
        Self::new(cos(half), axis.x * s, axis.y * s, axis.z * s)
    }

    /// Orientation equal to the Euler rotation, renormalized
    pub fn from_euler(e: &EulerRotation) -> Self {
        let qx = Self::from_axis_angle(&Vec3::new(1.0, 0.0, 0.0), e.x);
        let qy = Self::from_axis_angle(&Vec3::new(0.0, 1.0, 0.0), e.y);
        let qz = Self::from_axis_angle(&Vec3::new(0.0, 0.0, 1.0), e.z);
        let q = match e.mode {
            EulerMode::Zyx => qz * qy * qx,
            EulerMode::Xyz => qx * qy * qz,
        };
        q.normalize()
    }

    /// ZYX Euler decomposition (roll, pitch, yaw)
    pub fn to_euler_zyx(&self) -> EulerRotation {
        let Quaternion { w, x, y, z } = *self;
        let roll = libm::atan2(2.0 * (w * x + y * z), 1.0 - 2.0 * (x * x + y * y));
        let pitch = libm::asin((2.0 * (w * y - z * x)).clamp(-1.0, 1.0));
        let yaw = libm::atan2(2.0 * (w * z + x * y), 1.0 - 2.0 * (y * y + z * z));
        EulerRotation::zyx(roll, pitch, yaw)
    }

    pub fn vector(&self) -> Vec3 {
        Vec3::from_quaternion(self)
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn dot(&self, q: &Quaternion) -> f64 {
        self.w * q.w + self.x * q.x + self.y * q.y + self.z * q.z
    }

    /// Unit-length copy.
    ///
    /// A zero quaternion yields NaN components; callers own that check.
    pub fn normalize(self) -> Self {
        let len = sqrt(self.length_squared());
        Self::new(self.w / len, self.x / len, self.y / len, self.z / len)
    }

    /// Conjugate; the inverse for unit quaternions
    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Rotate `v` in place: `q · v · q*`
    pub fn rotate(&self, v: &mut Vec3) {
        *v = (*self * *v * self.conjugate()).vector();
    }

    /// Inverse rotation in place: `q* · v · q`
    pub fn rotate_reverse(&self, v: &mut Vec3) {
        *v = (self.conjugate() * *v * *self).vector();
    }

    /// [`rotate`](Self::rotate) for a pure-yaw quaternion.
    ///
    /// Only `w` and `z` are read; `x`/`y` must be zero for a correct result.
    pub fn rotate_z(&self, v: &mut Vec3) {
        let (c, s) = self.yaw_cos_sin();
        let (x, y) = (v.x, v.y);
        v.x = c * x - s * y;
        v.y = s * x + c * y;
    }

    /// [`rotate_reverse`](Self::rotate_reverse) for a pure-yaw quaternion.
    pub fn rotate_reverse_z(&self, v: &mut Vec3) {
        let (c, s) = self.yaw_cos_sin();
        let (x, y) = (v.x, v.y);
        v.x = c * x + s * y;
        v.y = -s * x + c * y;
    }

    fn yaw_cos_sin(&self) -> (f64, f64) {
        (
            self.w * self.w - self.z * self.z,
            2.0 * self.w * self.z,
        )
    }

    /// Normalize and keep pitch at most `limit_deg` away from level.
    ///
    /// Run after every Euler import: near ±90° pitch the ZYX decomposition
    /// degenerates and repeated conversions smear roll into yaw. Pitch beyond
    /// the limit is clamped and the attitude rebuilt from roll/pitch/yaw.
    pub fn calibrate(self, limit_deg: f64) -> Self {
        let q = self.normalize();
        let limit = Vec3::splat(fabs(limit_deg)).to_rad().x;
        let e = q.to_euler_zyx();
        if fabs(e.y) <= limit {
            return q;
        }
        let pitch = e.y.clamp(-limit, limit);
        Self::from_euler(&EulerRotation::zyx(e.x, pitch, e.z))
    }

    /// Linear blend of `q1` and `q2` followed by renormalization.
    ///
    /// `t` is clamped to [0, 1]. This approximates slerp and is only close
    /// to it for nearby orientations.
    pub fn lerp(q1: &Quaternion, q2: &Quaternion, t: f64) -> Quaternion {
        let t = t.clamp(0.0, 1.0);
        (*q1 * (1.0 - t) + *q2 * t).normalize()
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Quaternion;

    fn mul(self, q: Quaternion) -> Quaternion {
        Quaternion::new(
            self.w * q.w - self.x * q.x - self.y * q.y - self.z * q.z,
            self.w * q.x + self.x * q.w + self.y * q.z - self.z * q.y,
            self.w * q.y - self.x * q.z + self.y * q.w + self.z * q.x,
            self.w * q.z + self.x * q.y - self.y * q.x + self.z * q.w,
        )
    }
}

impl MulAssign<Quaternion> for Quaternion {
    fn mul_assign(&mut self, q: Quaternion) {
        *self = *self * q;
    }
}

impl Mul<Vec3> for Quaternion {
    type Output = Quaternion;

    /// Product with the pure quaternion `(0, v)`
    fn mul(self, v: Vec3) -> Quaternion {
        self * Quaternion::pure(v)
    }
}

impl Mul<f64> for Quaternion {
    type Output = Quaternion;

    fn mul(self, s: f64) -> Quaternion {
        Quaternion::new(self.w * s, self.x * s, self.y * s, self.z * s)
    }
}

impl Add<Quaternion> for Quaternion {
    type Output = Quaternion;

    fn add(self, q: Quaternion) -> Quaternion {
        Quaternion::new(self.w + q.w, self.x + q.x, self.y + q.y, self.z + q.z)
    }
}

impl From<EulerRotation> for Quaternion {
    fn from(e: EulerRotation) -> Self {
        Quaternion::from_euler(&e)
    }
}

impl FromStr for Quaternion {
    type Err = ParseError;

    /// Parse `w,x,y,z`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [w, x, y, z] = parse_components::<4>(s)?;
        Ok(Quaternion::new(w, x, y, z))
    }
}

impl From<nalgebra::Quaternion<f64>> for Quaternion {
    fn from(q: nalgebra::Quaternion<f64>) -> Self {
        Quaternion::new(q.w, q.i, q.j, q.k)
    }
}

impl From<Quaternion> for nalgebra::Quaternion<f64> {
    fn from(q: Quaternion) -> Self {
        nalgebra::Quaternion::new(q.w, q.x, q.y, q.z)
    }
}
