//! Three-component vector
//!
//! Used for free vectors, angular rates, accelerations and positions.
//! All arithmetic is componentwise; there is no implicit unit handling.

use core::fmt;
use core::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};
use core::str::FromStr;

use libm::{fabs, pow, sqrt};
use nalgebra::Vector3;

use super::error::{parse_components, ParseError};
use super::matrix3::Matrix3;
use super::quaternion::Quaternion;

/// Standard gravity used by [`Vec3::to_g`] (m/s²)
pub const GRAVITY: f64 = 9.807;

/// Degree to radian factor numerator (π ≈ 355/113 → π/180 ≈ 71/4068)
const DEG_TO_RAD_NUM: f64 = 71.0;
/// Degree to radian factor denominator
const DEG_TO_RAD_DEN: f64 = 4068.0;

/// Vector axis selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    /// All axes in index order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Axis for index 0, 1 or 2
    pub fn from_index(index: usize) -> Option<Axis> {
        Self::ALL.get(index).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// All three components set to `s`
    pub const fn splat(s: f64) -> Self {
        Self::new(s, s, s)
    }

    /// First three elements of a slice, `None` if it is shorter
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [x, y, z, ..] => Some(Self::new(*x, *y, *z)),
            _ => None,
        }
    }

    /// First column of a matrix
    pub fn from_matrix_column(m: &Matrix3) -> Self {
        Self::new(m.m[0], m.m[3], m.m[6])
    }

    /// Vector part of a quaternion
    pub fn from_quaternion(q: &Quaternion) -> Self {
        Self::new(q.x, q.y, q.z)
    }

    pub fn length(&self) -> f64 {
        sqrt(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Length of the horizontal (xy) projection
    pub fn length_2d(&self) -> f64 {
        sqrt(self.x * self.x + self.y * self.y)
    }

    /// Scale to unit length. Zero vectors are left untouched.
    pub fn to_unit_length(&mut self) {
        let len = self.length();
        if len == 0.0 {
            return;
        }
        self.x /= len;
        self.y /= len;
        self.z /= len;
    }

    /// Unit-length copy (zero stays zero)
    pub fn normalized(mut self) -> Self {
        self.to_unit_length();
        self
    }

    /// Rescale to `len` keeping direction. Zero vectors are left untouched.
    pub fn set_length(&mut self, len: f64) {
        self.to_unit_length();
        *self *= len;
    }

    /// Rescale x/y so the horizontal length is `len`; z is kept.
    pub fn set_length_2d(&mut self, len: f64) {
        let current = self.length_2d();
        if current == 0.0 {
            return;
        }
        let factor = len / current;
        self.x *= factor;
        self.y *= factor;
    }

    pub fn dot(&self, v: &Vec3) -> f64 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    pub fn cross(&self, v: &Vec3) -> Vec3 {
        Vec3::new(
            self.y * v.z - self.z * v.y,
            self.z * v.x - self.x * v.z,
            self.x * v.y - self.y * v.x,
        )
    }

    /// Sum of the components
    pub fn value(&self) -> f64 {
        self.x + self.y + self.z
    }

    /// Sum of the absolute components
    pub fn abs_sum(&self) -> f64 {
        fabs(self.x) + fabs(self.y) + fabs(self.z)
    }

    /// Componentwise `self[i] ^ v[i]`
    pub fn pow(&self, v: &Vec3) -> Vec3 {
        Vec3::new(pow(self.x, v.x), pow(self.y, v.y), pow(self.z, v.z))
    }

    /// Componentwise `self[i] ^ s`
    pub fn powf(&self, s: f64) -> Vec3 {
        Vec3::new(pow(self.x, s), pow(self.y, s), pow(self.z, s))
    }

    /// Degrees to radians
    pub fn to_rad(self) -> Vec3 {
        Vec3::new(
            (self.x * DEG_TO_RAD_NUM) / DEG_TO_RAD_DEN,
            (self.y * DEG_TO_RAD_NUM) / DEG_TO_RAD_DEN,
            (self.z * DEG_TO_RAD_NUM) / DEG_TO_RAD_DEN,
        )
    }

    /// Radians to degrees
    pub fn to_deg(self) -> Vec3 {
        Vec3::new(
            (self.x * DEG_TO_RAD_DEN) / DEG_TO_RAD_NUM,
            (self.y * DEG_TO_RAD_DEN) / DEG_TO_RAD_NUM,
            (self.z * DEG_TO_RAD_DEN) / DEG_TO_RAD_NUM,
        )
    }

    /// m/s² to multiples of standard gravity
    pub fn to_g(self) -> Vec3 {
        self / GRAVITY
    }

    pub fn axis(&self, axis: Axis) -> f64 {
        self[axis]
    }

    pub fn set_axis(&mut self, axis: Axis, value: f64) {
        self[axis] = value;
    }

    /// Componentwise minimum
    pub fn min(a: &Vec3, b: &Vec3) -> Vec3 {
        Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
    }

    /// Componentwise maximum
    pub fn max(a: &Vec3, b: &Vec3) -> Vec3 {
        Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
    }

    /// True when every component of `self` exceeds the matching one of `v`.
    pub fn greater_than(&self, v: &Vec3) -> bool {
        self.x > v.x && self.y > v.y && self.z > v.z
    }

    /// True when any component of `self` is below the matching one of `v`.
    ///
    /// Not the mirror of [`greater_than`](Self::greater_than): this is the
    /// negation of "every component is greater or equal".
    pub fn less_than(&self, v: &Vec3) -> bool {
        !(self.x >= v.x && self.y >= v.y && self.z >= v.z)
    }

    /// `!self.less_than(v)`
    pub fn greater_or_equal(&self, v: &Vec3) -> bool {
        !self.less_than(v)
    }

    /// `!self.greater_than(v)`
    pub fn less_or_equal(&self, v: &Vec3) -> bool {
        !self.greater_than(v)
    }

    /// Column matrix with the vector in the first column
    pub fn to_matrix3(&self) -> Matrix3 {
        Matrix3::new(self.x, 0.0, 0.0, self.y, 0.0, 0.0, self.z, 0.0, 0.0)
    }
}

impl Index<Axis> for Vec3 {
    type Output = f64;

    fn index(&self, axis: Axis) -> &f64 {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

impl IndexMut<Axis> for Vec3 {
    fn index_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

macro_rules! impl_componentwise {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait<Vec3> for Vec3 {
            type Output = Vec3;

            fn $method(self, v: Vec3) -> Vec3 {
                Vec3::new(self.x $op v.x, self.y $op v.y, self.z $op v.z)
            }
        }

        impl $trait<f64> for Vec3 {
            type Output = Vec3;

            fn $method(self, s: f64) -> Vec3 {
                Vec3::new(self.x $op s, self.y $op s, self.z $op s)
            }
        }

        impl $assign_trait<Vec3> for Vec3 {
            fn $assign_method(&mut self, v: Vec3) {
                *self = *self $op v;
            }
        }

        impl $assign_trait<f64> for Vec3 {
            fn $assign_method(&mut self, s: f64) {
                *self = *self $op s;
            }
        }
    };
}

impl_componentwise!(Add, add, AddAssign, add_assign, +);
impl_componentwise!(Sub, sub, SubAssign, sub_assign, -);
impl_componentwise!(Mul, mul, MulAssign, mul_assign, *);
impl_componentwise!(Div, div, DivAssign, div_assign, /);

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}|{:.5}|{:.5})", self.x, self.y, self.z)
    }
}

impl FromStr for Vec3 {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x, y, z] = parse_components::<3>(s)?;
        Ok(Vec3::new(x, y, z))
    }
}

impl From<Vector3<f64>> for Vec3 {
    fn from(v: Vector3<f64>) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vector3<f64> {
    fn from(v: Vec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!(
            (a - b).abs_sum() < EPSILON,
            "vectors differ: {} vs {}",
            a,
            b
        );
    }

    #[test]
    fn componentwise_arithmetic() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::splat(3.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(b / a, Vec3::new(4.0, 2.5, 2.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a + 1.0, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(a.powf(2.0), Vec3::new(1.0, 4.0, 9.0));
        assert_eq!(a.pow(&Vec3::new(0.0, 1.0, 2.0)), Vec3::new(1.0, 2.0, 9.0));

        let mut c = a;
        c += b;
        c -= 1.0;
        c *= 2.0;
        c /= Vec3::splat(2.0);
        assert_eq!(c, Vec3::new(4.0, 6.0, 8.0));
    }

    #[test]
    fn dot_and_cross() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(&x), Vec3::new(0.0, 0.0, -1.0));

        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-2.0, 0.5, 4.0);
        assert_eq!(a.dot(&b), 11.0);

        // Cross product is orthogonal to both inputs
        let c = a.cross(&b);
        assert!(c.dot(&a).abs() < EPSILON);
        assert!(c.dot(&b).abs() < EPSILON);

        let reference = Vector3::from(a).cross(&Vector3::from(b));
        assert_vec_eq(c, Vec3::from(reference));
    }

    #[test]
    fn lengths() {
        let v = Vec3::new(3.0, 4.0, 12.0);
        assert_eq!(v.length(), 13.0);
        assert_eq!(v.length_2d(), 5.0);
    }

    #[test]
    fn unit_length_ignores_zero_vector() {
        let mut zero = Vec3::ZERO;
        zero.to_unit_length();
        assert_eq!(zero, Vec3::ZERO);

        let mut v = Vec3::new(0.0, 3.0, 4.0);
        v.to_unit_length();
        assert!((v.length() - 1.0).abs() < EPSILON);
        assert_vec_eq(v, Vec3::new(0.0, 0.6, 0.8));
    }

    #[test]
    fn set_length_variants() {
        let mut v = Vec3::new(0.0, 3.0, 4.0);
        v.set_length(10.0);
        assert_vec_eq(v, Vec3::new(0.0, 6.0, 8.0));

        let mut h = Vec3::new(3.0, 4.0, 7.0);
        h.set_length_2d(10.0);
        assert_vec_eq(h, Vec3::new(6.0, 8.0, 7.0));

        let mut vertical = Vec3::new(0.0, 0.0, 5.0);
        vertical.set_length_2d(1.0);
        assert_eq!(vertical, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn degree_radian_round_trip() {
        let angles = [
            Vec3::new(0.0, 45.0, -90.0),
            Vec3::new(180.0, -179.9, 359.0),
            Vec3::new(0.001, 12.5, -33.3),
        ];
        for deg in angles {
            assert_vec_eq(deg.to_rad().to_deg(), deg);
        }

        let rad = Vec3::new(180.0, 90.0, 0.0).to_rad();
        assert!((rad.x - core::f64::consts::PI).abs() < 1e-6);
        assert!((rad.y - core::f64::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn gravity_units() {
        let g = Vec3::new(0.0, 0.0, GRAVITY).to_g();
        assert_vec_eq(g, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn axis_access() {
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.axis(Axis::X), 1.0);
        assert_eq!(v[Axis::Z], 3.0);
        v.set_axis(Axis::Y, -7.0);
        assert_eq!(v.y, -7.0);

        assert_eq!(Axis::from_index(2), Some(Axis::Z));
        assert_eq!(Axis::from_index(3), None);
    }

    #[test]
    fn ordering_is_not_a_partial_order() {
        let a = Vec3::new(2.0, 2.0, 2.0);
        let b = Vec3::new(1.0, 1.0, 1.0);
        let mixed = Vec3::new(3.0, 0.0, 2.0);

        assert!(a.greater_than(&b));
        assert!(b.less_than(&a));
        assert!(a.greater_or_equal(&b));
        assert!(!a.less_or_equal(&b));

        // One smaller component is enough for less_than
        assert!(mixed.less_than(&b));
        assert!(!mixed.greater_than(&b));
        // ...and enough for less_or_equal even though x and z are larger
        assert!(mixed.less_or_equal(&b));
        assert!(!mixed.greater_or_equal(&b));

        // Equal vectors
        assert!(!a.greater_than(&a));
        assert!(!a.less_than(&a));
        assert!(a.greater_or_equal(&a));
        assert!(a.less_or_equal(&a));
    }

    #[test]
    fn min_max_sums() {
        let a = Vec3::new(1.0, -5.0, 3.0);
        let b = Vec3::new(0.0, 2.0, 4.0);
        assert_eq!(Vec3::min(&a, &b), Vec3::new(0.0, -5.0, 3.0));
        assert_eq!(Vec3::max(&a, &b), Vec3::new(1.0, 2.0, 4.0));
        assert_eq!(a.value(), -1.0);
        assert_eq!(a.abs_sum(), 9.0);
    }

    #[test]
    fn matrix_column_round_trip() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Vec3::from_matrix_column(&v.to_matrix3()), v);
    }

    #[test]
    fn display_and_parse() {
        let v = Vec3::new(1.0, -0.5, 2.25);
        let text = format!("{}", v);
        assert_eq!(text, "(1.00000|-0.50000|2.25000)");
        assert_eq!(text.parse::<Vec3>(), Ok(v));
        assert_eq!("1, -0.5, 2.25".parse::<Vec3>(), Ok(v));
        assert!("1,2".parse::<Vec3>().is_err());
    }

    #[test]
    fn from_slice_requires_three_values() {
        assert_eq!(Vec3::from_slice(&[1.0, 2.0, 3.0, 4.0]), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(Vec3::from_slice(&[1.0, 2.0]), None);
    }
}
