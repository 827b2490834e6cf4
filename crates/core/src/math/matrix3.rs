//! Row-major 3×3 matrix

use core::ops::Mul;
use core::str::FromStr;

use super::error::{parse_components, ParseError};
use super::vec3::Vec3;

/// 3×3 matrix stored as 9 row-major elements
///
/// Element `(row, col)` lives at `m[row * 3 + col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3 {
    pub m: [f64; 9],
}

impl Default for Matrix3 {
    /// Zero matrix
    fn default() -> Self {
        Self { m: [0.0; 9] }
    }
}

impl Matrix3 {
    pub const IDENTITY: Matrix3 = Matrix3 {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        m00: f64,
        m01: f64,
        m02: f64,
        m10: f64,
        m11: f64,
        m12: f64,
        m20: f64,
        m21: f64,
        m22: f64,
    ) -> Self {
        Self {
            m: [m00, m01, m02, m10, m11, m12, m20, m21, m22],
        }
    }

    pub const fn from_array(m: [f64; 9]) -> Self {
        Self { m }
    }

    #[inline]
    const fn index(row: usize, col: usize) -> usize {
        row * 3 + col
    }

    /// Element at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[Self::index(row, col)]
    }

    pub fn transpose(&self) -> Matrix3 {
        let m = &self.m;
        Matrix3::new(m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8])
    }

    /// First column as a vector
    pub fn to_vec3(&self) -> Vec3 {
        Vec3::from_matrix_column(self)
    }
}

impl Mul<Matrix3> for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: Matrix3) -> Matrix3 {
        let mut out = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                out[Self::index(row, col)] = (0..3)
                    .map(|k| self.m[Self::index(row, k)] * rhs.m[Self::index(k, col)])
                    .sum();
            }
        }
        Matrix3::from_array(out)
    }
}

impl Mul<Vec3> for Matrix3 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0] * v.x + m[1] * v.y + m[2] * v.z,
            m[3] * v.x + m[4] * v.y + m[5] * v.z,
            m[6] * v.x + m[7] * v.y + m[8] * v.z,
        )
    }
}

impl FromStr for Matrix3 {
    type Err = ParseError;

    /// Parse nine row-major numbers separated by `,`, `;`, `|` or whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_components::<9>(s).map(Matrix3::from_array)
    }
}

impl From<nalgebra::Matrix3<f64>> for Matrix3 {
    fn from(n: nalgebra::Matrix3<f64>) -> Self {
        let mut m = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                m[Self::index(row, col)] = n[(row, col)];
            }
        }
        Matrix3::from_array(m)
    }
}

impl From<Matrix3> for nalgebra::Matrix3<f64> {
    fn from(m: Matrix3) -> Self {
        nalgebra::Matrix3::from_row_slice(&m.m)
    }
}
