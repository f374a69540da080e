//! 4x4 Matrices

use crate::error::*;
use crate::pbrt::*;
use std::ops::Mul;

/// A 4x4 row-major matrix.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix4x4 {
    /// Matrix entries.
    pub m: [[Float; 4]; 4],
}

impl Matrix4x4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Create a matrix from its entries.
    ///
    /// * `m` - Row-major entries.
    pub fn new(m: [[Float; 4]; 4]) -> Self {
        Self { m }
    }

    /// Create a matrix from 16 values in row-major order.
    ///
    /// * `v` - The values.
    pub fn from_slice(v: &[Float; 16]) -> Self {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            row.copy_from_slice(&v[i * 4..i * 4 + 4]);
        }
        Self { m }
    }

    /// Returns the transpose.
    pub fn transpose(&self) -> Self {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = self.m[j][i];
            }
        }
        Self { m }
    }

    /// Returns true if this is the identity matrix.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Returns the inverse using Gauss-Jordan elimination with full pivoting.
    /// A singular matrix yields `Error::SingularMatrix`.
    pub fn inverse(&self) -> Result<Self> {
        let mut indxc = [0_usize; 4];
        let mut indxr = [0_usize; 4];
        let mut ipiv = [0_usize; 4];
        let mut minv = self.m;

        for i in 0..4 {
            let mut irow = 0;
            let mut icol = 0;
            let mut big: Float = 0.0;

            // Choose pivot.
            for j in 0..4 {
                if ipiv[j] != 1 {
                    for k in 0..4 {
                        if ipiv[k] == 0 {
                            if abs(minv[j][k]) >= big {
                                big = abs(minv[j][k]);
                                irow = j;
                                icol = k;
                            }
                        } else if ipiv[k] > 1 {
                            return Err(Error::SingularMatrix);
                        }
                    }
                }
            }
            ipiv[icol] += 1;

            // Swap rows so pivot is on the diagonal.
            if irow != icol {
                minv.swap(irow, icol);
            }
            indxr[i] = irow;
            indxc[i] = icol;
            if minv[icol][icol] == 0.0 {
                return Err(Error::SingularMatrix);
            }

            let pivinv = 1.0 / minv[icol][icol];
            minv[icol][icol] = 1.0;
            for j in 0..4 {
                minv[icol][j] *= pivinv;
            }

            // Subtract this row from the others to zero out their columns.
            for j in 0..4 {
                if j != icol {
                    let save = minv[j][icol];
                    minv[j][icol] = 0.0;
                    for k in 0..4 {
                        minv[j][k] -= minv[icol][k] * save;
                    }
                }
            }
        }

        // Swap columns to reflect permutation.
        for j in (0..4).rev() {
            if indxr[j] != indxc[j] {
                for row in minv.iter_mut() {
                    row.swap(indxr[j], indxc[j]);
                }
            }
        }

        Ok(Self { m: minv })
    }
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix4x4 {
    type Output = Self;

    /// Multiply two matrices.
    ///
    /// * `other` - The right hand side.
    fn mul(self, other: Self) -> Self::Output {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j]
                    + self.m[i][3] * other.m[3][j];
            }
        }
        Self { m }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn inverse_of_identity_is_identity() {
        assert_eq!(Matrix4x4::IDENTITY.inverse(), Ok(Matrix4x4::IDENTITY));
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let m = Matrix4x4::new([
            [2.0, 0.0, 1.0, 3.0],
            [0.0, 1.0, 0.0, -2.0],
            [1.0, 0.0, 3.0, 0.5],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let p = m * m.inverse().unwrap();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(approx_eq!(Float, p.m[i][j], expected, epsilon = 1e-5));
            }
        }
    }

    #[test]
    fn singular_matrix_is_an_error() {
        let m = Matrix4x4::new([
            [1.0, 2.0, 3.0, 4.0],
            [2.0, 4.0, 6.0, 8.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert_eq!(m.inverse(), Err(Error::SingularMatrix));
    }

    #[test]
    fn transpose_twice_is_same() {
        let m = Matrix4x4::from_slice(&[
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
        ]);
        assert_eq!(m.transpose().m[0][1], 5.0);
        assert_eq!(m.transpose().transpose(), m);
    }
}
