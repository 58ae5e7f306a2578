//! Dense LU decomposition with partial pivoting.

use crate::error::{NodalError, Result};

/// Column at which elimination found no usable pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingularPivot {
    pub column: usize,
}

/// Factored form `P A = L U` of a square matrix.
///
/// `L` (unit diagonal, below) and `U` (diagonal and above) share one
/// row-major buffer.
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    lu: Vec<f64>,
    pivots: Vec<usize>,
    size: usize,
}

impl LuDecomposition {
    /// Factor a row-major `size x size` matrix.
    ///
    /// A pivot in column `k` with magnitude at or below
    /// `tolerance * max_i |A[i][k]|` counts as zero, with the maximum taken
    /// over the unfactored column.
    pub fn factor(a: &[f64], size: usize, tolerance: f64) -> std::result::Result<Self, SingularPivot> {
        debug_assert_eq!(a.len(), size * size);
        let n = size;
        let mut lu = a.to_vec();
        let mut pivots: Vec<usize> = (0..n).collect();

        let thresholds: Vec<f64> = (0..n)
            .map(|k| {
                let scale = (0..n).fold(0.0_f64, |m, i| m.max(a[i * n + k].abs()));
                tolerance * scale
            })
            .collect();

        for k in 0..n {
            // Find pivot
            let mut max_val = lu[k * n + k].abs();
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val <= thresholds[k] || !max_val.is_finite() {
                return Err(SingularPivot { column: k });
            }

            // Swap rows if needed
            if max_row != k {
                pivots.swap(k, max_row);
                for j in 0..n {
                    lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = lu[k * n + k];
            for i in (k + 1)..n {
                let factor = lu[i * n + k] / pivot;
                lu[i * n + k] = factor;
                if factor == 0.0 {
                    continue;
                }
                for j in (k + 1)..n {
                    lu[i * n + j] -= factor * lu[k * n + j];
                }
            }
        }

        Ok(Self { lu, pivots, size })
    }

    /// Matrix dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Solve `A x = b` using the stored factors.
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        let n = self.size;
        if b.len() != n {
            return Err(NodalError::DimensionMismatch {
                what: "right-hand side",
                expected: n,
                found: b.len(),
            });
        }

        // Apply pivot permutation to b
        let mut x: Vec<f64> = self.pivots.iter().map(|&p| b[p]).collect();

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                x[i] -= self.lu[i * n + j] * x[j];
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                x[i] -= self.lu[i * n + j] * x[j];
            }
            x[i] /= self.lu[i * n + i];
        }

        Ok(x)
    }
}

/// Solve a dense row-major system in one call.
pub fn solve_dense(a: &[f64], b: &[f64], size: usize, tolerance: f64) -> Result<Vec<f64>> {
    if a.len() != size * size {
        return Err(NodalError::DimensionMismatch {
            what: "matrix",
            expected: size * size,
            found: a.len(),
        });
    }
    if b.len() != size {
        return Err(NodalError::DimensionMismatch {
            what: "right-hand side",
            expected: size,
            found: b.len(),
        });
    }
    let lu = LuDecomposition::factor(a, size, tolerance)
        .map_err(|p| NodalError::singular(format!("x{}", p.column)))?;
    lu.solve(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_solve_requires_pivoting() {
        // Zero on the leading diagonal forces a row swap.
        let a = [0.0, 2.0, 1.0, 1.0, 1.0, 0.0, 2.0, 0.0, 3.0];
        let b = [5.0, 3.0, 8.0];
        let x = solve_dense(&a, &b, 3, TOL).unwrap();
        for row in 0..3 {
            let lhs: f64 = (0..3).map(|j| a[row * 3 + j] * x[j]).sum();
            assert_relative_eq!(lhs, b[row], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_factor_reused_for_several_rhs() {
        let a = [4.0, -1.0, -1.0, 3.0];
        let lu = LuDecomposition::factor(&a, 2, TOL).unwrap();
        let x = lu.solve(&[3.0, 2.0]).unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-12);
        let y = lu.solve(&[4.0, -1.0]).unwrap();
        assert_relative_eq!(y[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(y[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_detected() {
        let a = [0.1, -0.1, -0.1, 0.1];
        let err = LuDecomposition::factor(&a, 2, TOL).unwrap_err();
        assert_eq!(err.column, 1);
        assert!(matches!(
            solve_dense(&a, &[1.0, 0.0], 2, TOL),
            Err(NodalError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_zero_matrix_is_singular() {
        assert_eq!(
            LuDecomposition::factor(&[0.0; 4], 2, TOL).unwrap_err(),
            SingularPivot { column: 0 }
        );
    }

    #[test]
    fn test_empty_system() {
        assert!(solve_dense(&[], &[], 0, TOL).unwrap().is_empty());
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(matches!(
            solve_dense(&[1.0, 0.0, 0.0, 1.0], &[1.0], 2, TOL),
            Err(NodalError::DimensionMismatch {
                what: "right-hand side",
                expected: 2,
                found: 1,
            })
        ));
        assert!(matches!(
            solve_dense(&[1.0, 0.0, 0.0], &[1.0, 2.0], 2, TOL),
            Err(NodalError::DimensionMismatch {
                what: "matrix",
                expected: 4,
                found: 3,
            })
        ));
    }

    #[test]
    fn test_small_column_beside_large_entries() {
        // 1 mOhm shunt on a, 10 GOhm to b, plus a source row on a.
        let g_big = 1.0 / 0.001;
        let g_small = 1.0 / 1e10;
        let a = [
            g_big + g_small, -g_small, 1.0,
            -g_small, 2.0 * g_small, 0.0,
            1.0, 0.0, 0.0,
        ];
        let b = [0.0, 0.0, 1.0];
        let x = solve_dense(&a, &b, 3, TOL).unwrap();
        assert_relative_eq!(x[0], 1.0, max_relative = 1e-9);
        assert_relative_eq!(x[1], 0.5, max_relative = 1e-9);
    }

    #[test]
    fn test_cancelled_column_still_singular() {
        // Tiny but exactly cancelling conductances.
        let g = 1e-10;
        let a = [g, -g, -g, g];
        assert_eq!(
            LuDecomposition::factor(&a, 2, TOL).unwrap_err(),
            SingularPivot { column: 1 }
        );
    }
}
