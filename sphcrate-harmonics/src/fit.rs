//! Linear least-squares coefficient fitting
//!
//! Solutions are computed from a singular value decomposition, never from
//! the normal equations. Singular values below `rcond * sigma_max` are
//! treated as zero, which gives the minimum-norm solution whenever the
//! design matrix is rank deficient or has fewer rows than columns.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use sphcrate_core::{Error, Result};

/// Coefficients and solver diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    pub coefficients: DVector<f64>,
    /// Numerical rank of the design matrix
    pub rank: usize,
    /// Singular values of the design matrix, largest first
    pub singular_values: DVector<f64>,
    /// `||Y c - r||` for the returned coefficients
    pub residual_norm: f64,
    /// Fewer samples than coefficients were supplied
    pub underdetermined: bool,
}

impl FitResult {
    pub fn is_rank_deficient(&self) -> bool {
        self.rank < self.coefficients.len()
    }

    /// Ratio of the largest to the smallest retained singular value
    pub fn condition_number(&self) -> f64 {
        if self.rank == 0 {
            return f64::INFINITY;
        }
        self.singular_values[0] / self.singular_values[self.rank - 1]
    }
}

/// Minimum-norm least-squares solver
#[derive(Debug, Clone, Default)]
pub struct LeastSquaresFitter {
    rcond: Option<f64>,
}

impl LeastSquaresFitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative cutoff for small singular values
    ///
    /// `None` uses machine epsilon times the larger matrix dimension.
    pub fn with_rcond(mut self, rcond: Option<f64>) -> Self {
        self.rcond = rcond;
        self
    }

    /// Find `c` minimizing `||design * c - target||`
    pub fn solve(&self, design: &DMatrix<f64>, target: &DVector<f64>) -> Result<FitResult> {
        self.solve_owned(design.clone(), target)
    }

    /// Like [`LeastSquaresFitter::solve`], factorizing `design` in place
    ///
    /// The matrix is consumed by the QR factorization, so no second copy of
    /// it is made.
    pub fn solve_owned(&self, design: DMatrix<f64>, target: &DVector<f64>) -> Result<FitResult> {
        let (n, k) = design.shape();
        if target.len() != n {
            return Err(Error::ShapeMismatch(format!(
                "design matrix has {} rows but target has {} values",
                n,
                target.len()
            )));
        }
        if n == 0 || k == 0 {
            return Err(Error::InvalidInput(format!(
                "cannot fit a {}x{} system",
                n, k
            )));
        }
        if let Some(rcond) = self.rcond {
            if !rcond.is_finite() || rcond < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "rcond must be finite and non-negative, got {}",
                    rcond
                )));
            }
        }
        let rcond = self.rcond.unwrap_or(f64::EPSILON * n.max(k) as f64);

        let underdetermined = n < k;
        // `rhs` is what the reduced system is solved against; `tail_norm` is
        // the part of the residual the reduced system cannot see.
        let (reduced, rhs, tail_norm) = if underdetermined {
            log::warn!(
                "Underdetermined fit: {} samples for {} coefficients, returning the minimum-norm solution",
                n,
                k
            );
            (design, target.clone(), 0.0)
        } else {
            // Y = QR with orthonormal Q, so min ||Y c - r|| and min ||R c - Q^T r||
            // share their minimizers and the K x K factor is all the SVD needs.
            let qr = design.qr();
            let mut qtb = target.clone();
            qr.q_tr_mul(&mut qtb);
            let tail_norm = qtb.rows(k, n - k).norm();
            let rhs = qtb.rows(0, k).into_owned();
            (qr.r(), rhs, tail_norm)
        };

        let svd = reduced.svd(true, true);
        let sigma_max = svd.singular_values.max();
        let cutoff = rcond * sigma_max;
        let rank = svd.singular_values.iter().filter(|&&s| s > cutoff).count();

        let coefficients = svd
            .solve(&rhs, cutoff)
            .map_err(|e| Error::Numerical(format!("least-squares solve failed: {}", e)))?;

        // ||Y c - r||^2 = ||R c - (Q^T r)_head||^2 + ||(Q^T r)_tail||^2
        let head_norm = match (&svd.u, &svd.v_t) {
            (Some(u), Some(v_t)) => {
                let projected = (v_t * &coefficients).component_mul(&svd.singular_values);
                (u * projected - &rhs).norm()
            }
            _ => {
                return Err(Error::Numerical(
                    "singular value decomposition returned no singular vectors".to_string(),
                ))
            }
        };
        let residual_norm = head_norm.hypot(tail_norm);

        let mut singular_values = svd.singular_values;
        singular_values
            .as_mut_slice()
            .sort_by(|a, b| b.total_cmp(a));

        if rank < k {
            log::warn!(
                "Design matrix is rank deficient (rank {} of {} columns)",
                rank,
                k
            );
        }

        log::debug!(
            "Least-squares fit: {}x{} system, rank {}, residual {:.3e}",
            n,
            k,
            rank,
            residual_norm
        );

        Ok(FitResult {
            coefficients,
            rank,
            singular_values,
            residual_norm,
            underdetermined,
        })
    }
}

/// Solve `design * c ~= target` with the default cutoff
pub fn least_squares(design: &DMatrix<f64>, target: &DVector<f64>) -> Result<FitResult> {
    LeastSquaresFitter::new().solve(design, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_square_system() {
        let a = DMatrix::from_row_slice(3, 3, &[2.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 4.0]);
        let x = DVector::from_vec(vec![1.0, -2.0, 0.5]);
        let b = &a * &x;
        let fit = least_squares(&a, &b).unwrap();
        assert_relative_eq!(fit.coefficients, x, epsilon = 1e-12);
        assert_eq!(fit.rank, 3);
        assert!(fit.residual_norm < 1e-12);
        assert!(!fit.underdetermined);
    }

    #[test]
    fn test_overdetermined_line_fit() {
        // y = 1 + 2t observed with symmetric noise; noise cancels in the fit
        let t = [0.0, 1.0, 2.0, 3.0];
        let noise = [0.1, -0.1, -0.1, 0.1];
        let a = DMatrix::from_fn(4, 2, |i, j| if j == 0 { 1.0 } else { t[i] });
        let b = DVector::from_fn(4, |i, _| 1.0 + 2.0 * t[i] + noise[i]);
        let fit = least_squares(&a, &b).unwrap();
        assert_relative_eq!(fit.coefficients[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.coefficients[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(fit.residual_norm, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_rank_deficient_returns_minimum_norm() {
        // Two identical columns: any split of the weight fits, the minimum norm splits evenly
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        let b = DVector::from_vec(vec![2.0, 4.0, 6.0]);
        let fit = least_squares(&a, &b).unwrap();
        assert_eq!(fit.rank, 1);
        assert!(fit.is_rank_deficient());
        assert_relative_eq!(fit.coefficients[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.coefficients[1], 1.0, epsilon = 1e-12);
        assert!(fit.residual_norm < 1e-12);
    }

    #[test]
    fn test_underdetermined_returns_minimum_norm() {
        let a = DMatrix::from_row_slice(1, 2, &[3.0, 4.0]);
        let b = DVector::from_vec(vec![5.0]);
        let fit = least_squares(&a, &b).unwrap();
        assert!(fit.underdetermined);
        assert_eq!(fit.rank, 1);
        // Minimum-norm solution is b * a^T / ||a||^2
        assert_relative_eq!(fit.coefficients[0], 0.6, epsilon = 1e-12);
        assert_relative_eq!(fit.coefficients[1], 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_values_sorted() {
        let a = DMatrix::from_row_slice(4, 3, &[
            1.0, 0.0, 0.0,
            0.0, 5.0, 0.0,
            0.0, 0.0, 2.0,
            0.0, 0.0, 0.0,
        ]);
        let b = DVector::from_vec(vec![1.0, 1.0, 1.0, 0.0]);
        let fit = least_squares(&a, &b).unwrap();
        let s = fit.singular_values.as_slice();
        assert_relative_eq!(s[0], 5.0, epsilon = 1e-12);
        assert_relative_eq!(s[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(s[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.condition_number(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_shape_and_config_errors() {
        let a = DMatrix::<f64>::zeros(3, 2);
        let b = DVector::<f64>::zeros(2);
        assert!(least_squares(&a, &b).unwrap_err().is_configuration_error());

        let b = DVector::<f64>::zeros(3);
        let err = LeastSquaresFitter::new()
            .with_rcond(Some(-1.0))
            .solve(&a, &b)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_owned_solve_matches_borrowed() {
        let a = DMatrix::from_fn(7, 3, |i, j| ((i + 1) as f64).powi(j as i32));
        let b = DVector::from_fn(7, |i, _| (i as f64 * 0.7).sin());
        let borrowed = least_squares(&a, &b).unwrap();
        let owned = LeastSquaresFitter::new().solve_owned(a.clone(), &b).unwrap();
        assert_relative_eq!(owned.coefficients, borrowed.coefficients, epsilon = 1e-12);
        // residual reported from the factorization equals the direct one
        let direct = (&a * &owned.coefficients - &b).norm();
        assert_relative_eq!(owned.residual_norm, direct, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_matrix_gives_zero_solution() {
        let a = DMatrix::<f64>::zeros(3, 2);
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let fit = least_squares(&a, &b).unwrap();
        assert_eq!(fit.rank, 0);
        assert_eq!(fit.coefficients, DVector::zeros(2));
        assert_eq!(fit.condition_number(), f64::INFINITY);
    }
}
