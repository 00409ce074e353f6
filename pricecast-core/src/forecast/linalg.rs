//! Penalized least squares via the normal equations.

use ndarray::{Array1, Array2};

use crate::error::CoreError;

/// Solve `(XᵀX + diag(penalty)) β = Xᵀy`.
///
/// With every penalty strictly positive the system is positive definite, so a
/// Cholesky factorization always exists up to floating-point breakdown.
pub(crate) fn solve_ridge(
    x: &Array2<f64>,
    y: &Array1<f64>,
    penalty: &Array1<f64>,
) -> Result<Array1<f64>, CoreError> {
    if x.nrows() != y.len() || x.ncols() != penalty.len() {
        return Err(CoreError::Numerical(format!(
            "shape mismatch: X is {}x{}, y has {}, penalty has {}",
            x.nrows(),
            x.ncols(),
            y.len(),
            penalty.len()
        )));
    }

    let mut xtx = x.t().dot(x);
    for (i, lambda) in penalty.iter().enumerate() {
        xtx[[i, i]] += lambda;
    }
    let xty = x.t().dot(y);

    cholesky_solve(&xtx, &xty)
}

/// Solve `A x = b` for symmetric positive definite `A`.
pub(crate) fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, CoreError> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return Err(CoreError::Numerical(format!(
                        "matrix not positive definite at pivot {i}"
                    )));
                }
                l[[i, i]] = sum.sqrt();
            } else {
                l[[i, j]] = sum / l[[j, j]];
            }
        }
    }

    // Forward substitution: L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[[i, k]] * z[k];
        }
        z[i] = sum / l[[i, i]];
    }

    // Back substitution: Lᵀ x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = z[i];
        for k in (i + 1)..n {
            sum -= l[[k, i]] * x[k];
        }
        x[i] = sum / l[[i, i]];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn solves_spd_system() {
        let a = array![[4.0, 2.0], [2.0, 3.0]];
        let b = array![2.0, 1.0];
        let x = cholesky_solve(&a, &b).unwrap();
        // 4x + 2y = 2, 2x + 3y = 1 → x = 0.5, y = 0
        assert!((x[0] - 0.5).abs() < 1e-12);
        assert!(x[1].abs() < 1e-12);
    }

    #[test]
    fn rejects_indefinite_matrix() {
        let a = array![[1.0, 2.0], [2.0, 1.0]];
        let b = array![1.0, 1.0];
        assert!(matches!(
            cholesky_solve(&a, &b),
            Err(CoreError::Numerical(_))
        ));
    }

    #[test]
    fn tiny_penalty_recovers_exact_line() {
        // y = 1 + 2t
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
        let y = array![1.0, 3.0, 5.0, 7.0];
        let beta = solve_ridge(&x, &y, &array![1e-12, 1e-12]).unwrap();
        assert!((beta[0] - 1.0).abs() < 1e-8);
        assert!((beta[1] - 2.0).abs() < 1e-8);
    }

    #[test]
    fn penalty_makes_collinear_columns_solvable() {
        let x = array![[1.0, 1.0], [1.0, 1.0], [1.0, 1.0]];
        let y = array![2.0, 2.0, 2.0];
        let beta = solve_ridge(&x, &y, &array![1e-4, 1e-4]).unwrap();
        assert!((beta[0] + beta[1] - 2.0).abs() < 1e-3);
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let x = array![[1.0, 0.0]];
        let y = array![1.0, 2.0];
        assert!(solve_ridge(&x, &y, &array![1.0, 1.0]).is_err());
    }
}
