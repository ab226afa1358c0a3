//! Polynomial models of intensity profiles.
//!
//! A blurred step edge looks like a smooth sigmoid across the cross-section.
//! Fitting a cubic and taking the zero of its second derivative places the
//! edge at the steepest point of the fitted model.

use nalgebra::{DMatrix, DVector};

/// Polynomial with coefficients in ascending order: `c0 + c1 x + c2 x^2 + ...`.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    pub coeffs: Vec<f64>,
}

impl Polynomial {
    /// Least-squares fit of the given degree. Returns `None` when there are
    /// fewer samples than coefficients or the solve fails.
    pub fn fit(xs: &[f64], ys: &[f64], degree: usize) -> Option<Self> {
        let n = xs.len().min(ys.len());
        let cols = degree + 1;
        if n < cols {
            return None;
        }
        let a = DMatrix::<f64>::from_fn(n, cols, |r, c| xs[r].powi(c as i32));
        let b = DVector::<f64>::from_column_slice(&ys[..n]);
        let svd = a.svd(true, true);
        let solution = svd.solve(&b, 1e-12).ok()?;
        let coeffs: Vec<f64> = solution.iter().copied().collect();
        coeffs.iter().all(|c| c.is_finite()).then_some(Self { coeffs })
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    pub fn derivative(&self) -> Polynomial {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &c)| i as f64 * c)
            .collect();
        Polynomial { coeffs }
    }

    /// Real roots of polynomials up to degree two, ascending. Leading
    /// coefficients negligible next to the largest one are treated as zero.
    pub fn real_roots(&self) -> Vec<f64> {
        let scale = self.coeffs.iter().fold(0.0f64, |m, c| m.max(c.abs()));
        if scale == 0.0 {
            return Vec::new();
        }
        let tiny = |c: f64| c.abs() <= 1e-9 * scale;
        let mut c = self.coeffs.clone();
        while c.len() > 1 && c.last().is_some_and(|&v| tiny(v)) {
            c.pop();
        }
        match c.len() {
            2 => vec![-c[0] / c[1]],
            3 => {
                let (a, b, k) = (c[2], c[1], c[0]);
                let disc = b * b - 4.0 * a * k;
                if disc < 0.0 {
                    return Vec::new();
                }
                let sq = disc.sqrt();
                // Numerically stable pair.
                let q = -0.5 * (b + b.signum() * sq);
                let mut roots = if q == 0.0 {
                    vec![0.0]
                } else {
                    vec![q / a, k / q]
                };
                roots.sort_by(|x, y| x.total_cmp(y));
                roots.dedup();
                roots
            }
            _ => Vec::new(),
        }
    }
}

/// Steepest point of a cubic fitted to `values` sampled at equally spaced
/// positions on `[0, 1]`. Returns the normalized position, or `None` when the
/// cubic is degenerate or its inflection falls outside the sampled range.
pub fn cubic_edge_position(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let xs: Vec<f64> = (0..n).map(|i| i as f64 / (n - 1) as f64).collect();
    let cubic = Polynomial::fit(&xs, values, 3)?;
    let magnitude = values.iter().fold(1.0f64, |m, v| m.max(v.abs()));
    if cubic.coeffs[3].abs() <= 1e-9 * magnitude {
        return None;
    }
    let second = cubic.derivative().derivative();
    second
        .real_roots()
        .into_iter()
        .find(|t| (0.0..=1.0).contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, eps: f64) {
        assert!(
            (actual - expected).abs() <= eps,
            "{actual} differs from {expected} by more than {eps}"
        );
    }

    #[test]
    fn fit_recovers_exact_cubic() {
        let truth = Polynomial {
            coeffs: vec![1.0, -2.0, 0.5, 3.0],
        };
        let xs: Vec<f64> = (0..8).map(|i| i as f64 / 7.0).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| truth.eval(x)).collect();
        let fit = Polynomial::fit(&xs, &ys, 3).expect("well posed");
        for (a, b) in fit.coeffs.iter().zip(&truth.coeffs) {
            assert_close(*a, *b, 1e-9);
        }
        assert!(Polynomial::fit(&xs[..3], &ys[..3], 3).is_none());
    }

    #[test]
    fn roots_of_linear_and_quadratic() {
        let lin = Polynomial {
            coeffs: vec![-1.0, 2.0],
        };
        assert_eq!(lin.real_roots(), vec![0.5]);
        let quad = Polynomial {
            coeffs: vec![2.0, -3.0, 1.0],
        };
        let r = quad.real_roots();
        assert_eq!(r.len(), 2);
        assert_close(r[0], 1.0, 1e-12);
        assert_close(r[1], 2.0, 1e-12);
        let none = Polynomial {
            coeffs: vec![1.0, 0.0, 1.0],
        };
        assert!(none.real_roots().is_empty());
    }

    #[test]
    fn symmetric_step_has_central_inflection() {
        let values = [10.0, 10.0, 12.0, 30.0, 100.0, 170.0, 188.0, 190.0, 190.0];
        let t = cubic_edge_position(&values).expect("edge in range");
        assert_close(t, 0.5, 1e-9);
    }

    #[test]
    fn flat_profile_has_no_edge() {
        assert!(cubic_edge_position(&[50.0; 10]).is_none());
        assert!(cubic_edge_position(&[1.0, 2.0, 3.0]).is_none());
    }
}
