//! Shared dataset builders for the integration tests
#![allow(dead_code)]

use formula_glm::{DataFrame, RegressionResult};

/// An exactly linear response: y = 1 + 2*x1 - x2, no noise.
pub fn exact_linear() -> RegressionResult<DataFrame> {
    let x1 = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    let x2 = vec![1.0, 0.0, 2.0, 1.0, 3.0, 2.0];
    let y: Vec<f64> = x1
        .iter()
        .zip(&x2)
        .map(|(&a, &b)| 1.0 + 2.0 * a - b)
        .collect();
    DataFrame::new()
        .with_column("Y", y)?
        .with_column("X1", x1)?
        .with_column("X2", x2)
}

/// The linear response above with small fixed perturbations, so the fit has
/// genuine residuals without depending on a random source.
pub fn noisy_linear() -> RegressionResult<DataFrame> {
    let x1 = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
    let x2 = vec![1.0, 0.0, 2.0, 1.0, 3.0, 2.0, 0.0, 4.0];
    let bump = [0.11, -0.07, 0.02, -0.12, 0.08, 0.03, -0.05, 0.04];
    let y: Vec<f64> = x1
        .iter()
        .zip(&x2)
        .zip(&bump)
        .map(|((&a, &b), &e)| 1.0 + 2.0 * a - b + e)
        .collect();
    DataFrame::new()
        .with_column("Y", y)?
        .with_column("X1", x1)?
        .with_column("X2", x2)
}

/// Counts whose group means are exactly representable on the log scale:
/// the maximum-likelihood coefficients are (0, ln 2, -ln 2).
pub fn exact_counts() -> RegressionResult<DataFrame> {
    DataFrame::new()
        .with_column("Y", vec![2.0, 1.0, 0.0, 1.0])?
        .with_column("X1", vec![1.0, 1.0, 0.0, 0.0])?
        .with_column("X2", vec![0.0, 1.0, 1.0, 1.0])
}

/// Counts with within-group variance far above the group mean, so a
/// negative binomial shape estimate exists. Group means double with x.
pub fn overdispersed_counts() -> RegressionResult<DataFrame> {
    let x = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0];
    let y = vec![0.0, 1.0, 5.0, 10.0, 1.0, 3.0, 9.0, 19.0, 2.0, 6.0, 18.0, 38.0];
    DataFrame::new().with_column("Y", y)?.with_column("X", x)
}

/// Counts tighter than Poisson: variance below the mean in every group.
pub fn underdispersed_counts() -> RegressionResult<DataFrame> {
    let x = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
    let y = vec![3.0, 4.0, 4.0, 5.0, 7.0, 8.0, 8.0, 9.0];
    DataFrame::new().with_column("Y", y)?.with_column("X", x)
}
