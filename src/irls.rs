//! Iteratively re-weighted least squares algorithm

use crate::error::{RegressionError, RegressionResult};
use crate::fit::options::FitOptions;
use crate::glm::Glm;
use crate::link::Link;
use crate::model::Dataset;
use itertools::izip;
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};
use std::marker::PhantomData;

/// Working weights are clipped into this range so that a degenerate mean
/// iterate cannot poison the normal equations.
const MIN_WEIGHT: f64 = 1e-10;
const MAX_WEIGHT: f64 = 1e10;

/// Iterate over weighted least-squares updates until the relative change in
/// deviance falls within tolerance.
pub(crate) struct Irls<'a, M>
where
    M: Glm,
{
    model: PhantomData<M>,
    data: &'a Dataset,
    options: &'a FitOptions,
    aux: f64,
    /// The last accepted coefficient guess. Empty until the first solve.
    guess: Option<Array1<f64>>,
    /// Mean iterate for the current guess.
    mean: Array1<f64>,
    /// Linear predictor for the current guess.
    eta: Array1<f64>,
    /// Deviance of the current guess.
    deviance: f64,
    pub n_iter: usize,
    done: bool,
}

/// One accepted step of the iteration.
pub(crate) struct IrlsStep {
    pub guess: Array1<f64>,
    pub deviance: f64,
}

impl<'a, M> Irls<'a, M>
where
    M: Glm,
{
    pub fn new(data: &'a Dataset, options: &'a FitOptions, aux: f64) -> Self {
        let (guess, eta, mean) = match &options.init_guess {
            Some(beta) => {
                let eta = data.x.dot(beta);
                let mean = eta.mapv(|e| M::clamp_mean(M::mean(e)));
                (Some(beta.clone()), eta, mean)
            }
            None => {
                let mean = data.y.mapv(|y| M::clamp_mean(M::initial_mean(y)));
                let eta = mean.mapv(M::Link::func);
                (None, eta, mean)
            }
        };
        let deviance = M::deviance(&data.y, &mean, aux);
        Self {
            model: PhantomData,
            data,
            options,
            aux,
            guess,
            mean,
            eta,
            deviance,
            n_iter: 0,
            done: false,
        }
    }

    /// Relative deviance change of a candidate against the current state.
    fn relative_change(&self, candidate: f64) -> f64 {
        (candidate - self.deviance) / (self.deviance.abs() + f64::EPSILON)
    }

    /// Working weights 1/(V(μ)·g'(μ)²) and working response z = η + (y−μ)·g'(μ).
    fn working_arrays(&self) -> (Array1<f64>, Array1<f64>) {
        let n = self.data.y.len();
        let mut weights = Array1::<f64>::zeros(n);
        let mut response = Array1::<f64>::zeros(n);
        for (w, z, &y, &mu, &eta) in izip!(
            weights.iter_mut(),
            response.iter_mut(),
            &self.data.y,
            &self.mean,
            &self.eta
        ) {
            let deriv = M::Link::deriv(mu);
            let var = M::variance(mu, self.aux);
            *w = (var * deriv * deriv).recip().clamp(MIN_WEIGHT, MAX_WEIGHT);
            *z = eta + (y - mu) * deriv;
        }
        (weights, response)
    }
}

impl<'a, M> Iterator for Irls<'a, M>
where
    M: Glm,
{
    type Item = RegressionResult<IrlsStep>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.n_iter >= self.options.max_iter {
            return Some(Err(RegressionError::MaxIter(self.options.max_iter)));
        }

        let (weights, working) = self.working_arrays();
        let mut next_guess = match solve_weighted(&self.data.x, &working, &weights) {
            Ok(solution) => solution,
            Err(err) => return Some(Err(err)),
        };
        let mut next_eta = self.data.x.dot(&next_guess);
        let mut next_mean = next_eta.mapv(|e| M::clamp_mean(M::mean(e)));
        let mut next_dev = M::deviance(&self.data.y, &next_mean, self.aux);

        // If the full step makes the deviance worse, walk it back toward the
        // last accepted guess. Only possible once a guess exists.
        if let Some(current) = &self.guess {
            let mut halves = 0;
            while (!next_dev.is_finite() || self.relative_change(next_dev) > self.options.tol)
                && halves < self.options.max_step_halves
            {
                next_guess = izip!(&next_guess, current)
                    .map(|(&a, &b)| 0.5 * (a + b))
                    .collect();
                next_eta = self.data.x.dot(&next_guess);
                next_mean = next_eta.mapv(|e| M::clamp_mean(M::mean(e)));
                next_dev = M::deviance(&self.data.y, &next_mean, self.aux);
                halves += 1;
            }
            if !next_dev.is_finite() || self.relative_change(next_dev) > self.options.tol {
                // No improving direction left; stop at the current guess.
                self.done = true;
                return None;
            }
        }

        let converged =
            self.guess.is_some() && self.relative_change(next_dev).abs() <= self.options.tol;
        self.guess = Some(next_guess.clone());
        self.eta = next_eta;
        self.mean = next_mean;
        self.deviance = next_dev;
        self.n_iter += 1;
        if converged {
            self.done = true;
        }
        Some(Ok(IrlsStep {
            guess: next_guess,
            deviance: next_dev,
        }))
    }
}

/// Everything the fitting driver needs from a converged iteration.
pub(crate) struct IrlsOutput {
    pub coefficients: Array1<f64>,
    pub fitted: Array1<f64>,
    pub deviance: f64,
    /// (X'WX)⁻¹ at the converged weights; scaled by the dispersion it is the
    /// covariance of the coefficient estimates.
    pub cov_unscaled: Array2<f64>,
    pub n_iter: usize,
}

/// Drive the iteration to convergence and evaluate the converged state.
pub(crate) fn solve<M: Glm>(
    data: &Dataset,
    options: &FitOptions,
    aux: f64,
) -> RegressionResult<IrlsOutput> {
    let mut irls = Irls::<M>::new(data, options, aux);
    let mut coefficients = None;
    let mut deviance = f64::INFINITY;
    while let Some(step) = irls.next() {
        let step = step?;
        deviance = step.deviance;
        coefficients = Some(step.guess);
    }
    let coefficients = coefficients.ok_or(RegressionError::MaxIter(options.max_iter))?;

    let eta = data.x.dot(&coefficients);
    let fitted = eta.mapv(|e| M::clamp_mean(M::mean(e)));
    let mut weights = Array1::<f64>::zeros(fitted.len());
    for (w, &mu) in weights.iter_mut().zip(&fitted) {
        let deriv = M::Link::deriv(mu);
        let var = M::variance(mu, aux);
        *w = (var * deriv * deriv).recip().clamp(MIN_WEIGHT, MAX_WEIGHT);
    }
    let cov_unscaled = normal_matrix_inverse(&data.x, &weights)?;
    Ok(IrlsOutput {
        coefficients,
        fitted,
        deviance,
        cov_unscaled,
        n_iter: irls.n_iter,
    })
}

/// Solve the weighted normal equations (X'WX)β = X'Wz through a Cholesky
/// factorization, falling back to LU if the system is not numerically
/// positive definite.
fn solve_weighted(
    x: &Array2<f64>,
    z: &Array1<f64>,
    w: &Array1<f64>,
) -> RegressionResult<Array1<f64>> {
    let (xtx, xtz) = weighted_normal_equations(x, z, w);
    let solution = match xtx.clone().cholesky() {
        Some(chol) => chol.solve(&xtz),
        None => xtx
            .lu()
            .solve(&xtz)
            .ok_or_else(|| singular("the weighted normal matrix is not invertible"))?,
    };
    Ok(Array1::from_iter(solution.iter().copied()))
}

/// (X'WX)⁻¹ at the given weights.
fn normal_matrix_inverse(x: &Array2<f64>, w: &Array1<f64>) -> RegressionResult<Array2<f64>> {
    let p = x.ncols();
    let zero = Array1::<f64>::zeros(x.nrows());
    let (xtx, _) = weighted_normal_equations(x, &zero, w);
    let inverse = match xtx.clone().cholesky() {
        Some(chol) => chol.inverse(),
        None => xtx
            .try_inverse()
            .ok_or_else(|| singular("cannot invert the weighted normal matrix"))?,
    };
    let mut out = Array2::<f64>::zeros((p, p));
    for i in 0..p {
        for j in 0..p {
            out[[i, j]] = inverse[(i, j)];
        }
    }
    Ok(out)
}

/// Form X'WX and X'Wz by scaling rows with √w.
fn weighted_normal_equations(
    x: &Array2<f64>,
    z: &Array1<f64>,
    w: &Array1<f64>,
) -> (DMatrix<f64>, DVector<f64>) {
    let n = x.nrows();
    let p = x.ncols();
    let sqrt_w: Vec<f64> = w.iter().map(|&wi| wi.sqrt()).collect();
    let x_weighted = DMatrix::from_fn(n, p, |i, j| x[[i, j]] * sqrt_w[i]);
    let z_weighted =
        DVector::from_iterator(n, z.iter().zip(&sqrt_w).map(|(&zi, &si)| zi * si));
    let xtx = x_weighted.transpose() * &x_weighted;
    let xtz = x_weighted.transpose() * z_weighted;
    (xtx, xtz)
}

fn singular(msg: &str) -> RegressionError {
    RegressionError::Singular(msg.to_string())
}
