//! struct holding the fit result of a regression

pub mod options;

use crate::data::DataFrame;
use crate::error::{RegressionError, RegressionResult};
use crate::formula::Formula;
use crate::glm::{DispersionType, Glm};
use crate::irls::IrlsOutput;
use crate::linear::Linear;
use crate::link::Link;
use crate::model::Model;
use ndarray::{Array1, Array2};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};
use std::fmt;
use std::marker::PhantomData;

/// The result of a successful frequentist fit. Owns everything the
/// post-fit accessors forward to and is read-only after construction; the
/// family tag decides how predictions invert the link.
pub struct Fit<M>
where
    M: Glm,
{
    model: PhantomData<M>,
    formula: Formula,
    names: Vec<String>,
    /// The parameter values that minimize the deviance.
    pub result: Array1<f64>,
    /// Number of data points minus number of free parameters.
    pub ndf: usize,
    /// The number of IRLS iterations taken.
    pub n_iter: usize,
    y: Array1<f64>,
    x: Array2<f64>,
    fitted: Array1<f64>,
    cov_unscaled: Array2<f64>,
    deviance: f64,
    /// Auxiliary family parameter (the negative binomial shape); 1 elsewhere.
    aux: f64,
}

impl<M> Fit<M>
where
    M: Glm,
{
    pub(crate) fn new(model: &Model<M>, solved: IrlsOutput, aux: f64) -> Self {
        let ndf = model.data.n_obs() - solved.coefficients.len();
        Self {
            model: PhantomData,
            formula: model.formula.clone(),
            names: model.data.names.clone(),
            result: solved.coefficients,
            ndf,
            n_iter: solved.n_iter,
            y: model.data.y.clone(),
            x: model.data.x.clone(),
            fitted: solved.fitted,
            cov_unscaled: solved.cov_unscaled,
            deviance: solved.deviance,
            aux,
        }
    }

    /// The fitted coefficient vector, intercept first when the formula keeps
    /// one.
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.result
    }

    /// Labels for the coefficients, aligned with [`Fit::coefficients`].
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn n_obs(&self) -> usize {
        self.y.len()
    }

    pub fn n_param(&self) -> usize {
        self.result.len()
    }

    /// The residual deviance of the fit.
    pub fn deviance(&self) -> f64 {
        self.deviance
    }

    /// The estimated dispersion: deviance over residual degrees of freedom
    /// for families with free dispersion, one otherwise.
    pub fn dispersion(&self) -> f64 {
        match M::DISPERSED {
            DispersionType::FreeDispersion => self.deviance / self.ndf as f64,
            DispersionType::NoDispersion => 1.0,
        }
    }

    /// The residual standard error sqrt(deviance / ndf).
    pub fn residual_std_error(&self) -> f64 {
        (self.deviance / self.ndf as f64).sqrt()
    }

    /// Fitted means, one per observation of the training data.
    pub fn fitted_values(&self) -> &Array1<f64> {
        &self.fitted
    }

    /// Response residuals y - μ̂.
    pub fn residuals(&self) -> Array1<f64> {
        &self.y - &self.fitted
    }

    /// The log-likelihood of the data at the fitted parameters. For the
    /// Gaussian family the noise scale is profiled out at its maximum-
    /// likelihood value.
    pub fn log_likelihood(&self) -> f64 {
        let scale = match M::DISPERSED {
            DispersionType::FreeDispersion => (self.deviance / self.n_obs() as f64).sqrt(),
            DispersionType::NoDispersion => self.aux,
        };
        self.y
            .iter()
            .zip(&self.fitted)
            .map(|(&y, &mu)| M::log_like_term(y, mu, scale))
            .sum()
    }

    /// Akaike information criterion, counting the dispersion as a parameter
    /// where the family estimates one.
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.k_params() as f64
    }

    /// Bayesian information criterion.
    pub fn bic(&self) -> f64 {
        -2.0 * self.log_likelihood() + (self.n_obs() as f64).ln() * self.k_params() as f64
    }

    fn k_params(&self) -> usize {
        match M::DISPERSED {
            DispersionType::FreeDispersion => self.n_param() + 1,
            DispersionType::NoDispersion => self.n_param(),
        }
    }

    /// The coefficient table: estimates, standard errors, test statistics,
    /// and two-tailed p-values. Wald z-tests for fixed-dispersion families;
    /// t-tests with the residual degrees of freedom otherwise.
    pub fn coef_table(&self) -> RegressionResult<CoefficientTable> {
        let phi = self.dispersion();
        let std_err: Array1<f64> = (0..self.n_param())
            .map(|j| (phi * self.cov_unscaled[[j, j]]).sqrt())
            .collect();
        let statistic: Array1<f64> = self
            .result
            .iter()
            .zip(&std_err)
            .map(|(&b, &se)| b / se)
            .collect();
        let p_value: Array1<f64> = match M::DISPERSED {
            DispersionType::NoDispersion => {
                let normal = Normal::new(0.0, 1.0)?;
                statistic
                    .iter()
                    .map(|&z| 2.0 * (1.0 - normal.cdf(z.abs())))
                    .collect()
            }
            DispersionType::FreeDispersion => {
                let t_dist = StudentsT::new(0.0, 1.0, self.ndf as f64)?;
                statistic
                    .iter()
                    .map(|&t| 2.0 * (1.0 - t_dist.cdf(t.abs())))
                    .collect()
            }
        };
        Ok(CoefficientTable {
            names: self.names.clone(),
            estimate: self.result.clone(),
            std_err,
            statistic,
            p_value,
        })
    }

    /// Predict the response for new data: the data is expanded through the
    /// same formula as the fit, multiplied by the point estimates, and the
    /// family's inverse link is applied. A missing predictor column is a
    /// schema error.
    pub fn predict(&self, data: &DataFrame) -> RegressionResult<Array1<f64>> {
        let x_new = self.formula.design_matrix(data)?;
        if x_new.ncols() != self.n_param() {
            return Err(RegressionError::BadInput(format!(
                "expanded {} predictor columns where the fit used {}",
                x_new.ncols(),
                self.n_param()
            )));
        }
        Ok(x_new.dot(&self.result).mapv(M::mean))
    }
}

/// Diagnostics defined only for the linear (Gaussian, identity link) family.
/// Other families, and Bayesian results, do not expose them.
impl<L> Fit<Linear<L>>
where
    L: Link<Linear<L>>,
{
    /// The fraction of response variance explained by the regression.
    pub fn r_squared(&self) -> f64 {
        1.0 - self.deviance / self.total_sum_squares()
    }

    /// R² penalized for the number of predictors.
    pub fn adj_r_squared(&self) -> f64 {
        let n = self.n_obs() as f64;
        1.0 - (1.0 - self.r_squared()) * (n - 1.0) / self.ndf as f64
    }

    /// Cook's distance of each observation: the scaled influence of deleting
    /// it, computed from the hat-matrix leverage without forming the full
    /// n×n projection.
    pub fn cooks_distance(&self) -> Array1<f64> {
        let p = self.n_param() as f64;
        let s2 = self.deviance / self.ndf as f64;
        let residuals = self.residuals();
        (0..self.n_obs())
            .map(|i| {
                let xi = self.x.row(i);
                let leverage = xi.dot(&self.cov_unscaled.dot(&xi));
                let e = residuals[i];
                e * e * leverage / (p * s2 * (1.0 - leverage) * (1.0 - leverage))
            })
            .collect()
    }

    fn total_sum_squares(&self) -> f64 {
        let y_bar = self.y.mean().unwrap_or(f64::NAN);
        self.y.iter().map(|&y| (y - y_bar) * (y - y_bar)).sum()
    }
}

/// Per-coefficient estimates and Wald tests, aligned by index.
#[derive(Debug, Clone)]
pub struct CoefficientTable {
    pub names: Vec<String>,
    pub estimate: Array1<f64>,
    pub std_err: Array1<f64>,
    pub statistic: Array1<f64>,
    pub p_value: Array1<f64>,
}

impl fmt::Display for CoefficientTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<16} {:>12} {:>12} {:>9} {:>10}",
            "term", "estimate", "std err", "stat", "p"
        )?;
        for (i, name) in self.names.iter().enumerate() {
            writeln!(
                f,
                "{:<16} {:>12.5} {:>12.5} {:>9.3} {:>10.4} {}",
                name,
                self.estimate[i],
                self.std_err[i],
                self.statistic[i],
                self.p_value[i],
                significance_stars(self.p_value[i]),
            )?;
        }
        Ok(())
    }
}

/// Conventional significance markers for a p-value.
fn significance_stars(p: f64) -> &'static str {
    if p < 0.001 {
        "***"
    } else if p < 0.01 {
        "**"
    } else if p < 0.05 {
        "*"
    } else if p < 0.1 {
        "."
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_thresholds() {
        assert_eq!(significance_stars(0.0005), "***");
        assert_eq!(significance_stars(0.005), "**");
        assert_eq!(significance_stars(0.03), "*");
        assert_eq!(significance_stars(0.07), ".");
        assert_eq!(significance_stars(0.5), "");
    }
}
