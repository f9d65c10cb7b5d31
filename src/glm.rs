//! trait defining a generalized linear model family and providing common functionality
//! Models are fit such that E[Y] = g^-1(X*B) where g is the link function.

use crate::error::RegressionResult;
use crate::fit::{options::FitOptions, Fit};
use crate::irls;
use crate::link::Link;
use crate::model::{Dataset, Model};
use ndarray::Array1;

/// Whether the family estimates a free dispersion parameter from the
/// residuals (Gaussian) or has dispersion fixed at one (Bernoulli, Poisson,
/// negative binomial with its shape held in the auxiliary parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispersionType {
    FreeDispersion,
    NoDispersion,
}

/// A generalized linear model family. The associated link type fixes the
/// mean function at compile time, so every (family, link) pair resolves to
/// exactly one fitting routine.
pub trait Glm: Sized + 'static {
    /// The link function relating the mean of the response to the linear
    /// predictor.
    type Link: Link<Self>;

    const DISPERSED: DispersionType;

    /// Short family name used in messages and summaries.
    const NAME: &'static str;

    /// Whether the likelihood carries a scale parameter beyond the
    /// coefficients (the Gaussian noise scale, the negative binomial shape).
    /// Families without one ignore the `scale` argument of
    /// [`Glm::log_like_term`].
    const HAS_SCALE: bool = false;

    /// Chain label for the likelihood scale parameter, where one exists.
    const SCALE_NAME: &'static str = "scale";

    /// Whether a response value lies in the family's domain.
    fn valid_response(y: f64) -> bool;

    /// The variance of the response as a function of its mean. `aux` is the
    /// family's auxiliary parameter (the negative binomial shape); families
    /// without one ignore it.
    fn variance(mean: f64, aux: f64) -> f64;

    /// Pointwise log-likelihood of one observation at the response scale.
    fn log_like_term(y: f64, mean: f64, scale: f64) -> f64;

    /// Pointwise contribution to the deviance, i.e. twice the log-likelihood
    /// gap to the saturated model.
    fn deviance_term(y: f64, mean: f64, aux: f64) -> f64;

    /// Keep a mean iterate inside the family's open domain so that link
    /// derivatives and variances stay finite.
    fn clamp_mean(mean: f64) -> f64 {
        mean
    }

    /// Starting value for the mean given an observed response.
    fn initial_mean(y: f64) -> f64 {
        y
    }

    /// Estimate the auxiliary parameter ahead of the main fit. The default
    /// is the no-op value 1; the negative binomial family overrides this
    /// with its moment estimate of the shape.
    fn auxiliary(data: &Dataset, options: &FitOptions) -> RegressionResult<f64> {
        let _ = (data, options);
        Ok(1.0)
    }

    /// The inverse link applied to a single linear predictor.
    fn mean(lin_pred: f64) -> f64 {
        Self::Link::func_inv(lin_pred)
    }

    /// Total deviance of a mean vector against the observed response.
    fn deviance(y: &Array1<f64>, mean: &Array1<f64>, aux: f64) -> f64 {
        y.iter()
            .zip(mean.iter())
            .map(|(&y, &m)| Self::deviance_term(y, m, aux))
            .sum()
    }

    /// Perform the regression for this family and wrap the solver output
    /// into the result container.
    fn regression(model: &Model<Self>, options: FitOptions) -> RegressionResult<Fit<Self>> {
        let aux = Self::auxiliary(&model.data, &options)?;
        let solved = irls::solve::<Self>(&model.data, &options, aux)?;
        Ok(Fit::new(model, solved, aux))
    }
}
