//! Collect data for and configure a model

use crate::bayes::{BayesConfig, Prior};
use crate::data::DataFrame;
use crate::error::{RegressionError, RegressionResult};
use crate::fit::{
    options::{FitConfig, FitOptions},
    Fit,
};
use crate::formula::Formula;
use crate::glm::Glm;
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};
use std::marker::PhantomData;

/// The expanded observations of a regression: the response vector, the
/// design matrix, and the labels of its columns.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// the observations of response data by event
    pub y: Array1<f64>,
    /// the design matrix with events in rows and predictor terms in columns
    pub x: Array2<f64>,
    /// design-matrix column labels, intercept first when present
    pub names: Vec<String>,
}

impl Dataset {
    /// The design matrix multiplied by the given regression parameters.
    pub fn linear_predictor(&self, regressors: &Array1<f64>) -> Array1<f64> {
        self.x.dot(regressors)
    }

    pub fn n_obs(&self) -> usize {
        self.y.len()
    }

    pub fn n_param(&self) -> usize {
        self.x.ncols()
    }
}

/// Holds the expanded data and the formula it came from for a regression of
/// family `M`. Fitting routines are selected through the type parameter.
pub struct Model<M>
where
    M: Glm,
{
    pub model: PhantomData<M>,
    pub data: Dataset,
    pub formula: Formula,
}

impl<M> Model<M>
where
    M: Glm,
{
    /// Perform the regression with default options and return a fit object
    /// holding the results.
    pub fn fit(&self) -> RegressionResult<Fit<M>> {
        self.fit_options().fit()
    }

    /// Adjust fitting options before performing the regression.
    pub fn fit_options(&self) -> FitConfig<'_, M> {
        FitConfig {
            model: self,
            options: FitOptions::default(),
        }
    }

    /// Switch to the Bayesian path: place the given prior on the intercept
    /// and coefficients and sample the posterior instead of maximizing the
    /// likelihood.
    pub fn bayes(&self, prior: Prior) -> BayesConfig<'_, M> {
        BayesConfig::new(self, prior)
    }
}

/// Provides an interface to create the model struct with convenient type
/// inference over the family.
pub struct ModelBuilder<M: Glm> {
    _model: PhantomData<M>,
}

impl<M: Glm> ModelBuilder<M> {
    /// Start from a formula string and a table of named columns. The formula
    /// is parsed and expanded when the model is built.
    pub fn formula<'a>(formula: &'a str, data: &'a DataFrame) -> ModelBuilderData<'a, M> {
        ModelBuilderData {
            model: PhantomData,
            formula,
            data,
            rank_tol: None,
        }
    }
}

/// Holds the configuration of the model before expansion and validation.
pub struct ModelBuilderData<'a, M>
where
    M: Glm,
{
    model: PhantomData<M>,
    formula: &'a str,
    data: &'a DataFrame,
    /// relative singular-value tolerance for the rank check on X
    rank_tol: Option<f64>,
}

impl<'a, M> ModelBuilderData<'a, M>
where
    M: Glm,
{
    /// Set the relative tolerance for the co-linearity check.
    pub fn colinearity_tolerance(mut self, tol: f64) -> Self {
        self.rank_tol = Some(tol);
        self
    }

    /// Parse the formula, expand it against the data, and validate the
    /// result. Schema mismatches surface here, before any fitting work.
    pub fn build(self) -> RegressionResult<Model<M>> {
        let formula: Formula = self.formula.parse()?;
        let (y, x) = formula.expand(self.data)?;
        let names = formula.term_names();

        for &yi in &y {
            if !M::valid_response(yi) {
                return Err(RegressionError::InvalidY(format!(
                    "{} is not a valid {} response",
                    yi,
                    M::NAME
                )));
            }
        }

        let n_data = y.len();
        if n_data < x.ncols() {
            // A solution exists at n == p, although without any estimate of
            // the uncertainty.
            return Err(RegressionError::Underconstrained);
        }

        // Check for co-linearity through the singular values of X: a
        // smallest singular value that vanishes relative to the largest
        // means some column is a combination of the others.
        let p = x.ncols();
        let tol = self
            .rank_tol
            .unwrap_or_else(|| default_epsilon(n_data.max(p)));
        let x_na = DMatrix::from_fn(n_data, p, |i, j| x[[i, j]]);
        let singular_values = x_na.svd(false, false).singular_values;
        if singular_values.min() <= tol * singular_values.max() {
            return Err(RegressionError::ColinearData);
        }

        Ok(Model {
            model: PhantomData,
            data: Dataset { y, x, names },
            formula,
        })
    }
}

/// Default relative tolerance for the rank check. A few orders of magnitude
/// above machine epsilon so that exact colinearity is caught reliably; a
/// design past this condition number has no usable least-squares solution
/// in double precision anyway.
fn default_epsilon(max_dim: usize) -> f64 {
    max_dim as f64 * 1e-12
}
