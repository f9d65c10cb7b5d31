//! Fit-specific configuration and fit builder
use super::Fit;
use crate::{error::RegressionResult, glm::Glm, model::Model};
use ndarray::Array1;

/// A builder struct for fit configuration
pub struct FitConfig<'a, M>
where
    M: Glm,
{
    pub(crate) model: &'a Model<M>,
    pub options: FitOptions,
}

impl<'a, M> FitConfig<'a, M>
where
    M: Glm,
{
    pub fn fit(self) -> RegressionResult<Fit<M>> {
        M::regression(self.model, self.options)
    }

    /// Use a maximum number of iterations
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.options.max_iter = max_iter;
        self
    }

    /// Set the relative deviance tolerance of iteration
    pub fn tol(mut self, tol: f64) -> Self {
        self.options.tol = tol;
        self
    }

    /// Begin the iteration from a specific coefficient vector
    pub fn init_guess(mut self, guess: Array1<f64>) -> Self {
        self.options.init_guess = Some(guess);
        self
    }
}

/// Specifies the fitting options
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// The maximum number of IRLS iterations
    pub max_iter: usize,
    /// The relative tolerance of the deviance
    pub tol: f64,
    /// How many times a worsening step is halved back toward the previous
    /// guess before the iteration gives up
    pub max_step_halves: usize,
    /// An initial guess. A sensible default is selected if this is not provided.
    pub init_guess: Option<Array1<f64>>,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iter: 32,
            // Relative to the total deviance, which is O(n); tighter values
            // mostly burn iterations on noise.
            tol: 1e-8,
            max_step_halves: 8,
            init_guess: None,
        }
    }
}
