//! Frequentist and Bayesian generalized linear models driven by R-style
//! formulas over tabular data.
//!
//! A model is specified by a formula over the named columns of a
//! [`DataFrame`] and a family type; the family's link function is part of
//! the type, so every (family, link) combination resolves to exactly one
//! fitting routine at compile time. Without a prior the likelihood is
//! maximized by iteratively re-weighted least squares; with a prior the
//! posterior is sampled instead.
//!
//! ```
//! use formula_glm::{DataFrame, Linear, ModelBuilder, Prior};
//!
//! # fn main() -> formula_glm::RegressionResult<()> {
//! let data = DataFrame::new()
//!     .with_column("y", vec![1.05, 2.9, 5.1, 7.0, 8.95])?
//!     .with_column("x", vec![0.0, 1.0, 2.0, 3.0, 4.0])?;
//!
//! // maximum likelihood
//! let model = ModelBuilder::<Linear>::formula("y ~ x", &data).build()?;
//! let fit = model.fit()?;
//! assert_eq!(fit.coefficients().len(), 2);
//!
//! // posterior sampling under a ridge prior, reproducible by seed
//! let posterior = model.bayes(Prior::ridge()).sim_size(200).warmup(200).fit_seeded(7)?;
//! assert_eq!(posterior.chain().n_draws(), 200);
//! # Ok(())
//! # }
//! ```

pub mod bayes;
pub mod data;
pub mod error;
pub mod fit;
pub mod formula;
pub mod glm;
mod irls;
pub mod linear;
pub mod link;
pub mod logistic;
pub mod math;
pub mod model;
pub mod negative_binomial;
pub mod poisson;

pub use crate::bayes::{BayesianFit, Chain, Prior};
pub use crate::data::DataFrame;
pub use crate::error::{RegressionError, RegressionResult};
pub use crate::fit::{CoefficientTable, Fit};
pub use crate::formula::Formula;
pub use crate::glm::Glm;
pub use crate::linear::Linear;
pub use crate::logistic::Logistic;
pub use crate::model::{Model, ModelBuilder};
pub use crate::negative_binomial::NegativeBinomial;
pub use crate::poisson::Poisson;
