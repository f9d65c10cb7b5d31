//! Bayesian fitting: the model program, the posterior sampler, and the
//! chain container
//!
//! The model program shared by all families: a coefficient scale `v` is
//! drawn from an Inverse-Gamma(h, h) hyperprior, the intercept and
//! coefficients are drawn i.i.d. from the prior family at scale `v`, the
//! linear predictor is pushed through the family's inverse link, and the
//! observed-data likelihood is declared over every observation. Families
//! with a likelihood scale of their own (the Gaussian noise scale, the
//! negative binomial shape) sample it with the same hyperprior. Positive
//! parameters are sampled on the log scale with the Jacobian folded into
//! the density.

mod metropolis;
mod prior;

pub use prior::Prior;

use crate::data::DataFrame;
use crate::error::{RegressionError, RegressionResult};
use crate::formula::Formula;
use crate::glm::Glm;
use crate::math::quantile;
use crate::model::{Dataset, Model};
use itertools::izip;
use metropolis::{LogDensity, Metropolis};
use ndarray::{s, Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::{Continuous, InverseGamma};
use std::fmt;
use std::marker::PhantomData;

/// Default number of posterior draws.
pub const DEFAULT_SIM_SIZE: usize = 10_000;
/// Default number of discarded adaptation draws.
pub const DEFAULT_WARMUP: usize = 1_000;

/// Configuration of a Bayesian fit, created through [`Model::bayes`].
pub struct BayesConfig<'a, M>
where
    M: Glm,
{
    model: &'a Model<M>,
    prior: Prior,
    sim_size: usize,
    warmup: usize,
}

impl<'a, M> BayesConfig<'a, M>
where
    M: Glm,
{
    pub(crate) fn new(model: &'a Model<M>, prior: Prior) -> Self {
        Self {
            model,
            prior,
            sim_size: DEFAULT_SIM_SIZE,
            warmup: DEFAULT_WARMUP,
        }
    }

    /// Number of posterior draws to record.
    pub fn sim_size(mut self, sim_size: usize) -> Self {
        self.sim_size = sim_size;
        self
    }

    /// Number of adaptation draws discarded before recording starts.
    pub fn warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    /// Sample the posterior with the given generator. The generator is the
    /// only stateful collaborator: reseeding it and refitting with the same
    /// arguments reproduces the chain exactly.
    pub fn fit<R: Rng>(self, rng: &mut R) -> RegressionResult<BayesianFit<M>> {
        let posterior = Posterior::<M> {
            data: &self.model.data,
            prior: &self.prior,
            model: PhantomData,
        };
        let mut sampler = Metropolis::new(&posterior, posterior.initial_point(), rng)?;
        let mut draws = sampler.run(self.warmup, self.sim_size)?;
        let accept_rate = sampler.accept_rate();
        // scale parameters are walked on the log scale; the reported chain
        // carries them on their natural scale
        let n_coef = self.model.data.n_param();
        draws.slice_mut(s![.., n_coef..]).mapv_inplace(f64::exp);
        Ok(BayesianFit {
            model: PhantomData,
            formula: self.model.formula.clone(),
            n_coef,
            chain: Chain::new(posterior.parameter_names(), draws),
            accept_rate,
        })
    }

    /// Sample with a fresh generator seeded from the given value.
    pub fn fit_seeded(self, seed: u64) -> RegressionResult<BayesianFit<M>> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.fit(&mut rng)
    }

    /// Sample with a fresh generator seeded from the operating system, for
    /// callers that do not care about reproducibility.
    pub fn fit_fresh(self) -> RegressionResult<BayesianFit<M>> {
        let mut rng = StdRng::from_entropy();
        self.fit(&mut rng)
    }
}

/// The log-posterior of the model program over the unconstrained parameter
/// vector [coefficients, log v, (log scale), (log ν)].
struct Posterior<'a, M>
where
    M: Glm,
{
    data: &'a Dataset,
    prior: &'a Prior,
    model: PhantomData<M>,
}

impl<'a, M> Posterior<'a, M>
where
    M: Glm,
{
    fn n_coef(&self) -> usize {
        self.data.n_param()
    }

    fn initial_point(&self) -> Array1<f64> {
        // zero coefficients and unit scales (zero on the log scale)
        Array1::zeros(self.dim())
    }

    fn parameter_names(&self) -> Vec<String> {
        let mut names = self.data.names.clone();
        names.push("prior_scale".to_string());
        if M::HAS_SCALE {
            names.push(M::SCALE_NAME.to_string());
        }
        if self.prior.samples_df() {
            names.push("nu".to_string());
        }
        names
    }
}

impl<'a, M> LogDensity for Posterior<'a, M>
where
    M: Glm,
{
    fn dim(&self) -> usize {
        self.n_coef() + 1 + usize::from(M::HAS_SCALE) + usize::from(self.prior.samples_df())
    }

    fn log_density(&self, theta: &Array1<f64>) -> RegressionResult<f64> {
        let n_coef = self.n_coef();
        let beta = theta.slice(s![..n_coef]);
        let h = self.prior.h();
        let hyper = InverseGamma::new(h, h)?;
        let mut lp = 0.0;

        // Positive parameters live on the log scale; the additive log term
        // is the Jacobian of that transform. A proposal whose exponent
        // under- or overflows is rejected, not an error.
        let log_v = theta[n_coef];
        let v = log_v.exp();
        if v == 0.0 || !v.is_finite() {
            return Ok(f64::NEG_INFINITY);
        }
        lp += hyper.ln_pdf(v) + log_v;

        let scale = if M::HAS_SCALE {
            let log_s = theta[n_coef + 1];
            let s = log_s.exp();
            if s == 0.0 || !s.is_finite() {
                return Ok(f64::NEG_INFINITY);
            }
            lp += hyper.ln_pdf(s) + log_s;
            s
        } else {
            1.0
        };

        let df = if self.prior.samples_df() {
            let log_nu = theta[n_coef + 1 + usize::from(M::HAS_SCALE)];
            let nu = log_nu.exp();
            if nu == 0.0 || !nu.is_finite() {
                return Ok(f64::NEG_INFINITY);
            }
            lp += hyper.ln_pdf(nu) + log_nu;
            nu
        } else {
            1.0
        };

        if !lp.is_finite() {
            return Ok(f64::NEG_INFINITY);
        }
        for &b in beta.iter() {
            lp += self.prior.log_density(b, v, df)?;
        }
        if !lp.is_finite() {
            return Ok(f64::NEG_INFINITY);
        }

        let eta = self.data.x.dot(&beta);
        for (&y, &e) in izip!(&self.data.y, &eta) {
            let mu = M::clamp_mean(M::mean(e));
            lp += M::log_like_term(y, mu, scale);
        }
        Ok(if lp.is_finite() { lp } else { f64::NEG_INFINITY })
    }
}

/// An ordered collection of posterior draws, one row per draw and one
/// column per named parameter. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Chain {
    names: Vec<String>,
    draws: Array2<f64>,
}

impl Chain {
    fn new(names: Vec<String>, draws: Array2<f64>) -> Self {
        Self { names, draws }
    }

    pub fn n_draws(&self) -> usize {
        self.draws.nrows()
    }

    pub fn n_params(&self) -> usize {
        self.draws.ncols()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn draws(&self) -> &Array2<f64> {
        &self.draws
    }

    /// All draws of one named parameter.
    pub fn parameter(&self, name: &str) -> RegressionResult<ArrayView1<'_, f64>> {
        let idx = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| {
                RegressionError::BadInput(format!("no parameter '{}' in the chain", name))
            })?;
        Ok(self.draws.column(idx))
    }

    /// Posterior mean of the parameter at the given column.
    pub fn mean(&self, index: usize) -> f64 {
        self.draws.column(index).mean().unwrap_or(f64::NAN)
    }

    /// Per-parameter summary statistics of the chain.
    pub fn summary(&self) -> ChainSummary {
        let parameters = self
            .names
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let col = self.draws.column(j);
                let values: Vec<f64> = col.to_vec();
                ParameterSummary {
                    name: name.clone(),
                    mean: self.mean(j),
                    std_dev: col.std(1.0),
                    q025: quantile(&values, 0.025),
                    median: quantile(&values, 0.5),
                    q975: quantile(&values, 0.975),
                }
            })
            .collect();
        ChainSummary { parameters }
    }
}

/// Location and spread of one sampled parameter.
#[derive(Debug, Clone)]
pub struct ParameterSummary {
    pub name: String,
    pub mean: f64,
    pub std_dev: f64,
    pub q025: f64,
    pub median: f64,
    pub q975: f64,
}

#[derive(Debug, Clone)]
pub struct ChainSummary {
    pub parameters: Vec<ParameterSummary>,
}

impl fmt::Display for ChainSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<16} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "parameter", "mean", "std", "2.5%", "50%", "97.5%"
        )?;
        for p in &self.parameters {
            writeln!(
                f,
                "{:<16} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                p.name, p.mean, p.std_dev, p.q025, p.median, p.q975
            )?;
        }
        Ok(())
    }
}

/// The result of a Bayesian fit: the family tag and the posterior chain.
/// Point-estimate diagnostics of the frequentist container (AIC, Cook's
/// distance, ...) deliberately do not exist here; the chain itself is the
/// result.
pub struct BayesianFit<M>
where
    M: Glm,
{
    model: PhantomData<M>,
    formula: Formula,
    n_coef: usize,
    chain: Chain,
    accept_rate: f64,
}

impl<M> BayesianFit<M>
where
    M: Glm,
{
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Post-warmup acceptance rate of the sampler; a gross mixing check.
    pub fn acceptance_rate(&self) -> f64 {
        self.accept_rate
    }

    /// Posterior-mean coefficient vector, aligned with the design columns
    /// of the fit formula.
    pub fn posterior_mean(&self) -> Array1<f64> {
        self.chain
            .draws
            .slice(s![.., ..self.n_coef])
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(self.n_coef))
    }

    /// Predict the response for new data from the posterior-mean
    /// coefficients.
    pub fn predict(&self, data: &DataFrame) -> RegressionResult<Array1<f64>> {
        self.predict_with(data, &self.posterior_mean())
    }

    /// Predict from an explicit coefficient vector, e.g. a single posterior
    /// draw instead of the posterior mean.
    pub fn predict_with(
        &self,
        data: &DataFrame,
        coefficients: &Array1<f64>,
    ) -> RegressionResult<Array1<f64>> {
        let x_new = self.formula.design_matrix(data)?;
        if x_new.ncols() != coefficients.len() {
            return Err(RegressionError::BadInput(format!(
                "expanded {} predictor columns where {} coefficients were given",
                x_new.ncols(),
                coefficients.len()
            )));
        }
        Ok(x_new.dot(coefficients).mapv(M::mean))
    }
}
