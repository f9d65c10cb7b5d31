//! Adaptive random-walk Metropolis sampling
//!
//! The proposal is an independent Gaussian step per dimension. During warmup
//! the per-dimension step sizes are rescaled in batches toward the usual
//! random-walk acceptance target; after warmup the proposal is frozen so the
//! recorded draws come from a fixed transition kernel.

use crate::error::{RegressionError, RegressionResult};
use ndarray::{Array1, Array2};
use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::Normal;

/// Asymptotically optimal acceptance rate for random-walk proposals in
/// moderate dimension.
const TARGET_ACCEPT: f64 = 0.234;
/// Warmup draws per adaptation batch.
const ADAPT_BATCH: usize = 50;

/// A log-density over an unconstrained parameter vector. Evaluations may
/// fail (invalid distribution parameters) and may legitimately return
/// `-inf` for a rejected region; both are handled by the sampler, the
/// former by propagation and the latter by rejection.
pub(crate) trait LogDensity {
    fn dim(&self) -> usize;
    fn log_density(&self, theta: &Array1<f64>) -> RegressionResult<f64>;
}

pub(crate) struct Metropolis<'a, T, R>
where
    T: LogDensity,
    R: Rng,
{
    target: &'a T,
    rng: &'a mut R,
    unit_normal: Normal,
    current: Array1<f64>,
    current_lp: f64,
    /// Per-dimension proposal standard deviations.
    step: Array1<f64>,
    accepted: usize,
    proposed: usize,
}

impl<'a, T, R> Metropolis<'a, T, R>
where
    T: LogDensity,
    R: Rng,
{
    pub fn new(target: &'a T, initial: Array1<f64>, rng: &'a mut R) -> RegressionResult<Self> {
        let current_lp = target.log_density(&initial)?;
        if !current_lp.is_finite() {
            return Err(RegressionError::Sampler(
                "posterior density is not finite at the initial point".to_string(),
            ));
        }
        let dim = target.dim();
        Ok(Self {
            target,
            rng,
            unit_normal: Normal::new(0.0, 1.0)?,
            current: initial,
            current_lp,
            step: Array1::from_elem(dim, 0.1),
            accepted: 0,
            proposed: 0,
        })
    }

    /// One Metropolis transition: propose, evaluate, accept or stay.
    fn advance(&mut self) -> RegressionResult<()> {
        let mut noise = Array1::<f64>::zeros(self.current.len());
        for n in noise.iter_mut() {
            *n = self.unit_normal.sample(&mut *self.rng);
        }
        let proposal = &self.current + &(&self.step * &noise);
        let lp = self.target.log_density(&proposal)?;
        self.proposed += 1;
        if lp.is_finite() && self.rng.gen::<f64>().ln() < lp - self.current_lp {
            self.current = proposal;
            self.current_lp = lp;
            self.accepted += 1;
        }
        Ok(())
    }

    /// Rescale the proposal from the acceptance rate of the last batch. The
    /// adjustment shrinks with the batch index so the scales settle down.
    fn adapt(&mut self, batch_index: usize) {
        let rate = self.accepted as f64 / self.proposed.max(1) as f64;
        let delta = (batch_index as f64).sqrt().recip().min(0.25);
        let factor = if rate > TARGET_ACCEPT {
            delta.exp()
        } else {
            (-delta).exp()
        };
        self.step.mapv_inplace(|s| s * factor);
        self.accepted = 0;
        self.proposed = 0;
    }

    /// Warm the proposal up, then record exactly `n_draws` draws. A
    /// non-finite parameter value in the recorded portion aborts the run.
    pub fn run(&mut self, warmup: usize, n_draws: usize) -> RegressionResult<Array2<f64>> {
        let mut batch_index = 0;
        for i in 0..warmup {
            self.advance()?;
            if (i + 1) % ADAPT_BATCH == 0 {
                batch_index += 1;
                self.adapt(batch_index);
            }
        }
        self.accepted = 0;
        self.proposed = 0;

        let mut chain = Array2::<f64>::zeros((n_draws, self.current.len()));
        for i in 0..n_draws {
            self.advance()?;
            if self.current.iter().any(|v| !v.is_finite()) {
                return Err(RegressionError::Sampler(format!(
                    "non-finite draw at iteration {}",
                    i
                )));
            }
            chain.row_mut(i).assign(&self.current);
        }
        Ok(chain)
    }

    /// Fraction of accepted proposals since warmup ended.
    pub fn accept_rate(&self) -> f64 {
        self.accepted as f64 / self.proposed.max(1) as f64
    }
}
