//! Model for negative binomial regression
//!
//! Counts whose variance exceeds their mean are modeled with an extra shape
//! parameter `r`: var = μ + μ²/r. The shape is estimated up front from a
//! Poisson fit on the same design (a method-of-moments step) and then held
//! fixed while the coefficients are iterated.

use crate::error::{RegressionError, RegressionResult};
use crate::fit::options::FitOptions;
use crate::glm::{DispersionType, Glm};
use crate::irls;
use crate::link::Link;
use crate::math::prod_log;
use crate::model::Dataset;
use crate::poisson::{link::Log as PoissonLog, Poisson};
use itertools::izip;
use statrs::function::gamma::ln_gamma;
use std::marker::PhantomData;

pub struct NegativeBinomial<L = link::Log>
where
    L: Link<NegativeBinomial<L>>,
{
    _link: PhantomData<L>,
}

impl<L> Glm for NegativeBinomial<L>
where
    L: Link<NegativeBinomial<L>>,
{
    type Link = L;
    const DISPERSED: DispersionType = DispersionType::NoDispersion;
    const NAME: &'static str = "negative binomial";
    const HAS_SCALE: bool = true;
    const SCALE_NAME: &'static str = "r";

    fn valid_response(y: f64) -> bool {
        y.is_finite() && y >= 0.0 && y.fract() == 0.0
    }

    /// var = μ + μ²/r; the quadratic term carries the overdispersion.
    fn variance(mean: f64, aux: f64) -> f64 {
        mean + mean * mean / aux
    }

    fn log_like_term(y: f64, mean: f64, scale: f64) -> f64 {
        ln_gamma(y + scale) - ln_gamma(scale) - ln_gamma(y + 1.0)
            + scale * (scale / (scale + mean)).ln()
            + y * (mean / (scale + mean)).ln()
    }

    fn deviance_term(y: f64, mean: f64, aux: f64) -> f64 {
        2.0 * (prod_log(y) - y * mean.ln()
            - (y + aux) * ((y + aux) / (mean + aux)).ln())
    }

    fn clamp_mean(mean: f64) -> f64 {
        mean.max(1e-10)
    }

    fn initial_mean(y: f64) -> f64 {
        y + 0.5
    }

    /// Moment estimate of the shape from a Poisson fit on the same design:
    /// the average standardized excess of squared residuals over the mean.
    /// Underdispersed data has no negative binomial representation and is
    /// rejected rather than silently refit as Poisson.
    fn auxiliary(data: &Dataset, options: &FitOptions) -> RegressionResult<f64> {
        let poisson = irls::solve::<Poisson<PoissonLog>>(data, options, 1.0)?;
        let ndf = (data.n_obs() - data.n_param()).max(1) as f64;
        let alpha = izip!(&data.y, &poisson.fitted)
            .map(|(&y, &mu)| ((y - mu) * (y - mu) - mu) / (mu * mu))
            .sum::<f64>()
            / ndf;
        if alpha <= 0.0 {
            return Err(RegressionError::BadInput(
                "response shows no overdispersion over Poisson; \
                 the negative binomial shape estimate is not positive"
                    .to_string(),
            ));
        }
        Ok(alpha.recip())
    }
}

pub mod link {
    //! Link functions for negative binomial regression
    use super::NegativeBinomial;
    use crate::link::Link;

    /// The mean is kept on the log scale, as for Poisson regression.
    pub struct Log {}
    impl Link<NegativeBinomial<Log>> for Log {
        fn func(mean: f64) -> f64 {
            mean.ln()
        }
        fn func_inv(lin_pred: f64) -> f64 {
            lin_pred.exp()
        }
        fn deriv(mean: f64) -> f64 {
            mean.recip()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn variance_exceeds_mean() {
        assert_abs_diff_eq!(NegativeBinomial::<link::Log>::variance(2.0, 4.0), 3.0);
        assert!(NegativeBinomial::<link::Log>::variance(5.0, 1.0) > 5.0);
    }

    #[test]
    fn deviance_vanishes_at_saturation() {
        for &y in &[0.0, 2.0, 9.0] {
            let mu = if y == 0.0 { 1e-12 } else { y };
            assert_abs_diff_eq!(
                NegativeBinomial::<link::Log>::deviance_term(y, mu, 3.0),
                0.0,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn log_like_sums_to_one_over_small_support() {
        // Σ_y P(y) over a generous range should approach 1 for a modest mean.
        let total: f64 = (0..200)
            .map(|y| NegativeBinomial::<link::Log>::log_like_term(y as f64, 3.0, 2.0).exp())
            .sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-8);
    }
}
