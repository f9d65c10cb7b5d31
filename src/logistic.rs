//! Logistic regression for binary (or proportion) responses

use crate::glm::{DispersionType, Glm};
use crate::link::Link;
use crate::math::prod_log;
use std::marker::PhantomData;

/// Logistic regression. The link parameter selects how the linear predictor
/// is mapped into a probability; the logit is the canonical choice.
pub struct Logistic<L = link::Logit>
where
    L: Link<Logistic<L>>,
{
    _link: PhantomData<L>,
}

impl<L> Glm for Logistic<L>
where
    L: Link<Logistic<L>>,
{
    type Link = L;
    const DISPERSED: DispersionType = DispersionType::NoDispersion;
    const NAME: &'static str = "logistic";

    /// Proportions in the closed unit interval are admitted, binary outcomes
    /// being the common case.
    fn valid_response(y: f64) -> bool {
        (0.0..=1.0).contains(&y)
    }

    /// var = mu*(1-mu)
    fn variance(mean: f64, _aux: f64) -> f64 {
        mean * (1.0 - mean)
    }

    fn log_like_term(y: f64, mean: f64, _scale: f64) -> f64 {
        y * mean.ln() + (1.0 - y) * (1.0 - mean).ln()
    }

    /// Both saturated terms vanish for binary y but contribute for
    /// proportion responses.
    fn deviance_term(y: f64, mean: f64, _aux: f64) -> f64 {
        2.0 * (prod_log(y) + prod_log(1.0 - y) - y * mean.ln() - (1.0 - y) * (1.0 - mean).ln())
    }

    fn clamp_mean(mean: f64) -> f64 {
        mean.clamp(1e-10, 1.0 - 1e-10)
    }

    /// Shrink toward one half so that degenerate 0/1 responses do not start
    /// the iteration on the boundary.
    fn initial_mean(y: f64) -> f64 {
        (y + 0.5) / 2.0
    }
}

pub mod link {
    //! Link functions for logistic regression
    use super::Logistic;
    use crate::link::Link;
    use statrs::function::erf::{erf_inv, erfc};
    use std::f64::consts::{FRAC_1_PI, PI, SQRT_2};

    /// The canonical logit link g(p) = log(p/(1-p)).
    pub struct Logit {}
    impl Link<Logistic<Logit>> for Logit {
        fn func(mean: f64) -> f64 {
            (mean / (1.0 - mean)).ln()
        }
        fn func_inv(lin_pred: f64) -> f64 {
            (1.0 + (-lin_pred).exp()).recip()
        }
        fn deriv(mean: f64) -> f64 {
            (mean * (1.0 - mean)).recip()
        }
    }

    /// The probit link maps the linear predictor through the standard normal
    /// distribution function.
    pub struct Probit {}
    impl Link<Logistic<Probit>> for Probit {
        fn func(mean: f64) -> f64 {
            SQRT_2 * erf_inv(2.0 * mean - 1.0)
        }
        fn func_inv(lin_pred: f64) -> f64 {
            0.5 * erfc(-lin_pred / SQRT_2)
        }
        /// 1 over the standard normal density at the linear predictor.
        fn deriv(mean: f64) -> f64 {
            let z = Self::func(mean);
            (2.0 * PI).sqrt() * (0.5 * z * z).exp()
        }
    }

    /// The cauchit link maps through the standard Cauchy distribution
    /// function; its heavy tails damp the influence of extreme predictors.
    pub struct Cauchit {}
    impl Link<Logistic<Cauchit>> for Cauchit {
        fn func(mean: f64) -> f64 {
            (PI * (mean - 0.5)).tan()
        }
        fn func_inv(lin_pred: f64) -> f64 {
            FRAC_1_PI * lin_pred.atan() + 0.5
        }
        fn deriv(mean: f64) -> f64 {
            let z = Self::func(mean);
            PI * (1.0 + z * z)
        }
    }

    /// The complementary log-log link g(p) = log(-log(1-p)) is appropriate
    /// when modeling the probability of non-zero counts when the counts are
    /// Poisson-distributed with mean lambda = exp(lin_pred).
    pub struct Cloglog {}
    impl Link<Logistic<Cloglog>> for Cloglog {
        fn func(mean: f64) -> f64 {
            (-f64::ln_1p(-mean)).ln()
        }
        // This quickly underflows to zero for inputs greater than ~2.
        fn func_inv(lin_pred: f64) -> f64 {
            -f64::exp_m1(-lin_pred.exp())
        }
        fn deriv(mean: f64) -> f64 {
            -((1.0 - mean) * f64::ln_1p(-mean)).recip()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::link::{Cauchit, Cloglog, Logit, Probit};
    use super::*;
    use approx::assert_abs_diff_eq;

    const MEANS: [f64; 7] = [0.01, 0.1, 0.3, 0.5, 0.7, 0.9, 0.99];

    // verify that each link and its inverse are indeed inverses.
    #[test]
    fn logit_closure() {
        for &mu in &MEANS {
            assert_abs_diff_eq!(mu, Logit::func_inv(Logit::func(mu)), epsilon = 1e-12);
        }
    }

    #[test]
    fn probit_closure() {
        for &mu in &MEANS {
            assert_abs_diff_eq!(mu, Probit::func_inv(Probit::func(mu)), epsilon = 1e-9);
        }
    }

    #[test]
    fn cauchit_closure() {
        for &mu in &MEANS {
            assert_abs_diff_eq!(mu, Cauchit::func_inv(Cauchit::func(mu)), epsilon = 1e-12);
        }
    }

    #[test]
    fn cloglog_closure() {
        for &mu in &MEANS {
            assert_abs_diff_eq!(mu, Cloglog::func_inv(Cloglog::func(mu)), epsilon = 1e-9);
        }
    }

    #[test]
    fn binary_deviance_vanishes_at_saturation() {
        assert_abs_diff_eq!(
            Logistic::<Logit>::deviance_term(1.0, 1.0 - 1e-12, 1.0),
            0.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            Logistic::<Logit>::deviance_term(0.0, 1e-12, 1.0),
            0.0,
            epsilon = 1e-9
        );
    }
}
