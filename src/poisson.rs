//! Model for Poisson regression

use crate::glm::{DispersionType, Glm};
use crate::link::Link;
use crate::math::prod_log;
use statrs::function::gamma::ln_gamma;
use std::marker::PhantomData;

/// Poisson regression over counts, with the log as its canonical link.
pub struct Poisson<L = link::Log>
where
    L: Link<Poisson<L>>,
{
    _link: PhantomData<L>,
}

impl<L> Glm for Poisson<L>
where
    L: Link<Poisson<L>>,
{
    type Link = L;
    const DISPERSED: DispersionType = DispersionType::NoDispersion;
    const NAME: &'static str = "poisson";

    /// Counts must be non-negative integers.
    fn valid_response(y: f64) -> bool {
        y.is_finite() && y >= 0.0 && y.fract() == 0.0
    }

    /// The variance of a Poisson variable is equal to its mean.
    fn variance(mean: f64, _aux: f64) -> f64 {
        mean
    }

    fn log_like_term(y: f64, mean: f64, _scale: f64) -> f64 {
        y * mean.ln() - mean - ln_gamma(y + 1.0)
    }

    /// 2·(y·log(y/μ) − (y − μ)), with the y = 0 limit handled by `prod_log`.
    fn deviance_term(y: f64, mean: f64, _aux: f64) -> f64 {
        2.0 * (prod_log(y) - y * mean.ln() - y + mean)
    }

    fn clamp_mean(mean: f64) -> f64 {
        mean.max(1e-10)
    }

    /// Offset from zero so the log link has a finite starting point.
    fn initial_mean(y: f64) -> f64 {
        y + 0.5
    }
}

pub mod link {
    //! Link functions for Poisson regression
    use super::Poisson;
    use crate::link::Link;

    /// The canonical link function of the Poisson response is the logarithm.
    pub struct Log {}
    impl Link<Poisson<Log>> for Log {
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
    fn log_like_matches_poisson_mass() {
        // ln P(Y=3 | λ=2) = 3 ln 2 − 2 − ln 3!
        let expected = 3.0 * f64::ln(2.0) - 2.0 - f64::ln(6.0);
        assert_abs_diff_eq!(
            Poisson::<link::Log>::log_like_term(3.0, 2.0, 1.0),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn deviance_vanishes_at_saturation() {
        for &y in &[0.0, 1.0, 4.0] {
            let mu = if y == 0.0 { 1e-12 } else { y };
            assert_abs_diff_eq!(
                Poisson::<link::Log>::deviance_term(y, mu, 1.0),
                0.0,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn domain_check() {
        assert!(Poisson::<link::Log>::valid_response(0.0));
        assert!(Poisson::<link::Log>::valid_response(7.0));
        assert!(!Poisson::<link::Log>::valid_response(-1.0));
        assert!(!Poisson::<link::Log>::valid_response(2.5));
    }
}
