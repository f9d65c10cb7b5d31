//! Linear regression with constant variance

use crate::glm::{DispersionType, Glm};
use crate::link::Link;
use std::f64::consts::PI;
use std::marker::PhantomData;

/// Linear regression over a Gaussian response. Only the identity link is
/// defined for this family.
pub struct Linear<L = link::Id>
where
    L: Link<Linear<L>>,
{
    _link: PhantomData<L>,
}

impl<L> Glm for Linear<L>
where
    L: Link<Linear<L>>,
{
    type Link = L;
    const DISPERSED: DispersionType = DispersionType::FreeDispersion;
    const NAME: &'static str = "linear";
    const HAS_SCALE: bool = true;
    const SCALE_NAME: &'static str = "sigma";

    fn valid_response(y: f64) -> bool {
        y.is_finite()
    }

    /// The variance is not a function of the mean in ordinary least squares.
    fn variance(_mean: f64, _aux: f64) -> f64 {
        1.0
    }

    /// Gaussian density with noise standard deviation `scale`.
    fn log_like_term(y: f64, mean: f64, scale: f64) -> f64 {
        let z = (y - mean) / scale;
        -0.5 * (2.0 * PI).ln() - scale.ln() - 0.5 * z * z
    }

    /// The squared error is the Gaussian deviance contribution.
    fn deviance_term(y: f64, mean: f64, _aux: f64) -> f64 {
        (y - mean) * (y - mean)
    }
}

pub mod link {
    //! Link functions for linear regression
    use super::Linear;
    use crate::link::Link;

    /// The identity link function, canonical for linear regression.
    pub struct Id;
    impl Link<Linear<Id>> for Id {
        fn func(mean: f64) -> f64 {
            mean
        }
        fn func_inv(lin_pred: f64) -> f64 {
            lin_pred
        }
        fn deriv(_mean: f64) -> f64 {
            1.0
        }
    }
}
