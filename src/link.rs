//! Defines the trait for link functions

use crate::glm::Glm;

/// Connects the linear predictor to the expectation of the response. A link
/// is a zero-sized marker type implemented for the model families it is
/// valid for; pairing a link with a family it does not support is therefore
/// rejected when the model type is written down, not at run time.
pub trait Link<M: Glm>: 'static {
    /// Map the expectation of the response to the linear predictor scale.
    fn func(mean: f64) -> f64;
    /// Map the linear predictor to the expectation of the response.
    fn func_inv(lin_pred: f64) -> f64;
    /// The derivative dη/dμ of the link at the given mean. Feeds the working
    /// weights and the working response of the IRLS update.
    fn deriv(mean: f64) -> f64;
}
