//! define the error enum for the result of regressions

use thiserror::Error;

/// Convenience alias for results of fitting and prediction operations.
pub type RegressionResult<T> = Result<T, RegressionError>;

#[derive(Error, Debug)]
pub enum RegressionError {
    /// The formula string itself could not be parsed.
    #[error("Invalid formula: {0}")]
    FormulaSyntax(String),
    /// The formula references a column that the data does not provide.
    #[error("Column '{0}' is not present in the data")]
    Schema(String),
    #[error("Inconsistent input: {0}")]
    BadInput(String),
    /// A response value lies outside the domain of the model family.
    #[error("Invalid response value: {0}")]
    InvalidY(String),
    #[error("Colinear data")]
    ColinearData,
    #[error("Underconstrained data")]
    Underconstrained,
    /// The iteration limit was reached before the deviance stabilized.
    #[error("Reached maximum of {0} iterations without converging")]
    MaxIter(usize),
    /// The weighted normal equations could not be solved.
    #[error("Singular system in weighted least squares: {0}")]
    Singular(String),
    /// The posterior sampler failed; never retried or masked.
    #[error("Sampler failure: {0}")]
    Sampler(String),
    /// Invalid parameters handed to a distribution, surfaced as-is.
    #[error("Distribution error")]
    Distribution {
        #[from]
        source: statrs::StatsError,
    },
}
