//! test cases for negative binomial regression

use anyhow::Result;
use formula_glm::{ModelBuilder, NegativeBinomial, RegressionError};

mod common;
use common::{overdispersed_counts, underdispersed_counts};

#[test]
fn overdispersed_counts_fit() -> Result<()> {
    let data = overdispersed_counts()?;
    let model = ModelBuilder::<NegativeBinomial>::formula("Y ~ X", &data).build()?;
    let fit = model.fit()?;
    assert!(fit.result.iter().all(|b| b.is_finite()));
    // group means double with each step of x
    let slope = fit.result[1];
    assert!(
        (slope - f64::ln(2.0)).abs() < 0.5,
        "slope {} far from ln 2",
        slope
    );
    assert!(fit.fitted_values().iter().all(|&m| m > 0.0));
    assert!(fit.aic().is_finite());
    Ok(())
}

#[test]
fn coefficient_table_has_wald_tests() -> Result<()> {
    let data = overdispersed_counts()?;
    let fit = ModelBuilder::<NegativeBinomial>::formula("Y ~ X", &data)
        .build()?
        .fit()?;
    let table = fit.coef_table()?;
    assert_eq!(table.names, vec!["(Intercept)", "X"]);
    assert!(table.std_err.iter().all(|&se| se > 0.0));
    Ok(())
}

#[test]
fn underdispersed_counts_rejected() -> Result<()> {
    let data = underdispersed_counts()?;
    let model = ModelBuilder::<NegativeBinomial>::formula("Y ~ X", &data).build()?;
    // the shape pre-estimate fails loudly instead of degrading to Poisson
    let result = model.fit();
    assert!(matches!(result, Err(RegressionError::BadInput(_))));
    Ok(())
}
