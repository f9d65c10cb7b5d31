//! test cases for logistic regression

use anyhow::Result;
use approx::assert_abs_diff_eq;
use formula_glm::logistic::link::{Cauchit, Cloglog, Probit};
use formula_glm::{DataFrame, Logistic, ModelBuilder, RegressionError};
use ndarray::array;

/// Group frequencies chosen so the maximum-likelihood solution is known
/// exactly: logit(1/2) = 0 at x = 0 and logit(2/3) = ln 2 at x = ln 2.
fn balanced_binary() -> Result<DataFrame> {
    let ln2 = f64::ln(2.0);
    Ok(DataFrame::new()
        .with_column("Y", vec![1.0, 0.0, 1.0, 1.0, 0.0])?
        .with_column("X", vec![0.0, 0.0, ln2, ln2, ln2])?)
}

/// A larger separable-ish dataset for the non-canonical links.
fn graded_binary() -> Result<DataFrame> {
    let x: Vec<f64> = (0..12).map(|i| (i as f64 - 5.5) / 2.0).collect();
    let y = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0];
    Ok(DataFrame::new().with_column("Y", y)?.with_column("X", x)?)
}

#[test]
fn logit_recovers_known_coefficients() -> Result<()> {
    let data = balanced_binary()?;
    let model = ModelBuilder::<Logistic>::formula("Y ~ X", &data).build()?;
    let fit = model.fit()?;
    assert_abs_diff_eq!(array![0.0, 1.0], fit.result, epsilon = 1e-6);
    Ok(())
}

#[test]
fn predictions_are_probabilities() -> Result<()> {
    let data = balanced_binary()?;
    let fit = ModelBuilder::<Logistic>::formula("Y ~ X", &data)
        .build()?
        .fit()?;
    let p = fit.predict(&data)?;
    assert!(p.iter().all(|&pi| (0.0..=1.0).contains(&pi)));
    assert_abs_diff_eq!(p[0], 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(p[2], 2.0 / 3.0, epsilon = 1e-6);
    Ok(())
}

#[test]
fn probit_link_fits() -> Result<()> {
    let data = graded_binary()?;
    let fit = ModelBuilder::<Logistic<Probit>>::formula("Y ~ X", &data)
        .build()?
        .fit()?;
    assert!(fit.result.iter().all(|b| b.is_finite()));
    // the response trends upward in x
    assert!(fit.result[1] > 0.0);
    let p = fit.predict(&data)?;
    assert!(p.iter().all(|&pi| (0.0..=1.0).contains(&pi)));
    Ok(())
}

#[test]
fn cauchit_link_fits() -> Result<()> {
    let data = graded_binary()?;
    let fit = ModelBuilder::<Logistic<Cauchit>>::formula("Y ~ X", &data)
        .build()?
        .fit()?;
    assert!(fit.result[1] > 0.0);
    Ok(())
}

#[test]
fn cloglog_link_fits() -> Result<()> {
    let data = graded_binary()?;
    let fit = ModelBuilder::<Logistic<Cloglog>>::formula("Y ~ X", &data)
        .build()?
        .fit()?;
    assert!(fit.result[1] > 0.0);
    Ok(())
}

#[test]
fn out_of_range_response_rejected() -> Result<()> {
    let data = DataFrame::new()
        .with_column("Y", vec![0.0, 2.0, 1.0])?
        .with_column("X", vec![0.0, 1.0, 2.0])?;
    let result = ModelBuilder::<Logistic>::formula("Y ~ X", &data).build();
    assert!(matches!(result, Err(RegressionError::InvalidY(_))));
    Ok(())
}
