//! test cases for linear regression

use anyhow::Result;
use approx::assert_abs_diff_eq;
use formula_glm::{Linear, ModelBuilder};
use ndarray::array;

mod common;
use common::{exact_linear, noisy_linear};

#[test]
fn ols_recovers_known_coefficients() -> Result<()> {
    let data = exact_linear()?;
    let model = ModelBuilder::<Linear>::formula("Y ~ X1 + X2", &data).build()?;
    let fit = model.fit()?;
    assert_eq!(fit.coefficients().len(), 3);
    assert_abs_diff_eq!(array![1.0, 2.0, -1.0], fit.result, epsilon = 1e-8);
    Ok(())
}

#[test]
fn prediction_on_training_data_equals_fitted_values() -> Result<()> {
    let data = noisy_linear()?;
    let model = ModelBuilder::<Linear>::formula("Y ~ X1 + X2", &data).build()?;
    let fit = model.fit()?;
    let predicted = fit.predict(&data)?;
    assert_abs_diff_eq!(predicted, *fit.fitted_values(), epsilon = 1e-12);
    Ok(())
}

#[test]
fn getters_are_pure() -> Result<()> {
    let data = noisy_linear()?;
    let fit = ModelBuilder::<Linear>::formula("Y ~ X1 + X2", &data)
        .build()?
        .fit()?;
    assert_eq!(fit.aic(), fit.aic());
    assert_eq!(fit.bic(), fit.bic());
    assert_eq!(fit.log_likelihood(), fit.log_likelihood());
    assert_abs_diff_eq!(fit.residuals(), fit.residuals());
    let first = fit.coef_table()?;
    let second = fit.coef_table()?;
    assert_abs_diff_eq!(first.estimate, second.estimate);
    assert_abs_diff_eq!(first.p_value, second.p_value);
    Ok(())
}

#[test]
fn exact_fit_diagnostics() -> Result<()> {
    let data = exact_linear()?;
    let fit = ModelBuilder::<Linear>::formula("Y ~ X1 + X2", &data)
        .build()?
        .fit()?;
    assert_abs_diff_eq!(fit.r_squared(), 1.0, epsilon = 1e-10);
    assert_abs_diff_eq!(fit.deviance(), 0.0, epsilon = 1e-16);
    assert_abs_diff_eq!(fit.residual_std_error(), 0.0, epsilon = 1e-8);
    Ok(())
}

#[test]
fn noisy_fit_diagnostics_are_sane() -> Result<()> {
    let data = noisy_linear()?;
    let fit = ModelBuilder::<Linear>::formula("Y ~ X1 + X2", &data)
        .build()?
        .fit()?;
    let r2 = fit.r_squared();
    assert!(r2 > 0.9 && r2 < 1.0, "r2 = {}", r2);
    assert!(fit.adj_r_squared() < r2);
    assert!(fit.aic().is_finite());
    assert!(fit.bic() > fit.aic() - 10.0);
    assert!(fit.residual_std_error() > 0.0);

    let cooks = fit.cooks_distance();
    assert_eq!(cooks.len(), data.n_rows());
    assert!(cooks.iter().all(|&d| d.is_finite() && d >= 0.0));

    let table = fit.coef_table()?;
    assert_eq!(table.names.len(), 3);
    assert!(table.std_err.iter().all(|&se| se > 0.0));
    assert!(table.p_value.iter().all(|&p| (0.0..=1.0).contains(&p)));
    // the slopes are strong signals against these tiny residuals
    assert!(table.p_value[1] < 0.001);
    Ok(())
}

#[test]
fn display_of_coefficient_table_mentions_terms() -> Result<()> {
    let data = noisy_linear()?;
    let fit = ModelBuilder::<Linear>::formula("Y ~ X1 + X2", &data)
        .build()?
        .fit()?;
    let rendered = fit.coef_table()?.to_string();
    assert!(rendered.contains("(Intercept)"));
    assert!(rendered.contains("X1"));
    Ok(())
}
