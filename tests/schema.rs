//! Schema and formula failures surface before any solver or sampler runs

use anyhow::Result;
use formula_glm::{DataFrame, Linear, ModelBuilder, Prior, RegressionError};

mod common;
use common::noisy_linear;

#[test]
fn unknown_column_fails_at_build() -> Result<()> {
    let data = noisy_linear()?;
    let result = ModelBuilder::<Linear>::formula("Y ~ X1 + MISSING", &data).build();
    match result {
        Err(RegressionError::Schema(name)) => assert_eq!(name, "MISSING"),
        other => panic!("expected schema error, got {:?}", other.map(|_| ())),
    }
    Ok(())
}

#[test]
fn unknown_response_fails_at_build() -> Result<()> {
    let data = noisy_linear()?;
    let result = ModelBuilder::<Linear>::formula("Z ~ X1", &data).build();
    assert!(matches!(result, Err(RegressionError::Schema(_))));
    Ok(())
}

#[test]
fn bayes_path_never_reached_on_schema_error() -> Result<()> {
    // building fails, so there is no model to hand to the sampler at all;
    // the schema error precedes any draw
    let data = noisy_linear()?;
    let built = ModelBuilder::<Linear>::formula("Y ~ NOPE", &data).build();
    assert!(matches!(built, Err(RegressionError::Schema(_))));
    Ok(())
}

#[test]
fn prediction_data_needs_predictors_but_not_the_response() -> Result<()> {
    let data = noisy_linear()?;
    let fit = ModelBuilder::<Linear>::formula("Y ~ X1 + X2", &data)
        .build()?
        .fit()?;

    // the response column is not consulted for prediction
    let new = DataFrame::new()
        .with_column("X1", vec![0.5, 1.5])?
        .with_column("X2", vec![1.0, 0.0])?;
    assert_eq!(fit.predict(&new)?.len(), 2);

    // a missing predictor is a schema error
    let incomplete = DataFrame::new().with_column("X1", vec![0.5, 1.5])?;
    assert!(matches!(
        fit.predict(&incomplete),
        Err(RegressionError::Schema(_))
    ));
    Ok(())
}

#[test]
fn bayesian_prediction_checks_the_schema_too() -> Result<()> {
    let data = noisy_linear()?;
    let fit = ModelBuilder::<Linear>::formula("Y ~ X1 + X2", &data)
        .build()?
        .bayes(Prior::ridge())
        .sim_size(50)
        .warmup(50)
        .fit_seeded(1)?;
    let incomplete = DataFrame::new().with_column("X2", vec![0.5])?;
    assert!(matches!(
        fit.predict(&incomplete),
        Err(RegressionError::Schema(_))
    ));
    Ok(())
}

#[test]
fn malformed_formulas_are_syntax_errors() -> Result<()> {
    let data = noisy_linear()?;
    for formula in ["Y X1", "Y ~ X1 ~ X2", " ~ X1"] {
        let result = ModelBuilder::<Linear>::formula(formula, &data).build();
        assert!(
            matches!(result, Err(RegressionError::FormulaSyntax(_))),
            "'{}' should not parse",
            formula
        );
    }
    Ok(())
}
