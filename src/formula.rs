//! R-style model formulas and their expansion into design matrices.
//!
//! A formula names a response column and a sum of predictor terms, e.g.
//! `"y ~ x1 + x2 + x1:x2"`. Supported syntax:
//! - main effects: `x1 + x2`
//! - pure interactions: `x1:x2` (the elementwise product column)
//! - crossed terms: `x1*x2`, shorthand for `x1 + x2 + x1:x2`
//! - intercept removal: `y ~ 0 + x` or `y ~ x - 1`
//!
//! Matrices are materialized fresh from (formula, data) on every call; no
//! expansion is ever cached, so a fit and a later prediction always see the
//! data they were handed.

use crate::data::DataFrame;
use crate::error::{RegressionError, RegressionResult};
use ndarray::{Array1, Array2};
use std::str::FromStr;

/// Name given to the constant column in coefficient tables.
pub const INTERCEPT_NAME: &str = "(Intercept)";

#[derive(Debug, Clone, PartialEq)]
enum Term {
    Main(String),
    Interaction(Vec<String>),
}

impl Term {
    fn label(&self) -> String {
        match self {
            Term::Main(name) => name.clone(),
            Term::Interaction(factors) => factors.join(":"),
        }
    }
}

/// A parsed model formula: a response column name, predictor terms, and an
/// intercept flag. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    response: String,
    terms: Vec<Term>,
    intercept: bool,
}

impl FromStr for Formula {
    type Err = RegressionError;

    fn from_str(formula: &str) -> RegressionResult<Self> {
        let mut sides = formula.split('~');
        let lhs = sides.next().unwrap_or_default().trim();
        let rhs = match (sides.next(), sides.next()) {
            (Some(rhs), None) => rhs.trim(),
            _ => {
                return Err(RegressionError::FormulaSyntax(format!(
                    "expected exactly one '~' in '{}'",
                    formula
                )))
            }
        };
        if lhs.is_empty() {
            return Err(RegressionError::FormulaSyntax(
                "missing response on the left of '~'".to_string(),
            ));
        }

        let (rhs, intercept) = strip_intercept_markers(rhs);
        let mut terms: Vec<Term> = Vec::new();
        for raw in rhs.split('+') {
            let raw = raw.trim();
            if raw.is_empty() || raw == "1" {
                continue;
            }
            if raw.contains('*') {
                // a*b expands to the main effects plus the full interaction
                let factors = split_factors(raw, '*')?;
                for f in &factors {
                    push_unique(&mut terms, Term::Main(f.clone()));
                }
                push_unique(&mut terms, Term::Interaction(factors));
            } else if raw.contains(':') {
                push_unique(&mut terms, Term::Interaction(split_factors(raw, ':')?));
            } else {
                push_unique(&mut terms, Term::Main(raw.to_string()));
            }
        }
        if terms.is_empty() && !intercept {
            return Err(RegressionError::FormulaSyntax(format!(
                "no predictor terms in '{}'",
                formula
            )));
        }

        Ok(Formula {
            response: lhs.to_string(),
            terms,
            intercept,
        })
    }
}

impl Formula {
    /// Parse a formula string; equivalent to `str::parse`.
    pub fn parse(formula: &str) -> RegressionResult<Self> {
        formula.parse()
    }

    /// The name of the response column.
    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn has_intercept(&self) -> bool {
        self.intercept
    }

    /// Labels of the design-matrix columns, intercept first when present.
    pub fn term_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.terms.len() + 1);
        if self.intercept {
            names.push(INTERCEPT_NAME.to_string());
        }
        names.extend(self.terms.iter().map(Term::label));
        names
    }

    /// Materialize the response vector from the data.
    pub fn response_vector(&self, data: &DataFrame) -> RegressionResult<Array1<f64>> {
        Ok(data.column(&self.response)?.clone())
    }

    /// Materialize the predictor matrix from the data, one row per
    /// observation and one column per term (plus a leading constant column
    /// when the formula keeps its intercept). The response column is not
    /// consulted, so prediction data need not carry it.
    pub fn design_matrix(&self, data: &DataFrame) -> RegressionResult<Array2<f64>> {
        let n = data.n_rows();
        let offset = usize::from(self.intercept);
        let mut x = Array2::<f64>::zeros((n, self.terms.len() + offset));
        if self.intercept {
            x.column_mut(0).fill(1.0);
        }
        for (j, term) in self.terms.iter().enumerate() {
            let mut col = x.column_mut(j + offset);
            match term {
                Term::Main(name) => col.assign(data.column(name)?),
                Term::Interaction(factors) => {
                    let mut product = Array1::<f64>::ones(n);
                    for name in factors {
                        product = &product * data.column(name)?;
                    }
                    col.assign(&product);
                }
            }
        }
        Ok(x)
    }

    /// Expand both sides at once: `(y, X)`.
    pub fn expand(&self, data: &DataFrame) -> RegressionResult<(Array1<f64>, Array2<f64>)> {
        Ok((self.response_vector(data)?, self.design_matrix(data)?))
    }
}

fn push_unique(terms: &mut Vec<Term>, term: Term) {
    if !terms.contains(&term) {
        terms.push(term);
    }
}

fn split_factors(term: &str, sep: char) -> RegressionResult<Vec<String>> {
    let factors: Vec<String> = term
        .split(sep)
        .map(|f| f.trim().to_string())
        .collect();
    if factors.iter().any(String::is_empty) {
        return Err(RegressionError::FormulaSyntax(format!(
            "empty factor in term '{}'",
            term
        )));
    }
    Ok(factors)
}

/// Handle the `0 + ...` prefix and `... - 1` suffix forms of intercept
/// removal, returning the remaining right-hand side.
fn strip_intercept_markers(rhs: &str) -> (String, bool) {
    let mut rhs = rhs.trim().to_string();
    let mut intercept = true;
    if let Some(rest) = rhs.strip_prefix("0 +").or_else(|| rhs.strip_prefix("0+")) {
        intercept = false;
        rhs = rest.trim().to_string();
    }
    if let Some(rest) = rhs.strip_suffix("- 1").or_else(|| rhs.strip_suffix("-1")) {
        intercept = false;
        rhs = rest.trim().trim_end_matches('+').trim().to_string();
    }
    (rhs, intercept)
}
