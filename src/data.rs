//! A minimal tabular container with named numeric columns.
//!
//! Formulas resolve their variable names against a [`DataFrame`]; a name with
//! no matching column is a schema error, raised before any fitting work
//! starts.

use crate::error::{RegressionError, RegressionResult};
use ndarray::Array1;

/// Column-oriented table of `f64` observations. All columns have the same
/// length; rows are observations.
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Array1<f64>>,
}

impl DataFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named column, consuming and returning the frame so calls can
    /// be chained. Fails on a duplicate name or a length mismatch with the
    /// columns already present.
    pub fn with_column<C>(mut self, name: &str, values: C) -> RegressionResult<Self>
    where
        C: Into<Array1<f64>>,
    {
        let values = values.into();
        if self.names.iter().any(|n| n == name) {
            return Err(RegressionError::BadInput(format!(
                "column '{}' given twice",
                name
            )));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != values.len() {
                return Err(RegressionError::BadInput(format!(
                    "column '{}' has {} rows but the data has {}",
                    name,
                    values.len(),
                    first.len()
                )));
            }
        }
        self.names.push(name.to_string());
        self.columns.push(values);
        Ok(self)
    }

    /// Number of observations (rows).
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Look a column up by name. The error names the missing column so that
    /// formula mismatches are directly actionable.
    pub fn column(&self, name: &str) -> RegressionResult<&Array1<f64>> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| RegressionError::Schema(name.to_string()))
    }
}
