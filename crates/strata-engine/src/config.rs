//! Estimator configuration.
//!
//! The coefficients used when a predicate gives the estimator nothing to
//! work with. Loaded with serde; missing fields take their defaults.

use serde::{Deserialize, Serialize};
use strata_common::utils::error::{Error, Result};

/// Coefficients applied by the estimators' fallback branches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Fraction of rows kept by a predicate the estimator cannot analyze.
    pub unknown_filter_coefficient: f64,
    /// Selectivity of a range comparison over a column with unknown bounds.
    pub default_range_selectivity: f64,
    /// Fraction of source rows kept by a semi-join.
    pub semi_join_coefficient: f64,
}

impl EstimatorConfig {
    /// Creates a configuration with default coefficients.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the unknown-predicate coefficient.
    pub fn with_unknown_filter_coefficient(mut self, coefficient: f64) -> Self {
        self.unknown_filter_coefficient = coefficient;
        self
    }

    /// Sets the range selectivity used when bounds are unknown.
    pub fn with_default_range_selectivity(mut self, selectivity: f64) -> Self {
        self.default_range_selectivity = selectivity;
        self
    }

    /// Sets the semi-join coefficient.
    pub fn with_semi_join_coefficient(mut self, coefficient: f64) -> Self {
        self.semi_join_coefficient = coefficient;
        self
    }

    /// Checks that every coefficient is a fraction.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("unknown_filter_coefficient", self.unknown_filter_coefficient),
            ("default_range_selectivity", self.default_range_selectivity),
            ("semi_join_coefficient", self.semi_join_coefficient),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            unknown_filter_coefficient: 0.5,
            default_range_selectivity: 0.5,
            semi_join_coefficient: 0.5,
        }
    }
}
