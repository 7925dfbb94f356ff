use figment::{error::Kind, providers::Env, Figment};
use serde::{Deserialize, Serialize};
use snafu::Snafu;
use tracing::debug;

use crate::{default_max_ulps, is_close_relative, BitLayout, UlpComparator, DBL_DEFAULT_TEST_TOLERANCE};

/// An error loading a [`ComparisonConfiguration`].
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)))]
pub enum ConfigurationError {
    /// No prefix was given to scope the tolerance environment variables.
    #[snafu(display("Tolerance environment variables need a non-empty prefix."))]
    EmptyPrefix,

    /// Relative tolerance was negative, or not a finite number.
    #[snafu(display("Relative tolerance must be a finite, non-negative number, got '{}'.", value))]
    InvalidRelativeTolerance {
        /// The rejected value.
        value: f64,
    },

    /// A tolerance could not be read as the type it is declared with.
    #[snafu(display(
        "Tolerance '{}' should be of type '{}', but was given a value of type '{}'.",
        field,
        expected_ty,
        actual_ty
    ))]
    InvalidFieldType {
        /// Dotted path of the tolerance, such as `max_ulps`.
        field: String,

        /// Type the tolerance is declared with.
        expected_ty: String,

        /// Type of the value that was supplied.
        actual_ty: String,
    },

    /// The tolerance source itself could not be read.
    #[snafu(display("Failed to read comparison tolerances."))]
    Generic {
        /// Underlying `figment` error.
        source: Box<figment::Error>,
    },
}

impl From<figment::Error> for ConfigurationError {
    fn from(error: figment::Error) -> Self {
        if let Kind::InvalidType(actual, expected_ty) = &error.kind {
            return Self::InvalidFieldType {
                field: error.path.join("."),
                expected_ty: expected_ty.clone(),
                actual_ty: actual.to_string(),
            };
        }

        Self::Generic {
            source: Box::new(error),
        }
    }
}

/// Tolerances used when comparing floating-point numbers.
///
/// Test suites can tune how strict their comparisons are without code changes, by loading this configuration from the
/// environment:
///
/// - `max_ulps`: number of ULPs tolerated by ULP-based comparisons (optional, default: the default of the compared type)
/// - `relative_tolerance`: tolerance used by relative comparisons (optional, default:
///   [`DBL_DEFAULT_TEST_TOLERANCE`])
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ComparisonConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_ulps: Option<u64>,
    relative_tolerance: f64,
}

impl ComparisonConfiguration {
    /// Creates a new `ComparisonConfiguration` with the given tolerances.
    ///
    /// # Errors
    ///
    /// If `relative_tolerance` is negative or not finite, an error will be returned.
    pub fn new(max_ulps: Option<u64>, relative_tolerance: f64) -> Result<Self, ConfigurationError> {
        let config = Self {
            max_ulps,
            relative_tolerance,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from the given `Figment`.
    ///
    /// Missing fields take their default value.
    ///
    /// # Errors
    ///
    /// If a field has the wrong type, or the relative tolerance is invalid, an error will be returned.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigurationError> {
        let config = figment.extract::<Self>()?;
        config.validate()?;

        debug!(
            max_ulps = ?config.max_ulps,
            relative_tolerance = config.relative_tolerance,
            "Loaded floating-point comparison configuration."
        );

        Ok(config)
    }

    /// Loads the configuration from environment variables with the given prefix.
    ///
    /// The prefix is separated from the field name by an underscore, which is added if the prefix does not already end
    /// with one: with a prefix of `FLOAT_ULPS`, the `max_ulps` field is read from `FLOAT_ULPS_MAX_ULPS`.
    ///
    /// # Errors
    ///
    /// If the prefix is empty, a field has the wrong type, or the relative tolerance is invalid, an error will be
    /// returned.
    pub fn from_environment(prefix: &str) -> Result<Self, ConfigurationError> {
        if prefix.is_empty() {
            return Err(ConfigurationError::EmptyPrefix);
        }

        let prefix = if prefix.ends_with('_') {
            prefix.to_string()
        } else {
            format!("{}_", prefix)
        };

        debug!(prefix = %prefix, "Loading floating-point comparison configuration from environment.");
        Self::from_figment(&Figment::new().merge(Env::prefixed(&prefix)))
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.relative_tolerance.is_finite() || self.relative_tolerance < 0.0 {
            return Err(ConfigurationError::InvalidRelativeTolerance {
                value: self.relative_tolerance,
            });
        }
        Ok(())
    }

    /// Returns the configured number of ULPs to tolerate, if any.
    pub fn max_ulps(&self) -> Option<u64> {
        self.max_ulps
    }

    /// Returns the number of ULPs to tolerate when comparing numbers of type `F`.
    ///
    /// Falls back to the default of `F` when not configured.
    pub fn max_ulps_for<F: BitLayout>(&self) -> u64 {
        self.max_ulps.unwrap_or(default_max_ulps::<F>())
    }

    /// Returns the relative tolerance.
    pub fn relative_tolerance(&self) -> f64 {
        self.relative_tolerance
    }

    /// Creates a ULP-based comparator for numbers of type `F` using the configured tolerance.
    pub fn comparator<F: BitLayout>(&self) -> UlpComparator<F> {
        UlpComparator::new(self.max_ulps_for::<F>())
    }

    /// Returns `true` if `x` and `y` are equal within the configured relative tolerance.
    pub fn is_close(&self, x: f64, y: f64) -> bool {
        is_close_relative(x, y, self.relative_tolerance)
    }
}

impl Default for ComparisonConfiguration {
    fn default() -> Self {
        Self {
            max_ulps: None,
            relative_tolerance: DBL_DEFAULT_TEST_TOLERANCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use figment::{providers::Serialized, Jail};

    use super::*;

    #[test]
    fn defaults() {
        let config = ComparisonConfiguration::default();
        assert_eq!(config.max_ulps(), None);
        assert_eq!(config.max_ulps_for::<f64>(), 10);
        assert_eq!(config.max_ulps_for::<f32>(), 10);
        assert_eq!(config.relative_tolerance(), DBL_DEFAULT_TEST_TOLERANCE);
        assert_eq!(config.comparator::<f64>(), UlpComparator::default());
    }

    #[test]
    fn new_rejects_invalid_relative_tolerance() {
        for value in [-1.0e-6, f64::NAN, f64::INFINITY] {
            let result = ComparisonConfiguration::new(None, value);
            assert!(matches!(result, Err(ConfigurationError::InvalidRelativeTolerance { .. })));
        }

        assert!(ComparisonConfiguration::new(Some(4), 0.0).is_ok());
    }

    #[test]
    fn from_figment() {
        let source = ComparisonConfiguration {
            max_ulps: Some(4),
            relative_tolerance: 1.0e-6,
        };
        let figment = Figment::from(Serialized::defaults(source));

        let config = ComparisonConfiguration::from_figment(&figment).unwrap();
        assert_eq!(config, source);
        assert_eq!(config.comparator::<f32>().max_ulps(), 4);
        assert!(config.is_close(1.0, 1.0 + 1.0e-7));
    }

    #[test]
    fn from_figment_rejects_negative_relative_tolerance() {
        let source = ComparisonConfiguration {
            max_ulps: None,
            relative_tolerance: -0.5,
        };
        let figment = Figment::from(Serialized::defaults(source));

        let result = ComparisonConfiguration::from_figment(&figment);
        assert!(matches!(result, Err(ConfigurationError::InvalidRelativeTolerance { .. })));
    }

    #[test]
    fn from_environment_empty_prefix() {
        let result = ComparisonConfiguration::from_environment("");
        assert!(matches!(result, Err(ConfigurationError::EmptyPrefix)));
    }

    #[test]
    fn from_environment() {
        Jail::expect_with(|jail| {
            jail.set_env("FLOAT_ULPS_MAX_ULPS", "4");
            jail.set_env("FLOAT_ULPS_RELATIVE_TOLERANCE", "0.001");

            let config = ComparisonConfiguration::from_environment("FLOAT_ULPS").map_err(|e| e.to_string())?;
            assert_eq!(config.max_ulps(), Some(4));
            assert_eq!(config.relative_tolerance(), 0.001);

            // A trailing underscore in the prefix is not doubled.
            let config = ComparisonConfiguration::from_environment("FLOAT_ULPS_").map_err(|e| e.to_string())?;
            assert_eq!(config.max_ulps(), Some(4));

            Ok(())
        });
    }

    #[test]
    fn from_environment_missing_values() {
        Jail::expect_with(|_| {
            let config = ComparisonConfiguration::from_environment("FLOAT_ULPS_UNSET").map_err(|e| e.to_string())?;
            assert_eq!(config, ComparisonConfiguration::default());
            Ok(())
        });
    }

    #[test]
    fn from_environment_invalid_type() {
        Jail::expect_with(|jail| {
            jail.set_env("FLOAT_ULPS_MAX_ULPS", "plenty");

            let result = ComparisonConfiguration::from_environment("FLOAT_ULPS");
            assert!(matches!(result, Err(ConfigurationError::InvalidFieldType { .. })));
            Ok(())
        });
    }
}
