//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! policy from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineMetadata, PayrollPolicy, PenaltyConfig, PenaltyPolicy};

/// Loads and provides access to the payroll policy.
///
/// # Directory Structure
///
/// ```text
/// config/payroll/
/// ├── engine.yaml      # Engine metadata (name, version, currency)
/// └── penalties.yaml   # Attendance penalty constants
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll").unwrap();
/// println!("Daily hours: {}", loader.penalties().standard_daily_hours);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    policy: PayrollPolicy,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing or contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine = Self::load_yaml::<EngineMetadata>(&path.join("engine.yaml"))?;
        let penalties = Self::load_yaml::<PenaltyConfig>(&path.join("penalties.yaml"))?;
        Self::validate(&path.join("penalties.yaml"), &penalties.penalties)?;

        Ok(Self {
            policy: PayrollPolicy::new(engine, penalties.penalties),
        })
    }

    /// Wraps an already-built policy.
    pub fn from_policy(policy: PayrollPolicy) -> Self {
        Self { policy }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Divisors of zero would turn every penalty into a division error.
    fn validate(path: &Path, penalties: &PenaltyPolicy) -> EngineResult<()> {
        if penalties.standard_month_working_days == 0 || penalties.standard_month_hours == 0 {
            return Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: "standard month divisors must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the underlying payroll policy.
    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }

    /// Returns the engine metadata.
    pub fn engine(&self) -> &EngineMetadata {
        self.policy.engine()
    }

    /// Returns the penalty constants.
    pub fn penalties(&self) -> &PenaltyPolicy {
        self.policy.penalties()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/payroll"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.engine().name, "Payroll Run Engine");
        assert_eq!(loader.engine().currency, "EGP");
    }

    #[test]
    fn test_penalty_constants_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert_eq!(loader.penalties().standard_month_working_days, 22);
        assert_eq!(loader.penalties().standard_daily_hours, dec("8.4"));
        assert_eq!(loader.penalties().standard_month_hours, 210);
    }

    #[test]
    fn test_loaded_penalties_match_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.penalties(), &PenaltyPolicy::default());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("engine.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_zero_divisor_is_rejected() {
        let penalties = PenaltyPolicy {
            standard_month_working_days: 0,
            ..PenaltyPolicy::default()
        };
        let result = ConfigLoader::validate(Path::new("penalties.yaml"), &penalties);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }
}
