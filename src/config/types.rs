//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Metadata about the engine deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMetadata {
    /// Human-readable engine name.
    pub name: String,
    /// The policy version in force.
    pub version: String,
    /// ISO currency code all amounts are expressed in.
    pub currency: String,
}

impl Default for EngineMetadata {
    fn default() -> Self {
        Self {
            name: "Payroll Run Engine".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            currency: "EGP".to_string(),
        }
    }
}

/// Constants that drive attendance penalties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyPolicy {
    /// Divisor turning a monthly net salary into a daily rate.
    pub standard_month_working_days: u32,
    /// Hours expected per attended working day (42 weekly hours / 5).
    pub standard_daily_hours: Decimal,
    /// Divisor turning a monthly net salary into an hourly rate.
    pub standard_month_hours: u32,
}

impl Default for PenaltyPolicy {
    fn default() -> Self {
        Self {
            standard_month_working_days: 22,
            standard_daily_hours: Decimal::new(84, 1),
            standard_month_hours: 210,
        }
    }
}

/// Penalty configuration file structure (`penalties.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct PenaltyConfig {
    /// The penalty constants.
    pub penalties: PenaltyPolicy,
}

/// The complete payroll policy loaded from YAML files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PayrollPolicy {
    /// Engine metadata.
    engine: EngineMetadata,
    /// Penalty constants.
    penalties: PenaltyPolicy,
}

impl PayrollPolicy {
    /// Creates a new PayrollPolicy from its component parts.
    pub fn new(engine: EngineMetadata, penalties: PenaltyPolicy) -> Self {
        Self { engine, penalties }
    }

    /// Returns the engine metadata.
    pub fn engine(&self) -> &EngineMetadata {
        &self.engine
    }

    /// Returns the penalty constants.
    pub fn penalties(&self) -> &PenaltyPolicy {
        &self.penalties
    }
}
