//! Compensation configuration records.
//!
//! Pay grades, allowances, tax rules and insurance brackets are authored and
//! approved by the payroll-configuration subsystem. The engine only reads
//! them, and only uses records whose status is [`ConfigStatus::Approved`].

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Approval status of a payroll-configuration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigStatus {
    /// Authored but not yet approved.
    Draft,
    /// Approved and usable for payroll.
    Approved,
    /// Rejected by the approver.
    Rejected,
}

impl fmt::Display for ConfigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigStatus::Draft => "DRAFT",
            ConfigStatus::Approved => "APPROVED",
            ConfigStatus::Rejected => "REJECTED",
        };
        f.write_str(label)
    }
}

/// A pay grade.
///
/// `gross_salary` is precomputed by payroll configuration and already
/// includes the grade's standard allowances on top of `base_salary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayGrade {
    /// Unique identifier.
    pub id: String,
    /// Grade label (e.g., "Senior Accountant").
    pub grade: String,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Monthly gross salary inclusive of standard allowances.
    pub gross_salary: Decimal,
    /// Approval status.
    pub status: ConfigStatus,
}

/// An ad-hoc allowance. Every approved allowance applies to every employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    /// Unique identifier.
    pub id: String,
    /// Allowance name (e.g., "Transportation").
    pub name: String,
    /// Flat monthly amount.
    pub amount: Decimal,
    /// Approval status.
    pub status: ConfigStatus,
}

/// A flat-rate tax rule applied to the full gross salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRule {
    /// Unique identifier.
    pub id: String,
    /// Rule name.
    pub name: String,
    /// Rate as a percentage (10 means 10%).
    pub rate: Decimal,
    /// Approval status.
    pub status: ConfigStatus,
}

/// A social/health insurance bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceBracket {
    /// Unique identifier.
    pub id: String,
    /// Bracket name.
    pub name: String,
    /// Lowest gross salary the bracket covers (inclusive).
    pub min_salary: Decimal,
    /// Highest gross salary the bracket covers (inclusive).
    pub max_salary: Decimal,
    /// Employee contribution as a percentage of gross.
    pub employee_rate: Decimal,
    /// Employer contribution as a percentage of gross.
    pub employer_rate: Decimal,
    /// Approval status.
    pub status: ConfigStatus,
}

impl InsuranceBracket {
    /// Returns true if `gross_salary` falls within `[min_salary, max_salary]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{ConfigStatus, InsuranceBracket};
    /// use rust_decimal::Decimal;
    ///
    /// let bracket = InsuranceBracket {
    ///     id: "ins_1".to_string(),
    ///     name: "Social insurance".to_string(),
    ///     min_salary: Decimal::ZERO,
    ///     max_salary: Decimal::from(10000),
    ///     employee_rate: Decimal::from(5),
    ///     employer_rate: Decimal::from(10),
    ///     status: ConfigStatus::Approved,
    /// };
    /// assert!(bracket.applies_to(Decimal::from(10000)));
    /// assert!(!bracket.applies_to(Decimal::from(10001)));
    /// ```
    pub fn applies_to(&self, gross_salary: Decimal) -> bool {
        gross_salary >= self.min_salary && gross_salary <= self.max_salary
    }
}
