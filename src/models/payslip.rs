//! Payslip model: the itemized gross-to-net breakdown for one employee.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditStep, PaymentStatus};

/// A named amount on a payslip (allowance, bonus, benefit, refund).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipLine {
    /// Display name. Unique within its list.
    pub name: String,
    /// Amount.
    pub amount: Decimal,
}

/// One tax rule's contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxDeduction {
    /// The tax rule applied.
    pub rule_id: String,
    /// Rule name.
    pub name: String,
    /// Rate as a percentage.
    pub rate: Decimal,
    /// `gross × rate / 100`.
    pub amount: Decimal,
}

/// One insurance bracket's contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceContribution {
    /// The bracket applied.
    pub bracket_id: String,
    /// Bracket name.
    pub name: String,
    /// Employee rate as a percentage.
    pub employee_rate: Decimal,
    /// Employer rate as a percentage.
    pub employer_rate: Decimal,
    /// Deducted from the employee.
    pub employee_amount: Decimal,
    /// Paid by the employer; informational.
    pub employer_amount: Decimal,
}

/// Earnings side of a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earnings {
    /// Pay grade base salary.
    pub base_salary: Decimal,
    /// Approved ad-hoc allowances.
    pub allowances: Vec<PayslipLine>,
    /// Signing bonuses.
    pub bonuses: Vec<PayslipLine>,
    /// Termination benefits.
    pub benefits: Vec<PayslipLine>,
    /// Pending refunds.
    pub refunds: Vec<PayslipLine>,
}

/// Deductions side of a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    /// Tax rule contributions.
    pub taxes: Vec<TaxDeduction>,
    /// Insurance contributions.
    pub insurances: Vec<InsuranceContribution>,
    /// Attendance penalty reasons (e.g., "Missing 2 days").
    pub penalty_reasons: Vec<String>,
    /// Total attendance penalty.
    pub penalty_amount: Decimal,
}

/// The itemized payslip for one employee in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// Unique identifier.
    pub id: Uuid,
    /// The run this payslip belongs to.
    pub run_id: Uuid,
    /// The employee.
    pub employee_id: String,
    /// Earnings breakdown.
    pub earnings: Earnings,
    /// Deductions breakdown.
    pub deductions: Deductions,
    /// Gross salary (base plus all allowances).
    pub total_gross_salary: Decimal,
    /// Tax, employee-side insurance and penalties.
    pub total_deductions: Decimal,
    /// Employer-side insurance; not deducted.
    pub employer_contributions: Decimal,
    /// Final amount to disburse.
    pub net_pay: Decimal,
    /// Becomes PAID when the run is executed.
    pub payment_status: PaymentStatus,
    /// How the figures were derived.
    pub audit_trace: Vec<AuditStep>,
}
