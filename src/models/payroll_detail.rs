//! Per-employee payroll detail record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether the employee can be paid by bank transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BankStatus {
    /// A bank account number is on file.
    Valid,
    /// No bank account number is on file.
    Missing,
}

/// One employee's summarized result within a run.
///
/// Created once per employee per run. Only `exception` changes afterwards,
/// when the run is reviewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePayrollDetail {
    /// Unique identifier.
    pub id: Uuid,
    /// The run this detail belongs to.
    pub run_id: Uuid,
    /// The employee.
    pub employee_id: String,
    /// Pay grade base salary.
    pub base_salary: Decimal,
    /// Gross salary above base (standard plus ad-hoc allowances).
    pub allowances: Decimal,
    /// Tax, employee-side insurance and penalties.
    pub deductions: Decimal,
    /// Gross minus tax and employee-side insurance.
    pub net_salary: Decimal,
    /// Final amount to disburse.
    pub net_pay: Decimal,
    /// Bank account presence.
    pub bank_status: BankStatus,
    /// Comma-joined data-quality issues, if any.
    pub exception: Option<String>,
    /// Signing bonus included in this pay.
    pub bonus: Decimal,
    /// Termination benefit included in this pay.
    pub benefit: Decimal,
    /// When the detail was created.
    pub created_at: DateTime<Utc>,
}
