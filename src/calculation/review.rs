//! Data-quality checks applied when a run is reviewed.
//!
//! Flags are advisory: they annotate the detail and count toward the run's
//! exception total, but never block the approval workflow.

use rust_decimal::Decimal;

use crate::models::{BankStatus, EmployeePayrollDetail};

/// Net pay below zero.
pub const NEGATIVE_NET_PAY: &str = "Negative Net Pay";

/// No bank account on file.
pub const MISSING_BANK_DETAILS: &str = "Missing Bank Details";

/// Net pay above base + allowances + bonus + benefit.
pub const SALARY_SPIKE: &str = "Salary Spike";

/// The issues found on one detail, in a fixed order.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::detect_exceptions;
/// use payroll_engine::models::{BankStatus, EmployeePayrollDetail};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let detail = EmployeePayrollDetail {
///     id: Uuid::new_v4(),
///     run_id: Uuid::new_v4(),
///     employee_id: "emp_001".to_string(),
///     base_salary: Decimal::from(6000),
///     allowances: Decimal::from(200),
///     deductions: Decimal::from(930),
///     net_salary: Decimal::from(5270),
///     net_pay: Decimal::from(-10),
///     bank_status: BankStatus::Missing,
///     exception: None,
///     bonus: Decimal::ZERO,
///     benefit: Decimal::ZERO,
///     created_at: Utc::now(),
/// };
/// assert_eq!(detect_exceptions(&detail), vec!["Negative Net Pay", "Missing Bank Details"]);
/// ```
pub fn detect_exceptions(detail: &EmployeePayrollDetail) -> Vec<&'static str> {
    let mut issues = Vec::new();

    if detail.net_pay < Decimal::ZERO {
        issues.push(NEGATIVE_NET_PAY);
    }
    if detail.bank_status == BankStatus::Missing {
        issues.push(MISSING_BANK_DETAILS);
    }
    let ceiling = detail.base_salary + detail.allowances + detail.bonus + detail.benefit;
    if detail.net_pay > ceiling {
        issues.push(SALARY_SPIKE);
    }

    issues
}

/// Comma-joined issue text for a detail, or `None` when it is clean.
pub fn exception_note(detail: &EmployeePayrollDetail) -> Option<String> {
    let issues = detect_exceptions(detail);
    if issues.is_empty() {
        None
    } else {
        Some(issues.join(", "))
    }
}
