//! Net pay assembly.
//!
//! Combines compensation, penalties and ancillary payments into the
//! employee's payroll detail and itemized payslip.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    AuditStep, BankStatus, Deductions, Earnings, Employee, EmployeePayrollDetail, PaymentStatus,
    Payslip,
};

use super::ancillary::AncillaryResult;
use super::compensation::CompensationResult;
use super::penalties::PenaltyResult;
use super::review::NEGATIVE_NET_PAY;

/// A detail and payslip ready to be persisted together.
#[derive(Debug, Clone)]
pub struct AssembledPay {
    /// The summary record.
    pub detail: EmployeePayrollDetail,
    /// The itemized payslip.
    pub payslip: Payslip,
}

/// Assembles the final pay for one employee.
///
/// ```text
/// net_pay    = net_salary − penalty + refunds + signing_bonus + termination_benefit
/// deductions = tax + employee_insurance + penalty
/// ```
///
/// Bank status is VALID when the employee has an account number on file.
/// A negative net pay is flagged on the detail immediately.
pub fn assemble_net_pay(
    run_id: Uuid,
    employee: &Employee,
    compensation: CompensationResult,
    penalties: PenaltyResult,
    ancillary: &AncillaryResult,
    step_number: u32,
    now: DateTime<Utc>,
) -> AssembledPay {
    let bonus = ancillary.bonus_amount();
    let benefit = ancillary.benefit_amount();

    let net_pay = compensation.net_salary - penalties.penalty_amount
        + ancillary.total_refunds
        + bonus
        + benefit;
    let deductions = compensation.total_tax
        + compensation.total_insurance_employee
        + penalties.penalty_amount;

    let bank_status = if employee.has_bank_account() {
        BankStatus::Valid
    } else {
        BankStatus::Missing
    };

    let exception = (net_pay < Decimal::ZERO).then(|| NEGATIVE_NET_PAY.to_string());

    let net_pay_step = AuditStep {
        step_number,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        input: serde_json::json!({
            "net_salary": compensation.net_salary.to_string(),
            "penalty": penalties.penalty_amount.to_string(),
            "refunds": ancillary.total_refunds.to_string(),
            "signing_bonus": bonus.to_string(),
            "termination_benefit": benefit.to_string()
        }),
        output: serde_json::json!({
            "net_pay": net_pay.to_string(),
            "deductions": deductions.to_string(),
            "bank_status": bank_status
        }),
        reasoning: format!(
            "${} − ${} + ${} + ${} + ${} = ${}",
            compensation.net_salary.normalize(),
            penalties.penalty_amount.round_dp(2),
            ancillary.total_refunds.normalize(),
            bonus.normalize(),
            benefit.normalize(),
            net_pay.round_dp(2)
        ),
    };

    let mut audit_trace = compensation.audit_steps;
    audit_trace.push(penalties.audit_step);
    audit_trace.push(ancillary.audit_step.clone());
    audit_trace.push(net_pay_step);

    let detail = EmployeePayrollDetail {
        id: Uuid::new_v4(),
        run_id,
        employee_id: employee.id.clone(),
        base_salary: compensation.base_salary,
        allowances: compensation.gross_salary - compensation.base_salary,
        deductions,
        net_salary: compensation.net_salary,
        net_pay,
        bank_status,
        exception,
        bonus,
        benefit,
        created_at: now,
    };

    let payslip = Payslip {
        id: Uuid::new_v4(),
        run_id,
        employee_id: employee.id.clone(),
        earnings: Earnings {
            base_salary: compensation.base_salary,
            allowances: compensation.allowances,
            bonuses: ancillary.bonus_lines(),
            benefits: ancillary.benefit_lines(),
            refunds: ancillary.refunds.clone(),
        },
        deductions: Deductions {
            taxes: compensation.taxes,
            insurances: compensation.insurances,
            penalty_reasons: penalties.reasons,
            penalty_amount: penalties.penalty_amount,
        },
        total_gross_salary: compensation.gross_salary,
        total_deductions: deductions,
        employer_contributions: compensation.total_insurance_employer,
        net_pay,
        payment_status: PaymentStatus::Pending,
        audit_trace,
    };

    AssembledPay { detail, payslip }
}
