//! Attendance-based penalty calculation.
//!
//! A working day (Monday to Friday) is covered when the employee punched on
//! that date in a finalised attendance record, or when an approved paid leave
//! spans it. Uncovered days are charged at `net_salary / 22`. Attended days
//! are then expected to carry 8.4 hours each; any shortfall in finalised
//! worked time is charged at `net_salary / 210` per hour.
//!
//! Paid leave days count as attended, so their expected hours are not met
//! by punches and fall into the hours shortfall. Partial days can likewise
//! be charged twice. This follows the established payroll behavior and is
//! kept as a known approximation.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::PenaltyPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AuditStep, LeaveRequest, PayrollPeriod};

const MINUTES_PER_HOUR: u32 = 60;

/// The result of calculating attendance penalties for one employee.
#[derive(Debug, Clone)]
pub struct PenaltyResult {
    /// Total penalty to deduct.
    pub penalty_amount: Decimal,
    /// Human-readable reasons, one per penalty component.
    pub reasons: Vec<String>,
    /// Mon–Fri days in the period.
    pub working_days: u32,
    /// Working days covered by neither attendance nor paid leave.
    pub missing_days: u32,
    /// Hours short of the expectation for attended days.
    pub missing_hours: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates attendance penalties for one employee over a period.
///
/// `attendance` and `leaves` are the employee's records for the period.
/// Records that are not finalised, leaves that are not approved, and
/// unpaid leaves never cover a day.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if the policy divisors are zero.
pub fn calculate_penalties(
    period: &PayrollPeriod,
    net_salary: Decimal,
    attendance: &[AttendanceRecord],
    leaves: &[LeaveRequest],
    policy: &PenaltyPolicy,
    step_number: u32,
) -> EngineResult<PenaltyResult> {
    if policy.standard_month_working_days == 0 || policy.standard_month_hours == 0 {
        return Err(EngineError::CalculationError {
            message: "penalty divisors must be greater than zero".to_string(),
        });
    }

    let working_days = period.working_days();
    let punched_dates: HashSet<NaiveDate> = attendance
        .iter()
        .filter(|r| r.shows_presence())
        .map(|r| r.date)
        .collect();

    let missing_days = working_days
        .iter()
        .filter(|day| !punched_dates.contains(*day) && !leaves.iter().any(|l| l.excuses(**day)))
        .count() as u32;
    let total_working_days = working_days.len() as u32;

    let mut penalty_amount = Decimal::ZERO;
    let mut reasons = Vec::new();

    let daily_rate = net_salary / Decimal::from(policy.standard_month_working_days);
    let days_penalty = Decimal::from(missing_days) * daily_rate;
    if missing_days > 0 {
        penalty_amount += days_penalty;
        reasons.push(format!("Missing {} days", missing_days));
    }

    let attended_days = total_working_days - missing_days;
    let expected_hours = Decimal::from(attended_days) * policy.standard_daily_hours;
    let worked_minutes: u32 = attendance
        .iter()
        .filter(|r| r.finalised_for_payroll)
        .map(|r| r.total_work_minutes)
        .sum();
    let actual_hours = Decimal::from(worked_minutes) / Decimal::from(MINUTES_PER_HOUR);

    let hourly_rate = net_salary / Decimal::from(policy.standard_month_hours);
    let mut missing_hours = Decimal::ZERO;
    let mut hours_penalty = Decimal::ZERO;
    if actual_hours < expected_hours {
        missing_hours = expected_hours - actual_hours;
        hours_penalty = missing_hours * hourly_rate;
        penalty_amount += hours_penalty;
        reasons.push(format!("Missing {:.1} hours", missing_hours.round_dp(1)));
    }

    let reasoning = if reasons.is_empty() {
        format!(
            "All {} working days covered and {} of {} expected hours worked",
            total_working_days,
            actual_hours.round_dp(1).normalize(),
            expected_hours.normalize()
        )
    } else {
        format!(
            "{} → ${} deducted",
            reasons.join(", "),
            penalty_amount.round_dp(2)
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "attendance_penalty".to_string(),
        rule_name: "Attendance Penalty".to_string(),
        input: serde_json::json!({
            "period": period.to_string(),
            "net_salary": net_salary.to_string(),
            "working_days": total_working_days,
            "attendance_records": attendance.len(),
            "leave_requests": leaves.len()
        }),
        output: serde_json::json!({
            "missing_days": missing_days,
            "days_penalty": days_penalty.to_string(),
            "expected_hours": expected_hours.to_string(),
            "actual_hours": actual_hours.to_string(),
            "missing_hours": missing_hours.to_string(),
            "hours_penalty": hours_penalty.to_string(),
            "penalty_amount": penalty_amount.to_string()
        }),
        reasoning,
    };

    Ok(PenaltyResult {
        penalty_amount,
        reasons,
        working_days: total_working_days,
        missing_days,
        missing_hours,
        audit_step,
    })
}
