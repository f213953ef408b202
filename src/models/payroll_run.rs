//! Payroll run model and its status enums.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayrollPeriod;

/// Lifecycle status of a payroll run.
///
/// ```text
/// DRAFT → UNDER_REVIEW → PENDING_FINANCE_APPROVAL → APPROVED → LOCKED ⇄ UNLOCKED
///              ↓                    ↓
///          REJECTED             REJECTED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Computed, not yet reviewed.
    Draft,
    /// Exception flags computed; awaiting the payroll manager.
    UnderReview,
    /// Approved by the manager; awaiting finance.
    PendingFinanceApproval,
    /// Approved by finance.
    Approved,
    /// Rejected by the manager or finance. Terminal.
    Rejected,
    /// Frozen for disbursement.
    Locked,
    /// Reopened after a lock.
    Unlocked,
}

impl RunStatus {
    /// Every status, for exhaustive checks.
    pub const ALL: [RunStatus; 7] = [
        RunStatus::Draft,
        RunStatus::UnderReview,
        RunStatus::PendingFinanceApproval,
        RunStatus::Approved,
        RunStatus::Rejected,
        RunStatus::Locked,
        RunStatus::Unlocked,
    ];

    /// Rejected runs free their period for a fresh run.
    pub fn holds_period(&self) -> bool {
        *self != RunStatus::Rejected
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunStatus::Draft => "DRAFT",
            RunStatus::UnderReview => "UNDER_REVIEW",
            RunStatus::PendingFinanceApproval => "PENDING_FINANCE_APPROVAL",
            RunStatus::Approved => "APPROVED",
            RunStatus::Rejected => "REJECTED",
            RunStatus::Locked => "LOCKED",
            RunStatus::Unlocked => "UNLOCKED",
        };
        f.write_str(label)
    }
}

/// Disbursement status of a run or payslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Not yet paid.
    Pending,
    /// Paid.
    Paid,
}

/// One payroll-processing batch for a period and organizational unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier.
    pub id: Uuid,
    /// The month the run covers.
    pub period: PayrollPeriod,
    /// The organizational unit processed.
    pub unit_id: String,
    /// Lifecycle status.
    pub status: RunStatus,
    /// Employees processed without error.
    pub employees: u32,
    /// Exceptions raised (skipped employees at initiation, flagged details after review).
    pub exceptions: u32,
    /// Sum of net pay over successfully processed employees.
    pub total_net_pay: Decimal,
    /// The payroll specialist who initiated the run.
    pub specialist_id: String,
    /// The payroll manager who approved or rejected the run.
    pub manager_id: Option<String>,
    /// The finance staff member who decided on the run.
    pub finance_staff_id: Option<String>,
    /// When the manager approved.
    pub manager_approved_at: Option<DateTime<Utc>>,
    /// When finance approved.
    pub finance_approved_at: Option<DateTime<Utc>>,
    /// Why the run was rejected.
    pub rejection_reason: Option<String>,
    /// When the run was rejected.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Disbursement status.
    pub payment_status: PaymentStatus,
    /// The manager who locked the run.
    pub locked_by: Option<String>,
    /// The manager who last unlocked the run.
    pub unlocked_by: Option<String>,
    /// Why the run was unlocked.
    pub unlock_reason: Option<String>,
    /// When the run was created.
    pub created_at: DateTime<Utc>,
    /// Optimistic concurrency version, bumped on every committed update.
    pub version: u64,
}

impl PayrollRun {
    /// Creates an empty DRAFT run.
    pub fn draft(
        period: PayrollPeriod,
        unit_id: impl Into<String>,
        specialist_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            period,
            unit_id: unit_id.into(),
            status: RunStatus::Draft,
            employees: 0,
            exceptions: 0,
            total_net_pay: Decimal::ZERO,
            specialist_id: specialist_id.into(),
            manager_id: None,
            finance_staff_id: None,
            manager_approved_at: None,
            finance_approved_at: None,
            rejection_reason: None,
            rejected_at: None,
            payment_status: PaymentStatus::Pending,
            locked_by: None,
            unlocked_by: None,
            unlock_reason: None,
            created_at: now,
            version: 0,
        }
    }
}
