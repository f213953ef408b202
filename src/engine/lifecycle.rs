//! The run lifecycle state machine.
//!
//! Transitions are computed by [`apply_action`], a pure function over a run,
//! and committed with the version the caller read. A rejected transition
//! never touches the stored run.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::exception_note;
use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeePayrollDetail, PaymentStatus, PayrollRun, Payslip, RunStatus};

use super::PayrollEngine;

/// A human-triggered transition on a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunAction {
    /// Flag data-quality issues; `exceptions` is the number of flagged details.
    Review {
        /// Flagged detail count.
        exceptions: u32,
    },
    /// Manager approval.
    ManagerApprove {
        /// Approving manager.
        manager_id: String,
    },
    /// Manager rejection.
    ManagerReject {
        /// Rejecting manager.
        manager_id: String,
        /// Why.
        reason: String,
    },
    /// Finance approval.
    FinanceApprove {
        /// Approving finance staff member.
        staff_id: String,
    },
    /// Finance rejection.
    FinanceReject {
        /// Rejecting finance staff member.
        staff_id: String,
        /// Why.
        reason: String,
    },
    /// Freeze for disbursement.
    Lock {
        /// Locking manager.
        manager_id: String,
    },
    /// Reopen a locked run.
    Unlock {
        /// Unlocking manager.
        manager_id: String,
        /// Why.
        reason: String,
    },
    /// Disburse.
    Execute,
}

impl RunAction {
    /// Name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            RunAction::Review { .. } => "review",
            RunAction::ManagerApprove { .. } => "manager-approve",
            RunAction::ManagerReject { .. } => "manager-reject",
            RunAction::FinanceApprove { .. } => "finance-approve",
            RunAction::FinanceReject { .. } => "finance-reject",
            RunAction::Lock { .. } => "lock",
            RunAction::Unlock { .. } => "unlock",
            RunAction::Execute => "execute",
        }
    }

    /// Statuses the action may be applied from.
    ///
    /// `Execute` is refused only on REJECTED runs, whose period may already
    /// belong to a newer run.
    pub fn allowed_from(&self) -> &'static [RunStatus] {
        match self {
            RunAction::Review { .. } => &[RunStatus::Draft, RunStatus::UnderReview],
            RunAction::ManagerApprove { .. } | RunAction::ManagerReject { .. } => {
                &[RunStatus::UnderReview]
            }
            RunAction::FinanceApprove { .. } | RunAction::FinanceReject { .. } => {
                &[RunStatus::PendingFinanceApproval]
            }
            RunAction::Lock { .. } => &[RunStatus::Approved],
            RunAction::Unlock { .. } => &[RunStatus::Locked],
            RunAction::Execute => &[
                RunStatus::Draft,
                RunStatus::UnderReview,
                RunStatus::PendingFinanceApproval,
                RunStatus::Approved,
                RunStatus::Locked,
                RunStatus::Unlocked,
            ],
        }
    }
}

/// Applies `action` to a copy of `run`.
///
/// # Errors
///
/// [`EngineError::InvalidStateTransition`] when the run's status is not one
/// the action may be applied from.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use payroll_engine::engine::{RunAction, apply_action};
/// use payroll_engine::models::{PayrollPeriod, PayrollRun, RunStatus};
///
/// let period = PayrollPeriod::from_month(2025, 3).unwrap();
/// let run = PayrollRun::draft(period, "finance", "spec_1", Utc::now());
///
/// let reviewed = apply_action(&run, RunAction::Review { exceptions: 0 }, Utc::now()).unwrap();
/// assert_eq!(reviewed.status, RunStatus::UnderReview);
///
/// let lock = RunAction::Lock { manager_id: "mgr_1".to_string() };
/// assert!(apply_action(&reviewed, lock, Utc::now()).is_err());
/// ```
pub fn apply_action(
    run: &PayrollRun,
    action: RunAction,
    now: DateTime<Utc>,
) -> EngineResult<PayrollRun> {
    if !action.allowed_from().contains(&run.status) {
        return Err(EngineError::InvalidStateTransition {
            run_id: run.id,
            transition: action.name().to_string(),
            status: run.status.to_string(),
        });
    }

    let mut next = run.clone();
    match action {
        RunAction::Review { exceptions } => {
            next.status = RunStatus::UnderReview;
            next.exceptions = exceptions;
        }
        RunAction::ManagerApprove { manager_id } => {
            next.status = RunStatus::PendingFinanceApproval;
            next.manager_id = Some(manager_id);
            next.manager_approved_at = Some(now);
        }
        RunAction::ManagerReject { manager_id, reason } => {
            next.status = RunStatus::Rejected;
            next.manager_id = Some(manager_id);
            next.rejection_reason = Some(reason);
            next.rejected_at = Some(now);
        }
        RunAction::FinanceApprove { staff_id } => {
            next.status = RunStatus::Approved;
            next.payment_status = PaymentStatus::Paid;
            next.finance_staff_id = Some(staff_id);
            next.finance_approved_at = Some(now);
        }
        RunAction::FinanceReject { staff_id, reason } => {
            next.status = RunStatus::Rejected;
            next.finance_staff_id = Some(staff_id);
            next.rejection_reason = Some(reason);
            next.rejected_at = Some(now);
        }
        RunAction::Lock { manager_id } => {
            next.status = RunStatus::Locked;
            next.locked_by = Some(manager_id);
        }
        RunAction::Unlock { manager_id, reason } => {
            next.status = RunStatus::Unlocked;
            next.unlocked_by = Some(manager_id);
            next.unlock_reason = Some(reason);
        }
        RunAction::Execute => {
            next.status = RunStatus::Locked;
            next.payment_status = PaymentStatus::Paid;
        }
    }
    Ok(next)
}

impl PayrollEngine {
    /// Looks up a run.
    pub fn get_run(&self, run_id: Uuid) -> EngineResult<PayrollRun> {
        self.store.get_run(run_id)
    }

    /// All runs, oldest first.
    pub fn list_runs(&self) -> EngineResult<Vec<PayrollRun>> {
        self.store.runs()
    }

    /// The payroll details of a run.
    pub fn get_draft_details(&self, run_id: Uuid) -> EngineResult<Vec<EmployeePayrollDetail>> {
        self.store.details_for_run(run_id)
    }

    /// The payslips of a run.
    pub fn get_payslips(&self, run_id: Uuid) -> EngineResult<Vec<Payslip>> {
        self.store.payslips_for_run(run_id)
    }

    /// One employee's payslip within a run.
    pub fn get_payslip(&self, run_id: Uuid, employee_id: &str) -> EngineResult<Option<Payslip>> {
        self.store.payslip(run_id, employee_id)
    }

    /// Recomputes exception flags on every detail and moves the run to
    /// UNDER_REVIEW.
    ///
    /// Clean details have their note cleared, so reviewing twice over
    /// unchanged details yields the same flags and count.
    pub fn review_payroll(&self, run_id: Uuid) -> EngineResult<PayrollRun> {
        let run = self.store.get_run(run_id)?;
        let details = self.store.details_for_run(run_id)?;

        let annotations: HashMap<Uuid, Option<String>> = details
            .iter()
            .map(|detail| (detail.id, exception_note(detail)))
            .collect();
        let flagged = annotations.values().filter(|note| note.is_some()).count() as u32;

        let reviewed = apply_action(&run, RunAction::Review { exceptions: flagged }, Utc::now())?;
        let committed = self.store.commit_review(reviewed, run.version, &annotations)?;
        info!(
            run_id = %run_id,
            exceptions = committed.exceptions,
            "Payroll run reviewed"
        );
        Ok(committed)
    }

    /// Manager approval: UNDER_REVIEW to PENDING_FINANCE_APPROVAL.
    pub fn approve_by_manager(&self, run_id: Uuid, manager_id: &str) -> EngineResult<PayrollRun> {
        self.transition(
            run_id,
            RunAction::ManagerApprove {
                manager_id: manager_id.to_string(),
            },
        )
    }

    /// Manager rejection: UNDER_REVIEW to REJECTED.
    pub fn reject_by_manager(
        &self,
        run_id: Uuid,
        manager_id: &str,
        reason: &str,
    ) -> EngineResult<PayrollRun> {
        self.transition(
            run_id,
            RunAction::ManagerReject {
                manager_id: manager_id.to_string(),
                reason: reason.to_string(),
            },
        )
    }

    /// Finance approval: PENDING_FINANCE_APPROVAL to APPROVED.
    pub fn approve_by_finance(&self, run_id: Uuid, staff_id: &str) -> EngineResult<PayrollRun> {
        self.transition(
            run_id,
            RunAction::FinanceApprove {
                staff_id: staff_id.to_string(),
            },
        )
    }

    /// Finance rejection: PENDING_FINANCE_APPROVAL to REJECTED.
    pub fn reject_by_finance(
        &self,
        run_id: Uuid,
        staff_id: &str,
        reason: &str,
    ) -> EngineResult<PayrollRun> {
        self.transition(
            run_id,
            RunAction::FinanceReject {
                staff_id: staff_id.to_string(),
                reason: reason.to_string(),
            },
        )
    }

    /// APPROVED to LOCKED.
    pub fn lock_payroll(&self, run_id: Uuid, manager_id: &str) -> EngineResult<PayrollRun> {
        self.transition(
            run_id,
            RunAction::Lock {
                manager_id: manager_id.to_string(),
            },
        )
    }

    /// LOCKED to UNLOCKED. There is no transition back to LOCKED other
    /// than [`execute_payroll`](Self::execute_payroll).
    pub fn unlock_payroll(
        &self,
        run_id: Uuid,
        manager_id: &str,
        reason: &str,
    ) -> EngineResult<PayrollRun> {
        self.transition(
            run_id,
            RunAction::Unlock {
                manager_id: manager_id.to_string(),
                reason: reason.to_string(),
            },
        )
    }

    /// Sets the run LOCKED and PAID and marks every payslip PAID.
    ///
    /// Applies from any status except REJECTED. Calls on a run that is not
    /// APPROVED, LOCKED or UNLOCKED are logged as warnings.
    pub fn execute_payroll(&self, run_id: Uuid) -> EngineResult<PayrollRun> {
        let run = self.store.get_run(run_id)?;
        if !matches!(
            run.status,
            RunStatus::Approved | RunStatus::Locked | RunStatus::Unlocked
        ) {
            warn!(
                run_id = %run_id,
                status = %run.status,
                "Executing payroll run that has not been approved"
            );
        }

        let executed = apply_action(&run, RunAction::Execute, Utc::now())?;
        let committed = self.store.commit_execution(executed, run.version)?;
        info!(run_id = %run_id, "Payroll run executed");
        Ok(committed)
    }

    fn transition(&self, run_id: Uuid, action: RunAction) -> EngineResult<PayrollRun> {
        let run = self.store.get_run(run_id)?;
        let name = action.name();
        let next = apply_action(&run, action, Utc::now())?;
        let committed = self.store.update_run(next, run.version)?;
        info!(
            run_id = %run_id,
            transition = name,
            from = %run.status,
            to = %committed.status,
            "Payroll run transitioned"
        );
        Ok(committed)
    }
}
