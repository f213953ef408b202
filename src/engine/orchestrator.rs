//! Run initiation: compute every employee of a unit and aggregate the run.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::calculation::{
    AssembledPay, CompensationRules, assemble_net_pay, calculate_penalties,
    resolve_ancillary_payments, resolve_compensation,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AncillaryStatus, ConfigStatus, Employee, PayrollPeriod, PayrollRun, RefundStatus,
    SigningBonus, TerminationBenefit,
};

use super::PayrollEngine;

/// An employee skipped during initiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeFailure {
    /// The skipped employee.
    pub employee_id: String,
    /// Why processing failed.
    pub reason: String,
}

/// The outcome of [`PayrollEngine::initiate_payroll`].
#[derive(Debug, Clone, Serialize)]
pub struct RunInitiation {
    /// The DRAFT run with its final totals.
    pub run: PayrollRun,
    /// Employees that were skipped. Its length equals `run.exceptions`.
    pub failures: Vec<EmployeeFailure>,
}

impl PayrollEngine {
    /// Creates a DRAFT run for `period` and computes every employee of
    /// `unit_id`.
    ///
    /// A failure for one employee never aborts the run: it is recorded in
    /// [`RunInitiation::failures`] and counted in the run's exceptions, and
    /// processing moves on. Totals cover exactly the employees whose detail
    /// and payslip were persisted.
    ///
    /// # Errors
    ///
    /// - [`EngineError::RunAlreadyExists`](crate::error::EngineError::RunAlreadyExists)
    ///   if a non-rejected run already holds the period.
    /// - [`EngineError::DataSource`](crate::error::EngineError::DataSource) if the
    ///   roster or compensation rules cannot be read.
    pub fn initiate_payroll(
        &self,
        period: PayrollPeriod,
        unit_id: &str,
        specialist_id: &str,
    ) -> EngineResult<RunInitiation> {
        let now = Utc::now();

        let employees = self.source.employees_in_unit(unit_id)?;
        let rules = CompensationRules::approved(
            self.source.allowances(ConfigStatus::Approved)?,
            self.source.tax_rules(ConfigStatus::Approved)?,
            self.source.insurance_brackets(ConfigStatus::Approved)?,
        );

        let run = self
            .store
            .insert_run(PayrollRun::draft(period, unit_id, specialist_id, now))?;
        info!(
            run_id = %run.id,
            period = %run.period,
            unit_id = %unit_id,
            employees = employees.len(),
            "Payroll run initiated"
        );

        let mut processed: u32 = 0;
        let mut total_net_pay = Decimal::ZERO;
        let mut failures = Vec::new();

        for employee in &employees {
            match self.process_employee(&run, employee, &rules, now) {
                Ok(net_pay) => {
                    processed += 1;
                    total_net_pay += net_pay;
                    debug!(
                        run_id = %run.id,
                        employee_id = %employee.id,
                        net_pay = %net_pay,
                        "Employee processed"
                    );
                }
                Err(err) => {
                    warn!(
                        run_id = %run.id,
                        employee_id = %employee.id,
                        recoverable = err.is_recoverable(),
                        error = %err,
                        "Employee skipped"
                    );
                    failures.push(EmployeeFailure {
                        employee_id: employee.id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let mut completed = run.clone();
        completed.employees = processed;
        completed.exceptions = failures.len() as u32;
        completed.total_net_pay = total_net_pay;
        let completed = self.store.update_run(completed, run.version)?;

        info!(
            run_id = %completed.id,
            employees = completed.employees,
            exceptions = completed.exceptions,
            total_net_pay = %completed.total_net_pay,
            "Payroll run computed"
        );

        Ok(RunInitiation {
            run: completed,
            failures,
        })
    }

    /// Runs the pipeline for one employee and persists the result. Returns
    /// the employee's net pay.
    fn process_employee(
        &self,
        run: &PayrollRun,
        employee: &Employee,
        rules: &CompensationRules,
        now: DateTime<Utc>,
    ) -> EngineResult<Decimal> {
        let pay_grade = match &employee.pay_grade_id {
            Some(id) => self.source.pay_grade(id)?,
            None => None,
        };
        let compensation = resolve_compensation(employee, pay_grade.as_ref(), rules, 1)?;

        let (start, end) = (run.period.start_date(), run.period.end_date());
        let attendance = self.source.finalised_attendance(&employee.id, start, end)?;
        let leaves = self.source.approved_leaves(&employee.id, start, end)?;
        let penalties = calculate_penalties(
            &run.period,
            compensation.net_salary,
            &attendance,
            &leaves,
            self.config.penalties(),
            4,
        )?;

        let refunds = self.source.refunds(&employee.id, RefundStatus::Pending)?;
        let claims = self.claim_ancillary(&employee.id, now)?;
        let ancillary = resolve_ancillary_payments(
            employee,
            &refunds,
            claims.bonus.as_slice(),
            claims.benefit.as_slice(),
            5,
        );

        let AssembledPay { detail, payslip } =
            assemble_net_pay(run.id, employee, compensation, penalties, &ancillary, 6, now);
        let net_pay = detail.net_pay;
        if let Err(err) = self.store.insert_employee_result(detail, payslip) {
            return Err(self.release_after(&claims, err));
        }

        Ok(net_pay)
    }

    /// Claims the first approved signing bonus and the first approved
    /// termination benefit that no other run has taken. The returned records
    /// hold their pre-claim (APPROVED) state.
    ///
    /// On error every claim already made is released.
    fn claim_ancillary(&self, employee_id: &str, now: DateTime<Utc>) -> EngineResult<Claims> {
        let mut claims = Claims::default();
        match self.claim_into(&mut claims, employee_id, now) {
            Ok(()) => Ok(claims),
            Err(err) => Err(self.release_after(&claims, err)),
        }
    }

    fn claim_into(
        &self,
        claims: &mut Claims,
        employee_id: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        for bonus in self
            .source
            .signing_bonuses(employee_id, AncillaryStatus::Approved)?
        {
            if self.source.claim_signing_bonus(&bonus.id, now)? {
                claims.bonus = Some(bonus);
                break;
            }
            debug!(signing_bonus_id = %bonus.id, "Signing bonus already claimed");
        }
        for benefit in self
            .source
            .termination_benefits(employee_id, AncillaryStatus::Approved)?
        {
            if self.source.claim_termination_benefit(&benefit.id, now)? {
                claims.benefit = Some(benefit);
                break;
            }
            debug!(termination_benefit_id = %benefit.id, "Termination benefit already claimed");
        }
        Ok(())
    }

    /// Releases `claims` after `err`. A failed release is folded into the
    /// returned error so the employee's failure reason names the stranded
    /// records.
    fn release_after(&self, claims: &Claims, err: EngineError) -> EngineError {
        let mut stranded = Vec::new();
        if let Some(bonus) = &claims.bonus {
            if let Err(release_err) = self.source.release_signing_bonus(&bonus.id) {
                stranded.push(format!("signing bonus {} ({})", bonus.id, release_err));
            }
        }
        if let Some(benefit) = &claims.benefit {
            if let Err(release_err) = self.source.release_termination_benefit(&benefit.id) {
                stranded.push(format!("termination benefit {} ({})", benefit.id, release_err));
            }
        }
        if stranded.is_empty() {
            return err;
        }
        EngineError::DataSource {
            message: format!(
                "{}; left marked paid without a payslip: {}",
                err,
                stranded.join(", ")
            ),
        }
    }
}

/// Ancillary records claimed for one employee's payslip.
#[derive(Debug, Default)]
struct Claims {
    bonus: Option<SigningBonus>,
    benefit: Option<TerminationBenefit>,
}
