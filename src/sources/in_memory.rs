//! In-process implementation of [`PayrollDataSource`].
//!
//! Backs tests, benchmarks and demos. Records are inserted up front and
//! queried with the same filters the real subsystems apply.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Allowance, AncillaryStatus, AttendanceRecord, ConfigStatus, Employee, InsuranceBracket,
    LeaveRequest, LeaveStatus, PayGrade, Refund, RefundStatus, SigningBonus, TaxRule,
    TerminationBenefit,
};

use super::PayrollDataSource;

#[derive(Debug, Default)]
struct Records {
    employees: Vec<Employee>,
    pay_grades: HashMap<String, PayGrade>,
    allowances: Vec<Allowance>,
    tax_rules: Vec<TaxRule>,
    insurance_brackets: Vec<InsuranceBracket>,
    attendance: Vec<AttendanceRecord>,
    leaves: Vec<LeaveRequest>,
    refunds: Vec<Refund>,
    signing_bonuses: Vec<SigningBonus>,
    termination_benefits: Vec<TerminationBenefit>,
}

/// A thread-safe, in-memory data source.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{ConfigStatus, PayGrade};
/// use payroll_engine::sources::{InMemoryDataSource, PayrollDataSource};
/// use rust_decimal::Decimal;
///
/// let source = InMemoryDataSource::new();
/// source.add_pay_grade(PayGrade {
///     id: "G1".to_string(),
///     grade: "Accountant".to_string(),
///     base_salary: Decimal::from(6000),
///     gross_salary: Decimal::from(6200),
///     status: ConfigStatus::Approved,
/// }).unwrap();
///
/// assert!(source.pay_grade("G1").unwrap().is_some());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDataSource {
    records: RwLock<Records>,
}

impl InMemoryDataSource {
    /// Creates an empty data source.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, Records>> {
        self.records.read().map_err(|_| EngineError::DataSource {
            message: "in-memory records lock poisoned".to_string(),
        })
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, Records>> {
        self.records.write().map_err(|_| EngineError::DataSource {
            message: "in-memory records lock poisoned".to_string(),
        })
    }

    /// Adds an employee to the roster.
    pub fn add_employee(&self, employee: Employee) -> EngineResult<()> {
        self.write()?.employees.push(employee);
        Ok(())
    }

    /// Adds or replaces a pay grade.
    pub fn add_pay_grade(&self, grade: PayGrade) -> EngineResult<()> {
        self.write()?.pay_grades.insert(grade.id.clone(), grade);
        Ok(())
    }

    /// Adds an allowance.
    pub fn add_allowance(&self, allowance: Allowance) -> EngineResult<()> {
        self.write()?.allowances.push(allowance);
        Ok(())
    }

    /// Adds a tax rule.
    pub fn add_tax_rule(&self, rule: TaxRule) -> EngineResult<()> {
        self.write()?.tax_rules.push(rule);
        Ok(())
    }

    /// Adds an insurance bracket.
    pub fn add_insurance_bracket(&self, bracket: InsuranceBracket) -> EngineResult<()> {
        self.write()?.insurance_brackets.push(bracket);
        Ok(())
    }

    /// Adds an attendance record.
    pub fn add_attendance(&self, record: AttendanceRecord) -> EngineResult<()> {
        self.write()?.attendance.push(record);
        Ok(())
    }

    /// Adds a leave request.
    pub fn add_leave(&self, leave: LeaveRequest) -> EngineResult<()> {
        self.write()?.leaves.push(leave);
        Ok(())
    }

    /// Adds a refund.
    pub fn add_refund(&self, refund: Refund) -> EngineResult<()> {
        self.write()?.refunds.push(refund);
        Ok(())
    }

    /// Adds a signing bonus.
    pub fn add_signing_bonus(&self, bonus: SigningBonus) -> EngineResult<()> {
        self.write()?.signing_bonuses.push(bonus);
        Ok(())
    }

    /// Adds a termination benefit.
    pub fn add_termination_benefit(&self, benefit: TerminationBenefit) -> EngineResult<()> {
        self.write()?.termination_benefits.push(benefit);
        Ok(())
    }
}

impl PayrollDataSource for InMemoryDataSource {
    fn employees_in_unit(&self, unit_id: &str) -> EngineResult<Vec<Employee>> {
        Ok(self
            .read()?
            .employees
            .iter()
            .filter(|e| e.unit_id == unit_id)
            .cloned()
            .collect())
    }

    fn pay_grade(&self, pay_grade_id: &str) -> EngineResult<Option<PayGrade>> {
        Ok(self.read()?.pay_grades.get(pay_grade_id).cloned())
    }

    fn allowances(&self, status: ConfigStatus) -> EngineResult<Vec<Allowance>> {
        Ok(self
            .read()?
            .allowances
            .iter()
            .filter(|a| a.status == status)
            .cloned()
            .collect())
    }

    fn tax_rules(&self, status: ConfigStatus) -> EngineResult<Vec<TaxRule>> {
        Ok(self
            .read()?
            .tax_rules
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect())
    }

    fn insurance_brackets(&self, status: ConfigStatus) -> EngineResult<Vec<InsuranceBracket>> {
        Ok(self
            .read()?
            .insurance_brackets
            .iter()
            .filter(|b| b.status == status)
            .cloned()
            .collect())
    }

    fn finalised_attendance(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        Ok(self
            .read()?
            .attendance
            .iter()
            .filter(|r| {
                r.employee_id == employee_id
                    && r.finalised_for_payroll
                    && r.date >= start
                    && r.date <= end
            })
            .cloned()
            .collect())
    }

    fn approved_leaves(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<LeaveRequest>> {
        Ok(self
            .read()?
            .leaves
            .iter()
            .filter(|l| {
                l.employee_id == employee_id
                    && l.status == LeaveStatus::Approved
                    && l.overlaps(start, end)
            })
            .cloned()
            .collect())
    }

    fn refunds(&self, employee_id: &str, status: RefundStatus) -> EngineResult<Vec<Refund>> {
        Ok(self
            .read()?
            .refunds
            .iter()
            .filter(|r| r.employee_id == employee_id && r.status == status)
            .cloned()
            .collect())
    }

    fn signing_bonuses(
        &self,
        employee_id: &str,
        status: AncillaryStatus,
    ) -> EngineResult<Vec<SigningBonus>> {
        Ok(self
            .read()?
            .signing_bonuses
            .iter()
            .filter(|b| b.employee_id == employee_id && b.status == status)
            .cloned()
            .collect())
    }

    fn termination_benefits(
        &self,
        employee_id: &str,
        status: AncillaryStatus,
    ) -> EngineResult<Vec<TerminationBenefit>> {
        Ok(self
            .read()?
            .termination_benefits
            .iter()
            .filter(|b| b.employee_id == employee_id && b.status == status)
            .cloned()
            .collect())
    }

    fn signing_bonus(&self, id: &str) -> EngineResult<Option<SigningBonus>> {
        Ok(self
            .read()?
            .signing_bonuses
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    fn termination_benefit(&self, id: &str) -> EngineResult<Option<TerminationBenefit>> {
        Ok(self
            .read()?
            .termination_benefits
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    fn save_signing_bonus(&self, bonus: SigningBonus) -> EngineResult<()> {
        let mut records = self.write()?;
        let slot = records
            .signing_bonuses
            .iter_mut()
            .find(|b| b.id == bonus.id)
            .ok_or_else(|| EngineError::SigningBonusNotFound {
                id: bonus.id.clone(),
            })?;
        *slot = bonus;
        Ok(())
    }

    fn save_termination_benefit(&self, benefit: TerminationBenefit) -> EngineResult<()> {
        let mut records = self.write()?;
        let slot = records
            .termination_benefits
            .iter_mut()
            .find(|b| b.id == benefit.id)
            .ok_or_else(|| EngineError::TerminationBenefitNotFound {
                id: benefit.id.clone(),
            })?;
        *slot = benefit;
        Ok(())
    }

    fn claim_signing_bonus(&self, id: &str, paid_at: DateTime<Utc>) -> EngineResult<bool> {
        let mut records = self.write()?;
        let bonus = records
            .signing_bonuses
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| EngineError::SigningBonusNotFound { id: id.to_string() })?;
        if bonus.status != AncillaryStatus::Approved {
            return Ok(false);
        }
        bonus.status = AncillaryStatus::Paid;
        bonus.paid_at = Some(paid_at);
        Ok(true)
    }

    fn release_signing_bonus(&self, id: &str) -> EngineResult<()> {
        let mut records = self.write()?;
        let bonus = records
            .signing_bonuses
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| EngineError::SigningBonusNotFound { id: id.to_string() })?;
        if bonus.status == AncillaryStatus::Paid {
            bonus.status = AncillaryStatus::Approved;
            bonus.paid_at = None;
        }
        Ok(())
    }

    fn claim_termination_benefit(&self, id: &str, paid_at: DateTime<Utc>) -> EngineResult<bool> {
        let mut records = self.write()?;
        let benefit = records
            .termination_benefits
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| EngineError::TerminationBenefitNotFound { id: id.to_string() })?;
        if benefit.status != AncillaryStatus::Approved {
            return Ok(false);
        }
        benefit.status = AncillaryStatus::Paid;
        benefit.paid_at = Some(paid_at);
        Ok(true)
    }

    fn release_termination_benefit(&self, id: &str) -> EngineResult<()> {
        let mut records = self.write()?;
        let benefit = records
            .termination_benefits
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| EngineError::TerminationBenefitNotFound { id: id.to_string() })?;
        if benefit.status == AncillaryStatus::Paid {
            benefit.status = AncillaryStatus::Approved;
            benefit.paid_at = None;
        }
        Ok(())
    }
}
