//! Shared fixtures for engine tests.

use std::str::FromStr;
use std::sync::{Arc, Barrier};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Allowance, AncillaryStatus, AttendanceRecord, ConfigStatus, Employee, InsuranceBracket,
    LeaveRequest, PayGrade, PayrollPeriod, Punch, PunchType, Refund, RefundStatus, SigningBonus,
    TaxRule, TerminationBenefit,
};
use crate::sources::{InMemoryDataSource, PayrollDataSource};

use super::PayrollEngine;

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn april() -> PayrollPeriod {
    PayrollPeriod::from_month(2025, 4).unwrap()
}

/// Grade G1 (6000 base, 6200 gross), a 10% tax rule and a 5%/10% bracket
/// over [0, 10000].
pub fn scenario_source() -> InMemoryDataSource {
    let source = InMemoryDataSource::new();
    source
        .add_pay_grade(PayGrade {
            id: "G1".to_string(),
            grade: "Accountant".to_string(),
            base_salary: dec("6000"),
            gross_salary: dec("6200"),
            status: ConfigStatus::Approved,
        })
        .unwrap();
    source
        .add_pay_grade(PayGrade {
            id: "G-DRAFT".to_string(),
            grade: "Unreviewed".to_string(),
            base_salary: dec("9000"),
            gross_salary: dec("9500"),
            status: ConfigStatus::Draft,
        })
        .unwrap();
    source
        .add_tax_rule(TaxRule {
            id: "t1".to_string(),
            name: "Income tax".to_string(),
            rate: dec("10"),
            status: ConfigStatus::Approved,
        })
        .unwrap();
    source
        .add_insurance_bracket(InsuranceBracket {
            id: "b1".to_string(),
            name: "Social insurance".to_string(),
            min_salary: dec("0"),
            max_salary: dec("10000"),
            employee_rate: dec("5"),
            employer_rate: dec("10"),
            status: ConfigStatus::Approved,
        })
        .unwrap();
    source
}

/// Adds an employee in unit "finance" with a full 8.4-hour April record
/// on every working day except `skip`.
pub fn add_employee(
    source: &InMemoryDataSource,
    id: &str,
    pay_grade_id: Option<&str>,
    bank: Option<&str>,
    skip: &[u32],
) {
    source
        .add_employee(Employee {
            id: id.to_string(),
            employee_number: id.to_uppercase(),
            full_name: format!("Employee {}", id),
            unit_id: "finance".to_string(),
            pay_grade_id: pay_grade_id.map(str::to_string),
            bank_account_number: bank.map(str::to_string),
            position_title: Some("Accountant".to_string()),
        })
        .unwrap();

    for day in april().working_days() {
        if skip.contains(&day.day()) {
            continue;
        }
        source
            .add_attendance(AttendanceRecord {
                id: format!("{}_{}", id, day),
                employee_id: id.to_string(),
                date: day,
                punches: vec![Punch {
                    punch_type: PunchType::In,
                    time: day.and_hms_opt(9, 0, 0).unwrap(),
                }],
                total_work_minutes: 504,
                finalised_for_payroll: true,
            })
            .unwrap();
    }
}

pub fn signing_bonus(id: &str, employee_id: &str, amount: &str, status: AncillaryStatus) -> SigningBonus {
    SigningBonus {
        id: id.to_string(),
        employee_id: employee_id.to_string(),
        position_name: None,
        amount: dec(amount),
        status,
        paid_at: None,
    }
}

pub fn termination_benefit(
    id: &str,
    employee_id: &str,
    amount: &str,
    status: AncillaryStatus,
) -> TerminationBenefit {
    TerminationBenefit {
        id: id.to_string(),
        employee_id: employee_id.to_string(),
        benefit_name: "End of service gratuity".to_string(),
        amount: dec(amount),
        reason: None,
        status,
        paid_at: None,
    }
}

pub fn engine(source: InMemoryDataSource) -> (PayrollEngine, Arc<InMemoryDataSource>) {
    let source = Arc::new(source);
    let engine = PayrollEngine::new(source.clone(), ConfigLoader::default());
    (engine, source)
}

/// Wraps an [`InMemoryDataSource`]. Can hold callers at the approved-bonus
/// read until `bonus_gate` fills, and can fail claims.
pub struct InterceptingSource {
    pub inner: Arc<InMemoryDataSource>,
    pub bonus_gate: Option<Barrier>,
    pub fail_bonus_claims: bool,
    pub fail_benefit_claims: bool,
}

impl InterceptingSource {
    pub fn new(inner: Arc<InMemoryDataSource>) -> Self {
        Self {
            inner,
            bonus_gate: None,
            fail_bonus_claims: false,
            fail_benefit_claims: false,
        }
    }
}

fn unavailable(what: &str) -> EngineError {
    EngineError::DataSource {
        message: format!("{} unavailable", what),
    }
}

impl PayrollDataSource for InterceptingSource {
    fn employees_in_unit(&self, unit_id: &str) -> EngineResult<Vec<Employee>> {
        self.inner.employees_in_unit(unit_id)
    }

    fn pay_grade(&self, pay_grade_id: &str) -> EngineResult<Option<PayGrade>> {
        self.inner.pay_grade(pay_grade_id)
    }

    fn allowances(&self, status: ConfigStatus) -> EngineResult<Vec<Allowance>> {
        self.inner.allowances(status)
    }

    fn tax_rules(&self, status: ConfigStatus) -> EngineResult<Vec<TaxRule>> {
        self.inner.tax_rules(status)
    }

    fn insurance_brackets(&self, status: ConfigStatus) -> EngineResult<Vec<InsuranceBracket>> {
        self.inner.insurance_brackets(status)
    }

    fn finalised_attendance(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        self.inner.finalised_attendance(employee_id, start, end)
    }

    fn approved_leaves(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<LeaveRequest>> {
        self.inner.approved_leaves(employee_id, start, end)
    }

    fn refunds(&self, employee_id: &str, status: RefundStatus) -> EngineResult<Vec<Refund>> {
        self.inner.refunds(employee_id, status)
    }

    fn signing_bonuses(
        &self,
        employee_id: &str,
        status: AncillaryStatus,
    ) -> EngineResult<Vec<SigningBonus>> {
        let bonuses = self.inner.signing_bonuses(employee_id, status)?;
        if let Some(gate) = &self.bonus_gate {
            gate.wait();
        }
        Ok(bonuses)
    }

    fn termination_benefits(
        &self,
        employee_id: &str,
        status: AncillaryStatus,
    ) -> EngineResult<Vec<TerminationBenefit>> {
        self.inner.termination_benefits(employee_id, status)
    }

    fn signing_bonus(&self, id: &str) -> EngineResult<Option<SigningBonus>> {
        self.inner.signing_bonus(id)
    }

    fn termination_benefit(&self, id: &str) -> EngineResult<Option<TerminationBenefit>> {
        self.inner.termination_benefit(id)
    }

    fn save_signing_bonus(&self, bonus: SigningBonus) -> EngineResult<()> {
        self.inner.save_signing_bonus(bonus)
    }

    fn save_termination_benefit(&self, benefit: TerminationBenefit) -> EngineResult<()> {
        self.inner.save_termination_benefit(benefit)
    }

    fn claim_signing_bonus(&self, id: &str, paid_at: DateTime<Utc>) -> EngineResult<bool> {
        if self.fail_bonus_claims {
            return Err(unavailable("signing bonus claim"));
        }
        self.inner.claim_signing_bonus(id, paid_at)
    }

    fn release_signing_bonus(&self, id: &str) -> EngineResult<()> {
        self.inner.release_signing_bonus(id)
    }

    fn claim_termination_benefit(&self, id: &str, paid_at: DateTime<Utc>) -> EngineResult<bool> {
        if self.fail_benefit_claims {
            return Err(unavailable("termination benefit claim"));
        }
        self.inner.claim_termination_benefit(id, paid_at)
    }

    fn release_termination_benefit(&self, id: &str) -> EngineResult<()> {
        self.inner.release_termination_benefit(id)
    }
}

pub fn intercepted_engine(source: InterceptingSource) -> PayrollEngine {
    PayrollEngine::new(Arc::new(source), ConfigLoader::default())
}
