//! Thread-safe storage for the records the engine owns: runs, payroll
//! details and payslips.
//!
//! All mutations go through one lock, so the duplicate-period check and the
//! insert happen in the same critical section, and multi-record commits
//! (review annotations, execution payment flips) are all-or-nothing.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeePayrollDetail, PaymentStatus, PayrollRun, Payslip};

#[derive(Debug, Default)]
struct StoreInner {
    runs: HashMap<Uuid, PayrollRun>,
    details: HashMap<Uuid, Vec<EmployeePayrollDetail>>,
    payslips: HashMap<Uuid, Vec<Payslip>>,
}

impl StoreInner {
    fn checked_run(&self, run_id: Uuid, expected_version: u64) -> EngineResult<&PayrollRun> {
        let stored = self
            .runs
            .get(&run_id)
            .ok_or(EngineError::RunNotFound { run_id })?;
        if stored.version != expected_version {
            return Err(EngineError::ConcurrentModification {
                run_id,
                expected: expected_version,
                actual: stored.version,
            });
        }
        Ok(stored)
    }
}

/// In-process store for runs, details and payslips.
#[derive(Debug, Default)]
pub struct PayrollStore {
    inner: RwLock<StoreInner>,
}

impl PayrollStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, StoreInner>> {
        self.inner.read().map_err(|_| EngineError::DataSource {
            message: "payroll store lock poisoned".to_string(),
        })
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, StoreInner>> {
        self.inner.write().map_err(|_| EngineError::DataSource {
            message: "payroll store lock poisoned".to_string(),
        })
    }

    /// Inserts a new run unless its period is already held by a
    /// non-rejected run.
    pub fn insert_run(&self, run: PayrollRun) -> EngineResult<PayrollRun> {
        let mut inner = self.write()?;
        let taken = inner
            .runs
            .values()
            .any(|existing| existing.period == run.period && existing.status.holds_period());
        if taken {
            return Err(EngineError::RunAlreadyExists {
                period: run.period.to_string(),
            });
        }
        inner.details.insert(run.id, Vec::new());
        inner.payslips.insert(run.id, Vec::new());
        inner.runs.insert(run.id, run.clone());
        Ok(run)
    }

    /// Looks up a run.
    pub fn get_run(&self, run_id: Uuid) -> EngineResult<PayrollRun> {
        self.read()?
            .runs
            .get(&run_id)
            .cloned()
            .ok_or(EngineError::RunNotFound { run_id })
    }

    /// All runs, oldest first.
    pub fn runs(&self) -> EngineResult<Vec<PayrollRun>> {
        let mut runs: Vec<PayrollRun> = self.read()?.runs.values().cloned().collect();
        runs.sort_by_key(|r| r.created_at);
        Ok(runs)
    }

    /// Replaces a run if the stored version still equals `expected_version`.
    ///
    /// The committed run carries `expected_version + 1`.
    pub fn update_run(&self, mut run: PayrollRun, expected_version: u64) -> EngineResult<PayrollRun> {
        let mut inner = self.write()?;
        inner.checked_run(run.id, expected_version)?;
        run.version = expected_version + 1;
        inner.runs.insert(run.id, run.clone());
        Ok(run)
    }

    /// Persists one employee's detail and payslip together.
    pub fn insert_employee_result(
        &self,
        detail: EmployeePayrollDetail,
        payslip: Payslip,
    ) -> EngineResult<()> {
        let mut inner = self.write()?;
        let run_id = detail.run_id;
        if !inner.runs.contains_key(&run_id) {
            return Err(EngineError::RunNotFound { run_id });
        }
        inner.details.entry(run_id).or_default().push(detail);
        inner.payslips.entry(payslip.run_id).or_default().push(payslip);
        Ok(())
    }

    /// Details of a run, in insertion order.
    pub fn details_for_run(&self, run_id: Uuid) -> EngineResult<Vec<EmployeePayrollDetail>> {
        self.read()?
            .details
            .get(&run_id)
            .cloned()
            .ok_or(EngineError::RunNotFound { run_id })
    }

    /// Payslips of a run, in insertion order.
    pub fn payslips_for_run(&self, run_id: Uuid) -> EngineResult<Vec<Payslip>> {
        self.read()?
            .payslips
            .get(&run_id)
            .cloned()
            .ok_or(EngineError::RunNotFound { run_id })
    }

    /// One employee's payslip within a run.
    pub fn payslip(&self, run_id: Uuid, employee_id: &str) -> EngineResult<Option<Payslip>> {
        let inner = self.read()?;
        let payslips = inner
            .payslips
            .get(&run_id)
            .ok_or(EngineError::RunNotFound { run_id })?;
        Ok(payslips
            .iter()
            .find(|p| p.employee_id == employee_id)
            .cloned())
    }

    /// Commits a reviewed run together with the exception note of every
    /// detail, keyed by detail id. Details not listed are left as they are.
    pub fn commit_review(
        &self,
        mut run: PayrollRun,
        expected_version: u64,
        annotations: &HashMap<Uuid, Option<String>>,
    ) -> EngineResult<PayrollRun> {
        let mut inner = self.write()?;
        inner.checked_run(run.id, expected_version)?;

        if let Some(details) = inner.details.get_mut(&run.id) {
            for detail in details.iter_mut() {
                if let Some(note) = annotations.get(&detail.id) {
                    detail.exception = note.clone();
                }
            }
        }

        run.version = expected_version + 1;
        inner.runs.insert(run.id, run.clone());
        Ok(run)
    }

    /// Commits an executed run and marks all of its payslips paid.
    pub fn commit_execution(
        &self,
        mut run: PayrollRun,
        expected_version: u64,
    ) -> EngineResult<PayrollRun> {
        let mut inner = self.write()?;
        inner.checked_run(run.id, expected_version)?;

        if let Some(payslips) = inner.payslips.get_mut(&run.id) {
            for payslip in payslips.iter_mut() {
                payslip.payment_status = PaymentStatus::Paid;
            }
        }

        run.version = expected_version + 1;
        inner.runs.insert(run.id, run.clone());
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BankStatus, Deductions, Earnings, PayrollPeriod, RunStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::sync::Barrier;
    use std::thread;

    fn run(month: u32) -> PayrollRun {
        PayrollRun::draft(
            PayrollPeriod::from_month(2025, month).unwrap(),
            "finance",
            "spec_1",
            Utc::now(),
        )
    }

    fn result_for(run_id: Uuid, employee_id: &str) -> (EmployeePayrollDetail, Payslip) {
        let detail = EmployeePayrollDetail {
            id: Uuid::new_v4(),
            run_id,
            employee_id: employee_id.to_string(),
            base_salary: Decimal::from(6000),
            allowances: Decimal::from(200),
            deductions: Decimal::from(930),
            net_salary: Decimal::from(5270),
            net_pay: Decimal::from(5270),
            bank_status: BankStatus::Valid,
            exception: None,
            bonus: Decimal::ZERO,
            benefit: Decimal::ZERO,
            created_at: Utc::now(),
        };
        let payslip = Payslip {
            id: Uuid::new_v4(),
            run_id,
            employee_id: employee_id.to_string(),
            earnings: Earnings {
                base_salary: Decimal::from(6000),
                allowances: vec![],
                bonuses: vec![],
                benefits: vec![],
                refunds: vec![],
            },
            deductions: Deductions {
                taxes: vec![],
                insurances: vec![],
                penalty_reasons: vec![],
                penalty_amount: Decimal::ZERO,
            },
            total_gross_salary: Decimal::from(6200),
            total_deductions: Decimal::from(930),
            employer_contributions: Decimal::from(620),
            net_pay: Decimal::from(5270),
            payment_status: PaymentStatus::Pending,
            audit_trace: vec![],
        };
        (detail, payslip)
    }

    #[test]
    fn test_duplicate_period_rejected() {
        let store = PayrollStore::new();
        store.insert_run(run(3)).unwrap();

        let result = store.insert_run(run(3));
        assert!(matches!(
            result,
            Err(EngineError::RunAlreadyExists { ref period }) if period == "2025-03"
        ));
        assert_eq!(store.runs().unwrap().len(), 1);
    }

    #[test]
    fn test_racing_inserts_for_one_period_admit_one() {
        let store = PayrollStore::new();
        let start = Barrier::new(8);

        let outcomes: Vec<EngineResult<PayrollRun>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let (store, start) = (&store, &start);
                    scope.spawn(move || {
                        start.wait();
                        store.insert_run(run(5))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .filter_map(|o| o.as_ref().err())
                .all(|e| matches!(e, EngineError::RunAlreadyExists { .. }))
        );
        assert_eq!(store.runs().unwrap().len(), 1);
    }

    #[test]
    fn test_rejected_run_releases_period() {
        let store = PayrollStore::new();
        let mut first = store.insert_run(run(3)).unwrap();
        first.status = RunStatus::Rejected;
        store.update_run(first, 0).unwrap();

        assert!(store.insert_run(run(3)).is_ok());
    }

    #[test]
    fn test_update_bumps_version() {
        let store = PayrollStore::new();
        let mut stored = store.insert_run(run(4)).unwrap();
        stored.status = RunStatus::UnderReview;

        let updated = store.update_run(stored, 0).unwrap();
        assert_eq!(updated.version, 1);
        assert_eq!(store.get_run(updated.id).unwrap().status, RunStatus::UnderReview);
    }

    #[test]
    fn test_stale_version_rejected_without_change() {
        let store = PayrollStore::new();
        let stored = store.insert_run(run(4)).unwrap();
        let mut first = stored.clone();
        first.status = RunStatus::UnderReview;
        store.update_run(first, 0).unwrap();

        let mut stale = stored.clone();
        stale.status = RunStatus::Locked;
        let result = store.update_run(stale, 0);

        assert!(matches!(
            result,
            Err(EngineError::ConcurrentModification { expected: 0, actual: 1, .. })
        ));
        assert_eq!(store.get_run(stored.id).unwrap().status, RunStatus::UnderReview);
    }

    #[test]
    fn test_unknown_run_is_not_found() {
        let store = PayrollStore::new();
        assert!(matches!(
            store.get_run(Uuid::new_v4()),
            Err(EngineError::RunNotFound { .. })
        ));
        assert!(matches!(
            store.details_for_run(Uuid::new_v4()),
            Err(EngineError::RunNotFound { .. })
        ));
    }

    #[test]
    fn test_commit_review_annotates_details() {
        let store = PayrollStore::new();
        let stored = store.insert_run(run(4)).unwrap();
        let (detail, payslip) = result_for(stored.id, "emp_001");
        let detail_id = detail.id;
        store.insert_employee_result(detail, payslip).unwrap();

        let mut annotations = HashMap::new();
        annotations.insert(detail_id, Some("Missing Bank Details".to_string()));
        let mut reviewed = stored.clone();
        reviewed.exceptions = 1;
        store.commit_review(reviewed, 0, &annotations).unwrap();

        let details = store.details_for_run(stored.id).unwrap();
        assert_eq!(details[0].exception.as_deref(), Some("Missing Bank Details"));
        assert_eq!(store.get_run(stored.id).unwrap().exceptions, 1);
    }

    #[test]
    fn test_commit_execution_pays_every_payslip() {
        let store = PayrollStore::new();
        let stored = store.insert_run(run(4)).unwrap();
        for id in ["emp_001", "emp_002"] {
            let (detail, payslip) = result_for(stored.id, id);
            store.insert_employee_result(detail, payslip).unwrap();
        }

        store.commit_execution(stored.clone(), 0).unwrap();

        let payslips = store.payslips_for_run(stored.id).unwrap();
        assert!(payslips.iter().all(|p| p.payment_status == PaymentStatus::Paid));
        assert!(store.payslip(stored.id, "emp_002").unwrap().is_some());
        assert!(store.payslip(stored.id, "emp_404").unwrap().is_none());
    }

    #[test]
    fn test_stale_execution_leaves_payslips_pending() {
        let store = PayrollStore::new();
        let stored = store.insert_run(run(4)).unwrap();
        let (detail, payslip) = result_for(stored.id, "emp_001");
        store.insert_employee_result(detail, payslip).unwrap();

        assert!(store.commit_execution(stored.clone(), 7).is_err());
        let payslips = store.payslips_for_run(stored.id).unwrap();
        assert_eq!(payslips[0].payment_status, PaymentStatus::Pending);
    }
}
