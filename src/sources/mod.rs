//! Read-only (and narrowly writable) access to collaborating subsystems.
//!
//! The engine never owns roster, configuration, attendance, leave or
//! ancillary-payment records. It reaches them through [`PayrollDataSource`].

mod in_memory;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::EngineResult;
use crate::models::{
    Allowance, AncillaryStatus, AttendanceRecord, ConfigStatus, Employee, InsuranceBracket,
    LeaveRequest, PayGrade, Refund, RefundStatus, SigningBonus, TaxRule, TerminationBenefit,
};

pub use in_memory::InMemoryDataSource;

/// Everything the engine needs from other subsystems.
///
/// Implementations must be safe to share across threads; the HTTP layer
/// holds one behind an `Arc`.
pub trait PayrollDataSource: Send + Sync {
    /// Employees belonging to an organizational unit.
    fn employees_in_unit(&self, unit_id: &str) -> EngineResult<Vec<Employee>>;

    /// A pay grade by id, whatever its status.
    fn pay_grade(&self, pay_grade_id: &str) -> EngineResult<Option<PayGrade>>;

    /// Allowances with the given status.
    fn allowances(&self, status: ConfigStatus) -> EngineResult<Vec<Allowance>>;

    /// Tax rules with the given status.
    fn tax_rules(&self, status: ConfigStatus) -> EngineResult<Vec<TaxRule>>;

    /// Insurance brackets with the given status.
    fn insurance_brackets(&self, status: ConfigStatus) -> EngineResult<Vec<InsuranceBracket>>;

    /// Finalised attendance records for an employee dated within `[start, end]`.
    fn finalised_attendance(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>>;

    /// Approved leave requests for an employee overlapping `[start, end]`.
    fn approved_leaves(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<LeaveRequest>>;

    /// Refunds for an employee with the given status.
    fn refunds(&self, employee_id: &str, status: RefundStatus) -> EngineResult<Vec<Refund>>;

    /// Signing bonuses for an employee with the given status.
    fn signing_bonuses(
        &self,
        employee_id: &str,
        status: AncillaryStatus,
    ) -> EngineResult<Vec<SigningBonus>>;

    /// Termination benefits for an employee with the given status.
    fn termination_benefits(
        &self,
        employee_id: &str,
        status: AncillaryStatus,
    ) -> EngineResult<Vec<TerminationBenefit>>;

    /// A signing bonus by id.
    fn signing_bonus(&self, id: &str) -> EngineResult<Option<SigningBonus>>;

    /// A termination benefit by id.
    fn termination_benefit(&self, id: &str) -> EngineResult<Option<TerminationBenefit>>;

    /// Replaces a stored signing bonus.
    fn save_signing_bonus(&self, bonus: SigningBonus) -> EngineResult<()>;

    /// Replaces a stored termination benefit.
    fn save_termination_benefit(&self, benefit: TerminationBenefit) -> EngineResult<()>;

    /// Moves a signing bonus from APPROVED to PAID in one step.
    ///
    /// Returns `false`, and changes nothing, when the bonus is no longer
    /// APPROVED. At most one caller can claim a given bonus.
    fn claim_signing_bonus(&self, id: &str, paid_at: DateTime<Utc>) -> EngineResult<bool>;

    /// Returns a claimed signing bonus to APPROVED and clears `paid_at`.
    fn release_signing_bonus(&self, id: &str) -> EngineResult<()>;

    /// Moves a termination benefit from APPROVED to PAID in one step.
    ///
    /// Same contract as [`claim_signing_bonus`](Self::claim_signing_bonus).
    fn claim_termination_benefit(&self, id: &str, paid_at: DateTime<Utc>) -> EngineResult<bool>;

    /// Returns a claimed termination benefit to APPROVED and clears `paid_at`.
    fn release_termination_benefit(&self, id: &str) -> EngineResult<()>;
}
