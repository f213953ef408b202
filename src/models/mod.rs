//! Core data models for the payroll engine.
//!
//! The engine owns [`PayrollRun`], [`EmployeePayrollDetail`] and [`Payslip`].
//! Everything else here mirrors a record read from a collaborating subsystem.

mod ancillary;
mod audit;
mod compensation;
mod employee;
mod pay_period;
mod payroll_detail;
mod payroll_run;
mod payslip;
mod time_records;

pub use ancillary::{
    AncillaryStatus, Refund, RefundStatus, SigningBonus, SigningBonusEdit, TerminationBenefit,
    TerminationBenefitEdit,
};
pub use audit::AuditStep;
pub use compensation::{Allowance, ConfigStatus, InsuranceBracket, PayGrade, TaxRule};
pub use employee::Employee;
pub use pay_period::PayrollPeriod;
pub use payroll_detail::{BankStatus, EmployeePayrollDetail};
pub use payroll_run::{PaymentStatus, PayrollRun, RunStatus};
pub use payslip::{
    Deductions, Earnings, InsuranceContribution, Payslip, PayslipLine, TaxDeduction,
};
pub use time_records::{AttendanceRecord, LeaveRequest, LeaveStatus, LeaveType, Punch, PunchType};
