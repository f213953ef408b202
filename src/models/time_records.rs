//! Attendance and leave records consumed by the penalty calculator.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Direction of an attendance punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchType {
    /// Clock in.
    In,
    /// Clock out.
    Out,
}

/// A single clock-in or clock-out event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punch {
    /// In or out.
    #[serde(rename = "type")]
    pub punch_type: PunchType,
    /// When the punch happened.
    pub time: NaiveDateTime,
}

/// One employee's attendance on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier.
    pub id: String,
    /// The employee the record belongs to.
    pub employee_id: String,
    /// Calendar date of the record.
    pub date: NaiveDate,
    /// Punches recorded on the date.
    #[serde(default)]
    pub punches: Vec<Punch>,
    /// Worked minutes as computed by time management.
    pub total_work_minutes: u32,
    /// Whether time management has released the record for payroll.
    pub finalised_for_payroll: bool,
}

impl AttendanceRecord {
    /// Returns true if the record is finalised and holds at least one punch.
    pub fn shows_presence(&self) -> bool {
        self.finalised_for_payroll && !self.punches.is_empty()
    }
}

/// Status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved.
    Approved,
    /// Rejected.
    Rejected,
    /// Withdrawn by the employee.
    Cancelled,
}

/// A category of leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    /// Short code (e.g., "ANNUAL").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Paid leave exempts a day from the missing-days penalty.
    pub paid: bool,
}

/// A leave request spanning one or more calendar days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier.
    pub id: String,
    /// The requesting employee.
    pub employee_id: String,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Request status.
    pub status: LeaveStatus,
}

impl LeaveRequest {
    /// Returns true if an approved, paid leave covers `date`.
    pub fn excuses(&self, date: NaiveDate) -> bool {
        self.status == LeaveStatus::Approved
            && self.leave_type.paid
            && date >= self.start_date
            && date <= self.end_date
    }

    /// Returns true if the leave's range overlaps `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }
}
