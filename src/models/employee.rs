//! Employee roster model.
//!
//! The engine reads employees from the organization roster; it never
//! creates or edits them.

use serde::{Deserialize, Serialize};

/// An employee as seen by the payroll engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Human-readable employee number.
    pub employee_number: String,
    /// Full display name.
    pub full_name: String,
    /// The organizational unit (department) the employee belongs to.
    pub unit_id: String,
    /// The pay grade assigned to the employee.
    #[serde(default)]
    pub pay_grade_id: Option<String>,
    /// Bank account number on file, if any.
    #[serde(default)]
    pub bank_account_number: Option<String>,
    /// Title of the employee's primary position, if resolvable.
    #[serde(default)]
    pub position_title: Option<String>,
}

impl Employee {
    /// Returns true if a non-blank bank account number is on file.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Employee;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     employee_number: "E-001".to_string(),
    ///     full_name: "Mona Adel".to_string(),
    ///     unit_id: "finance".to_string(),
    ///     pay_grade_id: Some("G1".to_string()),
    ///     bank_account_number: Some("EG3800190005".to_string()),
    ///     position_title: None,
    /// };
    /// assert!(employee.has_bank_account());
    /// ```
    pub fn has_bank_account(&self) -> bool {
        self.bank_account_number
            .as_deref()
            .is_some_and(|account| !account.trim().is_empty())
    }
}
