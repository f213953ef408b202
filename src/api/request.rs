//! Request bodies for the payroll API.
//!
//! Actor ids travel in the body; authentication is handled upstream.

use serde::{Deserialize, Serialize};

use super::response::ApiError;

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::missing_field(field));
    }
    Ok(())
}

/// Body of `POST /runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePayrollRequest {
    /// The month to process, as `YYYY-MM` or any date within it (`YYYY-MM-DD`).
    pub period: String,
    /// The organizational unit to process.
    pub unit_id: String,
    /// The initiating payroll specialist.
    pub specialist_id: String,
}

impl InitiatePayrollRequest {
    /// Checks that every field is present.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("period", &self.period)?;
        require("unit_id", &self.unit_id)?;
        require("specialist_id", &self.specialist_id)
    }
}

/// Body of manager approval and lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerActionRequest {
    /// The acting payroll manager.
    pub manager_id: String,
}

impl ManagerActionRequest {
    /// Checks that every field is present.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("manager_id", &self.manager_id)
    }
}

/// Body of manager rejection and unlock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerReasonRequest {
    /// The acting payroll manager.
    pub manager_id: String,
    /// Why the manager acted.
    pub reason: String,
}

impl ManagerReasonRequest {
    /// Checks that every field is present.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("manager_id", &self.manager_id)?;
        require("reason", &self.reason)
    }
}

/// Body of finance approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceActionRequest {
    /// The acting finance staff member.
    pub staff_id: String,
}

impl FinanceActionRequest {
    /// Checks that every field is present.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("staff_id", &self.staff_id)
    }
}

/// Body of finance rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceReasonRequest {
    /// The acting finance staff member.
    pub staff_id: String,
    /// Why finance rejected.
    pub reason: String,
}

impl FinanceReasonRequest {
    /// Checks that every field is present.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("staff_id", &self.staff_id)?;
        require("reason", &self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initiate_request_deserialization() {
        let request: InitiatePayrollRequest = serde_json::from_str(
            r#"{"period": "2025-03-01", "unit_id": "finance", "specialist_id": "spec_1"}"#,
        )
        .unwrap();
        assert_eq!(request.period, "2025-03-01");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_reason_is_missing() {
        let request = ManagerReasonRequest {
            manager_id: "mgr_1".to_string(),
            reason: "   ".to_string(),
        };
        let error = request.validate().unwrap_err();
        assert_eq!(error.code, "MISSING_FIELD");
        assert!(error.message.contains("reason"));
    }
}
