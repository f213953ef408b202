//! Audit trace recorded while computing an employee's pay.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for one stage of the
/// gross-to-net pipeline.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "tax".to_string(),
///     rule_name: "Tax Deduction".to_string(),
///     input: serde_json::json!({"gross_salary": "6200"}),
///     output: serde_json::json!({"total_tax": "620"}),
///     reasoning: "1 approved tax rule applied to gross 6200".to_string(),
/// };
/// assert_eq!(step.rule_id, "tax");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}
