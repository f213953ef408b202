//! One-off payments outside the regular salary: refunds, signing bonuses
//! and termination benefits.
//!
//! Signing bonuses and termination benefits are owned by other subsystems.
//! The engine approves/edits them while they are pending and flips approved
//! records to paid once they land on a persisted payslip.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Status of a refund owed to an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundStatus {
    /// Owed and not yet disbursed.
    Pending,
    /// Disbursed.
    Paid,
}

/// A refund to be added to an employee's pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    /// Unique identifier.
    pub id: String,
    /// The employee owed the refund.
    pub employee_id: String,
    /// Why the refund is owed.
    pub description: String,
    /// Refund amount.
    pub amount: Decimal,
    /// Refund status.
    pub status: RefundStatus,
}

/// Lifecycle status shared by signing bonuses and termination benefits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AncillaryStatus {
    /// Awaiting approval; still editable.
    Pending,
    /// Approved and waiting for the next payroll run.
    Approved,
    /// Rejected.
    Rejected,
    /// Included in a persisted payslip.
    Paid,
}

impl fmt::Display for AncillaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AncillaryStatus::Pending => "PENDING",
            AncillaryStatus::Approved => "APPROVED",
            AncillaryStatus::Rejected => "REJECTED",
            AncillaryStatus::Paid => "PAID",
        };
        f.write_str(label)
    }
}

/// A signing bonus granted to a new hire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningBonus {
    /// Unique identifier.
    pub id: String,
    /// The employee receiving the bonus.
    pub employee_id: String,
    /// Position the bonus definition was attached to, if known.
    #[serde(default)]
    pub position_name: Option<String>,
    /// Bonus amount from the linked bonus definition.
    pub amount: Decimal,
    /// Current status.
    pub status: AncillaryStatus,
    /// When the bonus was paid.
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

/// A benefit paid out when employment ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationBenefit {
    /// Unique identifier.
    pub id: String,
    /// The departing employee.
    pub employee_id: String,
    /// Benefit name (e.g., "End of service gratuity").
    pub benefit_name: String,
    /// Benefit amount.
    pub amount: Decimal,
    /// Free-text reason recorded by HR.
    #[serde(default)]
    pub reason: Option<String>,
    /// Current status.
    pub status: AncillaryStatus,
    /// When the benefit was paid.
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

/// Editable fields of a pending signing bonus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigningBonusEdit {
    /// New bonus amount; must not be negative.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// New position name; must not be blank.
    #[serde(default)]
    pub position_name: Option<String>,
}

/// Editable fields of a pending termination benefit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerminationBenefitEdit {
    /// New benefit amount; must not be negative.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// New reason text.
    #[serde(default)]
    pub reason: Option<String>,
}

fn validate_amount(amount: Decimal) -> EngineResult<()> {
    if amount < Decimal::ZERO {
        return Err(EngineError::InvalidUpdate {
            field: "amount".to_string(),
            message: format!("must not be negative, got {}", amount),
        });
    }
    Ok(())
}

impl SigningBonusEdit {
    /// Validates every present field before anything is applied.
    pub fn validate(&self) -> EngineResult<()> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if self
            .position_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(EngineError::InvalidUpdate {
                field: "position_name".to_string(),
                message: "must not be blank".to_string(),
            });
        }
        Ok(())
    }
}

impl TerminationBenefitEdit {
    /// Validates every present field before anything is applied.
    pub fn validate(&self) -> EngineResult<()> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        Ok(())
    }
}

impl SigningBonus {
    /// Applies a validated edit.
    pub fn apply(&mut self, edit: SigningBonusEdit) -> EngineResult<()> {
        edit.validate()?;
        if let Some(amount) = edit.amount {
            self.amount = amount;
        }
        if let Some(name) = edit.position_name {
            self.position_name = Some(name);
        }
        Ok(())
    }
}

impl TerminationBenefit {
    /// Applies a validated edit.
    pub fn apply(&mut self, edit: TerminationBenefitEdit) -> EngineResult<()> {
        edit.validate()?;
        if let Some(amount) = edit.amount {
            self.amount = amount;
        }
        if let Some(reason) = edit.reason {
            self.reason = Some(reason);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn pending_bonus() -> SigningBonus {
        SigningBonus {
            id: "sb_1".to_string(),
            employee_id: "emp_001".to_string(),
            position_name: None,
            amount: dec("1000"),
            status: AncillaryStatus::Pending,
            paid_at: None,
        }
    }

    #[test]
    fn test_apply_signing_bonus_edit() {
        let mut bonus = pending_bonus();
        bonus
            .apply(SigningBonusEdit {
                amount: Some(dec("1500.50")),
                position_name: Some("Engineer".to_string()),
            })
            .unwrap();
        assert_eq!(bonus.amount, dec("1500.50"));
        assert_eq!(bonus.position_name.as_deref(), Some("Engineer"));
    }

    #[test]
    fn test_negative_amount_rejected_without_partial_apply() {
        let mut bonus = pending_bonus();
        let result = bonus.apply(SigningBonusEdit {
            amount: Some(dec("-1")),
            position_name: Some("Engineer".to_string()),
        });
        assert!(matches!(result, Err(EngineError::InvalidUpdate { ref field, .. }) if field == "amount"));
        assert_eq!(bonus, pending_bonus());
    }

    #[test]
    fn test_blank_position_name_rejected() {
        let edit = SigningBonusEdit {
            amount: None,
            position_name: Some("  ".to_string()),
        };
        assert!(edit.validate().is_err());
    }

    #[test]
    fn test_edit_rejects_unknown_fields() {
        let result: Result<SigningBonusEdit, _> =
            serde_json::from_str(r#"{"amount": "10", "status": "PAID"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_termination_benefit_edit_keeps_absent_fields() {
        let mut benefit = TerminationBenefit {
            id: "tb_1".to_string(),
            employee_id: "emp_001".to_string(),
            benefit_name: "End of service".to_string(),
            amount: dec("3000"),
            reason: Some("Resignation".to_string()),
            status: AncillaryStatus::Pending,
            paid_at: None,
        };
        benefit
            .apply(TerminationBenefitEdit {
                amount: Some(dec("0")),
                reason: None,
            })
            .unwrap();
        assert_eq!(benefit.amount, Decimal::ZERO);
        assert_eq!(benefit.reason.as_deref(), Some("Resignation"));
    }

    #[test]
    fn test_ancillary_status_display() {
        assert_eq!(AncillaryStatus::Approved.to_string(), "APPROVED");
        assert_eq!(
            serde_json::to_string(&AncillaryStatus::Paid).unwrap(),
            "\"PAID\""
        );
    }
}
