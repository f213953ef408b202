//! Ancillary payment resolution: refunds, signing bonuses and termination
//! benefits.
//!
//! Resolution never mutates records. The orchestrator claims the bonus and
//! benefit it passes in, so each one lands on at most one payslip.

use rust_decimal::Decimal;

use crate::models::{
    AncillaryStatus, AuditStep, Employee, PayslipLine, Refund, RefundStatus, SigningBonus,
    TerminationBenefit,
};

/// An approved bonus or benefit earmarked for the current payslip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedPayment {
    /// Id of the signing bonus or termination benefit record.
    pub id: String,
    /// Display name used on the payslip.
    pub name: String,
    /// Amount paid.
    pub amount: Decimal,
}

impl ReservedPayment {
    fn as_line(&self) -> PayslipLine {
        PayslipLine {
            name: self.name.clone(),
            amount: self.amount,
        }
    }
}

/// The result of resolving ancillary payments for one employee.
#[derive(Debug, Clone)]
pub struct AncillaryResult {
    /// Pending refunds, one line each.
    pub refunds: Vec<PayslipLine>,
    /// Sum of `refunds`.
    pub total_refunds: Decimal,
    /// The approved signing bonus, if any.
    pub signing_bonus: Option<ReservedPayment>,
    /// The approved termination benefit, if any.
    pub termination_benefit: Option<ReservedPayment>,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

impl AncillaryResult {
    /// Signing bonus amount, zero if none.
    pub fn bonus_amount(&self) -> Decimal {
        self.signing_bonus.as_ref().map_or(Decimal::ZERO, |b| b.amount)
    }

    /// Termination benefit amount, zero if none.
    pub fn benefit_amount(&self) -> Decimal {
        self.termination_benefit
            .as_ref()
            .map_or(Decimal::ZERO, |b| b.amount)
    }

    /// Bonus lines for the payslip.
    pub fn bonus_lines(&self) -> Vec<PayslipLine> {
        self.signing_bonus.iter().map(ReservedPayment::as_line).collect()
    }

    /// Benefit lines for the payslip.
    pub fn benefit_lines(&self) -> Vec<PayslipLine> {
        self.termination_benefit
            .iter()
            .map(ReservedPayment::as_line)
            .collect()
    }
}

/// Name shown for a signing bonus on the payslip.
///
/// The employee's current position title is preferred. Bonus names must be
/// unique within a payslip, so the fallback embeds the bonus id.
fn signing_bonus_name(employee: &Employee, bonus: &SigningBonus) -> String {
    employee
        .position_title
        .as_deref()
        .or(bonus.position_name.as_deref())
        .filter(|title| !title.trim().is_empty())
        .map(|title| format!("{} signing bonus", title))
        .unwrap_or_else(|| format!("Signing bonus {}", bonus.id))
}

/// Resolves refunds, the signing bonus and the termination benefit for one
/// employee.
///
/// Only pending refunds and approved bonuses/benefits are considered. At most
/// one bonus and one benefit is taken; when several are approved the first
/// one is used and the others wait for a later run.
pub fn resolve_ancillary_payments(
    employee: &Employee,
    refunds: &[Refund],
    bonuses: &[SigningBonus],
    benefits: &[TerminationBenefit],
    step_number: u32,
) -> AncillaryResult {
    let refund_lines: Vec<PayslipLine> = refunds
        .iter()
        .filter(|r| r.status == RefundStatus::Pending)
        .map(|r| PayslipLine {
            name: r.description.clone(),
            amount: r.amount,
        })
        .collect();
    let total_refunds: Decimal = refund_lines.iter().map(|r| r.amount).sum();

    let signing_bonus = bonuses
        .iter()
        .find(|b| b.status == AncillaryStatus::Approved)
        .map(|b| ReservedPayment {
            id: b.id.clone(),
            name: signing_bonus_name(employee, b),
            amount: b.amount,
        });

    let termination_benefit = benefits
        .iter()
        .find(|b| b.status == AncillaryStatus::Approved)
        .map(|b| ReservedPayment {
            id: b.id.clone(),
            name: b.benefit_name.clone(),
            amount: b.amount,
        });

    let bonus_amount = signing_bonus.as_ref().map_or(Decimal::ZERO, |b| b.amount);
    let benefit_amount = termination_benefit
        .as_ref()
        .map_or(Decimal::ZERO, |b| b.amount);

    let audit_step = AuditStep {
        step_number,
        rule_id: "ancillary_payments".to_string(),
        rule_name: "Ancillary Payments".to_string(),
        input: serde_json::json!({
            "employee_id": employee.id,
            "refunds": refunds.len(),
            "signing_bonuses": bonuses.len(),
            "termination_benefits": benefits.len()
        }),
        output: serde_json::json!({
            "total_refunds": total_refunds.to_string(),
            "signing_bonus_id": signing_bonus.as_ref().map(|b| b.id.clone()),
            "signing_bonus": bonus_amount.to_string(),
            "termination_benefit_id": termination_benefit.as_ref().map(|b| b.id.clone()),
            "termination_benefit": benefit_amount.to_string()
        }),
        reasoning: format!(
            "{} pending refund(s) ${}, signing bonus ${}, termination benefit ${}",
            refund_lines.len(),
            total_refunds.normalize(),
            bonus_amount.normalize(),
            benefit_amount.normalize()
        ),
    };

    AncillaryResult {
        refunds: refund_lines,
        total_refunds,
        signing_bonus,
        termination_benefit,
        audit_step,
    }
}
