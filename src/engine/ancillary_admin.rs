//! Administrative operations on signing bonuses and termination benefits.
//!
//! Only PENDING records may be approved, edited or rejected. Anything else
//! fails with [`EngineError::NotPending`] and is left unchanged.

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AncillaryStatus, SigningBonus, SigningBonusEdit, TerminationBenefit, TerminationBenefitEdit,
};

use super::PayrollEngine;

fn ensure_pending(record: &str, id: &str, status: AncillaryStatus) -> EngineResult<()> {
    if status != AncillaryStatus::Pending {
        return Err(EngineError::NotPending {
            record: record.to_string(),
            id: id.to_string(),
            status: status.to_string(),
        });
    }
    Ok(())
}

impl PayrollEngine {
    fn pending_signing_bonus(&self, id: &str) -> EngineResult<SigningBonus> {
        let bonus = self
            .source
            .signing_bonus(id)?
            .ok_or_else(|| EngineError::SigningBonusNotFound { id: id.to_string() })?;
        ensure_pending("Signing bonus", id, bonus.status)?;
        Ok(bonus)
    }

    fn pending_termination_benefit(&self, id: &str) -> EngineResult<TerminationBenefit> {
        let benefit = self
            .source
            .termination_benefit(id)?
            .ok_or_else(|| EngineError::TerminationBenefitNotFound { id: id.to_string() })?;
        ensure_pending("Termination benefit", id, benefit.status)?;
        Ok(benefit)
    }

    /// PENDING to APPROVED; the bonus is picked up by the next run.
    pub fn approve_signing_bonus(&self, id: &str) -> EngineResult<SigningBonus> {
        let mut bonus = self.pending_signing_bonus(id)?;
        bonus.status = AncillaryStatus::Approved;
        self.source.save_signing_bonus(bonus.clone())?;
        info!(signing_bonus_id = %id, "Signing bonus approved");
        Ok(bonus)
    }

    /// PENDING to REJECTED.
    pub fn reject_signing_bonus(&self, id: &str) -> EngineResult<SigningBonus> {
        let mut bonus = self.pending_signing_bonus(id)?;
        bonus.status = AncillaryStatus::Rejected;
        self.source.save_signing_bonus(bonus.clone())?;
        info!(signing_bonus_id = %id, "Signing bonus rejected");
        Ok(bonus)
    }

    /// Applies a validated edit to a pending bonus.
    pub fn edit_signing_bonus(&self, id: &str, edit: SigningBonusEdit) -> EngineResult<SigningBonus> {
        let mut bonus = self.pending_signing_bonus(id)?;
        bonus.apply(edit)?;
        self.source.save_signing_bonus(bonus.clone())?;
        info!(signing_bonus_id = %id, amount = %bonus.amount, "Signing bonus edited");
        Ok(bonus)
    }

    /// PENDING to APPROVED; the benefit is picked up by the next run.
    pub fn approve_termination_benefit(&self, id: &str) -> EngineResult<TerminationBenefit> {
        let mut benefit = self.pending_termination_benefit(id)?;
        benefit.status = AncillaryStatus::Approved;
        self.source.save_termination_benefit(benefit.clone())?;
        info!(termination_benefit_id = %id, "Termination benefit approved");
        Ok(benefit)
    }

    /// PENDING to REJECTED.
    pub fn reject_termination_benefit(&self, id: &str) -> EngineResult<TerminationBenefit> {
        let mut benefit = self.pending_termination_benefit(id)?;
        benefit.status = AncillaryStatus::Rejected;
        self.source.save_termination_benefit(benefit.clone())?;
        info!(termination_benefit_id = %id, "Termination benefit rejected");
        Ok(benefit)
    }

    /// Applies a validated edit to a pending benefit.
    pub fn edit_termination_benefit(
        &self,
        id: &str,
        edit: TerminationBenefitEdit,
    ) -> EngineResult<TerminationBenefit> {
        let mut benefit = self.pending_termination_benefit(id)?;
        benefit.apply(edit)?;
        self.source.save_termination_benefit(benefit.clone())?;
        info!(termination_benefit_id = %id, amount = %benefit.amount, "Termination benefit edited");
        Ok(benefit)
    }
}
