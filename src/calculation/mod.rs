//! Calculation logic for the payroll engine.
//!
//! This module contains the per-employee gross-to-net pipeline: compensation
//! resolution (gross, tax, insurance), attendance penalties, ancillary
//! payment resolution, net pay assembly, and the data-quality checks run at
//! review time. Every function here is pure; fetching and persisting is the
//! orchestrator's job.

mod ancillary;
mod compensation;
mod net_pay;
mod penalties;
mod review;

pub use ancillary::{AncillaryResult, ReservedPayment, resolve_ancillary_payments};
pub use compensation::{CompensationResult, CompensationRules, resolve_compensation};
pub use net_pay::{AssembledPay, assemble_net_pay};
pub use penalties::{PenaltyResult, calculate_penalties};
pub use review::{
    MISSING_BANK_DETAILS, NEGATIVE_NET_PAY, SALARY_SPIKE, detect_exceptions, exception_note,
};
