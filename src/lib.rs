//! Payroll Run Calculation & Approval Engine
//!
//! This crate computes each employee's gross-to-net pay for a pay period and
//! organizational unit, persists the per-employee results, and drives the
//! run through review, manager and finance approval, lock/unlock and
//! execution.
//!
//! The per-employee pipeline lives in [`calculation`]; [`engine`] runs it
//! over a unit's roster and owns the run lifecycle; [`api`] exposes both
//! over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod sources;
pub mod store;
