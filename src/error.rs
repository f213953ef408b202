//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine can report, from policy loading through
//! per-employee computation to run lifecycle guards.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the payroll engine.
///
/// Errors fall into three groups:
/// - fatal to the request: [`EngineError::RunAlreadyExists`],
///   [`EngineError::InvalidStateTransition`], the `*NotFound` variants and
///   [`EngineError::ConcurrentModification`]. Persisted state is unchanged.
/// - recoverable per employee: [`EngineError::ConfigurationMissing`] and
///   [`EngineError::CalculationError`]. The orchestrator records them and
///   moves on to the next employee.
/// - infrastructure: configuration and data source failures.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::RunAlreadyExists {
///     period: "2025-03".to_string(),
/// };
/// assert_eq!(error.to_string(), "A payroll run already exists for period 2025-03");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A pay period string could not be interpreted as a month.
    #[error("Invalid pay period '{value}': {message}")]
    InvalidPeriod {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        message: String,
    },

    /// The employee has no usable (approved) compensation configuration.
    #[error("Configuration missing for employee '{employee_id}': {message}")]
    ConfigurationMissing {
        /// The employee being processed.
        employee_id: String,
        /// What was missing.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },

    /// A collaborating subsystem failed to serve a read or write.
    #[error("Data source error: {message}")]
    DataSource {
        /// A description of the failure.
        message: String,
    },

    /// A non-rejected run already exists for the period.
    #[error("A payroll run already exists for period {period}")]
    RunAlreadyExists {
        /// The conflicting period.
        period: String,
    },

    /// The referenced run does not exist.
    #[error("Payroll run not found: {run_id}")]
    RunNotFound {
        /// The missing run id.
        run_id: Uuid,
    },

    /// The referenced signing bonus does not exist.
    #[error("Signing bonus not found: {id}")]
    SigningBonusNotFound {
        /// The missing bonus id.
        id: String,
    },

    /// The referenced termination benefit does not exist.
    #[error("Termination benefit not found: {id}")]
    TerminationBenefitNotFound {
        /// The missing benefit id.
        id: String,
    },

    /// A lifecycle transition was attempted from a status that does not allow it.
    #[error("Cannot {transition} payroll run {run_id} while it is {status}")]
    InvalidStateTransition {
        /// The run the transition targeted.
        run_id: Uuid,
        /// The attempted transition.
        transition: String,
        /// The run's current status.
        status: String,
    },

    /// Another writer updated the run after it was read.
    #[error("Payroll run {run_id} was modified concurrently (expected version {expected}, found {actual})")]
    ConcurrentModification {
        /// The contended run.
        run_id: Uuid,
        /// The version the writer read.
        expected: u64,
        /// The version currently stored.
        actual: u64,
    },

    /// An administrative operation targeted an ancillary record that is no longer pending.
    #[error("{record} '{id}' is {status}; only pending records can be changed")]
    NotPending {
        /// The kind of record ("Signing bonus", "Termination benefit").
        record: String,
        /// The record id.
        id: String,
        /// The record's current status.
        status: String,
    },

    /// A field in an edit payload failed validation.
    #[error("Invalid update for field '{field}': {message}")]
    InvalidUpdate {
        /// The rejected field.
        field: String,
        /// Why it was rejected.
        message: String,
    },
}

impl EngineError {
    /// Returns true for errors the orchestrator absorbs per employee.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::ConfigurationMissing { .. }
                | EngineError::CalculationError { .. }
                | EngineError::DataSource { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
