//! The payroll engine: run initiation, the run lifecycle and the
//! administrative operations on one-off payments.
//!
//! [`PayrollEngine`] ties the pure calculation stages to the data source it
//! reads from and the store it persists into. Its operations are split by
//! concern:
//!
//! - `orchestrator`: [`PayrollEngine::initiate_payroll`]
//! - `lifecycle`: review, approvals, lock/unlock, execution and reads
//! - `ancillary_admin`: approve, edit and reject pending bonuses and benefits

mod ancillary_admin;
mod lifecycle;
mod orchestrator;
#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::sources::PayrollDataSource;
use crate::store::PayrollStore;

pub use lifecycle::{RunAction, apply_action};
pub use orchestrator::{EmployeeFailure, RunInitiation};

/// Computes payroll runs and drives them through approval.
pub struct PayrollEngine {
    source: Arc<dyn PayrollDataSource>,
    store: PayrollStore,
    config: ConfigLoader,
}

impl PayrollEngine {
    /// Creates an engine over a data source with an empty store.
    pub fn new(source: Arc<dyn PayrollDataSource>, config: ConfigLoader) -> Self {
        Self {
            source,
            store: PayrollStore::new(),
            config,
        }
    }

    /// The collaborator data source.
    pub fn source(&self) -> &dyn PayrollDataSource {
        self.source.as_ref()
    }

    /// The engine-owned store.
    pub fn store(&self) -> &PayrollStore {
        &self.store
    }

    /// The loaded policy configuration.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}
