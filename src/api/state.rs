//! Application state shared by the request handlers.

use std::sync::Arc;

use crate::engine::PayrollEngine;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<PayrollEngine>,
}

impl AppState {
    /// Wraps an engine for sharing across handlers.
    pub fn new(engine: PayrollEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Shares an engine the caller keeps a handle to.
    pub fn from_shared(engine: Arc<PayrollEngine>) -> Self {
        Self { engine }
    }

    /// The engine.
    pub fn engine(&self) -> &PayrollEngine {
        &self.engine
    }

    /// A handle to the engine that can move into a blocking task.
    pub fn shared_engine(&self) -> Arc<PayrollEngine> {
        Arc::clone(&self.engine)
    }
}
