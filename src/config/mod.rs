//! Configuration loading for the payroll engine.
//!
//! This module loads the engine's payroll policy (engine metadata and the
//! attendance penalty constants) from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll").unwrap();
//! println!("Loaded engine: {}", config.engine().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineMetadata, PenaltyConfig, PenaltyPolicy, PayrollPolicy};
