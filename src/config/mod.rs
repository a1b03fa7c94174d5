//! Configuration
//!
//! Layered configuration for applications embedding the frame dictionary:
//! built-in defaults, then an optional file, then `FRAMEDICT__*` environment
//! overrides.

pub mod facade;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameDictConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
}
