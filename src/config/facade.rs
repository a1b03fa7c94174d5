//! ConfigLoader facade composing defaults, file and environment sources.

use super::sources::{environment, file};
use super::FrameDictConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from defaults and environment, plus `path` if it
    /// exists.
    /// Precedence: defaults (lowest) -> file -> environment (highest).
    pub fn load(path: Option<&Path>) -> Result<FrameDictConfig, ConfigError> {
        let builder = Self::builder_with_defaults()?;
        let builder = match path {
            Some(path) => file::add_to_builder(builder, path, false)?,
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }

    /// Load configuration from a specific file with environment overlay.
    /// The file must exist.
    pub fn load_from_file(path: &Path) -> Result<FrameDictConfig, ConfigError> {
        let builder = Self::builder_with_defaults()?;
        let builder = file::add_to_builder(builder, path, true)?;
        let builder = environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }

    /// Create default configuration.
    pub fn default() -> FrameDictConfig {
        FrameDictConfig::default()
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = Config::try_from(&FrameDictConfig::default())?;
        Ok(Config::builder().add_source(defaults))
    }
}
