//! Logging System
//!
//! The library only emits `tracing` events. Applications embedding it call
//! [`init_logging`] to install a subscriber with a level filter, a text or
//! JSON format and one or more destinations.

use crate::error::DictError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const ENV_FILTER: &str = "FRAMEDICT_LOG";
const ENV_MODULES: &str = "FRAMEDICT_LOG_MODULES";
const ENV_FORMAT: &str = "FRAMEDICT_LOG_FORMAT";
const ENV_OUTPUT: &str = "FRAMEDICT_LOG_OUTPUT";
const ENV_FILE: &str = "FRAMEDICT_LOG_FILE";

/// Event rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(DictError::ConfigError(format!(
                "Invalid log format: {other} (must be 'json' or 'text')"
            ))),
        }
    }
}

/// Where events are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
    File,
    #[serde(rename = "file+stderr")]
    FileAndStderr,
    /// stdout and stderr
    Both,
}

impl LogOutput {
    fn writes_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }

    fn writes_stderr(self) -> bool {
        matches!(self, LogOutput::Stderr | LogOutput::FileAndStderr | LogOutput::Both)
    }

    fn writes_stdout(self) -> bool {
        matches!(self, LogOutput::Stdout | LogOutput::Both)
    }
}

impl FromStr for LogOutput {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stdout" => Ok(LogOutput::Stdout),
            "stderr" => Ok(LogOutput::Stderr),
            "file" => Ok(LogOutput::File),
            "file+stderr" => Ok(LogOutput::FileAndStderr),
            "both" => Ok(LogOutput::Both),
            other => Err(DictError::ConfigError(format!(
                "Invalid log output: {other} (must be 'stdout', 'stderr', 'file', 'file+stderr' or 'both')"
            ))),
        }
    }
}

impl fmt::Display for LogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogOutput::Stdout => "stdout",
            LogOutput::Stderr => "stderr",
            LogOutput::File => "file",
            LogOutput::FileAndStderr => "file+stderr",
            LogOutput::Both => "both",
        };
        f.write_str(name)
    }
}

/// Logging configuration, the `[logging]` table of [`crate::config::FrameDictConfig`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,

    /// trace, debug, info, warn, error or off
    pub level: String,

    pub format: LogFormat,

    pub output: LogOutput,

    /// Log file when `output` includes a file; `None` uses the state directory
    pub file: Option<PathBuf>,

    /// ANSI colors for text written to a terminal
    pub color: bool,

    /// Per-module levels, e.g. `"framedict::dict" = "debug"`
    pub modules: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file: None,
            color: true,
            modules: HashMap::new(),
        }
    }
}

/// Pick the log file: `FRAMEDICT_LOG_FILE`, then the configured path, then
/// `framedict.log` in the platform state directory.
pub fn log_file_path(configured: Option<&Path>) -> Result<PathBuf, DictError> {
    match std::env::var(ENV_FILE) {
        Ok(path) if !path.is_empty() => return Ok(PathBuf::from(path)),
        _ => {}
    }
    if let Some(path) = configured.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path.to_path_buf());
    }
    let dirs = directories::ProjectDirs::from("", "framedict", "framedict").ok_or_else(|| {
        DictError::ConfigError("No platform state directory for the log file".to_string())
    })?;
    let dir = dirs.state_dir().unwrap_or_else(|| dirs.data_local_dir());
    Ok(dir.join("framedict.log"))
}

/// Install the global subscriber.
///
/// `FRAMEDICT_LOG*` environment variables take precedence over `config`,
/// which takes precedence over [`LoggingConfig::default`]. Fails if a
/// subscriber is already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), DictError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    if !config.enabled {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(install_error);
    }

    let filter = build_filter(config)?;
    let format = env_override(ENV_FORMAT)?.unwrap_or(config.format);
    let output = env_override(ENV_OUTPUT)?.unwrap_or(config.output);
    let writer = build_writer(output, config.file.as_deref())?;
    let ansi = config.color && !output.writes_file();

    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);
    let registry = Registry::default().with(filter);
    match format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Text => registry.with(layer.with_ansi(ansi)).try_init(),
    }
    .map_err(install_error)
}

fn install_error(err: impl fmt::Display) -> DictError {
    DictError::ConfigError(format!("Failed to install subscriber: {err}"))
}

fn env_override<T: FromStr<Err = DictError>>(var: &str) -> Result<Option<T>, DictError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => value.parse().map(Some),
        _ => Ok(None),
    }
}

fn build_writer(output: LogOutput, configured: Option<&Path>) -> Result<BoxMakeWriter, DictError> {
    if output.writes_file() {
        let file = Mutex::new(open_log_file(&log_file_path(configured)?)?);
        return Ok(if output.writes_stderr() {
            BoxMakeWriter::new(file.and(std::io::stderr))
        } else {
            BoxMakeWriter::new(file)
        });
    }
    Ok(match (output.writes_stdout(), output.writes_stderr()) {
        (true, true) => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
        (true, false) => BoxMakeWriter::new(std::io::stdout),
        _ => BoxMakeWriter::new(std::io::stderr),
    })
}

fn open_log_file(path: &Path) -> Result<std::fs::File, DictError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DictError::ConfigError(format!("Failed to create log directory: {e}"))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| DictError::ConfigError(format!("Failed to open log file {path:?}: {e}")))
}

/// `FRAMEDICT_LOG` replaces the whole filter. Otherwise the configured level
/// is extended with configured module levels, then `FRAMEDICT_LOG_MODULES`
/// (`module=level,module=level`).
fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, DictError> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_FILTER) {
        return Ok(filter);
    }
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let env_modules = std::env::var(ENV_MODULES).unwrap_or_default();
    let from_env = env_modules
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(module, level)| (module.trim(), level.trim()));
    let from_config = config
        .modules
        .iter()
        .map(|(module, level)| (module.as_str(), level.as_str()));

    from_config
        .chain(from_env)
        .try_fold(EnvFilter::new(&config.level), |filter, (module, level)| -> Result<EnvFilter, DictError> {
            let directive: Directive = format!("{module}={level}").parse().map_err(|e| {
                DictError::ConfigError(format!("Invalid log directive {module}={level}: {e}"))
            })?;
            Ok(filter.add_directive(directive))
        })
}
