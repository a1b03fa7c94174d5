//! Error types for frame graph, registry and factory operations.

use crate::types::Position;
use thiserror::Error;

/// Errors raised by the frame registry and its collaborators.
///
/// Internal invariant violations are not represented here: they indicate a
/// defect in the registry and abort with a panic instead of being returned.
#[derive(Debug, Error)]
pub enum DictError {
    /// No frame carries the requested domain
    #[error("No frame found with domain {domain}")]
    NotFound { domain: String },

    /// The domain is already claimed by another frame
    #[error("A frame already exists with domain {domain}")]
    DuplicateDomain { domain: String },

    /// The object does not provide the requested capability
    #[error("This is a {actual}, which is not a {expected}")]
    TypeMismatch { expected: String, actual: String },

    /// The class tag is not in the factory's class table
    #[error("Class {class} not supported")]
    UnsupportedType { class: String },

    /// The object body could not be decoded into the tagged class
    #[error("Malformed {class}: {reason}")]
    MalformedObject { class: String, reason: String },

    /// Position outside 1..=count
    #[error("Invalid frame index {position}; must be in range 1..={count}")]
    InvalidPosition { position: Position, count: usize },

    /// A frame graph must keep at least one frame
    #[error("Cannot remove the only frame of a frame set")]
    LastFrame,

    /// A mapping does not fit the frames it connects
    #[error("Axis mismatch: expected {expected} axes, found {actual}")]
    AxisMismatch { expected: usize, actual: usize },

    /// Logging or configuration setup failed
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DictError {
    /// Check if this error indicates an unknown domain
    pub fn is_not_found(&self) -> bool {
        matches!(self, DictError::NotFound { .. })
    }

    /// Check if this error indicates a domain collision
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DictError::DuplicateDomain { .. })
    }

    /// Check if this error comes from the object factory
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            DictError::TypeMismatch { .. }
                | DictError::UnsupportedType { .. }
                | DictError::MalformedObject { .. }
        )
    }
}

pub type Result<T, E = DictError> = std::result::Result<T, E>;
