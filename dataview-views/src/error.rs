//! Error types for the view state store

use dataview_fields::FieldsError;
use thiserror::Error;

/// Result type for view state operations
pub type Result<T> = std::result::Result<T, ViewError>;

/// Errors that can occur while transitioning view state
#[derive(Debug, Error)]
pub enum ViewError {
    /// Unknown field, missing capability, bad operator
    #[error(transparent)]
    Field(#[from] FieldsError),

    /// Filter value has the wrong shape for its operator
    #[error("invalid value for filter on '{field}': {message}")]
    InvalidFilterValue { field: String, message: String },

    /// Page size must be positive
    #[error("page size must be greater than zero")]
    InvalidPageSize,

    /// A command was built against an older snapshot
    #[error("stale revision: command built against {expected}, store is at {current}")]
    StaleRevision { expected: u64, current: u64 },

    /// The persistence collaborator failed
    #[error("persistence error: {message}")]
    Port { message: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ViewError {
    /// Create an invalid filter value error
    pub fn invalid_filter(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFilterValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a persistence error
    pub fn port(message: impl Into<String>) -> Self {
        Self::Port {
            message: message.into(),
        }
    }

    /// True for references to unknown or incapable fields
    pub fn is_invalid_field(&self) -> bool {
        matches!(self, Self::Field(e) if e.is_invalid_field())
    }
}
