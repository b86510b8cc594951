//! Error types for the query pipeline and layouts

use dataview_fields::FieldsError;
use dataview_views::ViewError;
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while evaluating or laying out a view
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Field(#[from] FieldsError),

    #[error(transparent)]
    View(#[from] ViewError),

    /// Record not found
    #[error("record not found: {id}")]
    RecordNotFound { id: String },

    /// Column not found
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// A layout was requested without the options it needs
    #[error("view type '{view_type}' needs {missing} options")]
    MissingLayoutOptions { view_type: String, missing: String },

    /// An aggregation that cannot be evaluated as configured
    #[error("invalid aggregation '{function}': {message}")]
    InvalidAggregation { function: String, message: String },

    /// Month outside 1..=12 or year outside the calendar range
    #[error("invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    /// Configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(#[from] serde_yaml_ng::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Create a missing layout options error
    pub fn missing_options(view_type: impl ToString, missing: impl Into<String>) -> Self {
        Self::MissingLayoutOptions {
            view_type: view_type.to_string(),
            missing: missing.into(),
        }
    }

    /// True for references to unknown or incapable fields, at any layer
    pub fn is_invalid_field(&self) -> bool {
        match self {
            Self::Field(e) => e.is_invalid_field(),
            Self::View(e) => e.is_invalid_field(),
            _ => false,
        }
    }
}
