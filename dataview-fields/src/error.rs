//! Error types for the field schema

use thiserror::Error;

/// Result type for field schema operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur while building or consulting a field schema
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldsError {
    /// Two fields share a key
    #[error("duplicate field key: {key}")]
    DuplicateKey { key: String },

    /// A field was declared with an empty key
    #[error("field key cannot be empty")]
    EmptyKey,

    /// Options declared on a type that is not enumerable
    #[error("field '{key}' declares options but its type '{field_type}' is not enumerable")]
    UnexpectedOptions { key: String, field_type: String },

    /// Select/multiselect field without options
    #[error("field '{key}' of type '{field_type}' requires options")]
    MissingOptions { key: String, field_type: String },

    /// Two options of the same field share a value
    #[error("field '{key}' declares option '{value}' more than once")]
    DuplicateOption { key: String, value: String },

    /// Validation rules that can never be satisfied or do not parse
    #[error("invalid validation rules on field '{key}': {message}")]
    InvalidValidation { key: String, message: String },

    /// Field not found by key
    #[error("field not found: {key}")]
    FieldNotFound { key: String },

    /// Field exists but lacks the capability the caller needs
    #[error("field '{key}' is not {capability}")]
    MissingCapability { key: String, capability: String },

    /// Operator string that the engine does not know
    #[error("unsupported filter operator: {operator}")]
    UnsupportedOperator { operator: String },

    /// Operator is known but meaningless for the field's type
    #[error("operator '{operator}' cannot be applied to field '{key}' of type '{field_type}'")]
    TypeMismatch {
        key: String,
        operator: String,
        field_type: String,
    },

    /// A value failed the field's validation rules
    #[error("validation error on field '{field}': {message}")]
    ValidationFailed { field: String, message: String },
}

impl FieldsError {
    /// Create a validation failure
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for errors raised while building a schema from malformed configs
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateKey { .. }
                | Self::EmptyKey
                | Self::UnexpectedOptions { .. }
                | Self::MissingOptions { .. }
                | Self::DuplicateOption { .. }
                | Self::InvalidValidation { .. }
        )
    }

    /// True for references to unknown or incapable fields
    pub fn is_invalid_field(&self) -> bool {
        matches!(
            self,
            Self::FieldNotFound { .. } | Self::MissingCapability { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldsError::FieldNotFound {
            key: "status".into(),
        };
        assert_eq!(err.to_string(), "field not found: status");
    }

    #[test]
    fn test_validation_error() {
        let err = FieldsError::validation("budget", "must be at least 0");
        assert!(err.to_string().contains("budget"));
        assert!(err.to_string().contains("must be at least 0"));
    }

    #[test]
    fn test_error_classification() {
        assert!(FieldsError::EmptyKey.is_schema_error());
        assert!(!FieldsError::EmptyKey.is_invalid_field());

        let err = FieldsError::MissingCapability {
            key: "notes".into(),
            capability: "filterable".into(),
        };
        assert!(err.is_invalid_field());
        assert!(!err.is_schema_error());
        assert_eq!(err.to_string(), "field 'notes' is not filterable");
    }
}
