//! Error types for structure inference

use thiserror::Error;

/// Errors that can occur during structure inference
///
/// Only structural conflicts are errors. Ambiguous or missing evidence is
/// reported as `None` by the inference functions instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// A field holds nested objects in some samples and scalars in others
    #[error("Field [{field}] has both object and non-object values")]
    MixedObjectField { field: String },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// A sample was not a JSON object
    #[error("Invalid sample structure: expected object, found {0}")]
    InvalidStructure(String),
}

/// Result type for inference operations
pub type InferenceResult<T> = Result<T, InferenceError>;

impl InferenceError {
    /// Create a mixed object/non-object error for a field
    pub fn mixed_object_field(field: impl Into<String>) -> Self {
        Self::MixedObjectField {
            field: field.into(),
        }
    }
}

impl From<serde_json::Error> for InferenceError {
    fn from(e: serde_json::Error) -> Self {
        InferenceError::JsonParse(e.to_string())
    }
}
