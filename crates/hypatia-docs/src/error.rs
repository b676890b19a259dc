//! Error types for the documentation generation crate.
//!
//! This module defines errors that can occur while describing a handler
//! signature as OpenAPI and serializing the result.

use thiserror::Error;

/// Errors that can occur during documentation generation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize OpenAPI document to JSON.
    #[error("Failed to serialize OpenAPI document: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A flattened wire name did not resolve to a declared field.
    #[error("Wire name '{wire_name}' of the {schema} schema does not resolve to a field")]
    UnresolvedField {
        /// Synthesized schema name.
        schema: String,
        /// The flattened wire name.
        wire_name: String,
    },

    /// Schema conversion failed.
    #[error("Failed to convert schema: {reason}")]
    SchemaConversionError {
        /// The reason for the conversion failure.
        reason: String,
    },

    /// Invalid operation definition.
    #[error("Invalid operation '{operation_id}': {reason}")]
    InvalidOperation {
        /// The operation ID that is invalid.
        operation_id: String,
        /// The reason the operation is invalid.
        reason: String,
    },
}

impl DocsError {
    /// Create an unresolved field error.
    pub fn unresolved_field(schema: impl Into<String>, wire_name: impl Into<String>) -> Self {
        Self::UnresolvedField {
            schema: schema.into(),
            wire_name: wire_name.into(),
        }
    }

    /// Create a schema conversion error.
    pub fn schema_conversion(reason: impl Into<String>) -> Self {
        Self::SchemaConversionError {
            reason: reason.into(),
        }
    }
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;
