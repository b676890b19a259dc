//! Non-fatal findings about a handler.

use std::fmt;

use hypatia_core::SignatureError;

use crate::reflect::SourceLocation;

/// What a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Path template names with no matching handler parameter.
    MissingPathParams {
        /// Sorted missing names.
        missing: Vec<String>,
    },
}

/// A finding attributed to a handler definition.
///
/// Diagnostics are collected on the signature. Whether they are logged,
/// raised or dropped is decided by
/// [`PathParamPolicy`](hypatia_core::PathParamPolicy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Finding.
    pub kind: DiagnosticKind,
    /// Human readable message.
    pub message: String,
    /// Handler name.
    pub handler: String,
    /// Where the handler is defined, if known.
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    /// Path names that no parameter reads.
    #[must_use]
    pub fn missing_path_params(
        handler: impl Into<String>,
        missing: Vec<String>,
        location: Option<SourceLocation>,
    ) -> Self {
        let handler = handler.into();
        let message = format!(
            "Field(s) {missing:?} are in the view path, but were not found in the signature of '{handler}'"
        );
        Self {
            kind: DiagnosticKind::MissingPathParams { missing },
            message,
            handler,
            location,
        }
    }

    /// Converts into the matching error.
    #[must_use]
    pub fn into_error(self) -> SignatureError {
        match self.kind {
            DiagnosticKind::MissingPathParams { missing } => SignatureError::MissingPathParams {
                handler: self.handler,
                missing,
            },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{location}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
