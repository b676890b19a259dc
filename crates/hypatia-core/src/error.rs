//! Error types for Hypatia.
//!
//! Every [`SignatureError`] is a registration-time configuration defect: the
//! handler cannot be bound and the route should not be served. Nothing here
//! is ever reported to an HTTP client.

use hypatia_router::TemplateError;
use thiserror::Error;

/// Result type alias using [`SignatureError`].
pub type SignatureResult<T> = Result<T, SignatureError>;

/// Fatal configuration errors raised while analysing a handler signature.
///
/// # Example
///
/// ```
/// use hypatia_core::SignatureError;
///
/// let err = SignatureError::duplicate_wire_name("page", "filters", "paging");
/// assert!(err.to_string().contains("'filters' & 'paging'"));
/// assert_eq!(err.handler(), None);
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// Two parameters map to the same wire name within one source group.
    #[error("Duplicated name: '{name}' in params: '{first}' & '{second}'")]
    DuplicateWireName {
        /// The clashing wire name.
        name: String,
        /// Parameter that claimed the name first.
        first: String,
        /// Parameter that claimed it again.
        second: String,
    },

    /// A path-bound parameter declared a default value.
    #[error("'{name}' is a path param, default not allowed")]
    PathParamDefault {
        /// The parameter name.
        name: String,
    },

    /// Path template names with no matching handler parameter, raised only
    /// when the missing-path-parameter policy is `deny`.
    #[error("Field(s) {missing:?} are in the view path, but were not found in the signature of '{handler}'")]
    MissingPathParams {
        /// The handler name.
        handler: String,
        /// Sorted missing names.
        missing: Vec<String>,
    },

    /// The path template could not be parsed.
    #[error("Invalid path template: {0}")]
    InvalidPathTemplate(#[from] TemplateError),

    /// Wraps another error with the handler it was raised for.
    #[error("Cannot bind handler '{handler}': {source}")]
    Handler {
        /// The handler name.
        handler: String,
        /// The underlying error.
        #[source]
        source: Box<SignatureError>,
    },
}

impl SignatureError {
    /// Creates a duplicate wire name error.
    #[must_use]
    pub fn duplicate_wire_name(
        name: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicateWireName {
            name: name.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Creates a path-param-with-default error.
    #[must_use]
    pub fn path_param_default(name: impl Into<String>) -> Self {
        Self::PathParamDefault { name: name.into() }
    }

    /// Attaches the handler name, unless one is already attached.
    #[must_use]
    pub fn for_handler(self, handler: impl Into<String>) -> Self {
        match self {
            already @ (Self::Handler { .. } | Self::MissingPathParams { .. }) => already,
            other => Self::Handler {
                handler: handler.into(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the handler this error was attributed to, if any.
    #[must_use]
    pub fn handler(&self) -> Option<&str> {
        match self {
            Self::Handler { handler, .. } | Self::MissingPathParams { handler, .. } => {
                Some(handler.as_str())
            }
            _ => None,
        }
    }

    /// Returns the innermost error, skipping handler attribution.
    #[must_use]
    pub fn root(&self) -> &SignatureError {
        match self {
            Self::Handler { source, .. } => source.root(),
            other => other,
        }
    }
}
