//! Parameter-source markers.
//!
//! A [`ParamSource`] says where in a request a handler parameter is read
//! from. Developers attach one explicitly as a parameter default
//! (`q: int = Query(5)`); otherwise the signature analyser infers one.
//!
//! | Kind | Reads from | Tag |
//! |------|-----------|-----|
//! | [`SourceKind::Path`] | URL path segment | `path` |
//! | [`SourceKind::Query`] | Query string | `query` |
//! | [`SourceKind::Header`] | Request header | `header` |
//! | [`SourceKind::Cookie`] | Cookie | `cookie` |
//! | [`SourceKind::Form`] | Form field | `form` |
//! | [`SourceKind::File`] | Uploaded file | `file` |
//! | [`SourceKind::Body`] | JSON body | `body` |
//! | [`SourceKind::MultipartBody`] | JSON part of a multipart body | `body` |
//! | [`SourceKind::Request`] | The request object itself | `_request` |

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where a parameter's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Path parameters (e.g., `/users/{id}`)
    Path,
    /// Query string parameters
    Query,
    /// HTTP headers
    Header,
    /// Cookies
    Cookie,
    /// URL-encoded or multipart form fields
    Form,
    /// Uploaded files
    File,
    /// JSON request body
    Body,
    /// JSON body fields sent alongside files or form fields
    MultipartBody,
    /// The request object, injected without validation
    Request,
}

impl SourceKind {
    /// All kinds, in declaration order.
    pub const ALL: [SourceKind; 9] = [
        Self::Path,
        Self::Query,
        Self::Header,
        Self::Cookie,
        Self::Form,
        Self::File,
        Self::Body,
        Self::MultipartBody,
        Self::Request,
    ];

    /// Tag consumed by the dispatcher to pick the request part to read.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Form => "form",
            Self::File => "file",
            Self::Body | Self::MultipartBody => "body",
            Self::Request => "_request",
        }
    }

    /// Name given to the schema synthesized for this kind.
    #[must_use]
    pub const fn schema_name(&self) -> &'static str {
        match self {
            Self::Path => "PathParams",
            Self::Query => "QueryParams",
            Self::Header => "HeaderParams",
            Self::Cookie => "CookieParams",
            Self::Form => "FormParams",
            Self::File => "FileParams",
            Self::Body => "BodyParams",
            Self::MultipartBody => "MultipartBodyParams",
            Self::Request => "RequestParams",
        }
    }

    /// True for kinds whose wire format is a flat key/value list.
    ///
    /// Structured parameters bound to these kinds are flattened into one wire
    /// key per leaf field.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        matches!(
            self,
            Self::Path | Self::Query | Self::Header | Self::Cookie | Self::Form
        )
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultipartBody => write!(f, "multipart body"),
            Self::Request => write!(f, "request"),
            other => write!(f, "{}", other.tag()),
        }
    }
}

/// Default carried by a marker.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamDefault {
    /// No default; the value must be supplied (`...`).
    Required,
    /// A literal default. `null` is the none value.
    Value(Value),
}

impl ParamDefault {
    /// Returns true if no default exists.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }

    /// Returns the literal default, if any.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Required => None,
            Self::Value(v) => Some(v),
        }
    }
}

/// A parameter-source marker.
///
/// # Example
///
/// ```
/// use hypatia_core::{ParamSource, SourceKind};
/// use serde_json::json;
///
/// let token = ParamSource::header().alias("X-Token");
/// assert_eq!(token.kind(), SourceKind::Header);
/// assert!(token.default().is_required());
///
/// let limit = ParamSource::query().with_default(json!(20));
/// assert_eq!(limit.default().value(), Some(&json!(20)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSource {
    kind: SourceKind,
    default: ParamDefault,
    alias: Option<String>,
    description: Option<String>,
}

impl ParamSource {
    /// Creates a required marker of the given kind.
    #[must_use]
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            default: ParamDefault::Required,
            alias: None,
            description: None,
        }
    }

    /// `Path(...)`
    #[must_use]
    pub fn path() -> Self {
        Self::new(SourceKind::Path)
    }

    /// `Query(...)`
    #[must_use]
    pub fn query() -> Self {
        Self::new(SourceKind::Query)
    }

    /// `Header(...)`
    #[must_use]
    pub fn header() -> Self {
        Self::new(SourceKind::Header)
    }

    /// `Cookie(...)`
    #[must_use]
    pub fn cookie() -> Self {
        Self::new(SourceKind::Cookie)
    }

    /// `Form(...)`
    #[must_use]
    pub fn form() -> Self {
        Self::new(SourceKind::Form)
    }

    /// `File(...)`
    #[must_use]
    pub fn file() -> Self {
        Self::new(SourceKind::File)
    }

    /// `Body(...)`
    #[must_use]
    pub fn body() -> Self {
        Self::new(SourceKind::Body)
    }

    /// Marker for the injected request object.
    #[must_use]
    pub fn request() -> Self {
        Self::new(SourceKind::Request)
    }

    /// Sets a literal default.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = ParamDefault::Value(value);
        self
    }

    /// Sets the default explicitly.
    #[must_use]
    pub fn with_param_default(mut self, default: ParamDefault) -> Self {
        self.default = default;
        self
    }

    /// Sets the wire alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Sets a description for generated documentation.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the source kind.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Returns the default.
    #[must_use]
    pub const fn default(&self) -> &ParamDefault {
        &self.default
    }

    /// Returns the wire alias override, if any.
    #[must_use]
    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns a copy retagged to another kind, keeping default and alias.
    #[must_use]
    pub fn retagged(&self, kind: SourceKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }
}
