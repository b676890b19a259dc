//! Reflected handler signatures.
//!
//! A [`Signature`] is what the registration layer knows about a handler:
//! its name, its declared parameters in order, its docstring and where it was
//! defined. Extensions may append already-classified parameters with
//! [`Signature::contribute`].
//!
//! # Example
//!
//! ```
//! use hypatia_core::{ParamSource, TypeRef};
//! use hypatia_signature::{Parameter, Signature};
//! use serde_json::json;
//!
//! let signature = Signature::new("list_items")
//!     .param(Parameter::new("request"))
//!     .param(Parameter::new("limit").annotated(TypeRef::Int).default_value(json!(20)))
//!     .param(Parameter::new("token").default_source(ParamSource::header().alias("X-Token")))
//!     .param(Parameter::var_kwargs("kwargs"))
//!     .doc("List items.");
//!
//! assert_eq!(signature.params().len(), 4);
//! ```

use std::fmt;
use std::panic::Location;

use hypatia_core::{ParamSource, TypeRef};
use serde_json::Value;

/// How a parameter may be passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterKind {
    /// Positional only.
    PositionalOnly,
    /// Positional or keyword.
    #[default]
    PositionalOrKeyword,
    /// `*args`
    VarPositional,
    /// Keyword only.
    KeywordOnly,
    /// `**kwargs`
    VarKeyword,
}

/// A parameter's declared default.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgDefault {
    /// No default declared.
    Empty,
    /// The `...` sentinel used as a default.
    Ellipsis,
    /// A literal value. `null` is the none value.
    Value(Value),
    /// An explicit parameter-source marker.
    Source(ParamSource),
}

impl ArgDefault {
    /// Returns true if no default was declared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns true if the default is the none value.
    #[must_use]
    pub const fn is_none_value(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    /// Returns the marker if the default is one.
    #[must_use]
    pub const fn as_source(&self) -> Option<&ParamSource> {
        match self {
            Self::Source(source) => Some(source),
            _ => None,
        }
    }
}

/// One declared handler parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Identifier as declared.
    pub name: String,
    /// Declared annotation; `None` means no annotation was written.
    pub annotation: Option<TypeRef>,
    /// Declared default.
    pub default: ArgDefault,
    /// Passing kind.
    pub kind: ParameterKind,
}

impl Parameter {
    /// Creates an unannotated parameter without default.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            default: ArgDefault::Empty,
            kind: ParameterKind::PositionalOrKeyword,
        }
    }

    /// `*args`
    #[must_use]
    pub fn var_args(name: impl Into<String>) -> Self {
        Self::new(name).kind(ParameterKind::VarPositional)
    }

    /// `**kwargs`
    #[must_use]
    pub fn var_kwargs(name: impl Into<String>) -> Self {
        Self::new(name).kind(ParameterKind::VarKeyword)
    }

    /// Sets the annotation.
    #[must_use]
    pub fn annotated(mut self, ty: TypeRef) -> Self {
        self.annotation = Some(ty);
        self
    }

    /// Sets a literal default.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = ArgDefault::Value(value);
        self
    }

    /// Uses `...` as the default.
    #[must_use]
    pub fn ellipsis_default(mut self) -> Self {
        self.default = ArgDefault::Ellipsis;
        self
    }

    /// Uses a parameter-source marker as the default.
    #[must_use]
    pub fn default_source(mut self, source: ParamSource) -> Self {
        self.default = ArgDefault::Source(source);
        self
    }

    /// Sets the passing kind.
    #[must_use]
    pub fn kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A parameter appended by an extension, already bound to a source.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributedParam {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Source marker.
    pub source: ParamSource,
}

/// Where a handler is defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file.
    pub file: String,
    /// 1-based line.
    pub line: u32,
}

impl SourceLocation {
    /// Creates a location.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// The location of the caller.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A handler's reflected signature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    name: String,
    params: Vec<Parameter>,
    doc: Option<String>,
    location: Option<SourceLocation>,
    contributed: Vec<ContributedParam>,
}

impl Signature {
    /// Creates an empty signature for the named handler.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends a declared parameter.
    #[must_use]
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Sets the docstring.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Sets the definition site.
    #[must_use]
    pub fn located_at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Records the caller as the definition site.
    #[must_use]
    #[track_caller]
    pub fn located_here(self) -> Self {
        self.located_at(SourceLocation::caller())
    }

    /// Appends a parameter contributed by an extension.
    #[must_use]
    pub fn contribute(mut self, name: impl Into<String>, ty: TypeRef, source: ParamSource) -> Self {
        self.contributed.push(ContributedParam {
            name: name.into(),
            ty,
            source,
        });
        self
    }

    /// Handler name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters, in order.
    #[must_use]
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Raw docstring.
    #[must_use]
    pub fn docstring(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Definition site.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    /// Contributed parameters, in order.
    #[must_use]
    pub fn contributed(&self) -> &[ContributedParam] {
        &self.contributed
    }
}

/// Normalises docstring indentation.
///
/// Tabs are expanded to eight-column stops. Leading whitespace is removed from
/// the first line, the common indentation of the remaining lines is removed,
/// and blank lines at either end are dropped. Indentation is counted in
/// characters.
#[must_use]
pub fn clean_docstring(doc: &str) -> String {
    let lines: Vec<String> = doc.lines().map(expand_tabs).collect();
    let Some((first, rest)) = lines.split_first() else {
        return String::new();
    };

    let margin = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| indent_width(line))
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    cleaned.push(first.trim_start());
    for line in rest {
        cleaned.push(skip_chars(line, margin).trim_end());
    }

    while cleaned.last().is_some_and(|l| l.trim().is_empty()) {
        cleaned.pop();
    }
    let start = cleaned
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(cleaned.len());

    cleaned[start..].join("\n")
}

fn expand_tabs(line: &str) -> String {
    const TAB_STOP: usize = 8;
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_STOP - column % TAB_STOP;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

/// Number of leading whitespace characters.
fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn skip_chars(line: &str, count: usize) -> &str {
    line.char_indices().nth(count).map_or("", |(i, _)| &line[i..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parameter_builders() {
        let param = Parameter::new("limit")
            .annotated(TypeRef::Int)
            .default_value(json!(10))
            .kind(ParameterKind::KeywordOnly);

        assert_eq!(param.annotation, Some(TypeRef::Int));
        assert_eq!(param.default, ArgDefault::Value(json!(10)));
        assert_eq!(param.kind, ParameterKind::KeywordOnly);
    }

    #[test]
    fn test_arg_default_predicates() {
        assert!(ArgDefault::Empty.is_empty());
        assert!(ArgDefault::Value(Value::Null).is_none_value());
        assert!(!ArgDefault::Value(json!(0)).is_none_value());
        assert!(ArgDefault::Source(ParamSource::query()).as_source().is_some());
    }

    #[test]
    fn test_located_here() {
        let signature = Signature::new("f").located_here();
        let location = signature.location().unwrap();
        assert!(location.file.ends_with("reflect.rs"));
        assert!(location.line > 0);
    }

    #[test]
    fn test_contribute() {
        let signature =
            Signature::new("f").contribute("user", TypeRef::named("User"), ParamSource::header());
        assert_eq!(signature.contributed().len(), 1);
        assert_eq!(signature.contributed()[0].name, "user");
    }

    #[test]
    fn test_clean_docstring() {
        let doc = "\n    Get an item.\n\n    Returns 404 if missing.\n      Indented.\n    ";
        assert_eq!(
            clean_docstring(doc),
            "Get an item.\n\nReturns 404 if missing.\n  Indented."
        );
    }

    #[test]
    fn test_clean_docstring_first_line() {
        assert_eq!(clean_docstring("  Summary.\n    Body."), "Summary.\nBody.");
        assert_eq!(clean_docstring(""), "");
        assert_eq!(clean_docstring("   \n  "), "");
    }

    #[test]
    fn test_clean_docstring_wide_whitespace() {
        let doc = "Summary.\n\u{3000}Wide indent.\n  Two spaces.";
        assert_eq!(clean_docstring(doc), "Summary.\nWide indent.\n Two spaces.");
    }

    #[test]
    fn test_clean_docstring_tabs() {
        let doc = "Summary.\n\tBody.\n        Same column.\n\t  Deeper.";
        assert_eq!(
            clean_docstring(doc),
            "Summary.\nBody.\nSame column.\n  Deeper."
        );
    }
}
