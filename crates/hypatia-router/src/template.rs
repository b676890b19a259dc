//! Path template parsing.
//!
//! A template is split on `/` into segments. A segment is either static text
//! or text containing one or more `{name}` / `{converter:name}` placeholders.
//! Any other character, `*` included, is literal.

use std::sync::LazyLock;

use regex::Regex;
use smallvec::SmallVec;

use crate::error::TemplateError;

/// Most segments carry a single placeholder.
const INLINE_PLACEHOLDERS: usize = 2;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("valid placeholder regex"));

/// A `{...}` placeholder inside a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The parameter name (text after the last `:`).
    pub name: String,
    /// Optional converter prefix, e.g. `int` in `{int:id}`.
    pub converter: Option<String>,
}

/// Type of path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Static path segment (e.g., "users", "api")
    Static,
    /// Segment with named placeholders (e.g., "{id}", "{name}.{ext}")
    Param(SmallVec<[Placeholder; INLINE_PLACEHOLDERS]>),
}

/// A single `/`-separated piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Raw segment text as written in the template.
    pub raw: String,
    /// Parsed kind.
    pub kind: SegmentKind,
}

/// A parsed path template.
///
/// # Example
///
/// ```rust
/// use hypatia_router::PathTemplate;
///
/// let template = PathTemplate::parse("/users/{int:user_id}/files/{name}.{ext}").unwrap();
/// assert_eq!(template.param_names(), vec!["user_id", "name", "ext"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parses a template string.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] for unbalanced braces and empty placeholders.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let segments = template
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|part| Self::parse_segment(template, part))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    fn parse_segment(template: &str, part: &str) -> Result<Segment, TemplateError> {
        let mut placeholders = SmallVec::new();
        for cap in PLACEHOLDER.captures_iter(part) {
            let Some(inner) = cap.get(1) else { continue };
            placeholders.push(Self::parse_placeholder(template, inner.as_str())?);
        }

        // Anything brace-like left after removing well-formed placeholders is unbalanced.
        let leftover = PLACEHOLDER.replace_all(part, "");
        if leftover.contains('{') || leftover.contains('}') {
            return Err(TemplateError::unbalanced(template, part));
        }

        let kind = if placeholders.is_empty() {
            SegmentKind::Static
        } else {
            SegmentKind::Param(placeholders)
        };

        Ok(Segment {
            raw: part.to_string(),
            kind,
        })
    }

    fn parse_placeholder(template: &str, inner: &str) -> Result<Placeholder, TemplateError> {
        let (converter, name) = match inner.rsplit_once(':') {
            Some((converter, name)) => (Some(converter.trim().to_string()), name.trim()),
            None => (None, inner.trim()),
        };

        if name.is_empty() {
            return Err(TemplateError::empty_placeholder(template));
        }

        Ok(Placeholder {
            name: name.to_string(),
            converter: converter.filter(|c| !c.is_empty()),
        })
    }

    /// Returns the template as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the declared parameter names in first-seen order, without duplicates.
    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            let SegmentKind::Param(placeholders) = &segment.kind else {
                continue;
            };
            for placeholder in placeholders {
                if !names.contains(&placeholder.name.as_str()) {
                    names.push(placeholder.name.as_str());
                }
            }
        }
        names
    }

    /// Returns true if the template declares any parameter.
    #[must_use]
    pub fn has_params(&self) -> bool {
        self.segments
            .iter()
            .any(|s| !matches!(s.kind, SegmentKind::Static))
    }
}

/// Extracts the declared parameter names from a template.
///
/// Turns `/foo/{var}/path/{int:another}/end` into `["var", "another"]`.
///
/// # Errors
///
/// Returns [`TemplateError`] if the template cannot be parsed.
pub fn path_param_names(template: &str) -> Result<Vec<String>, TemplateError> {
    let parsed = PathTemplate::parse(template)?;
    Ok(parsed.param_names().into_iter().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_template() {
        let template = PathTemplate::parse("/api/users").unwrap();
        assert_eq!(template.segments().len(), 2);
        assert!(!template.has_params());
        assert!(template.param_names().is_empty());
    }

    #[test]
    fn test_root_template() {
        let template = PathTemplate::parse("/").unwrap();
        assert!(template.segments().is_empty());
        assert!(template.param_names().is_empty());
    }

    #[test]
    fn test_param_with_converter() {
        let template = PathTemplate::parse("/items/{int:item_id}").unwrap();
        match &template.segments()[1].kind {
            SegmentKind::Param(p) => {
                assert_eq!(p[0].name, "item_id");
                assert_eq!(p[0].converter.as_deref(), Some("int"));
            }
            other => panic!("unexpected segment kind: {other:?}"),
        }
    }

    #[test]
    fn test_multiple_placeholders_in_segment() {
        let names = path_param_names("/files/{name}.{ext}").unwrap();
        assert_eq!(names, vec!["name", "ext"]);
    }

    #[test]
    fn test_duplicate_names_are_collapsed() {
        let names = path_param_names("/{id}/copy/{id}").unwrap();
        assert_eq!(names, vec!["id"]);
    }

    #[test]
    fn test_star_segments_are_static() {
        for raw in ["/static/*", "/a/*rest/b", "/files/*path"] {
            let template = PathTemplate::parse(raw).unwrap();
            assert!(!template.has_params(), "{raw}");
            assert!(template.param_names().is_empty(), "{raw}");
        }

        let template = PathTemplate::parse("/a/*rest/b").unwrap();
        assert_eq!(template.segments()[1].kind, SegmentKind::Static);
        assert_eq!(template.segments()[1].raw, "*rest");
    }

    #[test]
    fn test_unbalanced_braces() {
        assert!(matches!(
            PathTemplate::parse("/users/{id").unwrap_err(),
            TemplateError::Unbalanced { .. }
        ));
        assert!(matches!(
            PathTemplate::parse("/users/id}").unwrap_err(),
            TemplateError::Unbalanced { .. }
        ));
    }

    #[test]
    fn test_empty_placeholder() {
        assert!(matches!(
            PathTemplate::parse("/users/{}").unwrap_err(),
            TemplateError::EmptyPlaceholder { .. }
        ));
        assert!(matches!(
            PathTemplate::parse("/users/{int:}").unwrap_err(),
            TemplateError::EmptyPlaceholder { .. }
        ));
    }
}
