//! Template parsing errors.

use thiserror::Error;

/// Errors raised while parsing a path template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A `{` without a matching `}` (or the reverse).
    #[error("unbalanced braces in segment '{segment}' of path '{template}'")]
    Unbalanced {
        /// The full template.
        template: String,
        /// The offending segment.
        segment: String,
    },

    /// A placeholder with no name, e.g. `{}` or `{int:}`.
    #[error("empty placeholder in path '{template}'")]
    EmptyPlaceholder {
        /// The full template.
        template: String,
    },
}

impl TemplateError {
    pub(crate) fn unbalanced(template: &str, segment: &str) -> Self {
        Self::Unbalanced {
            template: template.to_string(),
            segment: segment.to_string(),
        }
    }

    pub(crate) fn empty_placeholder(template: &str) -> Self {
        Self::EmptyPlaceholder {
            template: template.to_string(),
        }
    }

    /// Returns the template that failed to parse.
    #[must_use]
    pub fn template(&self) -> &str {
        match self {
            Self::Unbalanced { template, .. } | Self::EmptyPlaceholder { template } => template,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TemplateError::unbalanced("/a/{b", "{b");
        assert!(err.to_string().contains("{b"));
        assert_eq!(err.template(), "/a/{b");

        let err = TemplateError::empty_placeholder("/a/{}");
        assert!(err.to_string().contains("/a/{}"));
    }
}
