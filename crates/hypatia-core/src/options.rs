//! Analysis options.
//!
//! These knobs cover the two places where signature analysis has more than
//! one reasonable behaviour. Both default to the historical behaviour.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// When a body group with exactly one field binds that field directly to the
/// whole JSON body instead of requiring a wrapper key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyShortcut {
    /// Any lone body field binds directly, collections included.
    #[default]
    AnyField,
    /// A lone collection-typed body field keeps its wrapper key.
    NonCollection,
}

impl BodyShortcut {
    /// Returns true if a lone body field of this collection-ness binds directly.
    #[must_use]
    pub const fn applies(&self, is_collection: bool) -> bool {
        match self {
            Self::AnyField => true,
            Self::NonCollection => !is_collection,
        }
    }
}

impl FromStr for BodyShortcut {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any_field" => Ok(Self::AnyField),
            "non_collection" => Ok(Self::NonCollection),
            other => Err(format!(
                "unknown body shortcut '{other}', expected 'any_field' or 'non_collection'"
            )),
        }
    }
}

/// What to do when path template names have no matching handler parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathParamPolicy {
    /// Log a warning and keep the diagnostic on the signature.
    #[default]
    Warn,
    /// Fail registration.
    Deny,
    /// Drop the diagnostic.
    Ignore,
}

impl FromStr for PathParamPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "deny" => Ok(Self::Deny),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!(
                "unknown path param policy '{other}', expected 'warn', 'deny' or 'ignore'"
            )),
        }
    }
}

/// Options for signature analysis.
///
/// # Example
///
/// ```
/// use hypatia_core::{BodyShortcut, PathParamPolicy, SignatureOptions};
///
/// let options = SignatureOptions::default()
///     .with_body_shortcut(BodyShortcut::NonCollection)
///     .with_path_params(PathParamPolicy::Deny);
///
/// assert!(!options.body_shortcut.applies(true));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignatureOptions {
    /// Single-field body behaviour.
    pub body_shortcut: BodyShortcut,
    /// Missing path parameter behaviour.
    pub path_params: PathParamPolicy,
}

impl SignatureOptions {
    /// Sets the body shortcut behaviour.
    #[must_use]
    pub const fn with_body_shortcut(mut self, body_shortcut: BodyShortcut) -> Self {
        self.body_shortcut = body_shortcut;
        self
    }

    /// Sets the missing path parameter policy.
    #[must_use]
    pub const fn with_path_params(mut self, path_params: PathParamPolicy) -> Self {
        self.path_params = path_params;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SignatureOptions::default();
        assert_eq!(options.body_shortcut, BodyShortcut::AnyField);
        assert_eq!(options.path_params, PathParamPolicy::Warn);
    }

    #[test]
    fn test_body_shortcut_applies() {
        assert!(BodyShortcut::AnyField.applies(true));
        assert!(BodyShortcut::AnyField.applies(false));
        assert!(!BodyShortcut::NonCollection.applies(true));
        assert!(BodyShortcut::NonCollection.applies(false));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("DENY".parse::<PathParamPolicy>(), Ok(PathParamPolicy::Deny));
        assert_eq!(
            "non_collection".parse::<BodyShortcut>(),
            Ok(BodyShortcut::NonCollection)
        );
        assert!("loud".parse::<PathParamPolicy>().is_err());
    }

    #[test]
    fn test_deserialize() {
        let options: SignatureOptions =
            serde_json::from_str(r#"{"path_params": "ignore"}"#).unwrap();
        assert_eq!(options.path_params, PathParamPolicy::Ignore);
        assert_eq!(options.body_shortcut, BodyShortcut::AnyField);

        assert!(serde_json::from_str::<SignatureOptions>(r#"{"unknown": 1}"#).is_err());
    }
}
