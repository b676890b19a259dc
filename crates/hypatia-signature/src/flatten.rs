//! Flatten maps for flat request sources.
//!
//! Query strings, headers, cookies, form fields and path segments are flat
//! key/value lists. A structured parameter bound to one of them is spread
//! over one wire key per leaf field:
//!
//! ```text
//! def search(request, filters: Filters = Query(...))
//!
//!   Filters { q, tags (alias "tag"), price: Range { min, max } }
//!
//!   wire name   path
//!   q           filters -> q
//!   tag         filters -> tag
//!   min         filters -> price -> min
//!   max         filters -> price -> max
//! ```
//!
//! The path lets the dispatcher rebuild the nested value from the flat keys.

use std::fmt;

use hypatia_core::{ModelDef, SignatureError, SignatureResult};
use indexmap::IndexMap;

use crate::infer::FuncParam;

/// Separator used when a path is rendered as a single key (ASCII record
/// separator, which does not appear in query names).
pub const FLATTEN_PATH_SEP: char = '\u{1e}';

/// Attribute steps from a root parameter alias to a leaf field alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlattenPath(Vec<String>);

impl FlattenPath {
    /// Creates a path from its steps.
    #[must_use]
    pub fn new<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(steps.into_iter().map(Into::into).collect())
    }

    /// Parses a path rendered with [`FLATTEN_PATH_SEP`].
    #[must_use]
    pub fn from_joined(joined: &str) -> Self {
        Self::new(joined.split(FLATTEN_PATH_SEP))
    }

    /// Renders the path with [`FLATTEN_PATH_SEP`].
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.join(&FLATTEN_PATH_SEP.to_string())
    }

    /// All steps.
    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.0
    }

    /// The root parameter alias.
    #[must_use]
    pub fn root(&self) -> &str {
        self.0.first().map_or("", String::as_str)
    }

    /// The leaf step.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    /// Steps after the root.
    pub fn nested_steps(&self) -> impl Iterator<Item = &str> {
        self.0.iter().skip(1).map(String::as_str)
    }

    /// True if the path descends into a model.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.0.len() > 1
    }

    fn child(&self, step: &str) -> Self {
        let mut steps = self.0.clone();
        steps.push(step.to_string());
        Self(steps)
    }
}

impl fmt::Display for FlattenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Wire name to attribute path, plus the reverse lookups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlattenMap {
    paths: IndexMap<String, FlattenPath>,
    reverse: IndexMap<FlattenPath, String>,
    owners: IndexMap<String, String>,
}

impl FlattenMap {
    /// The path for a wire name.
    #[must_use]
    pub fn get(&self, wire_name: &str) -> Option<&FlattenPath> {
        self.paths.get(wire_name)
    }

    /// True if the wire name is mapped.
    #[must_use]
    pub fn contains(&self, wire_name: &str) -> bool {
        self.paths.contains_key(wire_name)
    }

    /// The wire name a path is read from.
    #[must_use]
    pub fn wire_name_for(&self, path: &FlattenPath) -> Option<&str> {
        self.reverse.get(path).map(String::as_str)
    }

    /// The handler parameter that produced a wire name.
    #[must_use]
    pub fn owner(&self, wire_name: &str) -> Option<&str> {
        self.owners.get(wire_name).map(String::as_str)
    }

    /// Wire names and paths in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlattenPath)> {
        self.paths.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Wire names in insertion order.
    pub fn wire_names(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    /// The `path -> wire name` map.
    #[must_use]
    pub fn reverse(&self) -> &IndexMap<FlattenPath, String> {
        &self.reverse
    }

    /// Number of wire names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True if nothing is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn insert(&mut self, wire_name: String, path: FlattenPath, owner: &str) -> SignatureResult<()> {
        if let Some(first) = self.owners.get(&wire_name) {
            return Err(SignatureError::duplicate_wire_name(wire_name, first.clone(), owner));
        }
        self.reverse.insert(path.clone(), wire_name.clone());
        self.owners.insert(wire_name.clone(), owner.to_string());
        self.paths.insert(wire_name, path);
        Ok(())
    }
}

/// Builds the flatten map for one flat source group.
///
/// # Errors
///
/// Returns [`SignatureError::DuplicateWireName`] naming both parameters when
/// two leaves (or a leaf and a plain parameter) share a wire name.
pub fn build_flatten_map(args: &[FuncParam]) -> SignatureResult<FlattenMap> {
    let mut map = FlattenMap::default();

    for arg in args {
        match arg.annotation.as_model() {
            Some(model) => {
                let root = FlattenPath::new([arg.alias.as_str()]);
                for (wire_name, path) in model_leaves(model, &root) {
                    map.insert(wire_name, path, &arg.name)?;
                }
            }
            None => {
                let path = FlattenPath::new([arg.alias.as_str()]);
                map.insert(arg.alias.clone(), path, &arg.name)?;
            }
        }
    }

    Ok(map)
}

/// Leaf wire names of a model, each with its full path from `prefix`.
fn model_leaves(model: &ModelDef, prefix: &FlattenPath) -> Vec<(String, FlattenPath)> {
    let mut leaves = Vec::new();
    for field in model.fields() {
        let path = prefix.child(field.wire_name());
        match field.inner_type().as_model() {
            Some(nested) => leaves.extend(model_leaves(nested, &path)),
            None => leaves.push((field.wire_name().to_string(), path)),
        }
    }
    leaves
}
