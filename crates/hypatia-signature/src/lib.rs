//! # Hypatia Signature
//!
//! Handler signature introspection for Hypatia.
//!
//! At registration time every handler is analysed once: each parameter is
//! bound to the request part it is read from, parameters are grouped by
//! source, and one schema is synthesized per group. The result, a
//! [`ViewSignature`], tells the dispatcher how to build the handler's
//! arguments from a request.
//!
//! ## Components
//!
//! - [`classify`] - type predicates and repeated-field detection
//! - [`infer`] - the ordered source inference rules
//! - [`flatten`] - wire names for structured parameters on flat sources
//! - [`schema`] - per-source synthesized schemas
//! - [`ViewSignature`] / [`SignatureBuilder`] - the facade
//!
//! ## Example
//!
//! ```
//! use hypatia_core::{fixtures, ParamSource, SourceKind, TypeRef};
//! use hypatia_signature::{Parameter, Signature, ViewSignature};
//!
//! let signature = Signature::new("search")
//!     .param(Parameter::new("request"))
//!     .param(Parameter::new("filters").annotated(fixtures::filters_model())
//!         .default_source(ParamSource::query()))
//!     .param(Parameter::new("token").default_source(ParamSource::header().alias("X-Token")));
//!
//! let view = ViewSignature::new("/search", signature).unwrap();
//! let query = view.model(SourceKind::Query).unwrap();
//!
//! let names: Vec<_> = query.flatten_map().unwrap().wire_names().collect();
//! assert_eq!(names, vec!["q", "tag", "min", "max"]);
//! assert!(query.collection_fields().contains("tag"));
//! ```

#![doc(html_root_url = "https://docs.rs/hypatia-signature/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod classify;
mod diagnostic;
pub mod flatten;
pub mod infer;
mod reflect;
pub mod schema;
mod signature;

pub use classify::{detect_collection_fields, resolve_leaf, Leaf};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use flatten::{build_flatten_map, FlattenMap, FlattenPath, FLATTEN_PATH_SEP};
pub use infer::{infer_source, Classified, FuncParam, InferContext, RuleId};
pub use reflect::{
    clean_docstring, ArgDefault, ContributedParam, Parameter, ParameterKind, Signature,
    SourceLocation,
};
pub use schema::{SchemaField, SchemaShape, SynthesizedSchema};
pub use signature::{
    ModelsSynthesized, ParametersClassified, SignatureBuilder, Unbuilt, ViewSignature,
};
