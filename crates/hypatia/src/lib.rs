//! # Hypatia
//!
//! **Handler signature introspection and parameter binding**
//!
//! Hypatia analyses a handler's declared parameters once, at registration
//! time, and works out where each argument comes from:
//!
//! - **Source inference** – path, query, header, cookie, form, file or body,
//!   decided by an ordered rule table
//! - **Flattening** – structured parameters on flat sources are spread into
//!   one wire name per leaf field, with collisions rejected
//! - **Schema synthesis** – one schema per source, ready for validation and
//!   dispatch
//! - **Documentation** – OpenAPI parameters and request bodies generated from
//!   the same analysis
//!
//! ## Quick Start
//!
//! ```rust
//! use hypatia::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HypatiaConfig::development();
//! let mut registry = ViewRegistry::with_config(&config);
//!
//! registry.register(
//!     "GET",
//!     "/search",
//!     Signature::new("search")
//!         .param(Parameter::new("request"))
//!         .param(Parameter::new("filters")
//!             .annotated(hypatia::core::fixtures::filters_model())
//!             .default_source(ParamSource::query())),
//! )?;
//!
//! let doc = registry.openapi(OpenApiGenerator::new().title("Search"))?;
//! assert!(doc.paths.contains_key("/search"));
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/hypatia/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod registry;

pub use registry::{RegisteredView, ViewRegistry};

// Re-export core types
pub use hypatia_core as core;

// Re-export path template parsing
pub use hypatia_router as router;

// Re-export signature analysis
pub use hypatia_signature as signature;

// Re-export logging setup
pub use hypatia_telemetry as telemetry;

// Re-export configuration
pub use hypatia_config as config;

// Re-export documentation generation
pub use hypatia_docs as docs;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use hypatia::prelude::*;
///
/// let source = ParamSource::header().alias("X-Token");
/// assert_eq!(source.kind(), SourceKind::Header);
/// ```
pub mod prelude {
    pub use crate::registry::{RegisteredView, ViewRegistry};

    pub use hypatia_core::{
        BodyShortcut, FieldDef, ModelDef, ParamDefault, ParamSource, PathParamPolicy,
        SignatureError, SignatureOptions, SignatureResult, SourceKind, TypeRef,
    };

    // Re-export signature descriptors and results
    pub use hypatia_signature::{
        ArgDefault, Diagnostic, FlattenMap, FuncParam, Parameter, ParameterKind, SchemaShape,
        Signature, SynthesizedSchema, ViewSignature,
    };

    // Re-export configuration and logging
    pub use hypatia_config::{ConfigLoader, HypatiaConfig};
    pub use hypatia_telemetry::{init_logging, LogConfig};

    // Re-export documentation
    pub use hypatia_docs::{OpenApi, OpenApiGenerator};
}
