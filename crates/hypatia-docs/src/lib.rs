//! # Hypatia Docs
//!
//! OpenAPI documentation for analysed handler signatures.
//!
//! Each [`ViewSignature`](hypatia_signature::ViewSignature) describes exactly
//! where a handler reads its arguments from. This crate renders that as an
//! OpenAPI 3.1 operation:
//!
//! - Path, query, header and cookie schemas become one parameter per
//!   flattened wire name, typed by the resolved leaf field
//! - Body schemas become an `application/json` request body
//! - Form fields become `application/x-www-form-urlencoded`, or
//!   `multipart/form-data` when files or JSON parts travel alongside
//! - Structured models are emitted once as component schemas
//!
//! ## Example
//!
//! ```
//! use hypatia_core::{fixtures, ParamSource};
//! use hypatia_docs::{OpenApiGenerator, ParameterIn};
//! use hypatia_signature::{Parameter, Signature, ViewSignature};
//!
//! let view = ViewSignature::new(
//!     "/items",
//!     Signature::new("list_items")
//!         .doc("List items.")
//!         .param(Parameter::new("paging").annotated(fixtures::pagination_model())
//!             .default_source(ParamSource::query())),
//! )
//! .unwrap();
//!
//! let mut generator = OpenApiGenerator::new().title("Shop").version("1.0.0");
//! generator.add_route("GET", &view).unwrap();
//!
//! let doc = generator.generate();
//! let op = doc.paths["/items"].get.as_ref().unwrap();
//! assert_eq!(op.summary.as_deref(), Some("List items."));
//! assert!(op.parameter("pageSize", ParameterIn::Query).is_some());
//! ```

#![doc(html_root_url = "https://docs.rs/hypatia-docs/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod generator;
mod openapi;

pub use error::{DocsError, DocsResult};
pub use generator::{
    describe_operation, openapi_path, split_docstring, OpenApiGenerator, SchemaRegistry,
    FORM_MEDIA_TYPE, JSON_MEDIA_TYPE, MULTIPART_MEDIA_TYPE,
};
pub use openapi::{
    Components, Info, MediaType, OpenApi, Operation, Parameter, ParameterIn, PathItem,
    RequestBody, Response, Schema, SchemaType,
};
