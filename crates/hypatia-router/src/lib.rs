//! Path template parsing for Hypatia.
//!
//! Handlers are registered against templates such as `/users/{user_id}` or
//! `/orgs/{int:org_id}/files/{name}`. This crate parses those templates and
//! extracts the set of declared path-parameter names, which the signature
//! analyser uses to decide which handler parameters are bound to the path.
//!
//! # Example
//!
//! ```rust
//! use hypatia_router::{path_param_names, PathTemplate, SegmentKind};
//!
//! let names = path_param_names("/users/{user_id}/posts/{int:post_id}").unwrap();
//! assert_eq!(names, vec!["user_id", "post_id"]);
//!
//! let template = PathTemplate::parse("/files/*path").unwrap();
//! assert!(matches!(template.segments()[1].kind, SegmentKind::Static));
//! ```

#![doc(html_root_url = "https://docs.rs/hypatia-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod template;

pub use error::TemplateError;
pub use template::{path_param_names, PathTemplate, Placeholder, Segment, SegmentKind};
