//! # Hypatia Core
//!
//! Core types shared by every Hypatia crate.
//!
//! This crate provides the vocabulary signature analysis is written in:
//!
//! - [`TypeRef`], [`ModelDef`], [`FieldDef`] - declared parameter annotations
//! - [`SourceKind`], [`ParamSource`], [`ParamDefault`] - parameter-source markers
//! - [`SignatureError`] - registration-time configuration errors
//! - [`SignatureOptions`] - analysis behaviour switches

#![doc(html_root_url = "https://docs.rs/hypatia-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod fixtures;
mod options;
mod source;
mod types;

pub use error::{SignatureError, SignatureResult};
pub use options::{BodyShortcut, PathParamPolicy, SignatureOptions};
pub use source::{ParamDefault, ParamSource, SourceKind};
pub use types::{FieldDef, ModelDef, TypeRef};
