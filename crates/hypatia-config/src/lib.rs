//! Typed configuration for Hypatia.
//!
//! This crate provides a strongly-typed configuration system with support
//! for:
//! - TOML and JSON configuration files
//! - `.env` files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use hypatia_config::ConfigLoader;
//!
//! # fn main() -> Result<(), hypatia_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_file("hypatia.toml")?
//!     .with_env_prefix("HYPATIA")
//!     .load()?;
//!
//! println!("path params: {:?}", config.signature.path_params);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [signature]
//! body_shortcut = "any_field"   # or "non_collection"
//! path_params = "warn"          # or "deny", "ignore"
//!
//! [logging]
//! enabled = true
//! level = "info,hypatia_signature=debug"
//! json_format = true
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden via environment variables using the format
//! `PREFIX__SECTION__KEY`:
//!
//! - `HYPATIA__SIGNATURE__BODY_SHORTCUT=non_collection`
//! - `HYPATIA__SIGNATURE__PATH_PARAMS=deny`
//! - `HYPATIA__LOGGING__LEVEL=debug`

#![doc(html_root_url = "https://docs.rs/hypatia-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::HypatiaConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
