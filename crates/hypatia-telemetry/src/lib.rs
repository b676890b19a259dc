//! Logging setup for Hypatia.
//!
//! Hypatia crates emit structured events with `tracing`; this crate wires a
//! `tracing-subscriber` formatter to them, in JSON for production or pretty
//! output for development.
//!
//! # Example
//!
//! ```rust,ignore
//! use hypatia_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production()).expect("logging");
//! ```

#![doc(html_root_url = "https://docs.rs/hypatia-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
