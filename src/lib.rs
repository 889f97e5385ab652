//! A single structured error type with a required code and message, an
//! optional causal chain and props payload, and an on-demand trace.
//!
//! ```
//! use structured_error::StructuredError;
//!
//! let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
//! let err = StructuredError::caused_by(io, "sync.upload", "upload failed");
//!
//! assert_eq!(err.code(), "sync.upload");
//! assert!(err.trace().contains("\nCaused by Error: connection reset"));
//! ```

pub mod config;
pub mod errors;
pub mod report;

pub use config::{ConfigError, TraceOptions};
pub use errors::{
    Cause, ErrorSpec, IncompleteError, Props, StructuredError, ValidationCode, Variant,
    VariantInfo,
};
