//! Structured error construct: code, message, optional cause and props

pub mod builder;
pub mod codes;
pub mod structured;
pub mod trace;
pub mod variant;

pub use builder::{ErrorSpec, IncompleteError};
pub use codes::{ValidationCode, CODE_MISSING, MESSAGE_MISSING};
pub use structured::{Cause, Props, StructuredError};
pub use variant::{Variant, VariantInfo};
