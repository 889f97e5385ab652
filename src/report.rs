//! Structured log emission for consumers of [`StructuredError`].
//!
//! Construction never logs. These helpers let an application record an error
//! it has decided to surface, with code, props and trace as separate fields.

use tracing::{error, Level};

use crate::errors::trace::props_json;
use crate::errors::StructuredError;

// Levels are part of static callsite metadata, so each level needs its own expansion
macro_rules! structured_event {
    ($level:expr, $err:expr) => {{
        let err: &StructuredError = $err;
        let props = err.props().map(props_json).unwrap_or_default();
        tracing::event!(
            $level,
            error.name = err.name(),
            error.code = err.code(),
            error.props = %props,
            error.trace = %err.trace(),
            "{}",
            err.message()
        );
    }};
}

/// Emit `err` as a single ERROR event
pub fn emit(err: &StructuredError) {
    structured_event!(Level::ERROR, err);
}

/// Emit `err` as a single WARN event
pub fn emit_at_warn(err: &StructuredError) {
    structured_event!(Level::WARN, err);
}

/// Find the outermost [`StructuredError`] in an `anyhow` chain
pub fn find_structured(err: &anyhow::Error) -> Option<&StructuredError> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<StructuredError>())
}

/// Emit the structured error inside `err`, or the plain chain when there is none.
/// Returns whether a structured error was found.
pub fn emit_chain(err: &anyhow::Error) -> bool {
    match find_structured(err) {
        Some(structured) => {
            emit(structured);
            true
        }
        None => {
            error!(error = %format!("{:#}", err), "unstructured error");
            false
        }
    }
}
