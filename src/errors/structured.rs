use serde_json::{Map, Value};
use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use super::builder::{ErrorSpec, IncompleteError};
use super::codes::ValidationCode;
use super::trace;
use super::variant::{Variant, VariantInfo};
use crate::config::TraceOptions;

/// Diagnostic payload attached to an error
pub type Props = Map<String, Value>;

/// Shared handle to the error that caused another one
pub type Cause = Arc<dyn Error + Send + Sync + 'static>;

/// Base error carrying a machine-readable code, a message, an optional cause
/// and an optional props payload.
///
/// Values are built through [`ErrorSpec`] or one of the shorthand constructors
/// and never change afterwards. Constructors return the error to raise: when
/// the code or message is missing that is an `error.code-missing` /
/// `error.message-missing` error whose cause is the [`IncompleteError`] that
/// was attempted.
#[derive(Debug, Clone)]
pub struct StructuredError {
    variant: VariantInfo,
    code: String,
    message: String,
    cause: Option<Cause>,
    props: Option<Props>,
    location: &'static Location<'static>,
}

impl Variant for StructuredError {
    fn parent() -> Option<VariantInfo> {
        None
    }
}

impl StructuredError {
    /// Start an error of the base variant
    pub fn builder() -> ErrorSpec {
        ErrorSpec::new::<Self>()
    }

    /// Start an error of variant `V`
    pub fn of<V: Variant>() -> ErrorSpec {
        ErrorSpec::new::<V>()
    }

    #[track_caller]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::builder().code(code).message(message).build()
    }

    #[track_caller]
    pub fn with_props(
        code: impl Into<String>,
        message: impl Into<String>,
        props: impl Into<Props>,
    ) -> Self {
        Self::builder()
            .code(code)
            .message(message)
            .props(props)
            .build()
    }

    #[track_caller]
    pub fn caused_by<E>(cause: E, code: impl Into<String>, message: impl Into<String>) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::builder()
            .cause(cause)
            .code(code)
            .message(message)
            .build()
    }

    #[track_caller]
    pub fn caused_by_with_props<E>(
        cause: E,
        code: impl Into<String>,
        message: impl Into<String>,
        props: impl Into<Props>,
    ) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::builder()
            .cause(cause)
            .code(code)
            .message(message)
            .props(props)
            .build()
    }

    pub(crate) fn from_parts(
        variant: VariantInfo,
        code: String,
        message: String,
        cause: Option<Cause>,
        props: Option<Props>,
        location: &'static Location<'static>,
    ) -> Self {
        Self {
            variant,
            code,
            message,
            cause,
            props,
            location,
        }
    }

    /// The error raised in place of an attempt that failed validation.
    /// Always of the base variant.
    pub(crate) fn validation_failure(
        failure: ValidationCode,
        attempt: IncompleteError,
        location: &'static Location<'static>,
    ) -> Self {
        Self {
            variant: VariantInfo::of::<Self>(),
            code: failure.as_str().to_string(),
            message: failure.message().to_string(),
            cause: Some(Arc::new(attempt)),
            props: None,
            location,
        }
    }

    /// Concrete variant name, e.g. `TimeoutError`
    pub fn name(&self) -> &'static str {
        self.variant.name()
    }

    pub fn variant(&self) -> VariantInfo {
        self.variant
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    pub fn props(&self) -> Option<&Props> {
        self.props.as_ref()
    }

    /// Call site that constructed this error
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Exactly variant `V`
    pub fn is<V: Variant>(&self) -> bool {
        self.variant.is::<V>()
    }

    /// Variant `V` or any specialisation of it
    pub fn is_a<V: Variant>(&self) -> bool {
        self.variant.is_a::<V>()
    }

    /// Set when this error reports a construction with a missing code or message
    pub fn validation_code(&self) -> Option<ValidationCode> {
        if !self.is::<Self>() {
            return None;
        }
        match self.cause.as_deref() {
            Some(cause) if cause.is::<IncompleteError>() => ValidationCode::from_code(&self.code),
            _ => None,
        }
    }

    /// Full trace including the causal chain, rebuilt on every call
    pub fn trace(&self) -> String {
        self.format_trace()
    }

    pub fn format_trace(&self) -> String {
        self.format_trace_with(&TraceOptions::default())
    }

    pub fn format_trace_with(&self, options: &TraceOptions) -> String {
        trace::format_trace(self, options)
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.message)
    }
}

impl Error for StructuredError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Props {
        match value {
            Value::Object(map) => map,
            _ => panic!("props fixture must be an object"),
        }
    }

    #[test]
    fn test_new_sets_fields() {
        let err = StructuredError::new("my-code", "my-message");
        assert_eq!(err.name(), "StructuredError");
        assert_eq!(err.code(), "my-code");
        assert_eq!(err.message(), "my-message");
        assert!(err.cause().is_none());
        assert!(err.props().is_none());
        assert!(err.validation_code().is_none());
    }

    #[test]
    fn test_with_props_keeps_payload() {
        let payload = props(json!({ "foo": "bar", "attempt": 3 }));
        let err = StructuredError::with_props("props-code", "props-message", payload.clone());
        assert_eq!(err.props(), Some(&payload));
        assert!(err.cause().is_none());
    }

    #[test]
    fn test_caused_by_exposes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = StructuredError::caused_by(io, "storage.write", "could not persist");

        let source = err.source().expect("source should be set");
        assert_eq!(source.to_string(), "disk gone");
        assert!(source.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_display_is_first_trace_line() {
        let err = StructuredError::new("code", "message");
        assert_eq!(err.to_string(), "StructuredError: message");
    }

    #[test]
    fn test_location_points_at_caller() {
        let line = line!() + 1;
        let err = StructuredError::new("code", "message");
        assert_eq!(err.location().file(), file!());
        assert_eq!(err.location().line(), line);
    }

    #[test]
    fn test_validation_code_on_failure_path() {
        let err = StructuredError::builder().build();
        assert_eq!(err.validation_code(), Some(ValidationCode::CodeMissing));

        // A consumer reusing the literal code is not a validation failure
        let err = StructuredError::new("error.code-missing", "copied code");
        assert!(err.validation_code().is_none());
    }

    #[test]
    fn test_is_send_sync_static() {
        fn assert_bounds<T: Error + Send + Sync + 'static>() {}
        assert_bounds::<StructuredError>();
    }
}
