use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use super::codes::ValidationCode;
use super::structured::{Cause, Props, StructuredError};
use super::trace;
use super::variant::{Variant, VariantInfo};
use crate::config::TraceOptions;

/// Fields for constructing a [`StructuredError`].
///
/// `cause` and `props` are optional. `code` and `message` are required and an
/// empty string counts as missing. Validation checks the code first.
#[derive(Debug, Clone)]
pub struct ErrorSpec {
    variant: VariantInfo,
    cause: Option<Cause>,
    code: Option<String>,
    message: Option<String>,
    props: Option<Props>,
}

impl ErrorSpec {
    pub fn new<V: Variant>() -> Self {
        Self {
            variant: VariantInfo::of::<V>(),
            cause: None,
            code: None,
            message: None,
            props: None,
        }
    }

    pub fn cause<E>(self, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.shared_cause(Arc::new(cause))
    }

    /// Use an already shared cause, keeping its identity
    pub fn shared_cause(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = non_empty(code.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = non_empty(message.into());
        self
    }

    pub fn props(mut self, props: impl Into<Props>) -> Self {
        self.props = Some(props.into());
        self
    }

    /// Validate and build.
    ///
    /// `Err` holds the `error.code-missing` or `error.message-missing` error
    /// whose cause is the incomplete attempt.
    #[track_caller]
    pub fn try_build(self) -> Result<StructuredError, StructuredError> {
        let location = Location::caller();
        let ErrorSpec {
            variant,
            cause,
            code,
            message,
            props,
        } = self;

        match (code, message) {
            (Some(code), Some(message)) => Ok(StructuredError::from_parts(
                variant, code, message, cause, props, location,
            )),
            (code, message) => {
                let failure = if code.is_none() {
                    ValidationCode::CodeMissing
                } else {
                    ValidationCode::MessageMissing
                };
                let attempt = IncompleteError {
                    variant,
                    code,
                    message,
                    cause,
                    props,
                    location,
                };
                Err(StructuredError::validation_failure(
                    failure, attempt, location,
                ))
            }
        }
    }

    /// Build the error to raise: the requested one, or the validation failure
    /// standing in for it
    #[track_caller]
    pub fn build(self) -> StructuredError {
        match self.try_build() {
            Ok(err) | Err(err) => err,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// An attempted error that failed validation, kept as the cause of the
/// validation failure so the original fields stay inspectable
#[derive(Debug, Clone)]
pub struct IncompleteError {
    variant: VariantInfo,
    code: Option<String>,
    message: Option<String>,
    cause: Option<Cause>,
    props: Option<Props>,
    location: &'static Location<'static>,
}

impl IncompleteError {
    /// Name of the variant that was being constructed
    pub fn name(&self) -> &'static str {
        self.variant.name()
    }

    pub fn variant(&self) -> VariantInfo {
        self.variant
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    pub fn props(&self) -> Option<&Props> {
        self.props.as_ref()
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    pub fn trace(&self) -> String {
        trace::format_trace(self, &TraceOptions::default())
    }
}

impl fmt::Display for IncompleteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.name(), message),
            None => f.write_str(self.name()),
        }
    }
}

impl Error for IncompleteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}
