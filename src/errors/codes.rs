use serde::{Deserialize, Serialize};
use std::fmt;

/// Code raised when an error is constructed without a code
pub const CODE_MISSING: &str = "error.code-missing";

/// Code raised when an error is constructed without a message
pub const MESSAGE_MISSING: &str = "error.message-missing";

/// Failure codes produced by the error construct itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationCode {
    /// No code, or an empty one, was supplied
    #[serde(rename = "error.code-missing")]
    CodeMissing,

    /// No message, or an empty one, was supplied
    #[serde(rename = "error.message-missing")]
    MessageMissing,
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CodeMissing => CODE_MISSING,
            Self::MessageMissing => MESSAGE_MISSING,
        }
    }

    /// Human-readable message attached to the raised error
    pub fn message(&self) -> &'static str {
        match self {
            Self::CodeMissing => "BaseError must be thrown with a code",
            Self::MessageMissing => "BaseError must be thrown with a message",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            CODE_MISSING => Some(Self::CodeMissing),
            MESSAGE_MISSING => Some(Self::MessageMissing),
            _ => None,
        }
    }
}
