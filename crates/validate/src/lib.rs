mod duration;
mod hostname;

use std::fmt;

pub use duration::{convert_to_sec, TimeUnit};
pub use hostname::format_es_url;

/// Something that may or may not carry text.
///
/// Validators accept any `TextInput` so values read from loosely typed
/// sources (JSON documents, TOML config files) are checked for their kind
/// before their content.
pub trait TextInput {
    /// The text, if this value is text
    fn as_text(&self) -> Option<&str>;

    /// Human readable name of the value's kind, used in error messages
    fn kind_name(&self) -> &'static str;
}

impl TextInput for str {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }

    fn kind_name(&self) -> &'static str {
        "string"
    }
}

impl TextInput for String {
    fn as_text(&self) -> Option<&str> {
        Some(self.as_str())
    }

    fn kind_name(&self) -> &'static str {
        "string"
    }
}

impl TextInput for serde_json::Value {
    fn as_text(&self) -> Option<&str> {
        self.as_str()
    }

    fn kind_name(&self) -> &'static str {
        match self {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }
}

impl TextInput for toml::Value {
    fn as_text(&self) -> Option<&str> {
        self.as_str()
    }

    fn kind_name(&self) -> &'static str {
        self.type_str()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Name of the argument that failed validation
    pub field: &'static str,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(field: &'static str, kind: ValidationErrorKind) -> Self {
        Self { field, kind }
    }

    /// The input was not text at all
    pub fn is_invalid_kind(&self) -> bool {
        matches!(self.kind, ValidationErrorKind::InvalidKind { .. })
    }

    /// The input was text, but of the wrong shape
    pub fn is_malformed(&self) -> bool {
        !self.is_invalid_kind()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.kind)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErrorKind {
    InvalidKind { found: &'static str },
    ContainsSpace { value: String },
    MissingPort { value: String },
    MissingHost { value: String },
    MissingUnit { value: String },
    UnknownUnit { value: String, unit: char },
    InvalidNumber { value: String, reason: String },
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationErrorKind::InvalidKind { found } => {
                write!(f, "expected a string, you provided {}", found)
            }
            ValidationErrorKind::ContainsSpace { value } => {
                write!(f, "'{}' must not contain literal spaces", value)
            }
            ValidationErrorKind::MissingPort { value } => write!(
                f,
                "no port found in '{}'. Expected a string of the form \
                 [transfer_protocol][hostname]:[port], e.g. \"http://myindex.mysite.com:9200\"",
                value
            ),
            ValidationErrorKind::MissingHost { value } => {
                write!(f, "could not find a hostname in '{}'", value)
            }
            ValidationErrorKind::MissingUnit { value } => write!(
                f,
                "'{}' has no time unit. Expected '<number><time_unit>', e.g. '5m'",
                value
            ),
            ValidationErrorKind::UnknownUnit { value, unit } => write!(
                f,
                "could not figure out units of '{}' (found '{}'). Only seconds (s), \
                 minutes (m), hours (h), days (d) and weeks (w) are supported",
                value, unit
            ),
            ValidationErrorKind::InvalidNumber { value, reason } => {
                write!(f, "invalid number in '{}': {}", value, reason)
            }
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Extract the text of `input`, or fail with an `InvalidKind` error
fn require_text<'a, T>(field: &'static str, input: &'a T) -> ValidationResult<&'a str>
where
    T: TextInput + ?Sized,
{
    input.as_text().ok_or_else(|| {
        ValidationError::new(
            field,
            ValidationErrorKind::InvalidKind {
                found: input.kind_name(),
            },
        )
    })
}
