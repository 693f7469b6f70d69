// Error types for struct-tag validation

use serde::{Deserialize, Serialize};
use std::fmt;
use tagval_yaml::{SourceInfo, YamlWithSourceInfo};
use thiserror::Error;

/// Structured validation error kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ValidationErrorKind {
    /// A field tagged `required` has no key in the document
    MissingRequiredField { field: String },

    /// A `required` field is present but holds the zero value of its kind
    Required { field: String },

    /// An integer field failed a `gt` threshold
    NotGreaterThan { field: String, threshold: i64 },

    /// A string field does not parse against a `datetime` layout
    InvalidDatetime { field: String, layout: String },

    /// A rule names a validator that was never registered
    ///
    /// Only produced under [`UnknownRulePolicy::Fail`](crate::UnknownRulePolicy::Fail).
    UnknownValidator { field: String, rule: String },

    /// Failure reported by a caller-registered validator
    Custom { field: String, message: String },
}

impl ValidationErrorKind {
    /// Get the error code for this error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationErrorKind::MissingRequiredField { .. } => "TV-1-10",
            ValidationErrorKind::Required { .. } => "TV-1-11",
            ValidationErrorKind::NotGreaterThan { .. } => "TV-1-12",
            ValidationErrorKind::InvalidDatetime { .. } => "TV-1-13",
            ValidationErrorKind::UnknownValidator { .. } => "TV-1-20",
            ValidationErrorKind::Custom { .. } => "TV-1-99",
        }
    }

    /// Format a human-readable message from this error kind
    pub fn message(&self) -> String {
        match self {
            ValidationErrorKind::MissingRequiredField { field } => {
                format!("required field '{}' is missing", field)
            }
            ValidationErrorKind::Required { field } => format!("field '{}' is required", field),
            ValidationErrorKind::NotGreaterThan { field, threshold } => {
                format!("field '{}' must be greater than {}", field, threshold)
            }
            ValidationErrorKind::InvalidDatetime { field, .. } => {
                format!("field '{}' has invalid datetime format", field)
            }
            ValidationErrorKind::UnknownValidator { field, rule } => {
                format!("field '{}' uses unknown validation rule '{}'", field, rule)
            }
            ValidationErrorKind::Custom { message, .. } => message.clone(),
        }
    }

    /// Document key of the field this error is about
    pub fn field(&self) -> &str {
        match self {
            ValidationErrorKind::MissingRequiredField { field }
            | ValidationErrorKind::Required { field }
            | ValidationErrorKind::NotGreaterThan { field, .. }
            | ValidationErrorKind::InvalidDatetime { field, .. }
            | ValidationErrorKind::UnknownValidator { field, .. }
            | ValidationErrorKind::Custom { field, .. } => field,
        }
    }
}

/// Validation error pointing at a node of the source document
#[derive(Debug, Clone, PartialEq, Error)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// Where the offending node starts. For a missing field this is the
    /// enclosing mapping, since there is no field node to point at.
    pub source_info: SourceInfo,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation error at {}: {}",
            self.source_info,
            self.kind.message()
        )
    }
}

impl ValidationError {
    /// Create an error located at `node`
    pub fn new(kind: ValidationErrorKind, node: &YamlWithSourceInfo) -> Self {
        Self::at(kind, node.source_info.clone())
    }

    pub fn at(kind: ValidationErrorKind, source_info: SourceInfo) -> Self {
        Self { kind, source_info }
    }

    pub fn line(&self) -> usize {
        self.source_info.line
    }

    pub fn column(&self) -> usize {
        self.source_info.col
    }

    pub fn message(&self) -> String {
        self.kind.message()
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }
}

/// Errors raised by a validator itself rather than by the value it checks.
///
/// These carry no document position: they describe a mistake in the rule
/// tag (a malformed parameter) or a rule applied to a field it cannot check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorError {
    #[error("invalid parameter '{param}' for rule '{rule}': {reason}")]
    InvalidParameter {
        rule: String,
        param: String,
        reason: String,
    },

    #[error("rule '{rule}' cannot check a {kind} value")]
    UnsupportedKind { rule: String, kind: &'static str },
}

/// One entry of a validation pass result.
///
/// Callers handle a single type: either a positioned error about the
/// document, or an opaque error about the validation setup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationFailure {
    #[error(transparent)]
    Positioned(#[from] ValidationError),

    #[error(transparent)]
    Opaque(#[from] ValidatorError),
}

impl ValidationFailure {
    pub fn as_positioned(&self) -> Option<&ValidationError> {
        match self {
            ValidationFailure::Positioned(error) => Some(error),
            ValidationFailure::Opaque(_) => None,
        }
    }

    /// Human-readable message without position prefix
    pub fn message(&self) -> String {
        match self {
            ValidationFailure::Positioned(error) => error.message(),
            ValidationFailure::Opaque(error) => error.to_string(),
        }
    }

    /// `(line, column)` of the offending node, when there is one
    pub fn position(&self) -> Option<(usize, usize)> {
        self.as_positioned().map(|e| (e.line(), e.column()))
    }
}
