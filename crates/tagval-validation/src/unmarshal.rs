//! Decode a YAML document into a struct and validate it in one step.

use crate::descriptor::Validate;
use crate::error::ValidationFailure;
use crate::options::ValidationOptions;
use crate::registry::{ValidatorRegistry, default_registry};
use crate::validator::validate_struct_with_options;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnmarshalError {
    /// The text is not well-formed YAML
    #[error(transparent)]
    Parse(#[from] tagval_yaml::Error),

    /// The document does not fit the target type
    #[error("failed to decode document: {0}")]
    Decode(#[from] serde_yaml::Error),

    /// The decoded value breaks one or more rules
    #[error("{} validation failure(s)", .0.len())]
    Validation(Vec<ValidationFailure>),
}

impl UnmarshalError {
    /// The rule failures, when decoding itself succeeded
    pub fn failures(&self) -> &[ValidationFailure] {
        match self {
            UnmarshalError::Validation(failures) => failures,
            _ => &[],
        }
    }
}

/// Parse, decode and validate `text` with the process-wide registry.
pub fn unmarshal<T>(text: &str) -> Result<T, UnmarshalError>
where
    T: DeserializeOwned + Validate,
{
    unmarshal_with(&default_registry(), &ValidationOptions::default(), text)
}

pub fn unmarshal_with<T>(
    registry: &ValidatorRegistry,
    options: &ValidationOptions,
    text: &str,
) -> Result<T, UnmarshalError>
where
    T: DeserializeOwned + Validate,
{
    let node = tagval_yaml::parse(text)?;
    let value: T = serde_yaml::from_str(text)?;

    let failures = validate_struct_with_options(registry, options, &value, &node);
    if failures.is_empty() {
        Ok(value)
    } else {
        tracing::debug!(count = failures.len(), "decoded document failed validation");
        Err(UnmarshalError::Validation(failures))
    }
}
