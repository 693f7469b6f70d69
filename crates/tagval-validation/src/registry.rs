// Validator registry: rule name -> validator function

use crate::descriptor::FieldValue;
use crate::error::ValidationFailure;
use crate::validators::{validate_datetime, validate_greater_than, validate_required};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tagval_yaml::YamlWithSourceInfo;

/// A registered validator.
///
/// Arguments are the field value, the document key of the field, the
/// document node holding the value, and the rule parameter (`""` when the
/// rule has none).
pub type ValidatorFn = Arc<
    dyn Fn(&FieldValue<'_>, &str, &YamlWithSourceInfo, &str) -> Result<(), ValidationFailure>
        + Send
        + Sync,
>;

/// Mapping from rule name to validator.
///
/// Pass one explicitly to [`validate_struct_with`](crate::validate_struct_with)
/// to keep validation isolated, or use the process-wide instance through
/// [`register_validator`].
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, ValidatorFn>,
}

impl ValidatorRegistry {
    /// Create a registry with no validators at all
    pub fn new() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in `required`, `gt` and `datetime`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("required", validate_required);
        registry.register("gt", validate_greater_than);
        registry.register("datetime", validate_datetime);
        registry
    }

    /// Register a validator under `name`, replacing any previous one
    pub fn register<F>(&mut self, name: impl Into<String>, validator: F)
    where
        F: Fn(&FieldValue<'_>, &str, &YamlWithSourceInfo, &str) -> Result<(), ValidationFailure>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        if self.validators.contains_key(&name) {
            tracing::debug!(rule = %name, "replacing registered validator");
        }
        self.validators.insert(name, Arc::new(validator));
    }

    pub fn lookup(&self, name: &str) -> Option<&ValidatorFn> {
        self.validators.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Registered rule names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators", &self.names())
            .finish()
    }
}

/// Process-wide registry, seeded with the built-in validators on first use.
static DEFAULT_REGISTRY: Lazy<RwLock<ValidatorRegistry>> =
    Lazy::new(|| RwLock::new(ValidatorRegistry::with_defaults()));

/// Register a validator in the process-wide registry.
///
/// Meant for start-up; registering while another thread validates only
/// affects passes that begin afterwards.
pub fn register_validator<F>(name: impl Into<String>, validator: F)
where
    F: Fn(&FieldValue<'_>, &str, &YamlWithSourceInfo, &str) -> Result<(), ValidationFailure>
        + Send
        + Sync
        + 'static,
{
    DEFAULT_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(name, validator);
}

/// Look up a validator in the process-wide registry.
pub fn lookup_validator(name: &str) -> Option<ValidatorFn> {
    DEFAULT_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .lookup(name)
        .cloned()
}

/// A copy of the process-wide registry.
///
/// Each validation pass works on its own snapshot, so validators may
/// register further validators without deadlocking.
pub fn default_registry() -> ValidatorRegistry {
    DEFAULT_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
