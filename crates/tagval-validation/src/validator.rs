// Field/node alignment and rule dispatch

use crate::descriptor::{FieldAccess, FieldDescriptor, Validate};
use crate::error::{ValidationError, ValidationErrorKind, ValidationFailure};
use crate::options::{UnknownRulePolicy, ValidationOptions};
use crate::registry::{ValidatorRegistry, default_registry};
use crate::rule::tag_contains_required;
use std::collections::HashMap;
use tagval_yaml::YamlWithSourceInfo;

/// Validate `target` against `node` using a snapshot of the process-wide
/// registry and default options.
///
/// Every tagged field is checked; failures come back in field declaration
/// order, then rule order. An empty result means the struct is valid.
pub fn validate_struct<T: Validate>(target: &T, node: &YamlWithSourceInfo) -> Vec<ValidationFailure> {
    validate_struct_with(&default_registry(), target, node)
}

/// Validate `target` against `node` using an explicit registry.
pub fn validate_struct_with<T: Validate>(
    registry: &ValidatorRegistry,
    target: &T,
    node: &YamlWithSourceInfo,
) -> Vec<ValidationFailure> {
    validate_struct_with_options(registry, &ValidationOptions::default(), target, node)
}

pub fn validate_struct_with_options<T: Validate>(
    registry: &ValidatorRegistry,
    options: &ValidationOptions,
    target: &T,
    node: &YamlWithSourceInfo,
) -> Vec<ValidationFailure> {
    let descriptor = T::descriptor();
    tracing::debug!(
        target_type = descriptor.name(),
        node_kind = node.kind().as_str(),
        "validating struct"
    );

    let mut context = ValidationContext::new(registry, options, node);
    for field in descriptor.fields() {
        context.check_field(field, target);
    }
    context.into_failures()
}

/// Validate any field-like value.
///
/// Values that are not described structs (strings, numbers, containers)
/// produce no failures: validation is one struct level per call.
pub fn validate_value(value: &dyn FieldAccess, node: &YamlWithSourceInfo) -> Vec<ValidationFailure> {
    match value.as_validatable() {
        Some(target) => {
            target.validate_dyn(&default_registry(), &ValidationOptions::default(), node)
        }
        None => {
            tracing::trace!(
                kind = value.field_value().kind_name(),
                "value is not a validated struct"
            );
            Vec::new()
        }
    }
}

/// Object-safe form of [`Validate`], for values only known as
/// `&dyn FieldAccess`.
pub trait DynValidate {
    fn validate_dyn(
        &self,
        registry: &ValidatorRegistry,
        options: &ValidationOptions,
        node: &YamlWithSourceInfo,
    ) -> Vec<ValidationFailure>;
}

impl<T: Validate> DynValidate for T {
    fn validate_dyn(
        &self,
        registry: &ValidatorRegistry,
        options: &ValidationOptions,
        node: &YamlWithSourceInfo,
    ) -> Vec<ValidationFailure> {
        validate_struct_with_options(registry, options, self, node)
    }
}

/// State for one struct-level pass
struct ValidationContext<'a> {
    registry: &'a ValidatorRegistry,
    options: &'a ValidationOptions,
    /// The mapping the fields are read from; missing fields point here
    container: &'a YamlWithSourceInfo,
    /// Scalar key text -> value node. Empty unless `container` is a mapping.
    field_nodes: HashMap<&'a str, &'a YamlWithSourceInfo>,
    failures: Vec<ValidationFailure>,
}

impl<'a> ValidationContext<'a> {
    fn new(
        registry: &'a ValidatorRegistry,
        options: &'a ValidationOptions,
        container: &'a YamlWithSourceInfo,
    ) -> Self {
        let mut field_nodes = HashMap::new();
        // Non-scalar keys cannot name a field. A repeated key keeps its last value.
        for entry in container.entries() {
            if let Some(key) = entry.key.scalar_text() {
                field_nodes.insert(key, &entry.value);
            }
        }

        Self {
            registry,
            options,
            container,
            field_nodes,
            failures: Vec::new(),
        }
    }

    fn check_field<T>(&mut self, field: &FieldDescriptor<T>, target: &T) {
        if field.validate_tag().is_none() {
            return;
        }
        let key = field.yaml_key();

        let Some(node) = self.field_nodes.get(key).copied() else {
            if tag_contains_required(field.rules()) {
                tracing::trace!(field = key, "required field missing");
                self.add_error(
                    ValidationErrorKind::MissingRequiredField {
                        field: key.to_string(),
                    },
                    self.container,
                );
            }
            return;
        };

        let value = field.value(target).unwrapped();
        for rule in field.rules() {
            let Some(validator) = self.registry.lookup(&rule.name) else {
                tracing::warn!(field = key, rule = %rule.name, "no validator registered for rule");
                if self.options.unknown_rule == UnknownRulePolicy::Fail {
                    self.add_error(
                        ValidationErrorKind::UnknownValidator {
                            field: key.to_string(),
                            rule: rule.name.clone(),
                        },
                        node,
                    );
                }
                continue;
            };

            tracing::trace!(field = key, rule = %rule.name, param = rule.param(), "applying rule");
            if let Err(failure) = validator(&value, key, node, rule.param()) {
                self.failures.push(failure);
            }
        }
    }

    fn add_error(&mut self, kind: ValidationErrorKind, node: &YamlWithSourceInfo) {
        self.failures.push(ValidationError::new(kind, node).into());
    }

    fn into_failures(self) -> Vec<ValidationFailure> {
        self.failures
    }
}
