//! # tagval-validation
//!
//! Declarative validation of decoded structs against the YAML document they
//! came from.
//!
//! Each validated field carries a rule tag such as `required,gt=18`. After
//! decoding, the struct is walked field by field, each field is matched to
//! its node in the parsed document, and every rule is dispatched by name to
//! a registered validator. All failures are collected, each pointing at the
//! line and column of the offending node.
//!
//! ## Example
//!
//! ```rust
//! use serde::Deserialize;
//! use tagval_validation::{unmarshal, validated_struct, UnmarshalError};
//!
//! #[derive(Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct Person {
//!     name: String,
//!     age: i64,
//!     created_at: String,
//! }
//!
//! validated_struct!(Person {
//!     name(yaml = "name", validate = "required"),
//!     age(yaml = "age", validate = "required,gt=18"),
//!     created_at(validate = "datetime=2006-01-02T15:04:05Z07:00"),
//! });
//!
//! let person: Person = unmarshal(
//!     "name: John\nage: 30\ncreated_at: \"2023-06-21T15:00:00Z\"\n",
//! )
//! .unwrap();
//! assert_eq!(person.age, 30);
//!
//! let err = unmarshal::<Person>("age: 16\n").unwrap_err();
//! assert!(matches!(err, UnmarshalError::Validation(ref f) if f.len() == 2));
//! ```
//!
//! ## Built-in rules
//!
//! - `required`: the value is not the zero value of its kind
//! - `gt=<n>`: the integer value is greater than `n`
//! - `datetime=<layout>`: the string parses against a reference-time layout
//!
//! Further rules are added with [`register_validator`] or
//! [`ValidatorRegistry::register`].

mod descriptor;
mod error;
mod layout;
mod macros;
mod options;
mod registry;
pub mod report;
mod rule;
mod unmarshal;
mod validator;
pub mod validators;

pub use descriptor::{
    FieldAccess, FieldDescriptor, FieldValue, StructDescriptor, StructDescriptorBuilder, Validate,
    YamlValue,
};
pub use error::{ValidationError, ValidationErrorKind, ValidationFailure, ValidatorError};
pub use layout::DatetimeLayout;
pub use options::{UnknownRulePolicy, ValidationOptions};
pub use registry::{
    ValidatorFn, ValidatorRegistry, default_registry, lookup_validator, register_validator,
};
pub use rule::{ValidationRule, parse_tag, tag_contains_required};
pub use unmarshal::{UnmarshalError, unmarshal, unmarshal_with};
pub use validator::{
    DynValidate, validate_struct, validate_struct_with, validate_struct_with_options,
    validate_value,
};

// Re-exported for the node type validators receive.
pub use tagval_yaml::{SourceInfo, YamlWithSourceInfo};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
